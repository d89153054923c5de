use chrono::{DateTime, Utc};

/// Format a unix timestamp as relative time (e.g., "5m", "2h", "3d")
pub fn format_relative_time(timestamp: i64) -> String {
    format_relative_time_at(timestamp, Utc::now().timestamp())
}

fn format_relative_time_at(timestamp: i64, now: i64) -> String {
    if now < timestamp {
        return "just now".to_string();
    }

    let diff = now - timestamp;

    match diff {
        0..=59 => "just now".to_string(),
        60..=3599 => format!("{}m", diff / 60),
        3600..=86399 => format!("{}h", diff / 3600),
        86400..=604799 => format!("{}d", diff / 86400),
        _ => {
            // older than a week: show the date
            let dt = DateTime::from_timestamp(timestamp, 0).unwrap_or_else(Utc::now);
            dt.format("%b %d").to_string()
        }
    }
}
