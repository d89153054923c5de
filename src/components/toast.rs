use dioxus::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::stores::settings_store;

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub title: Option<String>,
    pub message: String,
}

/// Toasts currently on screen, oldest first
pub static TOASTS: GlobalSignal<Vec<Toast>> = Signal::global(Vec::new);

static NEXT_TOAST_ID: AtomicU64 = AtomicU64::new(1);

const MAX_TOASTS: usize = 4;

fn push_toast(toasts: &mut Vec<Toast>, toast: Toast) {
    toasts.push(toast);
    if toasts.len() > MAX_TOASTS {
        let overflow = toasts.len() - MAX_TOASTS;
        toasts.drain(..overflow);
    }
}

fn enqueue(title: Option<String>, message: String) {
    let id = NEXT_TOAST_ID.fetch_add(1, Ordering::Relaxed);
    push_toast(&mut TOASTS.write(), Toast { id, title, message });

    let duration_ms = settings_store::current_config().toast_duration_secs * 1000;
    spawn(async move {
        gloo_timers::future::TimeoutFuture::new(duration_ms as u32).await;
        dismiss(id);
    });
}

/// Short message at the bottom of the screen
pub fn show_toast(message: impl Into<String>) {
    enqueue(None, message.into());
}

/// Toast with a bold title line
pub fn show_alert(title: impl Into<String>, message: impl Into<String>) {
    enqueue(Some(title.into()), message.into());
}

pub fn dismiss(id: u64) {
    TOASTS.write().retain(|toast| toast.id != id);
}

/// Renders its children plus the toast stack
#[component]
pub fn ToastProvider(children: Element) -> Element {
    rsx! {
        {children}

        div {
            class: "fixed bottom-4 right-4 z-50 flex flex-col gap-2 max-w-sm",
            for toast in TOASTS.read().iter().cloned() {
                div {
                    key: "{toast.id}",
                    class: "bg-card border border-border rounded-lg shadow-lg px-4 py-3 cursor-pointer",
                    role: "status",
                    onclick: move |_| dismiss(toast.id),
                    if let Some(title) = &toast.title {
                        p {
                            class: "font-semibold",
                            "{title}"
                        }
                    }
                    if !toast.message.is_empty() {
                        p {
                            class: "text-sm text-muted-foreground",
                            "{toast.message}"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toast(id: u64) -> Toast {
        Toast {
            id,
            title: None,
            message: format!("toast {}", id),
        }
    }

    #[test]
    fn test_oldest_toasts_dropped_past_limit() {
        let mut toasts = Vec::new();
        for id in 1..=6 {
            push_toast(&mut toasts, toast(id));
        }
        let ids: Vec<u64> = toasts.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 4, 5, 6]);
    }
}
