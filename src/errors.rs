//! Profile screen error types
//!
//! Typed errors shared by the services and the controllers. Transport code
//! works with `String` errors internally and converts at the service boundary.

use std::fmt;

/// Errors surfaced by profile services and controllers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// Device is offline; checked before follow actions and feed loads
    NetworkUnreachable,
    /// A backend call failed
    RemoteFetchFailed(String),
    /// Viewer has no account; routed to a registration prompt
    NotAuthorized,
    /// Avatar could not be fetched or decoded
    ImageLoadFailed(String),
}

impl ProfileError {
    /// Short title used when the error is shown as an alert
    pub fn title(&self) -> &'static str {
        match self {
            Self::NetworkUnreachable => "No connection",
            Self::RemoteFetchFailed(_) => "Request failed",
            Self::NotAuthorized => "Registration required",
            Self::ImageLoadFailed(_) => "Image unavailable",
        }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::RemoteFetchFailed(message.into())
    }
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkUnreachable => write!(f, "The Internet connection appears to be offline"),
            Self::RemoteFetchFailed(msg) => write!(f, "Remote fetch failed: {}", msg),
            Self::NotAuthorized => write!(f, "You can't follow someone without registration"),
            Self::ImageLoadFailed(msg) => write!(f, "Failed to load image: {}", msg),
        }
    }
}

impl std::error::Error for ProfileError {}

pub type ProfileResult<T> = Result<T, ProfileError>;
