//! Typed failures surfaced by the profile adapter.
//!
//! Every failure short-circuits before the layout engine runs; the app shows
//! each kind as its own presentation state and never retries on its own.

use thiserror::Error;

/// Category of a failed profile fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The requested account does not exist upstream.
    NotFound,
    /// Upstream throttling.
    RateLimited,
    /// Transport failure, malformed payload or unexpected status.
    Unknown,
}

/// Error returned by [`crate::net::fetch::ProfileClient::fetch_profile`].
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::NotFound, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::RateLimited, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Unknown, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == FetchErrorKind::NotFound
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::unknown(format!("Request timed out: {}", e))
        } else {
            Self::unknown(format!("Request failed: {}", e))
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        Self::unknown(format!("Malformed response: {}", e))
    }
}
