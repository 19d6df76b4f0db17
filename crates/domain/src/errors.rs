//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Concord
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ConcordError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Meeting locked: {0}")]
    Guard(GuardReason),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a meeting-assist mutation was refused.
///
/// These are the state guards checked before any preference change: a
/// cancelled meeting, a scheduling window that has closed, an explicit
/// expiry that has passed, or a meeting that has already been finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GuardReason {
    Cancelled,
    WindowClosed,
    Expired,
    AlreadyScheduled,
}

impl std::fmt::Display for GuardReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "meeting is cancelled"),
            Self::WindowClosed => write!(f, "scheduling window has ended"),
            Self::Expired => write!(f, "meeting invite has expired"),
            Self::AlreadyScheduled => write!(f, "meeting is already scheduled"),
        }
    }
}

/// Result type alias for Concord operations
pub type Result<T> = std::result::Result<T, ConcordError>;
