//! Error types for studyctl.

use thiserror::Error;

/// Every failure a studyctl operation can report.
///
/// None of these are fatal to the process: commands surface them as a
/// message and the session controller keeps its last known-good state.
#[derive(Debug, Error)]
pub enum StudyError {
    /// Input rejected before any network call was made.
    #[error("{0}")]
    Validation(String),

    /// The backend refused to start a session.
    #[error("Session could not be started: {0}")]
    StartRejected(String),

    /// The backend refused to end a session.
    #[error("Session could not be ended: {0}")]
    EndRejected(String),

    /// Website blocking failed. Never fatal to a running session.
    #[error("Website blocking not available: {0}")]
    BlockingUnavailable(String),

    /// Connection-level failure talking to the backend.
    #[error("Network error: {0}")]
    Network(String),

    /// A request exceeded its timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The requested transition is not legal in the current state.
    #[error("{0}")]
    InvalidState(String),

    /// Preferences failed schema validation.
    #[error("Invalid preferences: {0}")]
    Preferences(String),

    /// Configuration could not be loaded or saved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    /// File system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudyError {
    /// Whether the failure came from the transport rather than the backend's answer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }

    /// Re-label a backend refusal as a rejected start.
    ///
    /// Transport failures and validation errors keep their own kind.
    #[must_use]
    pub fn into_start_rejected(self) -> Self {
        match self {
            Self::Api { message, .. } | Self::NotFound(message) => Self::StartRejected(message),
            other => other,
        }
    }

    /// Re-label a backend refusal as a rejected end.
    #[must_use]
    pub fn into_end_rejected(self) -> Self {
        match self {
            Self::Api { message, .. } | Self::NotFound(message) => Self::EndRejected(message),
            other => other,
        }
    }
}

impl From<reqwest::Error> for StudyError {
    fn from(err: reqwest::Error) -> Self {
        let target = err
            .url()
            .map_or_else(|| "backend".to_string(), ToString::to_string);

        if err.is_timeout() {
            Self::Timeout(target)
        } else if err.is_decode() {
            Self::Network(format!("unexpected response from {target}: {err}"))
        } else {
            Self::Network(format!("{target}: {err}"))
        }
    }
}
