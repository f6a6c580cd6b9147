//! Scoreboard error types.

use derive_more::{Display, Error};
use tracing::instrument;

use crate::db::DbError;

/// Score sink error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Scoreboard error: {} at {}:{}", message, file, line)]
pub struct ScoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ScoreError {
    /// Creates a new scoreboard error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<DbError> for ScoreError {
    #[track_caller]
    fn from(err: DbError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<reqwest::Error> for ScoreError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("HTTP error: {}", err))
    }
}

impl From<serde_json::Error> for ScoreError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {}", err))
    }
}

impl From<tokio::task::JoinError> for ScoreError {
    #[track_caller]
    fn from(err: tokio::task::JoinError) -> Self {
        Self::new(format!("Background task failed: {}", err))
    }
}
