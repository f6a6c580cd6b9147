//! Highscore database error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Highscore database error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Highscore database error: {} at {}:{}", message, file, line)]
pub struct DbError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates a new database error with caller location tracking.
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

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::NotFound => Self::new("No highscore entry for that player"),
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::new(format!("Player already has an entry: {}", info.message()))
            }
            other => Self::new(format!("Highscore query failed: {}", other)),
        }
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Cannot open highscore database: {}", err))
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for DbError {
    #[track_caller]
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::new(format!("Highscore schema migration failed: {}", err))
    }
}

impl From<std::num::TryFromIntError> for DbError {
    #[track_caller]
    fn from(err: std::num::TryFromIntError) -> Self {
        Self::new(format!("Progress counter does not fit a highscore column: {}", err))
    }
}
