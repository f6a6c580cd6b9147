//! Remote score reporting.
//!
//! The session reports passing attempts to a score sink and, at game over,
//! asks it for the aggregate board. Sink failures never change session state.

mod error;
mod http;
mod sqlite;

pub use error::ScoreError;
pub use http::HttpScoreboard;
pub use sqlite::SqliteScoreboard;

use crate::PlayerRecord;

/// Append-only sink for player progress.
#[async_trait::async_trait]
pub trait ScoreSink: Send + Sync {
    /// Reports a player's progress.
    async fn submit(&self, record: &PlayerRecord) -> Result<(), ScoreError>;

    /// Fetches the aggregate board as JSON.
    async fn fetch_aggregate(&self) -> Result<serde_json::Value, ScoreError>;
}
