//! Scoreboard kept in a local SQLite database.

use tracing::{debug, instrument};

use crate::PlayerRecord;
use crate::db::{HighscoreRepository, NewHighscore};
use crate::scoreboard::{ScoreError, ScoreSink};

/// Score sink that writes straight to a [`HighscoreRepository`].
///
/// Database calls are blocking, so they run on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct SqliteScoreboard {
    repository: HighscoreRepository,
}

impl SqliteScoreboard {
    /// Creates a sink backed by `repository`.
    #[instrument(skip(repository))]
    pub fn new(repository: HighscoreRepository) -> Self {
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &HighscoreRepository {
        &self.repository
    }
}

#[async_trait::async_trait]
impl ScoreSink for SqliteScoreboard {
    #[instrument(skip(self, record), fields(name = %record.name()))]
    async fn submit(&self, record: &PlayerRecord) -> Result<(), ScoreError> {
        let entry = NewHighscore::from_record(record)?;
        let repository = self.repository.clone();
        let stored = tokio::task::spawn_blocking(move || repository.upsert(entry)).await??;
        debug!(id = stored.id(), "Highscore stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_aggregate(&self) -> Result<serde_json::Value, ScoreError> {
        let repository = self.repository.clone();
        let board = tokio::task::spawn_blocking(move || repository.board()).await??;
        debug!(players = board.players(), "Highscore board built");
        Ok(serde_json::to_value(board)?)
    }
}
