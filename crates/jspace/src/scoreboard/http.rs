//! Scoreboard reached over HTTP.

use tracing::{debug, info, instrument};

use crate::PlayerRecord;
use crate::scoreboard::{ScoreError, ScoreSink};

/// Score sink backed by a `jspace serve` instance.
#[derive(Debug, Clone)]
pub struct HttpScoreboard {
    base_url: String,
    client: reqwest::Client,
}

impl HttpScoreboard {
    /// Creates a client for the server at `base_url`.
    #[instrument(skip(base_url), fields(base_url = %base_url))]
    pub fn new(base_url: String) -> Self {
        info!("Creating HttpScoreboard");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self) -> String {
        format!("{}/api/highscores", self.base_url)
    }
}

#[async_trait::async_trait]
impl ScoreSink for HttpScoreboard {
    #[instrument(skip(self, record), fields(name = %record.name()))]
    async fn submit(&self, record: &PlayerRecord) -> Result<(), ScoreError> {
        let response = self
            .client
            .post(self.url())
            .json(record)
            .send()
            .await?
            .error_for_status()?;
        debug!(status = %response.status(), "Highscore submitted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_aggregate(&self) -> Result<serde_json::Value, ScoreError> {
        let board: serde_json::Value = self
            .client
            .get(self.url())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!("Highscores fetched");
        Ok(board)
    }
}
