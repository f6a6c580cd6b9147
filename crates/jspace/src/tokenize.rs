//! Token sources: where the session gets its token stream from.
//!
//! The lexer itself is pure and lives in `jspace_tasks`. A session may still
//! hand tokenization to a `jspace serve` backend, so it talks to a
//! [`TokenSource`] rather than calling the lexer directly.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use jspace_tasks::Token;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Body of `POST /api/tokenize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct TokenizeRequest {
    /// Source text to tokenize.
    source: String,
}

/// Response of `POST /api/tokenize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct TokenizeResponse {
    /// Tokens in source order.
    tokens: Vec<Token>,
}

/// Token source error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Tokenizer error: {} at {}:{}", message, file, line)]
pub struct TokenizeError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl TokenizeError {
    /// Creates a new tokenizer error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<reqwest::Error> for TokenizeError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("HTTP error: {}", err))
    }
}

/// Produces the token stream for a piece of learner source.
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync {
    /// Tokenizes `source`.
    async fn tokenize(&self, source: &str) -> Result<Vec<Token>, TokenizeError>;
}

/// In-process lexer. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTokenizer;

#[async_trait::async_trait]
impl TokenSource for LocalTokenizer {
    #[instrument(skip(self, source), fields(len = source.len()))]
    async fn tokenize(&self, source: &str) -> Result<Vec<Token>, TokenizeError> {
        Ok(jspace_tasks::tokenize(source))
    }
}

/// Tokenizer reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTokenizer {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTokenizer {
    /// Creates a client for the server at `base_url`.
    #[instrument(skip(base_url), fields(base_url = %base_url))]
    pub fn new(base_url: String) -> Self {
        info!("Creating HttpTokenizer");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl TokenSource for HttpTokenizer {
    #[instrument(skip(self, source), fields(len = source.len()))]
    async fn tokenize(&self, source: &str) -> Result<Vec<Token>, TokenizeError> {
        let response: TokenizeResponse = self
            .client
            .post(format!("{}/api/tokenize", self.base_url))
            .json(&TokenizeRequest::new(source.to_string()))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(count = response.tokens.len(), "Tokens received");
        Ok(response.tokens)
    }
}
