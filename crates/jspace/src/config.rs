//! Player configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Configuration for playing and serving JSpace.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct JspaceConfig {
    /// Name shown on the highscore board.
    #[serde(default = "default_player_name")]
    player_name: String,

    /// File that keeps the player's progress between runs.
    #[serde(default = "default_storage_path")]
    storage_path: PathBuf,

    /// Backend to tokenize and report scores through. Local when absent.
    #[serde(default)]
    server_url: Option<String>,

    /// SQLite database for the local highscore board.
    #[serde(default = "default_database_path")]
    database_path: String,
}

#[instrument]
fn default_player_name() -> String {
    std::env::var("USER").unwrap_or_else(|_| "cadet".to_string())
}

#[instrument]
fn default_storage_path() -> PathBuf {
    PathBuf::from("jspace_progress.json")
}

#[instrument]
fn default_database_path() -> String {
    "jspace.db".to_string()
}

impl Default for JspaceConfig {
    fn default() -> Self {
        Self {
            player_name: default_player_name(),
            storage_path: default_storage_path(),
            server_url: None,
            database_path: default_database_path(),
        }
    }
}

impl JspaceConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid configuration.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(player = %config.player_name, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file at `path` if it exists, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an existing file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Returns a copy with the given overrides applied.
    pub fn with_overrides(
        mut self,
        player_name: Option<String>,
        server_url: Option<String>,
    ) -> Self {
        if let Some(name) = player_name {
            self.player_name = name;
        }
        if server_url.is_some() {
            self.server_url = server_url;
        }
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
