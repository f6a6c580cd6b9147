//! HTTP backend: remote tokenizer and highscore board.
//!
//! Routes:
//! - `POST /api/tokenize` takes `{"source": ...}` and returns `{"tokens": [...]}`
//! - `POST /api/highscores` upserts a player record
//! - `GET /api/highscores` returns the aggregate board

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tracing::{debug, error, info, instrument};

use crate::PlayerRecord;
use crate::db::{HighscoreBoard, HighscoreRepository, NewHighscore};
use crate::tokenize::{TokenizeRequest, TokenizeResponse};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    repository: Arc<HighscoreRepository>,
}

impl AppState {
    /// Creates handler state over `repository`.
    pub fn new(repository: HighscoreRepository) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }
}

/// Builds the API router.
#[instrument(skip(state))]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/tokenize", post(tokenize_handler))
        .route(
            "/api/highscores",
            get(list_highscores_handler).post(submit_highscore_handler),
        )
        .with_state(state)
}

/// Binds `host:port` and serves the API until the process exits.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the address cannot be bound.
#[instrument(skip(db_path), fields(db_path = %db_path))]
pub async fn serve(host: String, port: u16, db_path: String) -> Result<()> {
    let repository =
        HighscoreRepository::new(db_path).context("Failed to open highscore database")?;
    let app = router(AppState::new(repository));

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    info!("Server ready at http://{}:{}/", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[instrument(skip_all)]
async fn tokenize_handler(Json(request): Json<TokenizeRequest>) -> Json<TokenizeResponse> {
    let tokens = jspace_tasks::tokenize(request.source());
    debug!(len = request.source().len(), count = tokens.len(), "Tokenized");
    Json(TokenizeResponse::new(tokens))
}

#[instrument(skip_all)]
async fn submit_highscore_handler(
    State(state): State<AppState>,
    Json(record): Json<PlayerRecord>,
) -> Result<StatusCode, StatusCode> {
    debug!(name = %record.name(), task_index = record.task_index(), "Highscore submitted");
    if record.name().trim().is_empty() {
        debug!("Rejecting record without a name");
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let entry = NewHighscore::from_record(&record).map_err(|e| {
        debug!(error = %e, "Rejecting record");
        StatusCode::UNPROCESSABLE_ENTITY
    })?;

    let repository = state.repository.clone();
    tokio::task::spawn_blocking(move || repository.upsert(entry))
        .await
        .map_err(|e| {
            error!(error = %e, "Highscore task failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!(error = %e, "Failed to store highscore");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all)]
async fn list_highscores_handler(
    State(state): State<AppState>,
) -> Result<Json<HighscoreBoard>, StatusCode> {
    let repository = state.repository.clone();
    let board = tokio::task::spawn_blocking(move || repository.board())
        .await
        .map_err(|e| {
            error!(error = %e, "Highscore task failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!(error = %e, "Failed to load highscores");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    debug!(players = board.players(), "Serving highscores");
    Ok(Json(board))
}
