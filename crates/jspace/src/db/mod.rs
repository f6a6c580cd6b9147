//! Database persistence for the highscore board.

mod error;
mod models;
mod repository;
mod schema;

pub use error::DbError;
pub use models::{Highscore, HighscoreBoard, NewHighscore};
pub use repository::HighscoreRepository;
