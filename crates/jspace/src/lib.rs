//! JSpace - a coding exercise game.
//!
//! A [`GameSession`] walks a learner through the exercises of a
//! [`TaskCatalog`](jspace_tasks::TaskCatalog): every submission is tokenized,
//! checked against the current task's rule, counted and saved, and solved tasks
//! are reported to a score sink.
//!
//! Collaborators sit behind traits so they can be swapped:
//! - [`TokenSource`]: [`LocalTokenizer`] or [`HttpTokenizer`]
//! - [`PersistenceGateway`]: [`MemoryStore`] or [`FileStore`]
//! - [`ScoreSink`]: [`SqliteScoreboard`] or [`HttpScoreboard`]
//!
//! The [`server`] module serves the tokenizer and the highscore board over HTTP
//! and [`Console`] plays the game in a terminal.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
mod config;
mod console;
pub mod db;
mod record;
mod scoreboard;
pub mod server;
mod session;
mod storage;
mod tokenize;

pub use config::{ConfigError, JspaceConfig};
pub use console::{Console, NEXT_COMMAND, QUIT_COMMAND, TOKENS_COMMAND};
pub use db::{DbError, Highscore, HighscoreBoard, HighscoreRepository, NewHighscore};
pub use record::{PLAYER_KEY, PlayerRecord};
pub use scoreboard::{HttpScoreboard, ScoreError, ScoreSink, SqliteScoreboard};
pub use session::{
    AdvanceMatchesPhase, AdvanceOutcome, EditorInput, EditorOutput, ExternalFault, FAREWELL,
    GAME_OVER, GameOverAtEnd, GameSession, GameState, IndexInBounds, Invariant, InvariantSet,
    InvariantViolation, Mentor, MentorMood, NOTHING_TYPED, SessionError, SessionInvariants,
    SessionPhase, SessionPorts, SessionSnapshot, StartOutcome, SubmitOutcome, Verdict,
};
pub use storage::{FileStore, MemoryStore, PersistenceGateway, StorageError};
pub use tokenize::{
    HttpTokenizer, LocalTokenizer, TokenSource, TokenizeError, TokenizeRequest, TokenizeResponse,
};
