//! Database models and domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::PlayerRecord;
use crate::db::{DbError, schema};

/// Highscore row.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Queryable,
    Identifiable,
    Selectable,
    Getters,
    Serialize,
    Deserialize,
)]
#[diesel(table_name = schema::highscores)]
pub struct Highscore {
    id: i32,
    name: String,
    task_index: i32,
    completed_tries: i32,
    updated_at: NaiveDateTime,
}

/// Insertable highscore for recording a player's progress.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::highscores)]
pub struct NewHighscore {
    name: String,
    task_index: i32,
    completed_tries: i32,
}

impl NewHighscore {
    /// Converts a player record into an insertable row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a counter does not fit the column type.
    #[instrument(skip(record), fields(name = %record.name()))]
    pub fn from_record(record: &PlayerRecord) -> Result<Self, DbError> {
        let task_index = i32::try_from(*record.task_index())?;
        let completed_tries = i32::try_from(*record.completed_tries())?;
        Ok(Self::new(record.name().clone(), task_index, completed_tries))
    }
}

/// All highscores, best progress first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct HighscoreBoard {
    players: usize,
    entries: Vec<Highscore>,
}

impl HighscoreBoard {
    /// Creates a board from entries already in ranking order.
    #[instrument(skip(entries), fields(count = entries.len()))]
    pub fn new(entries: Vec<Highscore>) -> Self {
        Self {
            players: entries.len(),
            entries,
        }
    }
}
