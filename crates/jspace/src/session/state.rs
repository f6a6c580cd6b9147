//! Session state and phase.

use derive_getters::Getters;
use derive_more::Display;

use crate::PlayerRecord;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SessionPhase {
    /// `start()` has not been called yet.
    #[display("not started")]
    NotStarted,
    /// Waiting for the learner to submit code.
    #[display("awaiting input")]
    AwaitingInput,
    /// A submission is being tokenized and checked.
    #[display("validating")]
    Validating,
    /// The current task was solved; waiting for `advance()`.
    #[display("advance ready")]
    AdvanceReady,
    /// Every task was solved.
    #[display("game over")]
    GameOver,
}

/// Progress counters owned by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters)]
pub struct GameState {
    /// Index of the current task; equals the catalog length at game over.
    current_task_index: usize,
    /// Non-empty submissions so far, across all tasks.
    retry_count: u32,
    /// Whether `advance()` is currently allowed.
    advance_enabled: bool,
}

impl GameState {
    /// State of a brand new game.
    pub fn fresh() -> Self {
        Self::default()
    }

    /// State resumed from a persisted record.
    pub fn from_record(record: &PlayerRecord) -> Self {
        Self {
            current_task_index: *record.task_index(),
            retry_count: *record.completed_tries(),
            advance_enabled: false,
        }
    }

    /// Builds the record persisted for this state.
    pub fn to_record(&self, name: &str) -> PlayerRecord {
        PlayerRecord::new(name.to_string(), self.current_task_index, self.retry_count)
    }

    pub(crate) fn count_attempt(&mut self) {
        self.retry_count = self.retry_count.saturating_add(1);
    }

    pub(crate) fn enable_advance(&mut self) {
        self.advance_enabled = true;
    }

    pub(crate) fn next_task(&mut self) {
        self.current_task_index += 1;
        self.advance_enabled = false;
    }

    #[cfg(test)]
    pub(crate) fn with_values(
        current_task_index: usize,
        retry_count: u32,
        advance_enabled: bool,
    ) -> Self {
        Self {
            current_task_index,
            retry_count,
            advance_enabled,
        }
    }
}
