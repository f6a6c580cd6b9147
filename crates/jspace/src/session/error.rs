//! Session errors and the faults reported alongside normal outcomes.

use derive_more::{Display, Error, From};

use crate::scoreboard::ScoreError;
use crate::storage::StorageError;
use crate::tokenize::TokenizeError;

/// Misuse of the state machine, or a submission that could not be evaluated.
///
/// Returned before any state is touched.
#[derive(Debug, Clone, Display, Error)]
pub enum SessionError {
    /// `start()` has not been called.
    #[display("Session has not been started")]
    NotStarted,
    /// Every task is already solved.
    #[display("Game is over")]
    GameOver,
    /// The current task is solved; call `advance()` first.
    #[display("Current task is solved, advance to continue")]
    AwaitingAdvance,
    /// `advance()` called without a passing submission.
    #[display("Advancing is not enabled")]
    AdvanceNotEnabled,
    /// The token source failed; the attempt was abandoned.
    #[display("Could not tokenize submission: {}", _0)]
    Tokenizer(TokenizeError),
}

/// Collaborator failure that did not stop the transition.
#[derive(Debug, Clone, Display, Error, From)]
pub enum ExternalFault {
    /// The progress store failed.
    #[display("Storage fault: {}", _0)]
    Storage(StorageError),
    /// The score sink failed.
    #[display("Scoreboard fault: {}", _0)]
    Scoreboard(ScoreError),
}
