//! First-class session invariants.
//!
//! Checked after every transition in debug builds.

use super::{GameState, SessionPhase};

/// What an invariant looks at: the state, the phase and the catalog size.
#[derive(Debug, Clone, Copy)]
pub struct SessionSnapshot {
    /// Progress counters.
    pub state: GameState,
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Number of tasks in the catalog.
    pub task_count: usize,
}

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
            (I3::holds(state), I3::description()),
        ]
        .into_iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(description))
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// The task index never passes the end of the catalog.
pub struct IndexInBounds;

impl Invariant<SessionSnapshot> for IndexInBounds {
    fn holds(snapshot: &SessionSnapshot) -> bool {
        *snapshot.state.current_task_index() <= snapshot.task_count
    }

    fn description() -> &'static str {
        "Task index is within 0..=catalog length"
    }
}

/// Advancement is enabled exactly while the session waits for `advance()`.
pub struct AdvanceMatchesPhase;

impl Invariant<SessionSnapshot> for AdvanceMatchesPhase {
    fn holds(snapshot: &SessionSnapshot) -> bool {
        *snapshot.state.advance_enabled() == (snapshot.phase == SessionPhase::AdvanceReady)
    }

    fn description() -> &'static str {
        "Advancement is enabled only in the advance-ready phase"
    }
}

/// Game over happens at, and only at, the end of the catalog.
pub struct GameOverAtEnd;

impl Invariant<SessionSnapshot> for GameOverAtEnd {
    fn holds(snapshot: &SessionSnapshot) -> bool {
        match snapshot.phase {
            SessionPhase::GameOver => {
                *snapshot.state.current_task_index() == snapshot.task_count
            }
            SessionPhase::NotStarted => true,
            _ => *snapshot.state.current_task_index() < snapshot.task_count,
        }
    }

    fn description() -> &'static str {
        "Game over is reached exactly at the end of the catalog"
    }
}

/// All session invariants as a composable set.
pub type SessionInvariants = (IndexInBounds, AdvanceMatchesPhase, GameOverAtEnd);
