//! The game session state machine.
//!
//! A session walks the learner through the task catalog:
//!
//! ```text
//! NotStarted -> AwaitingInput -> Validating -> AdvanceReady -> AwaitingInput (next task)
//!                     ^               |              |
//!                     +---- failed ---+              +-> GameOver (catalog exhausted)
//! ```
//!
//! Collaborators are injected: the token source, progress store and score sink
//! at construction, the editor and mentor ports at [`GameSession::start`].
//! Store and sink failures never change the in-memory state; they are logged
//! and returned as [`ExternalFault`]s next to the normal outcome.

mod error;
mod invariants;
mod ports;
mod state;

pub use error::{ExternalFault, SessionError};
pub use invariants::{
    AdvanceMatchesPhase, GameOverAtEnd, IndexInBounds, Invariant, InvariantSet, InvariantViolation,
    SessionInvariants, SessionSnapshot,
};
pub use ports::{EditorInput, EditorOutput, Mentor, MentorMood, SessionPorts};
pub use state::{GameState, SessionPhase};

use std::sync::Arc;

use derive_getters::Getters;
use jspace_tasks::{TaskCatalog, TaskDefinition};
use tracing::{debug, info, instrument, warn};

use crate::scoreboard::ScoreSink;
use crate::storage::{PersistenceGateway, StorageError};
use crate::tokenize::TokenSource;
use crate::{PLAYER_KEY, PlayerRecord};

/// Shown when a submission is blank.
pub const NOTHING_TYPED: &str = "You forgot to type something :)";

/// Shown in the output pane when the last task is solved.
pub const GAME_OVER: &str = "GAME OVER";

/// The mentor's parting words.
pub const FAREWELL: &str = "Good bye, old friend. May the Force be with you.";

/// Result of [`GameSession::start`].
#[derive(Debug, Clone, Getters)]
pub struct StartOutcome {
    /// Whether a saved game was resumed.
    resumed: bool,
    /// Task the session starts on.
    task_index: usize,
    /// Collaborator failures along the way.
    faults: Vec<ExternalFault>,
}

/// How a submission was judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Verdict {
    /// Blank input; nothing was evaluated.
    Empty,
    /// The current task's rule is satisfied.
    Passed,
    /// The current task's rule is not satisfied.
    Failed,
}

/// Result of a submission.
#[derive(Debug, Clone, Getters)]
pub struct SubmitOutcome {
    /// The judgement.
    verdict: Verdict,
    /// Retry count after this submission.
    retry_count: u32,
    /// Collaborator failures along the way.
    faults: Vec<ExternalFault>,
}

/// Result of [`GameSession::advance`].
#[derive(Debug, Clone)]
pub enum AdvanceOutcome {
    /// The next task is loaded.
    NextTask {
        /// Index of the newly loaded task.
        task_index: usize,
        /// Collaborator failures along the way.
        faults: Vec<ExternalFault>,
    },
    /// Every task is solved.
    GameOver {
        /// Aggregate scores, when the sink delivered them.
        board: Option<serde_json::Value>,
        /// Collaborator failures along the way.
        faults: Vec<ExternalFault>,
    },
}

impl AdvanceOutcome {
    /// Collaborator failures along the way.
    pub fn faults(&self) -> &[ExternalFault] {
        match self {
            Self::NextTask { faults, .. } | Self::GameOver { faults, .. } => faults,
        }
    }

    /// Whether the game ended.
    pub fn is_game_over(&self) -> bool {
        matches!(self, Self::GameOver { .. })
    }
}

/// One learner playing through the task catalog.
pub struct GameSession {
    catalog: TaskCatalog,
    player_name: String,
    tokenizer: Arc<dyn TokenSource>,
    store: Box<dyn PersistenceGateway>,
    scoreboard: Arc<dyn ScoreSink>,
    state: GameState,
    phase: SessionPhase,
    ports: Option<SessionPorts>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("player_name", &self.player_name)
            .field("tasks", &self.catalog.len())
            .field("state", &self.state)
            .field("phase", &self.phase)
            .field("ports", &self.ports)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Creates a session that has not started yet.
    #[instrument(skip_all, fields(player = %player_name.as_ref(), tasks = catalog.len()))]
    pub fn new(
        catalog: TaskCatalog,
        player_name: impl AsRef<str>,
        tokenizer: Arc<dyn TokenSource>,
        store: Box<dyn PersistenceGateway>,
        scoreboard: Arc<dyn ScoreSink>,
    ) -> Self {
        info!("Creating game session");
        Self {
            catalog,
            player_name: player_name.as_ref().to_string(),
            tokenizer,
            store,
            scoreboard,
            state: GameState::fresh(),
            phase: SessionPhase::NotStarted,
            ports: None,
        }
    }

    /// Current progress counters.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The task catalog.
    pub fn catalog(&self) -> &TaskCatalog {
        &self.catalog
    }

    /// The player's display name.
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// The task currently being worked on, `None` before start and after game over.
    pub fn current_task(&self) -> Option<&TaskDefinition> {
        match self.phase {
            SessionPhase::NotStarted | SessionPhase::GameOver => None,
            _ => self.catalog.get(*self.state.current_task_index()),
        }
    }

    /// Starts or restarts the session, resuming saved progress when possible.
    ///
    /// Shows the current task's instruction and mentor prompt and clears the
    /// learner's input. A fresh game is saved immediately.
    #[instrument(skip(self, ports), fields(player = %self.player_name))]
    pub fn start(&mut self, ports: SessionPorts) -> StartOutcome {
        let mut faults = Vec::new();
        let restored = match self.store.read(PLAYER_KEY) {
            Ok(saved) => saved.and_then(|json| self.parse_record(&json)),
            Err(e) => {
                warn!(error = %e, "Could not read saved progress");
                faults.push(ExternalFault::from(e));
                None
            }
        };

        let resumed = restored.is_some();
        self.state = restored
            .as_ref()
            .map(GameState::from_record)
            .unwrap_or_else(GameState::fresh);
        self.phase = SessionPhase::AwaitingInput;
        self.ports = Some(ports);
        self.load_task();

        if !resumed {
            faults.extend(self.persist());
        }

        info!(
            resumed,
            task_index = self.state.current_task_index(),
            retry_count = self.state.retry_count(),
            "Session started"
        );
        self.check_invariants();
        StartOutcome {
            resumed,
            task_index: *self.state.current_task_index(),
            faults,
        }
    }

    /// Judges `source` against the current task.
    ///
    /// Blank input only shows a reminder. Any other input counts as one
    /// attempt and is persisted. A pass enables advancing and shows its
    /// feedback before it is reported to the score sink.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the session is not accepting input or the
    /// token source fails. State is untouched in both cases.
    #[instrument(skip(self, source), fields(player = %self.player_name, len = source.len()))]
    pub async fn submit(&mut self, source: &str) -> Result<SubmitOutcome, SessionError> {
        match self.phase {
            SessionPhase::NotStarted => return Err(SessionError::NotStarted),
            SessionPhase::GameOver => return Err(SessionError::GameOver),
            SessionPhase::AdvanceReady => return Err(SessionError::AwaitingAdvance),
            SessionPhase::AwaitingInput | SessionPhase::Validating => {}
        }

        if source.trim().is_empty() {
            debug!("Blank submission");
            self.show(NOTHING_TYPED);
            return Ok(SubmitOutcome {
                verdict: Verdict::Empty,
                retry_count: *self.state.retry_count(),
                faults: Vec::new(),
            });
        }

        let Some(task) = self.catalog.get(*self.state.current_task_index()).cloned() else {
            return Err(SessionError::GameOver);
        };

        self.phase = SessionPhase::Validating;
        let tokens = match self.tokenizer.tokenize(source).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(error = %e, "Tokenizer failed, attempt abandoned");
                self.phase = SessionPhase::AwaitingInput;
                return Err(SessionError::Tokenizer(e));
            }
        };

        let passed = task.check(&tokens);
        self.state.count_attempt();
        let mut faults = self.persist();

        let verdict = if passed {
            self.state.enable_advance();
            self.phase = SessionPhase::AdvanceReady;
            self.show(task.message_correct().as_str());
            self.mentor_says(
                task.mentor().as_ref().map(|m| m.correct().as_str()),
                MentorMood::Success,
            );
            Verdict::Passed
        } else {
            self.phase = SessionPhase::AwaitingInput;
            self.show(task.message_wrong().as_str());
            self.mentor_says(
                task.mentor().as_ref().map(|m| m.wrong().as_str()),
                MentorMood::Failure,
            );
            Verdict::Failed
        };

        info!(
            task = task.id(),
            tokens = tokens.len(),
            %verdict,
            retry_count = self.state.retry_count(),
            "Submission judged"
        );
        self.check_invariants();

        if verdict == Verdict::Passed
            && let Err(e) = self.scoreboard.submit(&self.record()).await
        {
            warn!(error = %e, "Could not report score");
            faults.push(ExternalFault::from(e));
        }

        Ok(SubmitOutcome {
            verdict,
            retry_count: *self.state.retry_count(),
            faults,
        })
    }

    /// Submits whatever is in the input editor.
    ///
    /// # Errors
    ///
    /// Same as [`GameSession::submit`].
    #[instrument(skip(self))]
    pub async fn submit_from_editor(&mut self) -> Result<SubmitOutcome, SessionError> {
        let source = self
            .ports
            .as_ref()
            .map(|ports| ports.input.current_text())
            .ok_or(SessionError::NotStarted)?;
        self.submit(&source).await
    }

    /// Moves on after a passing submission.
    ///
    /// Loads the next task, or at the end of the catalog ends the game, shows
    /// the aggregate scores and clears saved progress.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] unless the current task was just solved.
    #[instrument(skip(self), fields(player = %self.player_name))]
    pub async fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        match self.phase {
            SessionPhase::NotStarted => return Err(SessionError::NotStarted),
            SessionPhase::GameOver => return Err(SessionError::GameOver),
            _ if !self.state.advance_enabled() => return Err(SessionError::AdvanceNotEnabled),
            _ => {}
        }

        self.state.next_task();
        let task_index = *self.state.current_task_index();

        if task_index >= self.catalog.len() {
            self.phase = SessionPhase::GameOver;
            self.show(GAME_OVER);
            self.mentor_says(Some(FAREWELL), MentorMood::Neutral);

            let mut faults = Vec::new();
            let board = match self.scoreboard.fetch_aggregate().await {
                Ok(board) => {
                    let pretty = serde_json::to_string_pretty(&board)
                        .unwrap_or_else(|_| board.to_string());
                    self.show(format!("{}\n\n{}", GAME_OVER, pretty));
                    Some(board)
                }
                Err(e) => {
                    warn!(error = %e, "Could not fetch highscores");
                    faults.push(ExternalFault::from(e));
                    None
                }
            };

            if let Err(e) = self.store.reset() {
                warn!(error = %e, "Could not clear saved progress");
                faults.push(ExternalFault::from(e));
            }

            info!(retry_count = self.state.retry_count(), "Game over");
            self.check_invariants();
            return Ok(AdvanceOutcome::GameOver { board, faults });
        }

        self.phase = SessionPhase::AwaitingInput;
        self.load_task();
        let faults = self.persist();

        info!(task_index, "Advanced to next task");
        self.check_invariants();
        Ok(AdvanceOutcome::NextTask { task_index, faults })
    }

    fn record(&self) -> PlayerRecord {
        self.state.to_record(&self.player_name)
    }

    fn parse_record(&self, json: &str) -> Option<PlayerRecord> {
        match serde_json::from_str::<PlayerRecord>(json) {
            Ok(record) if *record.task_index() < self.catalog.len() => Some(record),
            Ok(record) => {
                warn!(
                    task_index = record.task_index(),
                    tasks = self.catalog.len(),
                    "Saved progress is past the catalog, starting fresh"
                );
                None
            }
            Err(e) => {
                warn!(error = %e, "Saved progress is unreadable, starting fresh");
                None
            }
        }
    }

    fn persist(&self) -> Vec<ExternalFault> {
        let result = serde_json::to_string(&self.record())
            .map_err(StorageError::from)
            .and_then(|json| self.store.write(PLAYER_KEY, &json));
        match result {
            Ok(()) => {
                debug!("Progress saved");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Could not save progress");
                vec![ExternalFault::from(e)]
            }
        }
    }

    fn load_task(&mut self) {
        let Some(task) = self.catalog.get(*self.state.current_task_index()).cloned() else {
            return;
        };
        debug!(task = task.id(), "Loading task");
        self.show(task.instruction().as_str());
        self.mentor_says(
            task.mentor().as_ref().map(|m| m.prompt().as_str()),
            MentorMood::Neutral,
        );
        if let Some(ports) = self.ports.as_mut() {
            ports.input.clear();
        }
    }

    fn show(&mut self, text: impl Into<String>) {
        if let Some(ports) = self.ports.as_mut() {
            ports.show(text);
        }
    }

    fn mentor_says(&mut self, text: Option<&str>, mood: MentorMood) {
        if let Some(ports) = self.ports.as_mut() {
            ports.mentor_says(text, mood);
        }
    }

    /// What the invariants see right now.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            phase: self.phase,
            task_count: self.catalog.len(),
        }
    }

    fn check_invariants(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        if let Err(violations) = SessionInvariants::check_all(&self.snapshot()) {
            for violation in &violations {
                warn!(invariant = %violation.description, "Session invariant violated");
            }
            debug_assert!(violations.is_empty(), "session invariants violated: {:?}", violations);
        }
    }
}
