//! Line-based terminal front-end.
//!
//! The learner types code line by line; an empty line submits it. Commands:
//! `:next` advances after a solved task, `:tokens` prints the token stream of
//! the pending code as JSON, `:quit` leaves (progress is kept).

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, instrument, warn};

use crate::session::{
    AdvanceOutcome, EditorInput, EditorOutput, GameSession, Mentor, MentorMood, SessionPorts,
    Verdict,
};

/// Advances to the next task.
pub const NEXT_COMMAND: &str = ":next";
/// Prints the pending code's tokens.
pub const TOKENS_COMMAND: &str = ":tokens";
/// Leaves the game.
pub const QUIT_COMMAND: &str = ":quit";

type Buffer = Arc<Mutex<String>>;

fn lock(buffer: &Buffer) -> MutexGuard<'_, String> {
    buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct BufferInput {
    buffer: Buffer,
}

impl EditorInput for BufferInput {
    fn current_text(&self) -> String {
        lock(&self.buffer).clone()
    }

    fn clear(&mut self) {
        lock(&self.buffer).clear();
    }
}

struct StdoutOutput;

impl EditorOutput for StdoutOutput {
    fn set_text(&mut self, text: String) {
        println!("\n{}\n", text);
    }
}

struct StdoutMentor;

impl Mentor for StdoutMentor {
    fn set_text(&mut self, text: String) {
        println!("  [mentor] {}", text);
    }

    fn set_mood(&mut self, mood: MentorMood) {
        let face = match mood {
            MentorMood::Neutral => ":|",
            MentorMood::Success => ":D",
            MentorMood::Failure => ":(",
        };
        println!("  [mentor] {}", face);
    }
}

/// Terminal front-end holding the learner's pending code.
#[derive(Debug, Clone, Default)]
pub struct Console {
    buffer: Buffer,
}

impl Console {
    /// Creates a console with an empty input buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ports that read from this console's buffer and print to stdout.
    pub fn ports(&self) -> SessionPorts {
        SessionPorts::new(
            Box::new(BufferInput {
                buffer: self.buffer.clone(),
            }),
            Box::new(StdoutOutput),
        )
        .with_mentor(Box::new(StdoutMentor))
    }

    /// Code typed since the last submission.
    pub fn pending(&self) -> String {
        lock(&self.buffer).clone()
    }

    /// Plays `session` reading lines from `reader` until `:quit`, end of
    /// input, or game over.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input fails.
    #[instrument(skip_all, fields(player = %session.player_name()))]
    pub async fn run<R>(&self, session: &mut GameSession, reader: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            match line.trim() {
                QUIT_COMMAND => {
                    info!("Player quit");
                    break;
                }
                NEXT_COMMAND => match session.advance().await {
                    Ok(outcome @ AdvanceOutcome::GameOver { .. }) => {
                        debug!(faults = outcome.faults().len(), "Game finished");
                        break;
                    }
                    Ok(outcome) => debug!(faults = outcome.faults().len(), "Advanced"),
                    Err(e) => println!("{}", e),
                },
                TOKENS_COMMAND => {
                    let tokens = jspace_tasks::tokenize(&self.pending());
                    println!("{}", serde_json::to_string_pretty(&tokens)?);
                }
                "" => {
                    let result = session.submit_from_editor().await;
                    lock(&self.buffer).clear();
                    match result {
                        Ok(outcome) => {
                            if *outcome.verdict() == Verdict::Passed {
                                println!("Type {} to continue.", NEXT_COMMAND);
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "Submission not accepted");
                            println!("{}", e);
                        }
                    }
                }
                _ => {
                    let mut buffer = lock(&self.buffer);
                    if !buffer.is_empty() {
                        buffer.push('\n');
                    }
                    buffer.push_str(&line);
                }
            }
        }
        Ok(())
    }
}
