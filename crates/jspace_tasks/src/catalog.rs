//! The fixed, ordered list of exercises.

use crate::lexer::DECLARATION_KEYWORDS;
use crate::rules::{PatternElement, Rule, TokenPattern};
use crate::token::{Token, TokenKind};
use derive_getters::Getters;
use derive_more::{Display, Error};
use tracing::{debug, info, instrument};

/// What the mentor says around one task.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MentorLines {
    /// Shown when the task is loaded.
    prompt: String,
    /// Shown after a passing submission.
    correct: String,
    /// Shown after a failing submission.
    wrong: String,
}

impl MentorLines {
    /// Creates the mentor lines for a task.
    pub fn new(
        prompt: impl Into<String>,
        correct: impl Into<String>,
        wrong: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            correct: correct.into(),
            wrong: wrong.into(),
        }
    }
}

/// One exercise: its instructions, its feedback and its rule.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct TaskDefinition {
    /// Position in the catalog.
    id: usize,
    /// Text shown in the output pane when the task is loaded.
    instruction: String,
    /// Optional mentor dialogue.
    mentor: Option<MentorLines>,
    /// Text shown after a passing submission.
    message_correct: String,
    /// Text shown after a failing submission.
    message_wrong: String,
    /// Check applied to submissions.
    rule: Rule,
}

impl TaskDefinition {
    /// Creates a task definition without mentor dialogue.
    pub fn new(
        id: usize,
        instruction: impl Into<String>,
        message_correct: impl Into<String>,
        message_wrong: impl Into<String>,
        rule: Rule,
    ) -> Self {
        Self {
            id,
            instruction: instruction.into(),
            mentor: None,
            message_correct: message_correct.into(),
            message_wrong: message_wrong.into(),
            rule,
        }
    }

    /// Attaches mentor dialogue.
    pub fn with_mentor(mut self, mentor: MentorLines) -> Self {
        self.mentor = Some(mentor);
        self
    }

    /// Runs this task's rule against a tokenized submission.
    #[instrument(skip(self, tokens), fields(task = self.id))]
    pub fn check(&self, tokens: &[Token]) -> bool {
        self.rule.validate(tokens)
    }
}

/// Error raised when a catalog is assembled incorrectly.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum CatalogError {
    /// A catalog needs at least one task.
    #[display("Task catalog is empty")]
    Empty,
    /// Task ids must equal their catalog position.
    #[display("Task at position {position} has id {id}")]
    IdMismatch {
        /// Position in the list.
        position: usize,
        /// Id found there.
        id: usize,
    },
}

/// Ordered, immutable list of tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCatalog {
    tasks: Vec<TaskDefinition>,
}

const MESSAGE_WRONG: &str =
    "Ouch! Something went wrong. Please check if you spelled everything in the right way, first.";

impl TaskCatalog {
    /// Builds a catalog, checking that ids are dense and start at zero.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the list is empty or an id is out of place.
    #[instrument(skip(tasks), fields(count = tasks.len()))]
    pub fn new(tasks: Vec<TaskDefinition>) -> Result<Self, CatalogError> {
        if tasks.is_empty() {
            return Err(CatalogError::Empty);
        }
        if let Some((position, task)) = tasks.iter().enumerate().find(|(i, t)| t.id != *i) {
            return Err(CatalogError::IdMismatch {
                position,
                id: task.id,
            });
        }
        debug!("Catalog assembled");
        Ok(Self { tasks })
    }

    /// The game's built-in exercises.
    #[instrument]
    pub fn standard() -> Self {
        let declaration = PatternElement::one_of(TokenKind::Keyword, DECLARATION_KEYWORDS);
        let assign = PatternElement::exact(TokenKind::Operator, "=");

        let tasks = vec![
            TaskDefinition::new(
                0,
                "TASK 1: Wake up the ship\n\n\
                 Every order you give the ship's computer is a line of JavaScript.\n\
                 Type any statement, for example:\n\n    \
                 let pilot = \"Ada\";\n\n\
                 and run it.",
                "Awesome! It worked. The ship's computer is listening.",
                MESSAGE_WRONG,
                Rule::WellFormed,
            )
            .with_mentor(MentorLines::new(
                "Welcome aboard, cadet. Let's see if you can talk to the computer.",
                "It understood you. A fine start.",
                "The computer could not make sense of that. Try again.",
            )),
            TaskDefinition::new(
                1,
                "TASK 2: Oxygen supply\n\n\
                 Declare a variable named oxygen that holds a number, for example:\n\n    \
                 let oxygen = 100;",
                "Good job you declared a variable with the name oxygen and a numeric value!",
                MESSAGE_WRONG,
                Rule::Contains(TokenPattern::new([
                    declaration,
                    PatternElement::exact(TokenKind::Identifier, "oxygen"),
                    assign,
                    PatternElement::kind(TokenKind::NumericLiteral),
                ])),
            )
            .with_mentor(MentorLines::new(
                "We are running low on air. Tell the computer how much oxygen is left.",
                "Breathe easy, the tanks are registered.",
                "That is not a numeric oxygen level. Check the name and the value.",
            )),
            TaskDefinition::new(
                2,
                "TASK 3: Call sign\n\n\
                 Declare a variable named callsign that holds a string, for example:\n\n    \
                 const callsign = \"Apollo\";",
                "Great! Mission control knows your call sign now.",
                MESSAGE_WRONG,
                Rule::Contains(TokenPattern::new([
                    declaration,
                    PatternElement::exact(TokenKind::Identifier, "callsign"),
                    assign,
                    PatternElement::kind(TokenKind::StringLiteral),
                ])),
            )
            .with_mentor(MentorLines::new(
                "Mission control needs to know who is flying. Give yourself a call sign.",
                "Roger that. Welcome to the fleet.",
                "A call sign is text, so it needs quotes.",
            )),
        ];

        info!(count = tasks.len(), "Built standard task catalog");
        Self { tasks }
    }

    /// Returns the task at `index`.
    pub fn get(&self, index: usize) -> Option<&TaskDefinition> {
        self.tasks.get(index)
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterates the tasks in progression order.
    pub fn iter(&self) -> impl Iterator<Item = &TaskDefinition> {
        self.tasks.iter()
    }
}

impl Default for TaskCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
