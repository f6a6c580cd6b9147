//! Narrow interfaces to the editor widgets and the mentor avatar.

/// Mentor expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MentorMood {
    /// Default face.
    Neutral,
    /// Shown after a passing submission.
    Success,
    /// Shown after a failing submission.
    Failure,
}

/// Where learner code comes from.
pub trait EditorInput: Send {
    /// Current contents of the input editor.
    fn current_text(&self) -> String;

    /// Empties the input editor.
    fn clear(&mut self);
}

/// Where instructions and feedback go.
pub trait EditorOutput: Send {
    /// Replaces the output editor's contents.
    fn set_text(&mut self, text: String);
}

/// The mentor avatar.
pub trait Mentor: Send {
    /// Replaces the speech bubble.
    fn set_text(&mut self, text: String);

    /// Changes the expression.
    fn set_mood(&mut self, mood: MentorMood);
}

/// Ports handed to [`GameSession::start`](super::GameSession::start).
pub struct SessionPorts {
    pub(crate) input: Box<dyn EditorInput>,
    pub(crate) output: Box<dyn EditorOutput>,
    pub(crate) mentor: Option<Box<dyn Mentor>>,
}

impl SessionPorts {
    /// Creates ports without a mentor.
    pub fn new(input: Box<dyn EditorInput>, output: Box<dyn EditorOutput>) -> Self {
        Self {
            input,
            output,
            mentor: None,
        }
    }

    /// Attaches a mentor.
    pub fn with_mentor(mut self, mentor: Box<dyn Mentor>) -> Self {
        self.mentor = Some(mentor);
        self
    }

    pub(crate) fn show(&mut self, text: impl Into<String>) {
        self.output.set_text(text.into());
    }

    pub(crate) fn mentor_says(&mut self, text: Option<&str>, mood: MentorMood) {
        if let Some(mentor) = self.mentor.as_mut() {
            if let Some(text) = text {
                mentor.set_text(text.to_string());
            }
            mentor.set_mood(mood);
        }
    }
}

impl std::fmt::Debug for SessionPorts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionPorts")
            .field("has_mentor", &self.mentor.is_some())
            .finish_non_exhaustive()
    }
}
