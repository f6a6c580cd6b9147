//! Task rules.
//!
//! Every rule is a pure predicate over a token sequence: no state, no I/O,
//! and the tokens are only ever borrowed.

mod pattern;
mod well_formed;

pub use pattern::{PatternElement, TokenPattern, ValueMatch};
pub use well_formed::{brackets_balanced, is_well_formed};

use crate::token::Token;
use tracing::{debug, instrument};

/// The check a task applies to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// The submission looks like plausible code.
    WellFormed,
    /// The submission contains the pattern as a contiguous run of tokens.
    Contains(TokenPattern),
}

impl Rule {
    /// Applies the rule to `tokens`.
    #[instrument(skip_all, fields(rule = self.name(), tokens = tokens.len()))]
    pub fn validate(&self, tokens: &[Token]) -> bool {
        let verdict = match self {
            Self::WellFormed => is_well_formed(tokens),
            Self::Contains(pattern) => pattern.is_match(tokens),
        };
        debug!(verdict, "Rule applied");
        verdict
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::WellFormed => "well_formed",
            Self::Contains(_) => "contains",
        }
    }
}

/// Applies `rule` to `tokens`.
pub fn validate(tokens: &[Token], rule: &Rule) -> bool {
    rule.validate(tokens)
}
