//! Declarative token-sequence patterns.
//!
//! A pattern is an ordered list of element matchers. It matches a token
//! sequence when the elements line up with a contiguous run of tokens.

use crate::token::{Token, TokenKind};
use tracing::{debug, instrument};

/// Constraint on a token's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMatch {
    /// Any value of the right kind.
    Any,
    /// Exactly this value (case-sensitive).
    Exact(&'static str),
    /// Exactly one of these values (case-sensitive).
    OneOf(&'static [&'static str]),
}

impl ValueMatch {
    fn accepts(self, value: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => value == expected,
            Self::OneOf(options) => options.contains(&value),
        }
    }
}

/// Matcher for a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternElement {
    kind: TokenKind,
    value: ValueMatch,
}

impl PatternElement {
    /// Matches any token of `kind`.
    pub const fn kind(kind: TokenKind) -> Self {
        Self {
            kind,
            value: ValueMatch::Any,
        }
    }

    /// Matches a token of `kind` whose value is exactly `value`.
    pub const fn exact(kind: TokenKind, value: &'static str) -> Self {
        Self {
            kind,
            value: ValueMatch::Exact(value),
        }
    }

    /// Matches a token of `kind` whose value is one of `values`.
    pub const fn one_of(kind: TokenKind, values: &'static [&'static str]) -> Self {
        Self {
            kind,
            value: ValueMatch::OneOf(values),
        }
    }

    /// Returns true if `token` satisfies this element.
    pub fn matches(&self, token: &Token) -> bool {
        *token.kind() == self.kind && self.value.accepts(token.value())
    }
}

/// An ordered sequence of element matchers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPattern {
    elements: Vec<PatternElement>,
}

impl TokenPattern {
    /// Creates a pattern from its elements, in match order.
    pub fn new(elements: impl Into<Vec<PatternElement>>) -> Self {
        Self {
            elements: elements.into(),
        }
    }

    /// Returns the element matchers.
    pub fn elements(&self) -> &[PatternElement] {
        &self.elements
    }

    /// Finds the first run of tokens matching the pattern, scanning left to
    /// right. Returns the index of the first matched token.
    ///
    /// An empty pattern matches nothing.
    #[instrument(skip_all, fields(tokens = tokens.len(), elements = self.elements.len()))]
    pub fn find(&self, tokens: &[Token]) -> Option<usize> {
        if self.elements.is_empty() {
            return None;
        }

        let found = tokens.windows(self.elements.len()).position(|window| {
            window
                .iter()
                .zip(&self.elements)
                .all(|(token, element)| element.matches(token))
        });

        debug!(?found, "Pattern scan finished");
        found
    }

    /// Returns true if the pattern occurs anywhere in `tokens`.
    pub fn is_match(&self, tokens: &[Token]) -> bool {
        self.find(tokens).is_some()
    }
}
