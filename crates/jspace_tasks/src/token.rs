//! Core lexical types shared by the lexer, the rules and the wire format.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Classification of a lexical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum TokenKind {
    /// A name that is not a reserved word.
    Identifier,
    /// A reserved word such as `let` or `return`.
    Keyword,
    /// A number in any supported notation.
    NumericLiteral,
    /// A quoted string, quotes included.
    StringLiteral,
    /// An arithmetic, logical, comparison or assignment operator.
    Operator,
    /// Delimiters and statement terminators.
    Punctuation,
    /// Anything the lexer could not classify.
    Unknown,
}

impl TokenKind {
    /// Returns true for kinds that carry a value on their own
    /// (names, reserved words and literals).
    pub fn is_value_bearing(self) -> bool {
        matches!(
            self,
            Self::Identifier | Self::Keyword | Self::NumericLiteral | Self::StringLiteral
        )
    }
}

/// A classified slice of learner source.
///
/// Tokens are immutable once produced. `position` is the byte offset of the
/// first character of `value` in the original source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Token {
    /// Token classification.
    kind: TokenKind,
    /// Raw source text of the token.
    value: String,
    /// Byte offset of the token in the source.
    position: usize,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, value: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
        }
    }

    /// Returns true if the token has the given kind and exact value.
    pub fn is(&self, kind: TokenKind, value: &str) -> bool {
        self.kind == kind && self.value == value
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:?})@{}", self.kind, self.value, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_wire_triple() {
        let token = Token::new(TokenKind::Keyword, "let", 0);
        let json = serde_json::to_value(&token).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({ "kind": "Keyword", "value": "let", "position": 0 })
        );
    }

    #[test]
    fn test_getters_expose_fields() {
        let token = Token::new(TokenKind::Identifier, "oxygen", 4);
        assert_eq!(*token.kind(), TokenKind::Identifier);
        assert_eq!(token.value(), "oxygen");
        assert_eq!(*token.position(), 4);
        assert!(token.is(TokenKind::Identifier, "oxygen"));
    }

    #[test]
    fn test_value_bearing_kinds() {
        assert!(TokenKind::Identifier.is_value_bearing());
        assert!(TokenKind::NumericLiteral.is_value_bearing());
        assert!(!TokenKind::Operator.is_value_bearing());
        assert!(!TokenKind::Unknown.is_value_bearing());
    }
}
