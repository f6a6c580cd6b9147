//! Plausibility check for free-form code.
//!
//! This is not a grammar. It accepts token sequences that look like code:
//! something was typed, every token was recognized, brackets pair up, and at
//! least one statement carries a name, keyword or literal.

use crate::token::{Token, TokenKind};
use tracing::{debug, instrument};

/// Returns true if `tokens` looks like syntactically plausible code.
#[instrument(skip_all, fields(tokens = tokens.len()))]
pub fn is_well_formed(tokens: &[Token]) -> bool {
    if tokens.is_empty() {
        debug!("No tokens");
        return false;
    }

    if let Some(unknown) = tokens.iter().find(|t| *t.kind() == TokenKind::Unknown) {
        debug!(token = %unknown, "Unrecognized token");
        return false;
    }

    if !brackets_balanced(tokens) {
        debug!("Unbalanced brackets");
        return false;
    }

    let has_statement = tokens
        .split(|t| t.is(TokenKind::Punctuation, ";"))
        .any(|statement| statement.iter().any(|t| t.kind().is_value_bearing()));

    debug!(has_statement, "Statement scan finished");
    has_statement
}

/// Checks that `()`, `[]` and `{}` are balanced and properly nested.
pub fn brackets_balanced(tokens: &[Token]) -> bool {
    let mut open = Vec::new();

    for token in tokens.iter().filter(|t| *t.kind() == TokenKind::Punctuation) {
        match token.value().as_str() {
            "(" | "[" | "{" => open.push(token.value().as_str()),
            ")" => {
                if open.pop() != Some("(") {
                    return false;
                }
            }
            "]" => {
                if open.pop() != Some("[") {
                    return false;
                }
            }
            "}" => {
                if open.pop() != Some("{") {
                    return false;
                }
            }
            _ => {}
        }
    }

    open.is_empty()
}
