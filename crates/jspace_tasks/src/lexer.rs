//! Lexer for learner-written JavaScript.
//!
//! The lexer is total: every input produces a token sequence, and anything
//! it cannot classify is emitted as [`TokenKind::Unknown`] so that rules can
//! reject it. Whitespace and comments never produce tokens.

use crate::token::{Token, TokenKind};
use tracing::{debug, instrument};

/// Keywords that introduce a variable declaration.
pub const DECLARATION_KEYWORDS: &[&str] = &["let", "var", "const"];

/// Reserved words classified as [`TokenKind::Keyword`].
const KEYWORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "import", "in", "instanceof", "let", "new", "null", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Operator and punctuation spellings, longest first so the first hit is
/// the longest match.
const SYMBOLS: &[(&str, TokenKind)] = &[
    (">>>=", TokenKind::Operator),
    ("...", TokenKind::Punctuation),
    ("===", TokenKind::Operator),
    ("!==", TokenKind::Operator),
    ("**=", TokenKind::Operator),
    ("<<=", TokenKind::Operator),
    (">>=", TokenKind::Operator),
    (">>>", TokenKind::Operator),
    ("&&=", TokenKind::Operator),
    ("||=", TokenKind::Operator),
    ("??=", TokenKind::Operator),
    ("=>", TokenKind::Operator),
    ("==", TokenKind::Operator),
    ("!=", TokenKind::Operator),
    ("<=", TokenKind::Operator),
    (">=", TokenKind::Operator),
    ("&&", TokenKind::Operator),
    ("||", TokenKind::Operator),
    ("??", TokenKind::Operator),
    ("?.", TokenKind::Punctuation),
    ("++", TokenKind::Operator),
    ("--", TokenKind::Operator),
    ("+=", TokenKind::Operator),
    ("-=", TokenKind::Operator),
    ("*=", TokenKind::Operator),
    ("/=", TokenKind::Operator),
    ("%=", TokenKind::Operator),
    ("&=", TokenKind::Operator),
    ("|=", TokenKind::Operator),
    ("^=", TokenKind::Operator),
    ("**", TokenKind::Operator),
    ("<<", TokenKind::Operator),
    (">>", TokenKind::Operator),
    ("=", TokenKind::Operator),
    ("+", TokenKind::Operator),
    ("-", TokenKind::Operator),
    ("*", TokenKind::Operator),
    ("/", TokenKind::Operator),
    ("%", TokenKind::Operator),
    ("<", TokenKind::Operator),
    (">", TokenKind::Operator),
    ("!", TokenKind::Operator),
    ("~", TokenKind::Operator),
    ("&", TokenKind::Operator),
    ("|", TokenKind::Operator),
    ("^", TokenKind::Operator),
    ("?", TokenKind::Operator),
    (";", TokenKind::Punctuation),
    (",", TokenKind::Punctuation),
    (".", TokenKind::Punctuation),
    ("(", TokenKind::Punctuation),
    (")", TokenKind::Punctuation),
    ("{", TokenKind::Punctuation),
    ("}", TokenKind::Punctuation),
    ("[", TokenKind::Punctuation),
    ("]", TokenKind::Punctuation),
    (":", TokenKind::Punctuation),
];

/// Returns true if `word` is a reserved word.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Splits `source` into classified tokens.
///
/// Never fails and never evaluates anything. The same input always yields
/// the same sequence.
#[instrument(skip(source), fields(len = source.len()))]
pub fn tokenize(source: &str) -> Vec<Token> {
    let tokens = Lexer::new(source).run();
    debug!(
        count = tokens.len(),
        unknown = tokens.iter().filter(|t| *t.kind() == TokenKind::Unknown).count(),
        "Tokenized source"
    );
    tokens
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.pos - start
    }

    fn token_from(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, &self.source[start..self.pos], start)
    }

    fn run(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            if let Some(unterminated) = self.skip_trivia() {
                tokens.push(unterminated);
            }

            let Some(c) = self.peek() else {
                break;
            };

            let token = if is_ident_start(c) {
                self.lex_word()
            } else if c.is_ascii_digit()
                || (c == '.' && self.peek_nth(1).is_some_and(|n| n.is_ascii_digit()))
            {
                self.lex_number()
            } else if matches!(c, '"' | '\'' | '`') {
                self.lex_string(c)
            } else if let Some(token) = self.lex_symbol() {
                token
            } else {
                let start = self.pos;
                self.bump();
                self.token_from(TokenKind::Unknown, start)
            };

            tokens.push(token);
        }

        tokens
    }

    /// Skips whitespace and comments. An unterminated block comment swallows
    /// the rest of the input and is returned as an unknown token.
    fn skip_trivia(&mut self) -> Option<Token> {
        loop {
            self.eat_while(char::is_whitespace);

            let rest = self.rest();
            if rest.starts_with("//") {
                self.eat_while(|c| c != '\n');
            } else if rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => {
                        let start = self.pos;
                        self.pos = self.source.len();
                        return Some(self.token_from(TokenKind::Unknown, start));
                    }
                }
            } else {
                return None;
            }
        }
    }

    fn lex_word(&mut self) -> Token {
        let start = self.pos;
        self.eat_while(is_ident_continue);
        let kind = if is_keyword(&self.source[start..self.pos]) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.token_from(kind, start)
    }

    fn lex_number(&mut self) -> Token {
        let start = self.pos;
        let mut well_formed = true;

        let radix = match (self.peek(), self.peek_nth(1)) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };

        if let Some(radix) = radix {
            self.pos += 2;
            let digits = self.eat_while(|c| c.is_digit(radix) || c == '_');
            well_formed = digits > 0;
        } else {
            self.eat_while(|c| c.is_ascii_digit() || c == '_');
            if self.peek() == Some('.') {
                self.bump();
                self.eat_while(|c| c.is_ascii_digit() || c == '_');
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                let signed = matches!(self.peek_nth(1), Some('+' | '-'));
                let digit_at = if signed { 2 } else { 1 };
                if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += digit_at;
                    self.eat_while(|c| c.is_ascii_digit() || c == '_');
                }
            }
        }

        // `5abc` is neither a number nor a name.
        if self.eat_while(is_ident_continue) > 0 {
            well_formed = false;
        }

        let kind = if well_formed {
            TokenKind::NumericLiteral
        } else {
            TokenKind::Unknown
        };
        self.token_from(kind, start)
    }

    fn lex_string(&mut self, quote: char) -> Token {
        let start = self.pos;
        self.bump();

        let terminated = loop {
            match self.peek() {
                None => break false,
                Some('\n') if quote != '`' => break false,
                Some('\\') => {
                    self.bump();
                    self.bump();
                }
                Some(c) => {
                    self.bump();
                    if c == quote {
                        break true;
                    }
                }
            }
        };

        let kind = if terminated {
            TokenKind::StringLiteral
        } else {
            TokenKind::Unknown
        };
        self.token_from(kind, start)
    }

    fn lex_symbol(&mut self) -> Option<Token> {
        let rest = self.rest();
        let (spelling, kind) = SYMBOLS.iter().find(|(spelling, _)| {
            // `a?.5:b` is a conditional, not optional chaining.
            rest.starts_with(spelling)
                && !(*spelling == "?." && rest[2..].starts_with(|c: char| c.is_ascii_digit()))
        })?;

        let start = self.pos;
        self.pos += spelling.len();
        Some(self.token_from(*kind, start))
    }
}
