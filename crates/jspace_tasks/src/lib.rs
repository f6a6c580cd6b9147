//! JSpace task engine - tokenizer, task rules and the exercise catalog.
//!
//! Everything here is pure: tokenizing and validating never perform I/O,
//! never mutate their input and always give the same answer for the same
//! source text.
//!
//! # Example
//!
//! ```
//! use jspace_tasks::{TaskCatalog, tokenize};
//!
//! let catalog = TaskCatalog::standard();
//! let oxygen = catalog.get(1).expect("second task");
//! assert!(oxygen.check(&tokenize("let oxygen = 5;")));
//! assert!(!oxygen.check(&tokenize("let oxigen = 5;")));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod catalog;
mod lexer;
mod rules;
mod token;

pub use catalog::{CatalogError, MentorLines, TaskCatalog, TaskDefinition};
pub use lexer::{DECLARATION_KEYWORDS, is_keyword, tokenize};
pub use rules::{
    PatternElement, Rule, TokenPattern, ValueMatch, brackets_balanced, is_well_formed, validate,
};
pub use token::{Token, TokenKind};
