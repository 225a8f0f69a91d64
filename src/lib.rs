pub mod assist;
pub mod checker;
pub mod cli;
pub mod config;
pub mod dict;

pub use assist::{Assistant, MenuChoice, MenuRequest, Outcome};
pub use checker::{Oracle, SpellChecker};
pub use config::Config;

use serde::Serialize;

/// A location in the document. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A word and the half-open range `[from, to)` it occupies on a single line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordSpan {
    pub word: String,
    pub from: Position,
    pub to: Position,
}

impl WordSpan {
    pub fn new(word: impl Into<String>, line: usize, column: usize) -> Self {
        let word = word.into();
        let len = word.chars().count();
        Self {
            word,
            from: Position::new(line, column),
            to: Position::new(line, column + len),
        }
    }

    pub fn len(&self) -> usize {
        self.to.column - self.from.column
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
