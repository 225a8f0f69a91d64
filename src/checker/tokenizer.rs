use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[A-Za-z']+").unwrap();
}

/// Shortest candidate worth checking, in characters
pub const MIN_WORD_LEN: usize = 2;

/// A candidate word and its starting character column within the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub column: usize,
}

/// Split a line into runs of ASCII letters and apostrophes, left to right.
///
/// Runs shorter than [`MIN_WORD_LEN`] are dropped. Columns are character
/// offsets, so anything non-ASCII earlier on the line shifts them correctly.
pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut column = 0;
    let mut consumed = 0;

    for m in WORD.find_iter(line) {
        column += line[consumed..m.start()].chars().count();
        // matches are pure ASCII, so byte length equals character length
        if m.len() >= MIN_WORD_LEN {
            tokens.push(Token {
                text: m.as_str(),
                column,
            });
        }
        column += m.len();
        consumed = m.end();
    }

    tokens
}
