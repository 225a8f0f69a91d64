use super::tokenizer::tokenize;
use super::Oracle;
use crate::WordSpan;
use tracing::debug;

/// Misspelled words on one line, ordered by starting column.
pub fn scan_line<O: Oracle + ?Sized>(oracle: &O, text: &str, line: usize) -> Vec<WordSpan> {
    let mut words: Vec<WordSpan> = tokenize(text)
        .into_iter()
        .filter(|token| !oracle.correct(token.text))
        .map(|token| WordSpan::new(token.text, line, token.column))
        .collect();

    words.sort_by_key(|span| span.from.column);
    debug!(line, misspelled = words.len(), "scanned line");
    words
}
