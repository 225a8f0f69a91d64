pub mod dictionary;
pub mod scanner;
pub mod suggestions;
pub mod tokenizer;

pub use scanner::scan_line;

use crate::Config;
use anyhow::Result;
use dictionary::{Dictionary, DictionaryError};
use std::collections::HashSet;
use tracing::debug;

/// The correctness and suggestion engine the assistant consults.
///
/// Implementations can wrap any dictionary format; the rest of the crate
/// only relies on these three operations.
pub trait Oracle {
    /// Whether `word` is spelled correctly
    fn correct(&self, word: &str) -> bool;

    /// Ranked replacements for `word`, best first
    fn suggest(&self, word: &str) -> Vec<String>;

    /// Accept `word` for the rest of this session
    fn add(&mut self, word: &str);
}

impl<O: Oracle + ?Sized> Oracle for Box<O> {
    fn correct(&self, word: &str) -> bool {
        (**self).correct(word)
    }

    fn suggest(&self, word: &str) -> Vec<String> {
        (**self).suggest(word)
    }

    fn add(&mut self, word: &str) {
        (**self).add(word)
    }
}

/// Oracle backed by an FST word list plus words accepted at runtime.
pub struct SpellChecker {
    dictionary: Dictionary,
    added_words: HashSet<String>,
    max_suggestions: usize,
}

impl SpellChecker {
    pub fn new(dictionary: Dictionary, max_suggestions: usize) -> Self {
        Self {
            dictionary,
            added_words: HashSet::new(),
            max_suggestions,
        }
    }

    /// Load the dictionary for the configured language
    pub fn load(config: &Config) -> Result<Self, DictionaryError> {
        let dictionary = Dictionary::load(&config.dictionary_dir(), &config.language)?;
        Ok(Self::new(dictionary, config.max_suggestions))
    }

    /// Build a checker over an in-memory word list
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        let dictionary = Dictionary::from_words(words)?;
        Ok(Self::new(dictionary, crate::config::MAX_MENU_SUGGESTIONS))
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    fn known(&self, word: &str) -> bool {
        if self.added_words.contains(word) || self.dictionary.contains(word) {
            return true;
        }
        let lower = word.to_lowercase();
        self.added_words.contains(&lower) || self.dictionary.contains(&lower)
    }
}

impl Oracle for SpellChecker {
    fn correct(&self, word: &str) -> bool {
        let bare = word.trim_matches('\'');
        bare.is_empty() || self.known(bare)
    }

    fn suggest(&self, word: &str) -> Vec<String> {
        let bare = word.trim_matches('\'');
        if bare.is_empty() {
            return Vec::new();
        }

        let start = word.len() - word.trim_start_matches('\'').len();
        let end = start + bare.len();
        let (lead, trail) = (&word[..start], &word[end..]);

        let mut suggestions: Vec<String> = Vec::new();
        for candidate in suggestions::generate(&bare.to_lowercase(), &self.dictionary, self.max_suggestions) {
            let cased = format!("{}{}{}", lead, match_case(bare, &candidate), trail);
            if !suggestions.contains(&cased) {
                suggestions.push(cased);
            }
        }

        debug!(word, count = suggestions.len(), "generated suggestions");
        suggestions
    }

    fn add(&mut self, word: &str) {
        self.added_words.insert(word.to_string());
    }
}

/// Re-case `candidate` the way `original` is cased
fn match_case(original: &str, candidate: &str) -> String {
    let mut letters = original.chars().filter(|c| c.is_alphabetic());
    let first_upper = letters.next().is_some_and(|c| c.is_uppercase());

    if !first_upper {
        return candidate.to_string();
    }

    let all_upper = original.chars().count() > 1
        && original
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(|c| c.is_uppercase());

    if all_upper {
        return candidate.to_uppercase();
    }

    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
