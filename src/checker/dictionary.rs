use anyhow::{Context, Result};
use fst::{Automaton, IntoStreamer, Set, SetBuilder, Streamer};
use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("no dictionary installed for {language} (expected {})", .path.display())]
    NotInstalled { language: String, path: PathBuf },

    #[error("failed to read dictionary {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dictionary {} is not a valid word set", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: fst::Error,
    },
}

pub struct Dictionary {
    set: Set<Vec<u8>>,
}

impl Dictionary {
    /// Load the installed dictionary for `language` from `dir`
    pub fn load(dir: &Path, language: &str) -> Result<Self, DictionaryError> {
        let dict_path = Self::path_for(dir, language);

        if !dict_path.exists() {
            return Err(DictionaryError::NotInstalled {
                language: language.to_string(),
                path: dict_path,
            });
        }

        Self::load_from_path(&dict_path)
    }

    /// Load dictionary from a specific path (useful for testing)
    pub fn load_from_path(path: &Path) -> Result<Self, DictionaryError> {
        let io_err = |source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut bytes = Vec::new();
        File::open(path)
            .and_then(|mut file| file.read_to_end(&mut bytes))
            .map_err(io_err)?;

        let set = Set::new(bytes).map_err(|source| DictionaryError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), words = set.len(), "loaded dictionary");
        Ok(Self { set })
    }

    /// Build an in-memory dictionary from a word list
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        let mut sorted: Vec<&str> = words.iter().map(|w| w.as_ref()).collect();
        sorted.sort_unstable();
        sorted.dedup();

        let set = Set::from_iter(sorted).context("Failed to build dictionary")?;
        Ok(Self { set })
    }

    /// Check if word exists in dictionary
    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Get all words with a given prefix
    pub fn words_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut results = Vec::new();
        let mut stream = self
            .set
            .search(fst::automaton::Str::new(prefix).starts_with())
            .into_stream();

        while let Some(key) = stream.next() {
            if let Ok(word) = String::from_utf8(key.to_vec()) {
                results.push(word);
            }
        }

        results
    }

    /// Words whose length is within one character of `len`.
    ///
    /// Walks the whole set, so only use it for short words.
    pub fn words_near_length(&self, len: usize, limit: usize) -> Vec<String> {
        let mut words = Vec::new();
        let mut stream = self.set.stream();

        while let Some(key) = stream.next() {
            if key.len().abs_diff(len) > 1 {
                continue;
            }
            if let Ok(word) = String::from_utf8(key.to_vec()) {
                words.push(word);
                if words.len() >= limit {
                    break;
                }
            }
        }

        words
    }

    /// Build dictionary file from word list
    pub fn build_from_words(words: &[String], output_path: &Path) -> Result<()> {
        let mut sorted_words = words.to_vec();
        sorted_words.sort();
        sorted_words.dedup();

        let file = File::create(output_path)
            .with_context(|| format!("Failed to create dictionary: {}", output_path.display()))?;

        let writer = BufWriter::new(file);
        let mut builder = SetBuilder::new(writer).context("Failed to create FST builder")?;

        for word in sorted_words {
            builder
                .insert(word.as_bytes())
                .context("Failed to insert word into dictionary")?;
        }

        builder.finish().context("Failed to finalize dictionary")?;

        Ok(())
    }

    pub fn path_for(dir: &Path, language: &str) -> PathBuf {
        dir.join(format!("{}.dict", language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_build_and_load_dictionary() {
        let dir = tempdir().unwrap();
        let dict_path = dir.path().join("test.dict");

        let words = vec!["hello".to_string(), "world".to_string(), "test".to_string()];

        Dictionary::build_from_words(&words, &dict_path).unwrap();

        let dict = Dictionary::load_from_path(&dict_path).unwrap();
        assert!(dict.contains("hello"));
        assert!(dict.contains("world"));
        assert!(!dict.contains("notfound"));
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn test_missing_language_is_not_installed() {
        let dir = tempdir().unwrap();
        let err = Dictionary::load(dir.path(), "en_US").err().unwrap();
        assert!(matches!(err, DictionaryError::NotInstalled { .. }));
    }

    #[test]
    fn test_garbage_file_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = Dictionary::path_for(dir.path(), "xx");
        std::fs::write(&path, b"definitely not an fst").unwrap();
        let err = Dictionary::load(dir.path(), "xx").err().unwrap();
        assert!(matches!(err, DictionaryError::Corrupt { .. }));
    }

    #[test]
    fn test_in_memory_dictionary_dedups_unsorted_input() {
        let dict = Dictionary::from_words(&["world", "hello", "world"]).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.words_with_prefix("he"), vec!["hello".to_string()]);
        assert_eq!(dict.words_near_length(4, 10), vec!["hello".to_string(), "world".to_string()]);
    }
}
