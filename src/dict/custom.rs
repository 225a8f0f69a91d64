use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Everything that survives between editing sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Newline-separated words the user accepted
    #[serde(default)]
    pub custom_dictionary: String,
}

pub trait SettingsStore {
    fn load(&self) -> Result<Settings>;
    fn save(&mut self, settings: &Settings) -> Result<()>;
}

/// Settings kept as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no settings file yet");
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings: {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Settings::default());
        }
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings: {}", self.path.display()))
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }
        let json = serde_json::to_string_pretty(settings).context("Failed to encode settings")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write settings: {}", self.path.display()))
    }
}

/// Settings held in memory only, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    pub settings: Settings,
    pub saves: usize,
}

impl MemorySettingsStore {
    pub fn with_words(custom_dictionary: &str) -> Self {
        Self {
            settings: Settings {
                custom_dictionary: custom_dictionary.to_string(),
            },
            saves: 0,
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings> {
        Ok(self.settings.clone())
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        self.settings = settings.clone();
        self.saves += 1;
        Ok(())
    }
}

/// Words the user added, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomDictionary {
    words: Vec<String>,
}

impl CustomDictionary {
    /// Parse the persisted form: one word per line, blanks dropped
    pub fn parse(text: &str) -> Self {
        let words = text
            .split('\n')
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Append `word` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, word: &str) -> bool {
        let word = word.trim();
        if word.is_empty() || self.contains(word) {
            return false;
        }
        self.words.push(word.to_string());
        true
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn serialize(&self) -> String {
        self.words.join("\n")
    }

    pub fn load_from(store: &dyn SettingsStore) -> Self {
        match store.load() {
            Ok(settings) => Self::parse(&settings.custom_dictionary),
            Err(e) => {
                warn!("Ignoring unreadable settings: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, store: &mut dyn SettingsStore) -> Result<()> {
        let mut settings = store.load().unwrap_or_default();
        settings.custom_dictionary = self.serialize();
        store.save(&settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_trims_and_drops_blank_lines() {
        let dict = CustomDictionary::parse("  foo \n\n bar\r\n\n");
        assert_eq!(dict.words(), ["foo", "bar"]);
    }

    #[test]
    fn test_duplicate_is_not_added() {
        let mut dict = CustomDictionary::parse("foo\nbar");
        assert!(!dict.insert("foo"));
        assert_eq!(dict.serialize(), "foo\nbar");
    }

    #[test]
    fn test_insert_keeps_order_and_case() {
        let mut dict = CustomDictionary::parse("foo");
        assert!(dict.insert("Zeta"));
        assert!(dict.insert("alpha"));
        assert!(dict.insert("Foo"));
        assert_eq!(dict.serialize(), "foo\nZeta\nalpha\nFoo");
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemorySettingsStore::with_words("foo\nbar");
        let mut dict = CustomDictionary::load_from(&store);
        dict.insert("baz");
        dict.save_to(&mut store).unwrap();
        assert_eq!(store.settings.custom_dictionary, "foo\nbar\nbaz");
        assert_eq!(store.saves, 1);
    }

    #[test]
    fn test_json_store_persists_to_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut store = JsonSettingsStore::new(&path);

        assert_eq!(store.load().unwrap(), Settings::default());

        let settings = Settings {
            custom_dictionary: "foo\nbar".to_string(),
        };
        store.save(&settings).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("customDictionary"));
        assert_eq!(JsonSettingsStore::new(&path).load().unwrap(), settings);
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonSettingsStore::new(&path);
        assert!(store.load().is_err());
        assert!(CustomDictionary::load_from(&store).is_empty());
    }
}
