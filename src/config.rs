use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Most suggestions a correction menu shows
pub const MAX_MENU_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_language")]
    pub language: String,

    /// Where installed `<language>.dict` files live
    #[serde(default)]
    pub dictionary_dir: Option<PathBuf>,

    /// JSON file holding the custom dictionary
    #[serde(default)]
    pub settings_path: Option<PathBuf>,

    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    #[serde(default = "default_cycle_timeout_ms")]
    pub cycle_timeout_ms: u64,
}

fn default_language() -> String {
    "en_US".to_string()
}

fn default_max_suggestions() -> usize {
    MAX_MENU_SUGGESTIONS
}

fn default_cycle_timeout_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            dictionary_dir: None,
            settings_path: None,
            max_suggestions: default_max_suggestions(),
            cycle_timeout_ms: default_cycle_timeout_ms(),
        }
    }
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(
        language: Option<String>,
        dictionary_dir: Option<PathBuf>,
        settings_path: Option<PathBuf>,
    ) -> Result<Self> {
        let mut config = Self::default();

        // Load global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global_config = Self::from_file(&global_path)?;
                config = config.merge(global_config);
            }
        }

        // Load local config (overrides global)
        let local_path = PathBuf::from(".spellcycle.toml");
        if local_path.exists() {
            let local_config = Self::from_file(&local_path)?;
            config = config.merge(local_config);
        }

        // Apply CLI overrides
        if let Some(language) = language {
            config.language = language;
        }
        if let Some(dir) = dictionary_dir {
            config.dictionary_dir = Some(dir);
        }
        if let Some(path) = settings_path {
            config.settings_path = Some(path);
        }

        config.max_suggestions = config.max_suggestions.clamp(1, MAX_MENU_SUGGESTIONS);

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, other: Self) -> Self {
        // other's values override self's if they differ from defaults
        if other.language != default_language() {
            self.language = other.language;
        }
        if other.dictionary_dir.is_some() {
            self.dictionary_dir = other.dictionary_dir;
        }
        if other.settings_path.is_some() {
            self.settings_path = other.settings_path;
        }
        if other.max_suggestions != default_max_suggestions() {
            self.max_suggestions = other.max_suggestions;
        }
        if other.cycle_timeout_ms != default_cycle_timeout_ms() {
            self.cycle_timeout_ms = other.cycle_timeout_ms;
        }
        self
    }

    pub fn cycle_timeout(&self) -> Duration {
        Duration::from_millis(self.cycle_timeout_ms)
    }

    pub fn dictionary_dir(&self) -> PathBuf {
        self.dictionary_dir
            .clone()
            .or_else(Self::data_dir)
            .unwrap_or_else(|| PathBuf::from("dictionaries"))
    }

    pub fn settings_path(&self) -> PathBuf {
        self.settings_path
            .clone()
            .or_else(Self::default_settings_path)
            .unwrap_or_else(|| PathBuf::from("spellcycle-settings.json"))
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "spellcycle").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn default_settings_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "spellcycle").map(|dirs| dirs.config_dir().join("settings.json"))
    }

    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "spellcycle").map(|dirs| dirs.data_dir().to_path_buf())
    }
}
