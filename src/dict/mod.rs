pub mod custom;
pub mod manager;

pub use custom::{CustomDictionary, JsonSettingsStore, Settings, SettingsStore};
