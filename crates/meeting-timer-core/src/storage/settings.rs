//! Settings storage operations

use crate::{Result, models::Settings};
use std::io::ErrorKind;
use std::path::PathBuf;

const SETTINGS_FILE: &str = "data.json";

pub struct SettingsStorage {
    config_dir: PathBuf,
}

impl SettingsStorage {
    pub fn new(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// Stored settings. A missing or blank file is replaced by the defaults,
    /// which are written back so the host finds a complete record next time.
    pub fn load(&self) -> Result<Settings> {
        match std::fs::read_to_string(self.path()) {
            Ok(content) if !content.trim().is_empty() => Ok(serde_json::from_str(&content)?),
            Ok(_) => self.load_or_default(),
            Err(e) if e.kind() == ErrorKind::NotFound => self.load_or_default(),
            Err(e) => Err(e.into()),
        }
    }

    fn load_or_default(&self) -> Result<Settings> {
        let settings = Settings::default();
        tracing::debug!("Writing default settings to {}", self.path().display());
        self.save(&settings)?;
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;

        let content = serde_json::to_string_pretty(settings)?;
        std::fs::write(self.path(), content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SettingsStorage::new(temp_dir.path().join("meeting-timer"));

        let settings = storage.load().unwrap();
        assert_eq!(settings, Settings::default());
        assert!(storage.path().exists());
    }

    #[test]
    fn test_load_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SettingsStorage::new(temp_dir.path().to_path_buf());
        std::fs::write(storage.path(), "  \n").unwrap();

        assert_eq!(storage.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SettingsStorage::new(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.timer.duration = "00:45".to_string();
        settings.timer.notify = "10".to_string();
        settings.auto_log = true;
        storage.save(&settings).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_fills_missing_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SettingsStorage::new(temp_dir.path().to_path_buf());
        std::fs::write(storage.path(), r#"{"notify":"2"}"#).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.timer.notify, "2");
        assert_eq!(loaded.timer.duration, "00:25");
    }

    #[test]
    fn test_load_blank_file_rewrites_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SettingsStorage::new(temp_dir.path().to_path_buf());
        std::fs::write(storage.path(), "\n").unwrap();

        storage.load().unwrap();
        let written = std::fs::read_to_string(storage.path()).unwrap();
        let reread: Settings = serde_json::from_str(&written).unwrap();
        assert_eq!(reread, Settings::default());
    }

    #[test]
    fn test_load_unreadable_path_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SettingsStorage::new(temp_dir.path().to_path_buf());
        std::fs::create_dir(storage.path()).unwrap();

        assert!(storage.load().is_err());
    }

    #[test]
    fn test_load_invalid_json_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SettingsStorage::new(temp_dir.path().to_path_buf());
        std::fs::write(storage.path(), "{not json").unwrap();

        assert!(storage.load().is_err());
    }
}
