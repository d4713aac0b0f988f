//! Settings and configuration utilities.
//!
//! Reads settings from $HOME/.git-reword/settings.json and uses them as a
//! fallback for environment variables, so the API key can live in a config
//! file instead of the shell environment.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Settings loaded from $HOME/.git-reword/settings.json.
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Missing file is not an error
        if !path.exists() {
            return Ok(Settings {
                env: HashMap::new(),
            });
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Settings>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".git-reword").join("settings.json"))
    }

    /// Returns an environment variable with fallback to settings.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) => Some(value),
            Err(_) => self.env.get(key).cloned(),
        }
    }
}

/// Returns an environment variable with fallback to the settings file.
pub fn get_env_var(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) => Ok(value),
        Err(_) => match Settings::load() {
            Ok(settings) => settings
                .env
                .get(key)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Environment variable not found: {}", key)),
            Err(err) => {
                // If settings couldn't load, report the original env var miss
                Err(anyhow::anyhow!("Environment variable not found: {}", key).context(err))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_from_missing_path_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from_path(temp_dir.path().join("nope.json")).unwrap();
        assert!(settings.env.is_empty());
    }

    #[test]
    fn load_from_path_reads_env_map() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");

        let settings_json = r#"{
            "env": {
                "OPENAI_API_KEY": "sk-from-settings"
            }
        }"#;
        fs::write(&settings_path, settings_json).unwrap();

        let settings = Settings::load_from_path(&settings_path).unwrap();
        assert_eq!(
            settings.env.get("OPENAI_API_KEY").unwrap(),
            "sk-from-settings"
        );
    }

    #[test]
    fn env_var_takes_precedence_over_settings() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        fs::write(
            &settings_path,
            r#"{"env": {"GIT_REWORD_TEST_VAR": "from_settings"}}"#,
        )
        .unwrap();

        let settings = Settings::load_from_path(&settings_path).unwrap();

        env::set_var("GIT_REWORD_TEST_VAR", "from_env");
        assert_eq!(
            settings.get_env_var("GIT_REWORD_TEST_VAR").unwrap(),
            "from_env"
        );

        env::remove_var("GIT_REWORD_TEST_VAR");
        assert_eq!(
            settings.get_env_var("GIT_REWORD_TEST_VAR").unwrap(),
            "from_settings"
        );
    }

    #[test]
    fn malformed_settings_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        fs::write(&settings_path, "not json").unwrap();

        assert!(Settings::load_from_path(&settings_path).is_err());
    }
}
