use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::DEFAULT_BASE_URL;
use crate::clipboard::SystemClipboard;
use crate::error::ConfigError;

pub const API_URL_ENV: &str = "JOBSEARCH_API_URL";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub last_resume_dir: Option<PathBuf>,
    /// Skip the terminal escape-sequence clipboard fallback.
    #[serde(default)]
    pub disable_osc52: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &std::path::Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<(), ConfigError> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    pub fn clipboard(&self) -> SystemClipboard {
        if self.disable_osc52 {
            SystemClipboard::commands_only()
        } else {
            SystemClipboard::new()
        }
    }

    pub fn save_last_resume_dir(dir: PathBuf) -> Result<(), ConfigError> {
        let mut config = Self::load().unwrap_or_else(|_| Self::new());
        config.last_resume_dir = Some(dir);
        config.save()
    }

    /// Base URL by precedence: explicit flag, environment, config file, default.
    pub fn resolve_base_url(&self, flag: Option<&str>) -> String {
        let env = std::env::var(API_URL_ENV).ok();
        Self::pick_base_url(flag, env.as_deref(), self.api_base_url.as_deref())
    }

    fn pick_base_url(flag: Option<&str>, env: Option<&str>, file: Option<&str>) -> String {
        [flag, env, file]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .to_string()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    fn get_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;

        Ok(config_dir.join("jobsearch").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_precedence() {
        assert_eq!(
            Config::pick_base_url(Some("http://flag"), Some("http://env"), Some("http://file")),
            "http://flag"
        );
        assert_eq!(
            Config::pick_base_url(None, Some("http://env"), Some("http://file")),
            "http://env"
        );
        assert_eq!(Config::pick_base_url(None, Some("  "), Some("http://file")), "http://file");
        assert_eq!(Config::pick_base_url(None, None, None), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_missing_config_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::new());
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            api_base_url: Some("http://jobs.internal:4000".to_string()),
            request_timeout_secs: Some(30),
            last_resume_dir: Some(PathBuf::from("/home/me/docs")),
            disable_osc52: true,
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_older_config_without_new_fields_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_base_url": "http://old:4000"}"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_base_url.as_deref(), Some("http://old:4000"));
        assert!(!config.disable_osc52);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }
}
