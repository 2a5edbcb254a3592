//! App configuration: API base URL and session file location.
//!
//! Values come from an optional TOML file under the platform config
//! dir, with environment variables taking precedence.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "https://series-tracker-rest-api.herokuapp.com";

pub const API_URL_ENV: &str = "SERIES_TRACKER_API_URL";
pub const SESSION_FILE_ENV: &str = "SERIES_TRACKER_SESSION_FILE";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub session_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: None,
        }
    }
}

impl AppConfig {
    /// `<config dir>/series-tracker/config.toml`.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("series-tracker").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Self::parse(&contents)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            _ => Self::default(),
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.is_empty() {
                config.api_url = url;
            }
        }
        if let Ok(path) = std::env::var(SESSION_FILE_ENV) {
            if !path.is_empty() {
                config.session_file = Some(PathBuf::from(path));
            }
        }

        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.session_file.is_none());
    }

    #[test]
    fn test_parse_full_file() {
        let config = AppConfig::parse(
            r#"
            api_url = "http://localhost:4000"
            session_file = "/tmp/session.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_url, "http://localhost:4000");
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/session.json")));
    }

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let config = AppConfig::parse("api_url = \"http://localhost:4000\"").unwrap();
        assert_eq!(config.api_url, "http://localhost:4000");
        assert!(config.session_file.is_none());
    }
}
