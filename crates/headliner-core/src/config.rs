use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Env var checked for the newsapi.org key
pub const API_KEY_ENV: &str = "NEWSAPI_KEY";

/// Main configuration structure
///
/// Loaded from the config file, then the API key may be overridden by
/// env var and CLI flag. Priority: CLI > Env > File > Defaults.
/// Read-only: nothing the user does in the app is written back here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load config from default location, or defaults if there is no file
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply env and CLI overrides for the API key.
    ///
    /// Blank values are ignored so `NEWSAPI_KEY=` doesn't wipe a key from
    /// the file.
    pub fn with_overrides(mut self, env_key: Option<String>, cli_key: Option<String>) -> Self {
        let non_blank = |k: Option<String>| k.filter(|k| !k.trim().is_empty());

        if let Some(key) = non_blank(cli_key).or_else(|| non_blank(env_key)) {
            self.api.api_key = Some(key);
        }
        self
    }

    /// Get the config file path
    /// Uses XDG on Linux/macOS, AppData on Windows
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("headliner");

        Ok(config_dir.join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// newsapi.org key
    /// Get one at https://newsapi.org/register
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Two-letter country code for top headlines
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_base_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_country() -> String {
    "us".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            country: default_country(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How often the News screen re-fetches top stories
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

fn default_refresh_interval() -> u64 {
    60
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://newsapi.org/v2");
        assert_eq!(config.api.country, "us");
        assert!(config.api.api_key.is_none());
        assert_eq!(config.ui.refresh_interval_secs, 60);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.api.country, "us");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\napi_key = \"abc\"\ncountry = \"gb\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.api_key.as_deref(), Some("abc"));
        assert_eq!(config.api.country, "gb");
        assert_eq!(config.api.base_url, "https://newsapi.org/v2");
        assert_eq!(config.ui.refresh_interval_secs, 60);
    }

    #[test]
    fn test_bad_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(crate::Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_key_override_priority() {
        let mut base = Config::default();
        base.api.api_key = Some("file".to_string());

        let c = base.clone().with_overrides(None, None);
        assert_eq!(c.api.api_key.as_deref(), Some("file"));

        let c = base.clone().with_overrides(Some("env".into()), None);
        assert_eq!(c.api.api_key.as_deref(), Some("env"));

        let c = base.clone().with_overrides(Some("env".into()), Some("cli".into()));
        assert_eq!(c.api.api_key.as_deref(), Some("cli"));

        let c = base.with_overrides(Some("  ".into()), None);
        assert_eq!(c.api.api_key.as_deref(), Some("file"));
    }
}
