//! Client configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/dynalist/config.toml)
//! 3. Environment variables (DYNALIST_* prefix)
//!
//! Environment variables take precedence over config file values. The API
//! token is the exception: `DYNALIST_TOKEN` is only consulted by
//! [`resolve_token`](crate::auth::resolve_token) when a client is built.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable prefix
const ENV_PREFIX: &str = "DYNALIST";

pub const DEFAULT_API_URL: &str = "https://dynalist.io/api/v1";
pub const DEFAULT_WEB_URL: &str = "https://dynalist.io/d";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Base URL of the document API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL for node deep links
    #[serde(default = "default_web_url")]
    pub web_url: String,

    /// HTTP request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Fallback token, used when neither an explicit token nor
    /// DYNALIST_TOKEN is available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            web_url: default_web_url(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (DYNALIST_API_URL, DYNALIST_WEB_URL, DYNALIST_TIMEOUT_SECS)
    /// 2. Config file (~/.config/dynalist/config.toml or DYNALIST_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var(format!("{}_API_URL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.api_url = val;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_WEB_URL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.web_url = val;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_TIMEOUT_SECS", ENV_PREFIX)) {
            self.timeout_secs = val
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}_TIMEOUT_SECS: {:?}", ENV_PREFIX, val))?;
        }

        Ok(())
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with DYNALIST_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dynalist")
            .join("config.toml")
    }

    /// HTTP request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of an API endpoint, e.g. `endpoint("doc/read")`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), path)
    }

    /// Base URL for deep links, without trailing slash
    pub fn link_base(&self) -> &str {
        self.web_url.trim_end_matches('/')
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_web_url() -> String {
    DEFAULT_WEB_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    pub(crate) struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        pub(crate) fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            // Clear all the vars
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    pub(crate) const ENV_VARS: &[&str] = &[
        "DYNALIST_API_URL",
        "DYNALIST_WEB_URL",
        "DYNALIST_TIMEOUT_SECS",
        "DYNALIST_CONFIG",
        "DYNALIST_TOKEN",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, "https://dynalist.io/api/v1");
        assert_eq!(config.web_url, "https://dynalist.io/d");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.token.is_none());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = Config {
            api_url: "http://localhost:8080/api/v1/".to_string(),
            web_url: "http://localhost:8080/d/".to_string(),
            ..Config::default()
        };

        assert_eq!(config.endpoint("doc/read"), "http://localhost:8080/api/v1/doc/read");
        assert_eq!(config.link_base(), "http://localhost:8080/d");
    }

    #[test]
    fn test_env_override_api_url() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("DYNALIST_API_URL", "http://127.0.0.1:9000/api/v1");
        config.apply_env_overrides().unwrap();

        assert_eq!(config.api_url, "http://127.0.0.1:9000/api/v1");
    }

    #[test]
    fn test_env_override_timeout() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("DYNALIST_TIMEOUT_SECS", "5");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.timeout_secs, 5);

        env::set_var("DYNALIST_TIMEOUT_SECS", "soon");
        assert!(config.apply_env_overrides().is_err());
    }

    #[test]
    fn test_env_token_is_not_read_by_config() {
        let _guard = EnvGuard::new(ENV_VARS);

        env::set_var("DYNALIST_TOKEN", "from-env");
        let config = Config::load_from_str("").unwrap();
        assert!(config.token.is_none());
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            api_url = "http://example.com/api/v1"
            timeout_secs = 10
            token = "file-token"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.api_url, "http://example.com/api/v1");
        assert_eq!(config.web_url, DEFAULT_WEB_URL);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.token.as_deref(), Some("file-token"));
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        // Should return defaults when file doesn't exist
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            web_url: "https://dynalist.example/d".to_string(),
            token: Some("secret".to_string()),
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_file_path_override() {
        let _guard = EnvGuard::new(ENV_VARS);

        env::set_var("DYNALIST_CONFIG", "/tmp/dynalist-test.toml");
        assert_eq!(
            Config::config_file_path(),
            PathBuf::from("/tmp/dynalist-test.toml")
        );
    }
}
