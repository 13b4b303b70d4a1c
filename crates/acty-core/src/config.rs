//! Configuration management for acty.
//!
//! Loads configuration from ${ACTY_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default config template with comments, embedded at compile time.
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("default_config.toml");

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "ACTY_API_URL";

/// Base URL used when neither the environment nor the config file sets one.
pub const DEFAULT_API_URL: &str = "http://localhost:4000/api";

pub mod paths {
    //! Path resolution for acty configuration and data directories.
    //!
    //! ACTY_HOME resolution order:
    //! 1. ACTY_HOME environment variable (if set)
    //! 2. ~/.config/acty (default)

    use std::path::PathBuf;

    /// Returns the acty home directory.
    ///
    /// Falls back to `./.acty` when no home directory can be determined.
    pub fn acty_home() -> PathBuf {
        if let Ok(home) = std::env::var("ACTY_HOME")
            && !home.trim().is_empty()
        {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("acty"))
            .unwrap_or_else(|| PathBuf::from(".acty"))
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        acty_home().join("config.toml")
    }

    /// Returns the path to the cookie jar holding the session token.
    pub fn cookies_path() -> PathBuf {
        acty_home().join("cookies.json")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Optional API base URL (for proxies or non-local servers)
    pub api_url: Option<String>,

    /// Sign-in endpoint, relative to the base URL
    pub token_path: String,
}

impl Config {
    const DEFAULT_TOKEN_PATH: &'static str = "/tokens";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the API base URL from config, if set.
    /// Empty strings are treated as unset.
    pub fn effective_api_url(&self) -> Option<&str> {
        self.api_url.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Resolves the API base URL.
    ///
    /// Order: `ACTY_API_URL` env var, `api_url` from config, then
    /// [`DEFAULT_API_URL`].
    pub fn api_url(&self) -> String {
        let from_env = std::env::var(API_URL_ENV).ok();
        self.api_url_with(from_env.as_deref())
    }

    /// Same as [`Config::api_url`] with an explicit env override.
    pub fn api_url_with(&self, env_override: Option<&str>) -> String {
        env_override
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| self.effective_api_url().map(str::trim))
            .unwrap_or(DEFAULT_API_URL)
            .to_string()
    }

    /// Returns the sign-in path, defaulting to `/tokens` when blank.
    pub fn effective_token_path(&self) -> &str {
        let trimmed = self.token_path.trim();
        if trimmed.is_empty() {
            Self::DEFAULT_TOKEN_PATH
        } else {
            trimmed
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, DEFAULT_CONFIG_TEMPLATE)
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            token_path: Self::DEFAULT_TOKEN_PATH.to_string(),
        }
    }
}
