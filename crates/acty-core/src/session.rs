//! Session credential storage.
//!
//! The credential lives in a cookie named `token` scoped to path `/`.
//! [`CookieFile`] persists the cookie jar in `${ACTY_HOME}/cookies.json`
//! with restricted permissions (0600). Tokens are never logged in full.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// Cookie holding the bearer credential.
pub const TOKEN_COOKIE: &str = "token";

/// Path the token cookie is scoped to.
pub const TOKEN_COOKIE_PATH: &str = "/";

/// Read/write access to the session cookie.
pub trait SessionStore: Send + Sync {
    /// Returns the current credential, if one is stored.
    fn token(&self) -> Result<Option<String>>;

    /// Stores the credential, replacing any previous one.
    fn set_token(&self, token: &str) -> Result<()>;

    /// Removes the credential. Returns true if one was stored.
    fn clear(&self) -> Result<bool>;
}

/// A single stored cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub value: String,
    #[serde(default = "default_cookie_path")]
    pub path: String,
}

fn default_cookie_path() -> String {
    TOKEN_COOKIE_PATH.to_string()
}

/// Cookie name -> cookie mapping, as stored on disk.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CookieJar {
    #[serde(flatten)]
    pub cookies: BTreeMap<String, Cookie>,
}

impl CookieJar {
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.get(name)
    }

    pub fn set(&mut self, name: &str, value: &str, path: &str) {
        self.cookies.insert(
            name.to_string(),
            Cookie {
                value: value.to_string(),
                path: path.to_string(),
            },
        );
    }

    pub fn remove(&mut self, name: &str) -> Option<Cookie> {
        self.cookies.remove(name)
    }
}

/// File-backed cookie jar. The file is re-read on every access.
#[derive(Debug, Clone)]
pub struct CookieFile {
    path: PathBuf,
}

impl CookieFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cookie jar at the default location.
    pub fn default_location() -> Self {
        Self::new(paths::cookies_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the jar. Returns an empty jar if the file doesn't exist.
    pub fn load(&self) -> Result<CookieJar> {
        if !self.path.exists() {
            return Ok(CookieJar::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read cookies from {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(CookieJar::default());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cookies from {}", self.path.display()))
    }

    /// Saves the jar with restricted permissions (0600).
    pub fn save(&self, jar: &CookieJar) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(jar).context("Failed to serialize cookies")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            // mode() only applies on create
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }
}

impl SessionStore for CookieFile {
    fn token(&self) -> Result<Option<String>> {
        let jar = self.load()?;
        Ok(jar
            .get(TOKEN_COOKIE)
            .map(|c| c.value.clone())
            .filter(|v| !v.is_empty()))
    }

    fn set_token(&self, token: &str) -> Result<()> {
        let mut jar = self.load()?;
        jar.set(TOKEN_COOKIE, token, TOKEN_COOKIE_PATH);
        self.save(&jar)
    }

    fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let mut jar = self.load()?;
        let had_token = jar.remove(TOKEN_COOKIE).is_some();
        if had_token {
            self.save(&jar)?;
        }
        Ok(had_token)
    }
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemoryStore {
    fn token(&self) -> Result<Option<String>> {
        let guard = self
            .token
            .lock()
            .map_err(|e| anyhow::anyhow!("session store lock poisoned: {e}"))?;
        Ok(guard.clone().filter(|t| !t.is_empty()))
    }

    fn set_token(&self, token: &str) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|e| anyhow::anyhow!("session store lock poisoned: {e}"))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<bool> {
        let mut guard = self
            .token
            .lock()
            .map_err(|e| anyhow::anyhow!("session store lock poisoned: {e}"))?;
        Ok(guard.take().is_some())
    }
}

/// Returns a masked version of a token for display (first 8 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 12 {
        return "***".to_string();
    }
    let prefix: String = token.chars().take(8).collect();
    format!("{prefix}...")
}
