//! CLI command handlers.

use std::sync::Arc;

use anyhow::Result;

use acty_core::api::{ApiClient, ApiConfig};
use acty_core::config::Config;
use acty_core::session::{CookieFile, SessionStore};

use super::navigator::SignInRedirect;

pub mod activities;
pub mod auth;
pub mod config;

/// Shared state for a single invocation.
pub struct Context {
    pub config: Config,
    api_url_override: Option<String>,
    session: Arc<CookieFile>,
}

impl Context {
    pub fn new(config: Config, api_url_override: Option<String>) -> Self {
        Self {
            config,
            api_url_override,
            session: Arc::new(CookieFile::default_location()),
        }
    }

    pub fn session(&self) -> &CookieFile {
        &self.session
    }

    fn api_config(&self) -> Result<ApiConfig> {
        ApiConfig::new(&self.config.api_url_with(self.api_url_override.as_deref()))
    }

    /// Client whose 401s send the user back to sign-in.
    pub fn client(&self) -> Result<ApiClient> {
        let session: Arc<dyn SessionStore> = Arc::clone(&self.session) as Arc<dyn SessionStore>;
        let redirect = SignInRedirect::new(Arc::clone(&session));
        Ok(ApiClient::new(self.api_config()?, session).with_navigator(Arc::new(redirect)))
    }

    /// Client for the sign-in request itself, where a 401 means bad
    /// credentials rather than an expired session.
    pub fn signin_client(&self) -> Result<ApiClient> {
        let session: Arc<dyn SessionStore> = Arc::clone(&self.session) as Arc<dyn SessionStore>;
        Ok(ApiClient::new(self.api_config()?, session))
    }
}
