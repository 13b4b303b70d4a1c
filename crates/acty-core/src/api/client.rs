use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::errors::ApiError;
use crate::config::Config;
use crate::routes::{Navigator, NoopNavigator, Route};
use crate::session::SessionStore;

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Validates `base_url` as an absolute http(s) URL.
    /// A trailing slash is dropped.
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim();
        let parsed =
            Url::parse(trimmed).with_context(|| format!("Invalid API base URL: {trimmed}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!(
                "Invalid API base URL: {trimmed} (expected http or https, got {})",
                parsed.scheme()
            );
        }
        Ok(Self {
            base_url: trimmed.trim_end_matches('/').to_string(),
        })
    }

    /// Resolves the base URL from `ACTY_API_URL`, then the config file,
    /// then the built-in default.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins a path onto the base URL. A leading slash is optional.
    pub fn url_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// HTTP client for the activities API.
///
/// Every request carries `Authorization: Bearer <token>` when the session
/// store holds a token. A 401 sends the injected [`Navigator`] to
/// [`Route::SignIn`] and is still returned to the caller as an error.
#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: reqwest::Client,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Creates a client that ignores route changes.
    pub fn new(config: ApiConfig, session: Arc<dyn SessionStore>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            session,
            navigator: Arc::new(NoopNavigator),
        }
    }

    /// Replaces the navigator notified on 401 responses.
    #[must_use]
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Removes the stored credential. Returns true if one was stored.
    pub fn clear_session(&self) -> Result<bool> {
        self.session.clear()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, Some(body)).await
    }

    /// Sends a DELETE. Any response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.dispatch::<()>(Method::DELETE, path, None).await?;
        Ok(())
    }

    /// Sends a request and decodes the JSON payload of a 2xx response.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.dispatch(method, path, body).await?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(Self::classify_reqwest_error)?;

        serde_json::from_slice(&bytes).map_err(|e| ApiError::decode(status.as_u16(), e.to_string()))
    }

    /// Sends a request and returns the raw 2xx response.
    async fn dispatch<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.url_for(path);
        let token = self.current_token();

        tracing::debug!(
            method = %method,
            url = %url,
            authorized = token.is_some(),
            "dispatching request"
        );

        let mut request_builder = self
            .http
            .request(method.clone(), &url)
            .header("accept", "application/json");

        if let Some(token) = &token {
            request_builder = request_builder.bearer_auth(token);
        }
        if let Some(body) = body {
            request_builder = request_builder.json(body);
        }

        let response = request_builder
            .send()
            .await
            .map_err(Self::classify_reqwest_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        let error = ApiError::from_status(status.as_u16(), &error_body);

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                method = %method,
                url = %url,
                "session rejected, redirecting to sign-in"
            );
            self.navigator.navigate(Route::SignIn);
        } else {
            tracing::debug!(
                method = %method,
                url = %url,
                status = status.as_u16(),
                "request failed"
            );
        }

        Err(error)
    }

    /// Reads the credential. A failing store is treated as signed out.
    fn current_token(&self) -> Option<String> {
        match self.session.token() {
            Ok(token) => token,
            Err(e) => {
                let error = format!("{e:#}");
                tracing::warn!(error = %error, "failed to read session token");
                None
            }
        }
    }

    /// Classifies a reqwest error into an ApiError.
    fn classify_reqwest_error(e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::network(format!("Request timed out: {e}"))
        } else if e.is_connect() {
            ApiError::network(format!("Connection failed: {e}"))
        } else if e.is_request() {
            ApiError::network(format!("Request error: {e}"))
        } else {
            ApiError::network(e.to_string())
        }
    }
}
