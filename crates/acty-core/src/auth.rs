//! Sign-in and sign-out.

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiError};

/// Body of the sign-in request.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Why a sign-in did not produce a session.
#[derive(Debug)]
pub enum SignInError {
    /// A required field was empty; nothing was sent.
    MissingField(&'static str),
    /// The server or transport rejected the request.
    Api(ApiError),
    /// The token was received but could not be stored.
    Store(anyhow::Error),
}

impl SignInError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            SignInError::MissingField(field) => format!("{field} is required"),
            SignInError::Api(e) => e.message_or("Login failed").to_string(),
            SignInError::Store(e) => format!("Failed to save session: {e:#}"),
        }
    }
}

impl std::fmt::Display for SignInError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignInError::MissingField(field) => write!(f, "{field} is required"),
            SignInError::Api(e) => write!(f, "Sign-in failed: {e}"),
            SignInError::Store(e) => write!(f, "Failed to save session: {e:#}"),
        }
    }
}

impl std::error::Error for SignInError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SignInError::MissingField(_) => None,
            SignInError::Api(e) => Some(e),
            SignInError::Store(e) => Some(&**e),
        }
    }
}

impl From<ApiError> for SignInError {
    fn from(e: ApiError) -> Self {
        SignInError::Api(e)
    }
}

/// Exchanges username/password for a token and stores it as the session.
///
/// `token_path` is the sign-in endpoint relative to the base URL
/// (`/tokens` on most servers, `/token` on some). Returns the token.
pub async fn sign_in(
    client: &ApiClient,
    token_path: &str,
    username: &str,
    password: &str,
) -> Result<String, SignInError> {
    // blank check only; the username is sent exactly as typed
    if username.trim().is_empty() {
        return Err(SignInError::MissingField("username"));
    }
    if password.is_empty() {
        return Err(SignInError::MissingField("password"));
    }

    let response: TokenResponse = client
        .post(token_path, &Credentials { username, password })
        .await?;

    if response.token.is_empty() {
        return Err(SignInError::Api(ApiError::decode(
            200,
            "sign-in response has an empty token",
        )));
    }

    client
        .session()
        .set_token(&response.token)
        .map_err(SignInError::Store)?;
    tracing::debug!(username, "signed in");

    Ok(response.token)
}

/// Clears the stored session. Returns true if a token was removed.
pub fn sign_out(client: &ApiClient) -> anyhow::Result<bool> {
    client.clear_session()
}
