use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Categories of API failures a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// No response was received (connect failure, timeout, bad request build)
    Network,
    /// The server answered 401: the credential is missing or no longer valid
    Unauthenticated,
    /// Any other non-2xx response
    Status,
    /// A 2xx response whose body did not match the expected shape
    Decode,
    /// The request was refused locally and never sent
    InvalidRequest,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Unauthenticated => write!(f, "unauthenticated"),
            ApiErrorKind::Status => write!(f, "status"),
            ApiErrorKind::Decode => write!(f, "decode"),
            ApiErrorKind::InvalidRequest => write!(f, "invalid_request"),
        }
    }
}

/// Structured error returned by every [`ApiClient`](super::ApiClient) call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// Human-readable message reported by the server, if any
    pub message: Option<String>,
    /// Raw response body or transport error text
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a transport-level error (no response received).
    pub fn network(details: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            status: None,
            message: None,
            details: Some(details.into()),
        }
    }

    /// Creates an error from a non-2xx response.
    ///
    /// 401 maps to [`ApiErrorKind::Unauthenticated`], everything else to
    /// [`ApiErrorKind::Status`]. The server message is pulled out of the JSON
    /// body when present.
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = if status == 401 {
            ApiErrorKind::Unauthenticated
        } else {
            ApiErrorKind::Status
        };
        let details = (!body.trim().is_empty()).then(|| body.to_string());
        Self {
            kind,
            status: Some(status),
            message: extract_message(body),
            details,
        }
    }

    /// Creates an error for a 2xx body that failed to deserialize.
    pub fn decode(status: u16, details: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Decode,
            status: Some(status),
            message: None,
            details: Some(details.into()),
        }
    }

    /// Creates an error for a request that was not sent.
    pub fn invalid_request(details: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::InvalidRequest,
            status: None,
            message: None,
            details: Some(details.into()),
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.kind == ApiErrorKind::Unauthenticated
    }

    /// Returns the server message, or `fallback` when the server sent none.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.status, self.message.as_deref()) {
            (ApiErrorKind::Network, _, _) => write!(
                f,
                "Network error: {}",
                self.details.as_deref().unwrap_or("no response")
            ),
            (ApiErrorKind::Decode, _, _) => write!(
                f,
                "Unexpected response: {}",
                self.details.as_deref().unwrap_or("invalid body")
            ),
            (ApiErrorKind::InvalidRequest, _, _) => write!(
                f,
                "Invalid request: {}",
                self.details.as_deref().unwrap_or("refused")
            ),
            (_, Some(status), Some(msg)) => write!(f, "HTTP {status}: {msg}"),
            (_, Some(status), None) => write!(f, "HTTP {status}"),
            (kind, None, _) => write!(f, "{kind}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Pulls a display message out of a JSON error body.
///
/// Accepts `{"message": ".."}`, `{"error": {"message": ".."}}` and
/// `{"error": ".."}`.
fn extract_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    let msg = json
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| {
            json.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
        })
        .or_else(|| json.get("error").and_then(Value::as_str))?;
    let trimmed = msg.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
