//! Authenticated HTTP client for the activities API.
//!
//! The client attaches the session credential to every request and reports
//! 401 responses to the caller's [`Navigator`](crate::routes::Navigator)
//! before returning them as [`ApiErrorKind::Unauthenticated`]. It never
//! clears the credential on its own; callers use
//! [`ApiClient::clear_session`] when they decide the session is over.

mod client;
mod errors;

pub use client::{ApiClient, ApiConfig};
pub use errors::{ApiError, ApiErrorKind};
