//! acty core library.
//!
//! Authenticated API client, session storage and activity model shared by
//! the CLI and tests.

pub mod activities;
pub mod api;
pub mod auth;
pub mod config;
pub mod logging;
pub mod routes;
pub mod session;
