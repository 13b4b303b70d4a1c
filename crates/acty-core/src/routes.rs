//! Client-side routes and the navigation capability.
//!
//! The API client never decides what "go to sign-in" means. It reports the
//! route through a [`Navigator`] owned by the caller's top-level layer.

use std::fmt;
#[cfg(test)]
use std::sync::Mutex;

/// Client-side routes known to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    SignIn,
    Activities,
    Main,
    /// Referenced by the sign-in view but not implemented.
    Register,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Home,
        Route::SignIn,
        Route::Activities,
        Route::Main,
        Route::Register,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::SignIn => "/signin",
            Route::Activities => "/activities",
            Route::Main => "/main",
            Route::Register => "/register",
        }
    }

    /// Parses a route path. Trailing slashes are ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL.into_iter().find(|r| r.path() == normalized)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Performs a client-side route change.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that ignores every route change.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _route: Route) {}
}

/// Navigator that remembers every route it was sent to.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingNavigator {
    visited: Mutex<Vec<Route>>,
}

#[cfg(test)]
impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes navigated to so far, oldest first.
    pub fn visited(&self) -> Vec<Route> {
        self.visited.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn count(&self, route: Route) -> usize {
        self.visited().iter().filter(|r| **r == route).count()
    }
}

#[cfg(test)]
impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(route);
        }
    }
}
