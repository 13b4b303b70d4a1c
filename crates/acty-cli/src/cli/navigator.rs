//! Terminal rendition of client-side navigation.

use std::sync::Arc;

use acty_core::routes::{Navigator, Route};
use acty_core::session::SessionStore;

/// Handles the sign-in redirect: the stale token is dropped and the user is
/// told how to sign in again. Other routes have no terminal meaning.
pub struct SignInRedirect {
    session: Arc<dyn SessionStore>,
}

impl SignInRedirect {
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self { session }
    }
}

impl Navigator for SignInRedirect {
    fn navigate(&self, route: Route) {
        if route != Route::SignIn {
            tracing::debug!(%route, "ignoring navigation");
            return;
        }

        if let Err(e) = self.session.clear() {
            let error = format!("{e:#}");
            tracing::warn!(error = %error, "failed to clear session");
        }
        eprintln!("Session expired. Run `acty signin` to sign in again.");
    }
}
