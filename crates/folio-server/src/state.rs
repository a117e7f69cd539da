//! Shared application state for the Folio server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`.

use std::sync::Arc;

use folio_core::auth::Authenticator;
use folio_core::document::DocumentStore;
use folio_core::session::SessionStore;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Document CRUD over the data directory.
    pub documents: Arc<DocumentStore>,
    /// Credential validation.
    pub authenticator: Arc<Authenticator>,
    /// Server-side session table.
    pub sessions: Arc<SessionStore>,
    /// Whether the session cookie is marked `Secure`.
    pub secure_cookie: bool,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("secure_cookie", &self.secure_cookie)
            .finish_non_exhaustive()
    }
}
