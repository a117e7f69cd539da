//! Sign-in validation and the signed-in gate.

use tracing::info;

use crate::credentials::CredentialStore;
use crate::error::AuthError;
use crate::session::Session;

/// Validates credentials and guards protected operations.
#[derive(Debug, Clone)]
pub struct Authenticator {
    credentials: CredentialStore,
}

impl Authenticator {
    /// Create an authenticator over a loaded credential store.
    #[must_use]
    pub fn new(credentials: CredentialStore) -> Self {
        Self { credentials }
    }

    /// Check a username/password pair.
    ///
    /// `username` must already be case-normalised by the caller; the lookup
    /// itself is exact.
    pub async fn validate(&self, username: &str, password: &str) -> bool {
        let valid = self.credentials.validate(username, password).await;
        if valid {
            info!(user = %username, "sign-in accepted");
        } else {
            info!(user = %username, "sign-in rejected");
        }
        valid
    }

    /// Whether `session` carries a signed-in user.
    #[must_use]
    pub fn is_signed_in(session: &Session) -> bool {
        session.username.is_some()
    }

    /// Gate for protected operations.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SignInRequired`] if nobody is signed in.
    pub fn require_signed_in(session: &Session) -> Result<(), AuthError> {
        if Self::is_signed_in(session) {
            Ok(())
        } else {
            Err(AuthError::SignInRequired)
        }
    }
}
