//! HTTP error types for the Folio server.
//!
//! Maps domain errors from `folio-core` into browser-facing responses. User
//! mistakes never produce an error page: they become a `302` back to the
//! index with a flash message explaining what went wrong. Only unexpected
//! failures surface as a plain `500`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use folio_core::error::{AuthError, DocumentError};

use crate::middleware::redirect_with_flash;

/// Flash shown when a protected route is hit without signing in.
pub const SIGN_IN_REQUIRED: &str = "You must be signed in to do that.";

/// Application-level error returned from HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// No signed-in session.
    SignInRequired,
    /// The named document does not exist.
    NotFound(String),
    /// A document with this name already exists.
    AlreadyExists(String),
    /// The name cannot be used for a document.
    InvalidName { name: String, reason: String },
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::SignInRequired => redirect_with_flash("/", SIGN_IN_REQUIRED),
            Self::NotFound(name) => redirect_with_flash("/", format!("File '{name}' not found.")),
            Self::AlreadyExists(name) => redirect_with_flash(
                "/",
                format!("File '{name}' already exists; new file not created."),
            ),
            Self::InvalidName { name, reason } => {
                redirect_with_flash("/", format!("Invalid file name '{name}': {reason}."))
            }
            Self::Internal(msg) => {
                error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::SignInRequired => Self::SignInRequired,
        }
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound { name } => Self::NotFound(name),
            DocumentError::AlreadyExists { name } => Self::AlreadyExists(name),
            DocumentError::InvalidName { name, reason } => Self::InvalidName { name, reason },
            DocumentError::EmptyName => Self::InvalidName {
                name: String::new(),
                reason: "name must not be empty".to_owned(),
            },
            DocumentError::Storage(_) => Self::Internal(err.to_string()),
        }
    }
}
