//! Error types for `folio-core`.
//!
//! Each error variant carries enough context to diagnose the problem without
//! a debugger. Credential errors never include passwords or hashes, only
//! file paths, usernames, and operation descriptions.

use folio_storage::StorageError;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The document is not in the store.
    #[error("document '{name}' not found")]
    NotFound { name: String },

    /// A document with this name already exists.
    #[error("document '{name}' already exists")]
    AlreadyExists { name: String },

    /// The submitted name was empty (after trimming).
    #[error("document name is empty")]
    EmptyName,

    /// The name is not a single visible path component.
    #[error("invalid document name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The storage backend returned an error.
    #[error("document storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for DocumentError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidName { name, reason } => Self::InvalidName { name, reason },
            other => Self::Storage(other),
        }
    }
}

/// Errors from credential file operations.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The users file could not be read.
    #[error("failed to read users file '{path}': {reason}")]
    Load { path: String, reason: String },

    /// The users file is not a `username: hash` mapping.
    #[error("failed to parse users file '{path}': {reason}")]
    Parse { path: String, reason: String },

    /// The users file could not be written.
    #[error("failed to write users file '{path}': {reason}")]
    Save { path: String, reason: String },

    /// Hashing or verification failed inside bcrypt.
    #[error("password hashing failed: {reason}")]
    Hash { reason: String },

    /// The requested user is not in the users file.
    #[error("user '{username}' not found")]
    UnknownUser { username: String },
}

/// Errors from the sign-in gate.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The session carries no signed-in user.
    #[error("sign-in required")]
    SignInRequired,
}
