//! Credential store backed by a YAML users file.
//!
//! The users file is a flat mapping of `username: bcrypt-hash`. The server
//! loads it once at startup into an immutable [`CredentialStore`]; the admin
//! CLI edits it through [`read_users_file`] and [`write_users_file`].
//!
//! bcrypt is CPU-bound, so hashing and verification run on the Tokio
//! blocking thread pool.

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::Path;

use tracing::warn;

use crate::error::CredentialError;

/// Default bcrypt cost for newly hashed passwords.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// Immutable username → password-hash mapping.
#[derive(Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, String>,
}

impl CredentialStore {
    /// Build a store from an in-memory mapping.
    #[must_use]
    pub fn from_map(users: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            users: users.into_iter().collect(),
        }
    }

    /// Load the users file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Load`] if the file cannot be read, or
    /// [`CredentialError::Parse`] if it is not a string-to-string mapping.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CredentialError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CredentialError::Load {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::from_map(parse_users(path, &raw)?))
    }

    /// Number of known users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store has no users at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Check `password` against the stored hash for `username`.
    ///
    /// The lookup is an exact match; callers normalise case beforehand.
    /// Unknown users and malformed stored hashes both yield `false`.
    pub async fn validate(&self, username: &str, password: &str) -> bool {
        let Some(hash) = self.users.get(username) else {
            return false;
        };

        match verify_password(password, hash).await {
            Ok(valid) => valid,
            Err(e) => {
                warn!(user = %username, error = %e, "stored password hash could not be verified");
                false
            }
        }
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("users", &self.users.len())
            .finish()
    }
}

/// Hash `password` with bcrypt at the given cost.
///
/// # Errors
///
/// Returns [`CredentialError::Hash`] if the cost is out of range or the
/// blocking task fails.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, CredentialError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| CredentialError::Hash {
            reason: format!("task join error: {e}"),
        })?
        .map_err(|e| CredentialError::Hash {
            reason: e.to_string(),
        })
}

/// Verify `password` against a bcrypt `hash` (constant-time comparison).
///
/// # Errors
///
/// Returns [`CredentialError::Hash`] if `hash` is not a valid bcrypt string.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, CredentialError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| CredentialError::Hash {
            reason: format!("task join error: {e}"),
        })?
        .map_err(|e| CredentialError::Hash {
            reason: e.to_string(),
        })
}

/// Read the users file for editing. A missing file is an empty mapping.
///
/// # Errors
///
/// Returns [`CredentialError::Load`] or [`CredentialError::Parse`].
pub async fn read_users_file(
    path: impl AsRef<Path>,
) -> Result<BTreeMap<String, String>, CredentialError> {
    let path = path.as_ref();
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => parse_users(path, &raw),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(e) => Err(CredentialError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Write `users` back to the users file, replacing its contents.
///
/// # Errors
///
/// Returns [`CredentialError::Save`] if serialisation or the write fails.
pub async fn write_users_file(
    path: impl AsRef<Path>,
    users: &BTreeMap<String, String>,
) -> Result<(), CredentialError> {
    let path = path.as_ref();
    let save_err = |reason: String| CredentialError::Save {
        path: path.display().to_string(),
        reason,
    };

    let yaml = serde_yaml::to_string(users).map_err(|e| save_err(e.to_string()))?;
    tokio::fs::write(path, yaml)
        .await
        .map_err(|e| save_err(e.to_string()))
}

fn parse_users(path: &Path, raw: &str) -> Result<BTreeMap<String, String>, CredentialError> {
    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let parsed: Option<BTreeMap<String, String>> =
        serde_yaml::from_str(raw).map_err(|e| CredentialError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    Ok(parsed.unwrap_or_default())
}
