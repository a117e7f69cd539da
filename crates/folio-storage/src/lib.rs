//! Document storage abstraction for Folio.
//!
//! This crate defines the [`DocumentBackend`] trait, a flat name-to-bytes
//! store that knows nothing about rendering, sessions, or HTTP. The document
//! store in `folio-core` wraps a backend and layers the domain rules on top.
//!
//! Two implementations are provided:
//!
//! - [`FsBackend`]: production default, one file per document in a single
//!   directory
//! - [`MemoryBackend`]: in-memory, for testing only

mod error;
mod fs_backend;
mod memory;

pub use error::StorageError;
pub use fs_backend::FsBackend;
pub use memory::MemoryBackend;

/// A pluggable flat document store.
///
/// Names are single path components (no separators, no leading `.`). Values
/// are opaque byte arrays. Hidden entries and sub-directories are never
/// reported by [`list`](DocumentBackend::list).
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait DocumentBackend: Send + Sync + 'static {
    /// List every visible document name, sorted lexicographically.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::List`] if the underlying backend fails.
    async fn list(&self) -> Result<Vec<String>, StorageError>;

    /// Read a document's raw bytes.
    ///
    /// Returns `Ok(None)` if the document does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidName`] for names that fail
    /// [`validate_name`], or [`StorageError::Read`] if the backend fails.
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store a document, creating it or overwriting any existing content.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidName`] for names that fail
    /// [`validate_name`], or [`StorageError::Write`] if the backend fails.
    async fn write(&self, name: &str, content: &[u8]) -> Result<(), StorageError>;

    /// Delete a document permanently.
    ///
    /// Returns `Ok(false)` if there was nothing to delete.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidName`] for names that fail
    /// [`validate_name`], or [`StorageError::Delete`] if the backend fails.
    async fn delete(&self, name: &str) -> Result<bool, StorageError>;

    /// Check whether a document is visible in the store.
    ///
    /// The default implementation is a membership test against
    /// [`list`](DocumentBackend::list). Backends may override this with a
    /// cheaper check as long as the answer stays the same.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::List`] if the underlying backend fails.
    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.list().await?.iter().any(|n| n == name))
    }
}

/// Check that `name` is a single, visible path component.
///
/// # Errors
///
/// Returns [`StorageError::InvalidName`] describing the first rule broken.
pub fn validate_name(name: &str) -> Result<(), StorageError> {
    let reason = if name.is_empty() {
        "name must not be empty"
    } else if name.starts_with('.') {
        "name must not begin with '.'"
    } else if name.contains(['/', '\\']) {
        "name must not contain path separators"
    } else if name.contains('\0') {
        "name must not contain null bytes"
    } else {
        return Ok(());
    };

    Err(StorageError::InvalidName {
        name: name.to_owned(),
        reason: reason.to_owned(),
    })
}
