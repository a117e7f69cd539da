//! Document store.
//!
//! Wraps a [`DocumentBackend`] with the domain rules: documents are visible
//! only if listed, names are unique, and new documents start empty. The
//! backend is the single source of truth; nothing is cached here.

use std::path::Path;
use std::sync::Arc;

use folio_storage::DocumentBackend;
use tracing::info;

use crate::error::DocumentError;

/// How a document's bytes are presented, resolved once from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// `.txt`: served verbatim as `text/plain`.
    PlainText,
    /// `.md`: converted to HTML.
    Markdown,
    /// Anything else: served verbatim with the default content type.
    Raw,
}

impl ContentKind {
    /// Resolve the kind from a document name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match Path::new(name).extension().and_then(|e| e.to_str()) {
            Some("md") => Self::Markdown,
            Some("txt") => Self::PlainText,
            _ => Self::Raw,
        }
    }
}

/// A document as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name, unique within the store.
    pub name: String,
    /// Presentation kind derived from `name`.
    pub kind: ContentKind,
    /// Raw bytes exactly as stored.
    pub content: Vec<u8>,
}

/// Document CRUD over a pluggable backend.
pub struct DocumentStore {
    backend: Arc<dyn DocumentBackend>,
}

impl DocumentStore {
    /// Create a store over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self { backend }
    }

    /// List every visible document name, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Storage`] if the backend cannot be listed.
    pub async fn list(&self) -> Result<Vec<String>, DocumentError> {
        Ok(self.backend.list().await?)
    }

    /// Check whether `name` is a listed document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Storage`] if the backend cannot be listed.
    pub async fn exists(&self, name: &str) -> Result<bool, DocumentError> {
        Ok(self.backend.exists(name).await?)
    }

    /// Read a document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if `name` is not listed.
    pub async fn read(&self, name: &str) -> Result<Document, DocumentError> {
        let not_found = || DocumentError::NotFound {
            name: name.to_owned(),
        };

        if !self.backend.exists(name).await? {
            return Err(not_found());
        }

        let content = match self.backend.read(name).await {
            Ok(Some(content)) => content,
            // Deleted between the listing and the read, or a hidden name.
            Ok(None) | Err(folio_storage::StorageError::InvalidName { .. }) => {
                return Err(not_found());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Document {
            name: name.to_owned(),
            kind: ContentKind::from_name(name),
            content,
        })
    }

    /// Create or overwrite a document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidName`] if `name` is not a single
    /// visible path component, or [`DocumentError::Storage`] on write failure.
    pub async fn write(&self, name: &str, content: &[u8]) -> Result<(), DocumentError> {
        self.backend.write(name, content).await?;
        info!(document = %name, bytes = content.len(), "document saved");
        Ok(())
    }

    /// Create a new, empty document and return its stored name.
    ///
    /// Surrounding whitespace is trimmed from `name` first. An existing
    /// document is never overwritten.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::EmptyName`] if nothing remains after trimming
    /// - [`DocumentError::InvalidName`] if the name breaks the naming rules
    /// - [`DocumentError::AlreadyExists`] if the name is already listed
    pub async fn create(&self, name: &str) -> Result<String, DocumentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DocumentError::EmptyName);
        }
        folio_storage::validate_name(name)?;

        if self.backend.exists(name).await? {
            return Err(DocumentError::AlreadyExists {
                name: name.to_owned(),
            });
        }

        self.backend.write(name, b"").await?;
        info!(document = %name, "document created");
        Ok(name.to_owned())
    }

    /// Delete a document permanently.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if `name` is not listed.
    pub async fn delete(&self, name: &str) -> Result<(), DocumentError> {
        let not_found = || DocumentError::NotFound {
            name: name.to_owned(),
        };

        if !self.backend.exists(name).await? {
            return Err(not_found());
        }
        if !self.backend.delete(name).await? {
            return Err(not_found());
        }

        info!(document = %name, "document deleted");
        Ok(())
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore").finish_non_exhaustive()
    }
}
