//! In-memory storage backend for testing.
//!
//! This backend stores all documents in a `BTreeMap` behind a `RwLock`. It is
//! not persistent: all data is lost when the process exits. Use this for
//! unit tests where you need a real backend without touching disk.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{DocumentBackend, StorageError, validate_name};

/// An in-memory document backend backed by a `BTreeMap`.
///
/// Keys are kept sorted, so listing needs no extra sort.
///
/// # Examples
///
/// ```
/// # use folio_storage::{DocumentBackend, MemoryBackend};
/// # #[tokio::main]
/// # async fn main() {
/// let backend = MemoryBackend::new();
/// backend.write("about.md", b"# Hi").await.unwrap();
/// let val = backend.read("about.md").await.unwrap();
/// assert_eq!(val, Some(b"# Hi".to_vec()));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    data: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryBackend {
    /// Create a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DocumentBackend for MemoryBackend {
    async fn list(&self) -> Result<Vec<String>, StorageError> {
        let data = self.data.read().await;
        Ok(data.keys().cloned().collect())
    }

    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        validate_name(name)?;
        let data = self.data.read().await;
        Ok(data.get(name).cloned())
    }

    async fn write(&self, name: &str, content: &[u8]) -> Result<(), StorageError> {
        validate_name(name)?;
        let mut data = self.data.write().await;
        data.insert(name.to_owned(), content.to_vec());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        validate_name(name)?;
        let mut data = self.data.write().await;
        Ok(data.remove(name).is_some())
    }

    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        let data = self.data.read().await;
        Ok(data.contains_key(name))
    }
}
