//! Filesystem storage backend, the production default.
//!
//! Each document is one regular file directly inside the root directory.
//! Hidden entries (leading `.`) and sub-directories are invisible to
//! [`DocumentBackend::list`]. Writes are plain overwrites with no locking, so
//! concurrent saves of the same document are last-write-wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{DocumentBackend, StorageError, validate_name};

/// A document backend rooted at one directory on disk.
///
/// # Examples
///
/// ```no_run
/// # use folio_storage::FsBackend;
/// let backend = FsBackend::open("./data").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    /// Open the document directory at `root`, creating it if it does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the directory cannot be created or
    /// `root` exists but is not a directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref();
        std::fs::create_dir_all(root).map_err(|e| StorageError::Open {
            path: root.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Return the document directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }
}

#[async_trait::async_trait]
impl DocumentBackend for FsBackend {
    async fn list(&self) -> Result<Vec<String>, StorageError> {
        let list_err = |e: std::io::Error| StorageError::List {
            reason: format!("{}: {e}", self.root.display()),
        };

        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(list_err)?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
            let Ok(name) = entry.file_name().into_string() else {
                debug!(path = %entry.path().display(), "skipping non-UTF-8 file name");
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            // Follow symlinks so a link to a directory is hidden too.
            let is_dir = tokio::fs::metadata(entry.path())
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);
            if is_dir {
                continue;
            }
            names.push(name);
        }

        names.sort();
        Ok(names)
    }

    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(name)?;

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => return Ok(None),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::Read {
                    name: name.to_owned(),
                    reason: e.to_string(),
                });
            }
        }

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read {
                name: name.to_owned(),
                reason: e.to_string(),
            }),
        }
    }

    async fn write(&self, name: &str, content: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| StorageError::Write {
                name: name.to_owned(),
                reason: e.to_string(),
            })
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Delete {
                name: name.to_owned(),
                reason: e.to_string(),
            }),
        }
    }
}
