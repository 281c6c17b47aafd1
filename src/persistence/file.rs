//! File-backed storage medium.
//!
//! Each identifier is a relative path under a root directory. Writes go to a
//! sibling temporary file first and are renamed into place, so a reader never
//! observes a half-written snapshot.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::error::StorageError;
use crate::persistence::Storage;

// == File Storage ==
/// Stores byte blobs as files below `root`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Creates a medium rooted at `root`. The directory is created lazily on
    /// the first store.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps an identifier to a path under the root.
    ///
    /// Only plain relative paths are accepted; anything that could escape
    /// the root is rejected.
    fn resolve(&self, identifier: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(identifier);
        let mut has_name = false;

        for component in relative.components() {
            match component {
                Component::Normal(_) => has_name = true,
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(StorageError::InvalidIdentifier(identifier.to_string()));
                }
            }
        }

        if !has_name {
            return Err(StorageError::InvalidIdentifier(identifier.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn store(&self, bytes: Vec<u8>, identifier: &str) -> Result<(), StorageError> {
        let path = self.resolve(identifier)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut temp = OsString::from(path.as_os_str());
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        fs::write(&temp, &bytes).await?;
        fs::rename(&temp, &path).await?;

        debug!(path = %path.display(), size = bytes.len(), "stored blob");
        Ok(())
    }

    async fn load(&self, identifier: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.resolve(identifier)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
