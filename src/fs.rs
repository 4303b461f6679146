use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::error::StorageError;

/// An object that can be used to get and put blobs within one container.
#[async_trait]
pub trait BlobStorageProvider: Send + Sync {
    /// Returns the contents of `blob_name`, or `None` if it does not exist
    async fn maybe_get(&self, blob_name: &str) -> Result<Option<Vec<u8>>, StorageError>;
    async fn put(&self, blob_name: &str, contents: Vec<u8>) -> Result<(), StorageError>;
    /// The name of the container (bucket, directory) blobs are read from
    fn container(&self) -> &str;
}

/// A [`BlobStorageProvider`] for local disk, with blob names relative to `root`
pub struct LocalDisk {
    root: PathBuf,
    name: String,
}

impl LocalDisk {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root.display().to_string();
        Self { root, name }
    }

    /// Resolves `blob_name` under `root`; absolute names and `..` are rejected
    fn path(&self, blob_name: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(blob_name);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("'{blob_name}' is not a path inside '{}'", self.name),
            )
            .into());
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStorageProvider for LocalDisk {
    async fn maybe_get(&self, blob_name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path(blob_name)?;
        if path.try_exists()? {
            Ok(Some(std::fs::read(path)?))
        } else {
            Ok(None)
        }
    }

    async fn put(&self, blob_name: &str, contents: Vec<u8>) -> Result<(), StorageError> {
        let path = self.path(blob_name)?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn container(&self) -> &str {
        &self.name
    }
}

/// A [`BlobStorageProvider`] held in memory
#[derive(Default)]
pub struct InMemory {
    name: String,
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blobs: Default::default(),
        }
    }
}

#[async_trait]
impl BlobStorageProvider for InMemory {
    async fn maybe_get(&self, blob_name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let blobs = self.blobs.read().unwrap_or_else(PoisonError::into_inner);
        Ok(blobs.get(blob_name).cloned())
    }

    async fn put(&self, blob_name: &str, contents: Vec<u8>) -> Result<(), StorageError> {
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(blob_name.to_string(), contents);
        Ok(())
    }

    fn container(&self) -> &str {
        &self.name
    }
}
