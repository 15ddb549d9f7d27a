//! Thread-safe in-memory object storage.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::acceptance::ports::{DocumentStorage, StorageError};

fn lock_error(err: impl ToString) -> StorageError {
    StorageError::backend(std::io::Error::other(err.to_string()))
}

/// An object held by [`InMemoryDocumentStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object contents.
    pub bytes: Vec<u8>,
    /// MIME type recorded on upload.
    pub content_type: String,
}

/// Key-addressed byte store backed by a map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStorage {
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
}

impl InMemoryDocumentStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an object without going through the port.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the lock is poisoned.
    pub fn put(
        &self,
        key: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        content_type: impl Into<String>,
    ) -> Result<(), StorageError> {
        let mut objects = self.objects.write().map_err(lock_error)?;
        objects.insert(
            key.into(),
            StoredObject {
                bytes: bytes.into(),
                content_type: content_type.into(),
            },
        );
        Ok(())
    }

    /// Returns the object stored under `key`, if any.
    #[must_use]
    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .ok()
            .and_then(|objects| objects.get(key).cloned())
    }

    /// Returns every stored key, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

#[async_trait]
impl DocumentStorage for InMemoryDocumentStorage {
    async fn download(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let objects = self.objects.read().map_err(lock_error)?;
        objects
            .get(key)
            .map(|object| object.bytes.clone())
            .ok_or_else(|| StorageError::NotFound(key.to_owned()))
    }

    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.put(key, bytes, content_type)
    }
}
