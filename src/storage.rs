use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
}

#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()>;
    async fn get_object(&self, key: &str) -> anyhow::Result<Option<StoredObject>>;
    async fn delete_object(&self, key: &str) -> anyhow::Result<()>;
    /// Path a client can fetch the object from.
    fn url_for(&self, key: &str) -> String;
}

/// Process-local object store. Contents vanish with the process.
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, StoredObject>>,
    url_prefix: String,
}

impl MemoryStorage {
    pub fn new(url_prefix: impl Into<String>) -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            url_prefix: url_prefix.into(),
        }
    }

    /// Preload an object, for content that exists before any upload.
    pub fn with_object(self, key: &str, body: Bytes, content_type: &str) -> Self {
        self.objects().insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        self
    }

    pub fn len(&self) -> usize {
        self.objects().len()
    }

    fn objects(&self) -> MutexGuard<'_, HashMap<String, StoredObject>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StorageClient for MemoryStorage {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        anyhow::ensure!(!key.is_empty(), "empty object key");
        self.objects().insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get_object(&self, key: &str) -> anyhow::Result<Option<StoredObject>> {
        Ok(self.objects().get(key).cloned())
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        self.objects().remove(key);
        Ok(())
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.url_prefix.trim_end_matches('/'), key)
    }
}
