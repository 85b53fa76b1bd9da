use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use bytes::Bytes;

use crate::services::object_store::ObjectStore;

/// A stored object body and its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: Option<String>,
}

/// Object store held in memory.
///
/// Keys list in lexicographic order, the same order S3 returns them in.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    bucket: String,
    objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl InMemoryStore {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: Mutex::new(BTreeMap::new()),
        }
    }

    /// Adds or replaces an object without a content type.
    pub fn insert(&self, key: &str, body: impl Into<Bytes>) {
        self.lock().insert(
            key.to_string(),
            StoredObject {
                body: body.into(),
                content_type: None,
            },
        );
    }

    /// Returns a copy of the object at `key`, if present.
    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, StoredObject>> {
        // A poisoned map is still consistent: every mutation is a single insert.
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait::async_trait]
impl ObjectStore for InMemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.lock().keys().cloned().collect())
    }

    async fn get_object(&self, key: &str) -> Result<Bytes> {
        self.lock()
            .get(key)
            .map(|o| o.body.clone())
            .ok_or_else(|| anyhow!("Object '{}/{key}' does not exist", self.bucket))
    }

    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        self.lock().insert(
            key.to_string(),
            StoredObject {
                body: Bytes::from(body),
                content_type: Some(content_type.to_string()),
            },
        );
        Ok(())
    }
}
