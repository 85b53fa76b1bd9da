//! Trait for the bucket the job reads from and writes to.

use anyhow::Result;
use bytes::Bytes;

/// Abstraction over an object store bucket (e.g., S3).
///
/// An implementation is bound to a single bucket.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket, used for logging.
    fn bucket(&self) -> &str;

    /// Returns every key in the bucket, following pagination to the end.
    async fn list_keys(&self) -> Result<Vec<String>>;

    /// Fetches the full body of the object at `key`.
    async fn get_object(&self, key: &str) -> Result<Bytes>;

    /// Writes `body` to `key`, replacing any existing object.
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;
}
