use anyhow::{Context, Result};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::debug;

use crate::services::object_store::ObjectStore;

/// Object store backed by a single S3 bucket.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Creates a store using the ambient AWS configuration (env vars, instance
    /// profile, etc.) already loaded by `aws_config::load_from_env`.
    pub fn new(config: &aws_config::SdkConfig, bucket: &str) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(config),
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        let mut page_count = 0usize;

        while let Some(page) = pages.next().await {
            let page = page.with_context(|| format!("S3 ListObjectsV2 failed for '{}'", self.bucket))?;
            page_count += 1;
            keys.extend(page.contents().iter().filter_map(|obj| obj.key().map(String::from)));
        }

        debug!(bucket = %self.bucket, pages = page_count, keys = keys.len(), "Bucket listed");
        Ok(keys)
    }

    async fn get_object(&self, key: &str) -> Result<Bytes> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("S3 GetObject failed for '{}/{key}'", self.bucket))?;

        let body = resp
            .body
            .collect()
            .await
            .with_context(|| format!("Failed to read body of '{}/{key}'", self.bucket))?;

        Ok(body.into_bytes())
    }

    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .with_context(|| format!("S3 PutObject failed for '{}/{key}'", self.bucket))?;

        Ok(())
    }
}
