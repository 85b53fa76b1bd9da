use anyhow::Result;
use tracing::info;

use crate::services::object_store::ObjectStore;

/// Uploads the rendered chart to `key`, replacing whatever was there.
#[tracing::instrument(skip(store, body), fields(bucket = %store.bucket(), bytes = body.len()))]
pub async fn publish(
    store: &dyn ObjectStore,
    body: Vec<u8>,
    key: &str,
    content_type: &str,
) -> Result<()> {
    store.put_object(key, body, content_type).await?;

    info!(key, "Successfully updated visualization");
    Ok(())
}
