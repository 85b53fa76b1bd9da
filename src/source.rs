//! Loading of raw deal records from the source bucket.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::{MalformedRowPolicy, SourceConfig};
use crate::deals::RawRecord;
use crate::services::object_store::ObjectStore;

/// Reads every object whose key ends with the configured suffix and
/// concatenates their rows in listing order.
///
/// Returns an empty dataset, not an error, when no key matches.
///
/// # Errors
///
/// Fails when listing or fetching fails, or when a row is malformed and the
/// policy is [`MalformedRowPolicy::Fail`].
#[tracing::instrument(skip_all, fields(bucket = %store.bucket(), suffix = %config.suffix))]
pub async fn fetch_all(store: &dyn ObjectStore, config: &SourceConfig) -> Result<Vec<RawRecord>> {
    let keys: Vec<String> = store
        .list_keys()
        .await?
        .into_iter()
        .filter(|key| key.ends_with(&config.suffix))
        .collect();

    if keys.is_empty() {
        info!("No source files found");
        return Ok(Vec::new());
    }
    debug!(files = keys.len(), "Source files selected");

    let mut records = Vec::new();
    for key in &keys {
        let body = store.get_object(key).await?;
        let rows = parse_records(&body, key, config.malformed_rows)?;
        debug!(key = %key, rows = rows.len(), "Source file loaded");
        records.extend(rows);
    }

    info!(files = keys.len(), rows = records.len(), "Raw data loaded");
    Ok(records)
}

/// Decodes comma-separated text with a header row into records.
///
/// `key` only labels log lines and errors.
pub fn parse_records(body: &[u8], key: &str, policy: MalformedRowPolicy) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(body);
    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for (index, result) in rdr.deserialize::<RawRecord>().enumerate() {
        match result {
            Ok(record) => rows.push(record),
            Err(e) => match policy {
                MalformedRowPolicy::Drop => {
                    dropped += 1;
                    warn!(key, row = index + 1, error = %e, "Dropping malformed row");
                }
                MalformedRowPolicy::Fail => {
                    return Err(e).with_context(|| format!("Malformed row {} in '{key}'", index + 1));
                }
            },
        }
    }

    if dropped > 0 {
        warn!(key, dropped, kept = rows.len(), "Malformed rows dropped");
    }

    Ok(rows)
}
