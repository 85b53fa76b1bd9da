//! One run of the job: source → transform → aggregate/render → sink.

use anyhow::Result;
use tokio::time::MissedTickBehavior;
use tracing::{Instrument, error, info, warn};

use crate::config::PipelineConfig;
use crate::deals::transform;
use crate::render::{ChartRenderer, aggregate_and_render};
use crate::services::object_store::ObjectStore;
use crate::sink::publish;
use crate::source::fetch_all;

/// How a run that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No source file matched, or the files held no rows.
    NoNewData,
    /// Rows were loaded but none survived the transform, so there was
    /// nothing to draw.
    NoValidData,
    /// A new chart was uploaded.
    Published {
        key: String,
        bytes: usize,
        rows: usize,
    },
}

/// Runs every stage once, stopping early when a stage comes up empty.
///
/// Empty results are not errors; they are reported through [`RunOutcome`]
/// and leave the previous chart in place. Any other failure is logged and
/// returned to the caller.
pub async fn run_once(
    store: &dyn ObjectStore,
    renderer: &dyn ChartRenderer,
    config: &PipelineConfig,
) -> Result<RunOutcome> {
    match run_stages(store, renderer, config).await {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            error!(error = %e, "Processing failed");
            Err(e)
        }
    }
}

async fn run_stages(
    store: &dyn ObjectStore,
    renderer: &dyn ChartRenderer,
    config: &PipelineConfig,
) -> Result<RunOutcome> {
    let raw = fetch_all(store, &config.source).await?;
    if raw.is_empty() {
        info!("No new data to process");
        return Ok(RunOutcome::NoNewData);
    }

    let deals = transform(&raw, &config.transform);
    if deals.is_empty() {
        warn!(raw_rows = raw.len(), "No valid data after transformations");
        return Ok(RunOutcome::NoValidData);
    }

    let Some(png) = aggregate_and_render(&deals, renderer, &config.chart)? else {
        return Ok(RunOutcome::NoValidData);
    };

    let bytes = png.len();
    publish(store, png, &config.output_key, &config.output_content_type).await?;

    Ok(RunOutcome::Published {
        key: config.output_key.clone(),
        bytes,
        rows: deals.len(),
    })
}

/// Calls [`run_once`] every `config.schedule_interval`, starting immediately.
///
/// Missed ticks are skipped rather than replayed, and a failed run is only
/// logged; the loop keeps going until the process is stopped.
pub async fn run_scheduled(
    store: &dyn ObjectStore,
    renderer: &dyn ChartRenderer,
    config: &PipelineConfig,
) -> Result<()> {
    let mut interval = tokio::time::interval(config.schedule_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        interval_secs = config.schedule_interval.as_secs(),
        bucket = %store.bucket(),
        "Scheduler started"
    );

    let mut tick = 0u64;
    loop {
        interval.tick().await;
        tick += 1;

        let span = tracing::info_span!("scheduled_run", tick);
        match run_once(store, renderer, config).instrument(span).await {
            Ok(outcome) => info!(tick, ?outcome, "Scheduled run finished"),
            Err(e) => error!(tick, error = %e, "Scheduled run failed"),
        }
    }
}
