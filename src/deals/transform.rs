use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::config::TransformConfig;
use crate::deals::ranking::top_agents;
use crate::deals::types::{DealRecord, RawRecord};

/// Filters raw deals down to the won deals of the target year closed by the
/// top-ranked agents.
///
/// Steps, in order:
/// 1. empty input returns empty output
/// 2. derive the agent first name and drop excluded names
/// 3. parse `close_date` as `MM/DD/YYYY`, unparseable values become `None`
/// 4. if no surviving row has a date at all, abort with an empty result
/// 5. keep rows closed in `target_year` with stage `won_stage`
/// 6. keep rows whose agent ranks in the top `top_k` by deal count
///
/// Never fails; degenerate input degrades to an empty result.
#[tracing::instrument(skip_all, fields(input_rows = raw.len()))]
pub fn transform(raw: &[RawRecord], config: &TransformConfig) -> Vec<DealRecord> {
    if raw.is_empty() {
        return Vec::new();
    }

    let candidates: Vec<DealRecord> = raw
        .iter()
        .filter(|r| !config.is_excluded(r.agent_first_name()))
        .map(DealRecord::from_raw)
        .collect();
    debug!(
        excluded = raw.len() - candidates.len(),
        remaining = candidates.len(),
        "Excluded agents removed"
    );

    if !candidates.is_empty() && candidates.iter().all(|d| d.close_date.is_none()) {
        warn!(
            rows = candidates.len(),
            "The 'close_date' column is not in datetime format"
        );
        return Vec::new();
    }

    let closed: Vec<DealRecord> = candidates
        .into_iter()
        .filter(|d| d.close_year() == Some(config.target_year))
        .filter(|d| d.deal_stage() == config.won_stage)
        .collect();
    debug!(
        rows = closed.len(),
        year = config.target_year,
        stage = %config.won_stage,
        "Closed deals selected"
    );

    let ranking = top_agents(&closed, config.top_k);
    for (rank, entry) in ranking.iter().enumerate() {
        info!(rank = rank + 1, agent = %entry.agent, deals = entry.deals, "Top agent");
    }

    let selected: HashSet<&str> = ranking.iter().map(|a| a.agent.as_str()).collect();
    let result: Vec<DealRecord> = closed
        .iter()
        .filter(|d| selected.contains(d.sales_agent()))
        .cloned()
        .collect();

    debug!(output_rows = result.len(), "Transform complete");
    result
}
