use std::collections::HashMap;

use crate::deals::types::DealRecord;

/// Number of deals attributed to one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentCount {
    pub agent: String,
    pub deals: usize,
}

/// Ranks agents by deal count and returns at most `k` of them.
///
/// Highest count first; equal counts are ordered by agent name so the cut at
/// the `k`-th slot is deterministic.
pub fn top_agents(deals: &[DealRecord], k: usize) -> Vec<AgentCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for deal in deals {
        *counts.entry(deal.sales_agent()).or_default() += 1;
    }

    let mut ranked: Vec<AgentCount> = counts
        .into_iter()
        .map(|(agent, deals)| AgentCount {
            agent: agent.to_string(),
            deals,
        })
        .collect();

    ranked.sort_by(|a, b| b.deals.cmp(&a.deals).then_with(|| a.agent.cmp(&b.agent)));
    ranked.truncate(k);
    ranked
}
