//! Sales-deal records and the filter/parse/rank transform applied to them.

pub mod date;
pub mod ranking;
pub mod transform;
pub mod types;

pub use ranking::{AgentCount, top_agents};
pub use transform::transform;
pub use types::{DealRecord, RawRecord};
