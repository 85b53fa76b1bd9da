//! Job parameters.
//!
//! Every value is compiled in; [`PipelineConfig::default`] is what the
//! binary runs with. Tests build variations of it directly.

use std::collections::HashSet;
use std::time::Duration;

use crate::render::ChartSpec;

/// Bucket holding both the source CSVs and the rendered chart.
pub const BUCKET_NAME: &str = "jara-data-pipeline";

/// Key the chart is written to on every successful run.
pub const OUTPUT_KEY: &str = "results/latest_chart.png";

pub const OUTPUT_CONTENT_TYPE: &str = "image/png";

pub const SOURCE_SUFFIX: &str = ".csv";

/// Agents whose first name appears here never reach the chart.
pub const EXCLUDED_FIRST_NAMES: &[&str] = &["Darcel", "Kami", "Jonathan"];

pub const TARGET_YEAR: i32 = 2016;

pub const WON_STAGE: &str = "Won";

pub const TOP_AGENTS: usize = 5;

pub const SCHEDULE_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// What to do with a CSV row that cannot be decoded into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedRowPolicy {
    /// Skip the row and log a warning.
    #[default]
    Drop,
    /// Abort the fetch with an error naming the object and row.
    Fail,
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub suffix: String,
    pub malformed_rows: MalformedRowPolicy,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            suffix: SOURCE_SUFFIX.to_string(),
            malformed_rows: MalformedRowPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformConfig {
    pub excluded_first_names: HashSet<String>,
    pub target_year: i32,
    pub won_stage: String,
    pub top_k: usize,
}

impl TransformConfig {
    pub fn is_excluded(&self, first_name: &str) -> bool {
        self.excluded_first_names.contains(first_name)
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            excluded_first_names: EXCLUDED_FIRST_NAMES.iter().map(|s| s.to_string()).collect(),
            target_year: TARGET_YEAR,
            won_stage: WON_STAGE.to_string(),
            top_k: TOP_AGENTS,
        }
    }
}

/// Everything one run of the job needs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub bucket: String,
    pub source: SourceConfig,
    pub transform: TransformConfig,
    pub chart: ChartSpec,
    pub output_key: String,
    pub output_content_type: String,
    pub schedule_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let transform = TransformConfig::default();
        Self {
            bucket: BUCKET_NAME.to_string(),
            source: SourceConfig::default(),
            chart: ChartSpec::closed_deals(transform.target_year, transform.top_k),
            transform,
            output_key: OUTPUT_KEY.to_string(),
            output_content_type: OUTPUT_CONTENT_TYPE.to_string(),
            schedule_interval: SCHEDULE_INTERVAL,
        }
    }
}
