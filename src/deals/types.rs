//! Record types flowing through the transform stage.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::deals::date::parse_close_date;

/// A single row deserialized from a source CSV file.
///
/// Only `sales_agent`, `product`, `deal_stage` and `close_date` are required.
/// The remaining columns are carried along untouched when present.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawRecord {
    #[serde(default)]
    pub opportunity_id: Option<String>,
    pub sales_agent: String,
    pub product: String,
    #[serde(default)]
    pub account: Option<String>,
    pub deal_stage: String,
    #[serde(default)]
    pub engage_date: Option<String>,
    pub close_date: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub close_value: Option<f64>,
}

impl RawRecord {
    /// Builds a record with only the columns the transform looks at.
    pub fn new(sales_agent: &str, product: &str, deal_stage: &str, close_date: &str) -> Self {
        RawRecord {
            opportunity_id: None,
            sales_agent: sales_agent.to_string(),
            product: product.to_string(),
            account: None,
            deal_stage: deal_stage.to_string(),
            engage_date: None,
            close_date: close_date.to_string(),
            close_value: None,
        }
    }

    /// First whitespace-separated token of the agent name, or `""` when blank.
    pub fn agent_first_name(&self) -> &str {
        self.sales_agent.split_whitespace().next().unwrap_or("")
    }
}

/// A raw record enriched with the attributes derived during the transform.
#[derive(Debug, Clone, PartialEq)]
pub struct DealRecord {
    pub record: RawRecord,
    pub agent_first_name: String,
    /// `None` when `close_date` did not match `MM/DD/YYYY`.
    pub close_date: Option<NaiveDate>,
}

impl DealRecord {
    pub fn from_raw(record: &RawRecord) -> Self {
        DealRecord {
            agent_first_name: record.agent_first_name().to_string(),
            close_date: parse_close_date(&record.close_date),
            record: record.clone(),
        }
    }

    pub fn sales_agent(&self) -> &str {
        &self.record.sales_agent
    }

    pub fn product(&self) -> &str {
        &self.record.product
    }

    pub fn deal_stage(&self) -> &str {
        &self.record.deal_stage
    }

    /// Year of the parsed close date, if any.
    pub fn close_year(&self) -> Option<i32> {
        self.close_date.map(|d| d.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_name_is_first_token() {
        let r = RawRecord::new("Moses  Frase", "GTX Plus Basic", "Won", "10/20/2016");
        assert_eq!(r.agent_first_name(), "Moses");
    }

    #[test]
    fn test_first_name_of_blank_agent() {
        let r = RawRecord::new("   ", "GTX Plus Basic", "Won", "10/20/2016");
        assert_eq!(r.agent_first_name(), "");
    }

    #[test]
    fn test_deal_record_parses_close_date() {
        let r = RawRecord::new("Moses Frase", "GTX Plus Basic", "Won", "10/20/2016");
        let deal = DealRecord::from_raw(&r);

        assert_eq!(deal.agent_first_name, "Moses");
        assert_eq!(deal.close_year(), Some(2016));
    }

    #[test]
    fn test_deal_record_keeps_unparseable_date_as_none() {
        let r = RawRecord::new("Moses Frase", "GTX Plus Basic", "Won", "2016-10-20");
        let deal = DealRecord::from_raw(&r);

        assert_eq!(deal.close_date, None);
        assert_eq!(deal.close_year(), None);
    }
}
