//! Chart rendering boundary.
//!
//! [`aggregate_and_render`] pivots the transformed deals into a
//! [`CountTable`] and hands it to a [`ChartRenderer`], which turns it into
//! an encoded PNG. [`PlottersRenderer`] is the bitmap implementation used by
//! the binary.

mod bar_chart;

pub use bar_chart::PlottersRenderer;

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::aggregate::CountTable;
use crate::deals::DealRecord;

/// Errors that can occur while drawing a chart
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to encode chart image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Presentation settings passed to the renderer alongside the counts.
///
/// Bars are always grouped: one bar per deal stage side by side within
/// each product.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Requested rotation of the product tick labels, in degrees.
    ///
    /// Renderers that can only turn text in quarter turns round this up;
    /// [`PlottersRenderer`] draws 45° as 90°.
    pub x_tick_rotation: u16,
    pub width: u32,
    pub height: u32,
}

impl ChartSpec {
    /// The closed-deals chart published by the job.
    pub fn closed_deals(year: i32, top_k: usize) -> Self {
        Self {
            title: format!(
                "{} Closed Deals by Product and Deal Stage (Top {} Agents)",
                year, top_k
            ),
            x_label: "Product".to_string(),
            y_label: "Number of Deals".to_string(),
            x_tick_rotation: 45,
            width: 1200,
            height: 600,
        }
    }
}

/// Turns a count table into an encoded raster image.
pub trait ChartRenderer {
    fn render(&self, table: &CountTable, spec: &ChartSpec) -> Result<Vec<u8>, RenderError>;
}

/// Groups `deals` by product and deal stage and renders the counts.
///
/// Returns `Ok(None)` when there is nothing to draw.
#[tracing::instrument(skip_all, fields(rows = deals.len()))]
pub fn aggregate_and_render(
    deals: &[DealRecord],
    renderer: &dyn ChartRenderer,
    spec: &ChartSpec,
) -> Result<Option<Vec<u8>>> {
    if deals.is_empty() {
        warn!("No data available for visualization");
        return Ok(None);
    }

    for deal in deals.iter().take(5) {
        debug!(
            agent = %deal.sales_agent(),
            product = %deal.product(),
            stage = %deal.deal_stage(),
            close_date = ?deal.close_date,
            "Sample row"
        );
    }

    let table = CountTable::from_deals(deals);
    info!(
        products = table.products().len(),
        stages = table.stages().len(),
        deals = table.total(),
        "Count table built"
    );

    let png = renderer.render(&table, spec)?;
    debug!(bytes = png.len(), "Chart rendered");

    Ok(Some(png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deals::RawRecord;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingRenderer {
        seen: RefCell<Vec<CountTable>>,
    }

    impl ChartRenderer for RecordingRenderer {
        fn render(&self, table: &CountTable, _spec: &ChartSpec) -> Result<Vec<u8>, RenderError> {
            self.seen.borrow_mut().push(table.clone());
            Ok(b"png".to_vec())
        }
    }

    struct FailingRenderer;

    impl ChartRenderer for FailingRenderer {
        fn render(&self, _table: &CountTable, _spec: &ChartSpec) -> Result<Vec<u8>, RenderError> {
            Err(RenderError::Drawing("no fonts".to_string()))
        }
    }

    fn won(product: &str) -> DealRecord {
        DealRecord::from_raw(&RawRecord::new("Moses Frase", product, "Won", "10/20/2016"))
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        let renderer = RecordingRenderer::default();
        let result = aggregate_and_render(&[], &renderer, &ChartSpec::closed_deals(2016, 5)).unwrap();

        assert!(result.is_none());
        assert!(renderer.seen.borrow().is_empty());
    }

    #[test]
    fn test_renderer_receives_pivoted_counts() {
        let renderer = RecordingRenderer::default();
        let deals = vec![won("GTX Plus"), won("GTXPro")];

        let result =
            aggregate_and_render(&deals, &renderer, &ChartSpec::closed_deals(2016, 5)).unwrap();

        assert_eq!(result, Some(b"png".to_vec()));
        let seen = renderer.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].products().len(), 2);
        assert_eq!(seen[0].count("GTX Plus", "Won"), 1);
        assert_eq!(seen[0].count("GTXPro", "Won"), 1);
    }

    #[test]
    fn test_render_failure_propagates() {
        let result = aggregate_and_render(
            &[won("GTX Plus")],
            &FailingRenderer,
            &ChartSpec::closed_deals(2016, 5),
        );

        let err = result.unwrap_err();
        assert!(err.to_string().contains("no fonts"));
    }

    #[test]
    fn test_closed_deals_spec() {
        let spec = ChartSpec::closed_deals(2016, 5);

        assert_eq!(
            spec.title,
            "2016 Closed Deals by Product and Deal Stage (Top 5 Agents)"
        );
        assert_eq!(spec.x_label, "Product");
        assert_eq!(spec.y_label, "Number of Deals");
        assert_eq!(spec.x_tick_rotation, 45);
    }
}
