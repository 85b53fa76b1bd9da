//! Bitmap bar charts drawn with [`plotters`].
//!
//! The bitmap backend only writes encoded images to disk, so the chart is
//! drawn into a temporary `.png` file and read back into memory.

use std::path::Path;

use plotters::prelude::*;
use plotters::style::FontTransform;

use super::{ChartRenderer, ChartSpec, RenderError};
use crate::aggregate::CountTable;

/// Share of each product slot covered by its bars.
const GROUP_WIDTH: f64 = 0.8;

/// Smallest chart that still fits the caption, both axis areas and a plot.
const MIN_WIDTH: u32 = 200;
const MIN_HEIGHT: u32 = 200;

/// Label area below the plot when tick labels are not rotated.
const BASE_X_LABEL_AREA: u32 = 50;

/// Renders count tables as PNG bar charts.
#[derive(Debug, Clone)]
pub struct PlottersRenderer {
    font: String,
}

impl PlottersRenderer {
    pub fn new(font: &str) -> Self {
        Self {
            font: font.to_string(),
        }
    }

    fn draw(&self, table: &CountTable, spec: &ChartSpec, output_path: &Path) -> Result<(), RenderError> {
        let root = BitMapBackend::new(output_path, (spec.width, spec.height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| RenderError::DrawingArea(e.to_string()))?;

        let products = table.products();
        let stages = table.stages();
        let y_max = y_axis_max(table);

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, (self.font.as_str(), 24))
            .margin(20)
            .x_label_area_size(x_label_area_size(products, spec))
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5..(products.len() as f64 - 0.5), 0.0..y_max)
            .map_err(|e| RenderError::ChartConfig(e.to_string()))?;

        let product_label = |x: &f64| {
            let nearest = x.round();
            if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
                return String::new();
            }
            products.get(nearest as usize).cloned().unwrap_or_default()
        };
        let count_label = |y: &f64| format!("{:.0}", y);
        let tick_style = TextStyle::from(
            (self.font.as_str(), 14)
                .into_font()
                .transform(tick_transform(spec.x_tick_rotation)),
        );

        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh()
            .x_labels(products.len())
            .x_label_formatter(&product_label)
            .x_label_style(tick_style)
            .y_labels((y_max as usize).clamp(1, 10) + 1)
            .y_label_formatter(&count_label)
            .x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .axis_desc_style((self.font.as_str(), 16));
        mesh.draw().map_err(|e| RenderError::Drawing(e.to_string()))?;

        let bar_width = GROUP_WIDTH / stages.len() as f64;

        for (column, stage) in stages.iter().enumerate() {
            let color = Palette99::pick(column).to_rgba();
            let bars: Vec<Rectangle<(f64, f64)>> = (0..products.len())
                .map(|row| {
                    let x0 = bar_left_edge(row, column, bar_width);
                    let count = table.row(row)[column] as f64;
                    Rectangle::new([(x0, 0.0), (x0 + bar_width, count)], color.filled())
                })
                .collect();

            chart
                .draw_series(bars)
                .map_err(|e| RenderError::Drawing(e.to_string()))?
                .label(stage.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((self.font.as_str(), 14))
            .draw()
            .map_err(|e| RenderError::Drawing(e.to_string()))?;

        root.present()
            .map_err(|e| RenderError::Drawing(e.to_string()))?;

        Ok(())
    }
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self::new("sans-serif")
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, table: &CountTable, spec: &ChartSpec) -> Result<Vec<u8>, RenderError> {
        if table.is_empty() || table.stages().is_empty() {
            return Err(RenderError::InvalidData(
                "Count table cannot be empty".to_string(),
            ));
        }
        if spec.width < MIN_WIDTH || spec.height < MIN_HEIGHT {
            return Err(RenderError::InvalidData(format!(
                "Chart size {}x{} is below the {}x{} minimum",
                spec.width, spec.height, MIN_WIDTH, MIN_HEIGHT
            )));
        }

        let file = tempfile::Builder::new()
            .prefix("deal_chart_")
            .suffix(".png")
            .tempfile()?;
        self.draw(table, spec, file.path())?;

        Ok(std::fs::read(file.path())?)
    }
}

/// Maps a requested label rotation onto the quarter turns the bitmap backend supports.
///
/// Tilted requests are rounded up to the next quarter turn, so the 45° of
/// the closed-deals chart is drawn as 90° (vertical labels).
fn tick_transform(degrees: u16) -> FontTransform {
    match degrees % 360 {
        0 => FontTransform::None,
        1..=135 => FontTransform::Rotate90,
        136..=225 => FontTransform::Rotate180,
        _ => FontTransform::Rotate270,
    }
}

/// Room below the plot for product names, grown so rotated labels are not clipped.
fn x_label_area_size(products: &[String], spec: &ChartSpec) -> u32 {
    if matches!(tick_transform(spec.x_tick_rotation), FontTransform::None) {
        return BASE_X_LABEL_AREA;
    }
    let longest = products.iter().map(|p| p.chars().count()).max().unwrap_or(0) as u32;
    let cap = (spec.height / 2).max(BASE_X_LABEL_AREA);
    (longest * 8 + BASE_X_LABEL_AREA).clamp(BASE_X_LABEL_AREA, cap)
}

/// Top of the count axis with some headroom above the tallest bar.
fn y_axis_max(table: &CountTable) -> f64 {
    (table.max_count().max(1) as f64 * 1.1).ceil()
}

/// Left edge of the bar for one (product, stage) cell.
fn bar_left_edge(row: usize, column: usize, bar_width: f64) -> f64 {
    row as f64 - GROUP_WIDTH / 2.0 + column as f64 * bar_width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deals::{DealRecord, RawRecord};

    fn table() -> CountTable {
        let deals: Vec<DealRecord> = [("GTX Pro", "Won"), ("GTX Pro", "Lost"), ("GTX Pro", "Won")]
            .iter()
            .map(|(p, s)| DealRecord::from_raw(&RawRecord::new("Moses Frase", p, s, "10/20/2016")))
            .collect();
        CountTable::from_deals(&deals)
    }

    #[test]
    fn test_render_rejects_empty_table() {
        let renderer = PlottersRenderer::default();
        let result = renderer.render(&CountTable::default(), &ChartSpec::closed_deals(2016, 5));

        assert!(matches!(result, Err(RenderError::InvalidData(_))));
    }

    #[test]
    fn test_render_produces_png() {
        let deals: Vec<DealRecord> = ["GTX Plus", "GTXPro"]
            .iter()
            .map(|p| DealRecord::from_raw(&RawRecord::new("Moses Frase", p, "Won", "10/20/2016")))
            .collect();
        let table = CountTable::from_deals(&deals);

        let png = PlottersRenderer::default()
            .render(&table, &ChartSpec::closed_deals(2016, 5))
            .unwrap();

        assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn test_render_rejects_zero_size() {
        let mut spec = ChartSpec::closed_deals(2016, 5);
        spec.width = 0;

        let result = PlottersRenderer::default().render(&table(), &spec);
        assert!(matches!(result, Err(RenderError::InvalidData(_))));
    }

    #[test]
    fn test_render_rejects_short_chart() {
        let mut spec = ChartSpec::closed_deals(2016, 5);
        spec.height = 80;

        let result = PlottersRenderer::default().render(&table(), &spec);
        assert!(matches!(result, Err(RenderError::InvalidData(_))));
    }

    #[test]
    fn test_tick_transform() {
        assert!(matches!(tick_transform(0), FontTransform::None));
        assert!(matches!(tick_transform(45), FontTransform::Rotate90));
        assert!(matches!(tick_transform(90), FontTransform::Rotate90));
        assert!(matches!(tick_transform(180), FontTransform::Rotate180));
        assert!(matches!(tick_transform(270), FontTransform::Rotate270));
        assert!(matches!(tick_transform(360), FontTransform::None));
    }

    #[test]
    fn test_x_label_area_grows_with_rotated_labels() {
        let spec = ChartSpec::closed_deals(2016, 5);
        let short = vec!["GTX".to_string()];
        let long = vec!["GTX Plus Basic Enterprise".to_string()];

        assert!(x_label_area_size(&long, &spec) > x_label_area_size(&short, &spec));
        assert!(x_label_area_size(&long, &spec) <= spec.height / 2);
    }

    #[test]
    fn test_x_label_area_on_short_chart() {
        let mut spec = ChartSpec::closed_deals(2016, 5);
        spec.height = 80;
        let long = vec!["GTX Plus Basic Enterprise".to_string()];

        assert_eq!(x_label_area_size(&long, &spec), BASE_X_LABEL_AREA);
    }

    #[test]
    fn test_y_axis_max_leaves_headroom() {
        // Lost = 1, Won = 2 for the single product.
        assert_eq!(y_axis_max(&table()), 3.0);
        assert_eq!(y_axis_max(&CountTable::default()), 2.0);
    }

    #[test]
    fn test_bar_left_edge() {
        assert!((bar_left_edge(0, 0, 0.4) + 0.4).abs() < 1e-9);
        assert!((bar_left_edge(0, 1, 0.4) - 0.0).abs() < 1e-9);
        assert!((bar_left_edge(2, 1, 0.4) - 2.0).abs() < 1e-9);
    }
}
