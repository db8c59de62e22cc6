//! Plots of completed series
//!
//! The SVG plotter draws the completed series as one line, overlays the
//! forecast on its last `horizon` positions and adds a light grid.

use crate::artifacts::sanitize_file_name;
use crate::error::{FillError, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything needed to draw one completed column
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest<'a> {
    pub test_id: u64,
    pub column: &'a str,
    /// The completed series, forecast included
    pub series: &'a [f64],
    /// The forecast slice
    pub forecast: &'a [f64],
    pub horizon: usize,
}

/// Renders completed columns
pub trait Visualizer: std::fmt::Debug {
    /// Draw one column, returning where the plot was written
    fn render(&self, request: &PlotRequest<'_>) -> Result<PathBuf>;
}

/// Writes one SVG line chart per column
#[derive(Debug, Clone)]
pub struct SvgPlotter {
    output_dir: PathBuf,
    width: f64,
    height: f64,
}

const MARGIN: f64 = 40.0;
const GRID_LINES: usize = 5;

impl SvgPlotter {
    /// Create a plotter writing into `output_dir`
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            width: 800.0,
            height: 400.0,
        }
    }

    /// Path of the plot for a column
    pub fn plot_path(&self, test_id: u64, column: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.svg", test_id, sanitize_file_name(column)))
    }

    fn to_svg(&self, request: &PlotRequest<'_>) -> Result<String> {
        let series = request.series;
        if series.is_empty() || series.iter().any(|v| !v.is_finite()) {
            return Err(FillError::InvalidInput(format!(
                "Column '{}' has no finite values to plot",
                request.column
            )));
        }

        let (min, max) = series
            .iter()
            .chain(request.forecast)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let span = if max > min { max - min } else { 1.0 };
        let last_index = (series.len().max(2) - 1) as f64;

        let plot_w = self.width - 2.0 * MARGIN;
        let plot_h = self.height - 2.0 * MARGIN;
        let x = |i: usize| MARGIN + plot_w * i as f64 / last_index;
        let y = |v: f64| MARGIN + plot_h * (1.0 - (v - min) / span);

        let points = |offset: usize, values: &[f64]| {
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| format!("{:.2},{:.2}", x(offset + i), y(v)))
                .collect::<Vec<_>>()
                .join(" ")
        };

        let mut svg = String::new();
        let fmt_err = |e: std::fmt::Error| FillError::InvalidInput(e.to_string());
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        )
        .map_err(fmt_err)?;
        writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#).map_err(fmt_err)?;

        for i in 0..=GRID_LINES {
            let frac = i as f64 / GRID_LINES as f64;
            let gx = MARGIN + plot_w * frac;
            let gy = MARGIN + plot_h * frac;
            writeln!(
                svg,
                r##"<line x1="{gx:.2}" y1="{top}" x2="{gx:.2}" y2="{bottom}" stroke="#dddddd"/>"##,
                top = MARGIN,
                bottom = MARGIN + plot_h
            )
            .map_err(fmt_err)?;
            writeln!(
                svg,
                r##"<line x1="{left}" y1="{gy:.2}" x2="{right}" y2="{gy:.2}" stroke="#dddddd"/>"##,
                left = MARGIN,
                right = MARGIN + plot_w
            )
            .map_err(fmt_err)?;
        }

        writeln!(
            svg,
            r##"<polyline fill="none" stroke="#1f77b4" stroke-width="2" points="{}"/>"##,
            points(0, series)
        )
        .map_err(fmt_err)?;

        if !request.forecast.is_empty() {
            let offset = series.len().saturating_sub(request.horizon);
            writeln!(
                svg,
                r##"<polyline fill="none" stroke="#ff7f0e" stroke-width="2" points="{}"/>"##,
                points(offset, request.forecast)
            )
            .map_err(fmt_err)?;
        }

        writeln!(
            svg,
            r#"<text x="{}" y="{}" font-family="sans-serif" font-size="14">{} / {}</text>"#,
            MARGIN,
            MARGIN / 2.0,
            request.test_id,
            escape_xml(request.column)
        )
        .map_err(fmt_err)?;
        svg.push_str("</svg>\n");

        Ok(svg)
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Visualizer for SvgPlotter {
    fn render(&self, request: &PlotRequest<'_>) -> Result<PathBuf> {
        let svg = self.to_svg(request)?;
        fs::create_dir_all(&self.output_dir)?;

        let path = self.plot_path(request.test_id, request.column);
        fs::write(&path, svg)?;
        Ok(path)
    }
}
