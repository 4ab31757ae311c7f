//! Rendering side of the pipeline: turns a [`ReportChart`] into an output file

pub mod svg_chart;

use std::path::PathBuf;

use thiserror::Error;

use crate::reports::ReportChart;

pub use svg_chart::SvgChartRenderer;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to draw chart {name}: {msg}")]
    Draw { name: String, msg: String },
}

/// Receives every chart a report run produces
pub trait ChartRenderer {
    /// Render one chart; `Ok(None)` when there was nothing to draw
    fn render(&mut self, chart: &ReportChart) -> Result<Option<PathBuf>, RenderError>;
}
