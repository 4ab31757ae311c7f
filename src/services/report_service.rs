use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::fetch_error::FetchError;
use crate::importers::{SheetError, SheetLoader};
use crate::render::{ChartRenderer, RenderError};
use crate::reports::{ReportChart, ReportKind};
use crate::series::{derive, extract, DateWindow, ROLLING_WINDOW_DAYS};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Runs reports against a local copy of the workbook.
///
/// Every report reloads its sheet from disk; nothing carries over between runs.
#[derive(Debug, Clone)]
pub struct ReportService {
    source_path: PathBuf,
    window_size: usize,
}

impl ReportService {
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            window_size: ROLLING_WINDOW_DAYS,
        }
    }

    /// Override the rolling-mean window (one week by default)
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Load, extract and derive every series of one report kind
    #[instrument(skip(self), fields(path = %self.source_path.display()))]
    pub fn build(
        &self,
        kind: ReportKind,
        window: Option<&DateWindow>,
    ) -> Result<Vec<ReportChart>, ReportError> {
        let loader = SheetLoader::new(&self.source_path);
        let table = loader.load_with_columns(kind.sheet_label(), &kind.required_columns())?;

        let series = extract(&table, kind.date_column(), &kind.selection(), window)?;
        debug!("Extracted {} series for {}", series.len(), kind);

        let charts = series
            .into_iter()
            .map(|series| {
                let derived = derive(&series, self.window_size);
                ReportChart {
                    kind,
                    name: series.name().to_string(),
                    title: kind.display_title(series.name()),
                    series,
                    derived,
                }
            })
            .collect();

        Ok(charts)
    }

    /// Build one report and hand each chart to `renderer`; returns how many files were written
    pub fn publish<R: ChartRenderer + ?Sized>(
        &self,
        kind: ReportKind,
        window: Option<&DateWindow>,
        renderer: &mut R,
    ) -> Result<usize, ReportError> {
        let charts = self.build(kind, window)?;
        let mut written = 0;

        for chart in &charts {
            if renderer.render(chart)?.is_some() {
                written += 1;
            }
        }

        info!(
            "Report {}: {} series, {} charts written",
            kind,
            charts.len(),
            written
        );
        Ok(written)
    }

    /// Publish several report kinds in order, stopping at the first failure
    pub fn publish_all<R: ChartRenderer + ?Sized>(
        &self,
        kinds: &[ReportKind],
        window: Option<&DateWindow>,
        renderer: &mut R,
    ) -> Result<usize, ReportError> {
        let mut written = 0;
        for kind in kinds {
            written += self.publish(*kind, window, renderer)?;
        }
        Ok(written)
    }
}
