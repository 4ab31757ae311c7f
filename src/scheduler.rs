use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, instrument};

use crate::fetcher::{FetchOutcome, SourceFetcher};
use crate::render::ChartRenderer;
use crate::reports::ReportKind;
use crate::series::DateWindow;
use crate::services::{ReportError, ReportService};

/// Everything one pipeline pass needs
pub struct Cycle<'a> {
    pub fetcher: &'a SourceFetcher,
    pub service: &'a ReportService,
    pub max_age: Duration,
    pub kinds: &'a [ReportKind],
    pub window: Option<&'a DateWindow>,
}

/// Refresh the cached workbook if needed, then publish every selected report
#[instrument(skip(cycle, renderer), fields(reports = cycle.kinds.len()))]
pub fn run_cycle<R: ChartRenderer + ?Sized>(
    cycle: &Cycle<'_>,
    renderer: &mut R,
) -> Result<usize, ReportError> {
    let path: &Path = cycle.service.source_path();
    match cycle.fetcher.ensure_fresh(path, cycle.max_age)? {
        FetchOutcome::Reused { age } => {
            debug!("Using cached workbook ({} minutes old)", age.as_secs() / 60)
        }
        FetchOutcome::Downloaded { bytes } => info!(
            "Fetched fresh workbook from {} ({} bytes)",
            cycle.fetcher.url(),
            bytes
        ),
    }

    let written = cycle
        .service
        .publish_all(cycle.kinds, cycle.window, renderer)?;
    info!("Cycle complete: {} charts written", written);
    Ok(written)
}

/// Run `run_cycle` now and then every `interval`.
///
/// Returns the first error; there is no retry or backoff.
pub fn run_every<R: ChartRenderer + ?Sized>(
    cycle: &Cycle<'_>,
    renderer: &mut R,
    interval: Duration,
) -> Result<(), ReportError> {
    info!(
        "Report scheduler started with {} minute interval",
        interval.as_secs() / 60
    );

    loop {
        if let Err(e) = run_cycle(cycle, renderer) {
            error!("Report cycle failed: {}", e);
            return Err(e);
        }
        debug!("Sleeping {}s until next cycle", interval.as_secs());
        thread::sleep(interval);
    }
}
