use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fhm_covid_charts::config::Config;
use fhm_covid_charts::fetcher::SourceFetcher;
use fhm_covid_charts::render::SvgChartRenderer;
use fhm_covid_charts::reports::ReportKind;
use fhm_covid_charts::scheduler::{self, Cycle};
use fhm_covid_charts::series::DateWindow;
use fhm_covid_charts::services::ReportService;

#[derive(Parser, Debug)]
#[command(name = "fhm-covid-charts")]
#[command(
    about = "Chart Folkhälsomyndigheten Covid-19 statistics with a 7-day trend",
    long_about = None
)]
struct Cli {
    /// Cached workbook location (overrides SOURCE_PATH)
    #[arg(long)]
    source_path: Option<PathBuf>,

    /// Directory charts are written to (overrides PLOT_DIR)
    #[arg(long)]
    plot_dir: Option<PathBuf>,

    /// Report to generate; repeat for several (default: all)
    #[arg(long = "report", value_enum)]
    reports: Vec<ReportKind>,

    /// Only dates after this day, exclusive (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Only dates up to this day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Re-run every N minutes (overrides RUN_INTERVAL_MINUTES)
    #[arg(long)]
    interval_minutes: Option<u64>,

    /// Run a single cycle even when an interval is configured
    #[arg(long, conflicts_with = "interval_minutes")]
    once: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,fhm_covid_charts=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(path) = cli.source_path {
        config.source_path = path;
    }
    if let Some(dir) = cli.plot_dir {
        config.plot_dir = dir;
    }
    if cli.interval_minutes.is_some() {
        config.run_interval_minutes = cli.interval_minutes;
    }
    if cli.once {
        config.run_interval_minutes = None;
    }
    info!("Starting with config: {:?}", config);

    let kinds = if cli.reports.is_empty() {
        ReportKind::ALL.to_vec()
    } else {
        cli.reports
    };
    let window = DateWindow::from_bounds(cli.from, cli.to);
    if let Some(window) = &window {
        info!("Date window: after {} up to {}", window.start, window.end);
    }

    let fetcher = SourceFetcher::new(config.source_url.clone(), config.http_timeout())?;
    let service = ReportService::new(config.source_path.clone());
    let mut renderer = SvgChartRenderer::new(config.plot_dir.clone());

    let cycle = Cycle {
        fetcher: &fetcher,
        service: &service,
        max_age: config.cache_max_age(),
        kinds: &kinds,
        window: window.as_ref(),
    };

    match config.run_interval() {
        Some(interval) => scheduler::run_every(&cycle, &mut renderer, interval)?,
        None => {
            let written = scheduler::run_cycle(&cycle, &mut renderer)?;
            info!("Wrote {} charts to {}", written, config.plot_dir.display());
        }
    }

    Ok(())
}
