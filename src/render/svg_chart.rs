use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use tracing::{debug, instrument, warn};

use super::{ChartRenderer, RenderError};
use crate::reports::{ChartStyle, ReportChart};

const BAR_WIDTH_DAYS: f64 = 0.8;

/// Writes one SVG file per chart under `<output_dir>/<report kind>/<series name>.svg`
pub struct SvgChartRenderer {
    output_dir: PathBuf,
    width: u32,
    height: u32,
}

impl SvgChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            width: 1024,
            height: 640,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn output_path(&self, chart: &ReportChart) -> PathBuf {
        self.output_dir
            .join(chart.kind.slug())
            .join(format!("{}.svg", file_stem(&chart.name)))
    }

    fn draw(
        &self,
        chart: &ReportChart,
        layout: &ChartLayout,
        path: &Path,
    ) -> Result<(), RenderError> {
        let fail = |e: String| RenderError::Draw {
            name: chart.name.clone(),
            msg: e,
        };

        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| fail(e.to_string()))?;

        let mut ctx = ChartBuilder::on(&root)
            .caption(chart.caption(), ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(48)
            .y_label_area_size(64)
            .build_cartesian_2d(0f64..layout.x_max, 0f64..layout.y_max)
            .map_err(|e| fail(e.to_string()))?;

        let origin = layout.origin;
        let format_date = |x: &f64| {
            (origin + Duration::days(x.floor() as i64))
                .format("%Y-%m-%d")
                .to_string()
        };

        ctx.configure_mesh()
            .x_desc("Datum")
            .y_desc(chart.kind.y_label())
            .x_labels(8)
            .x_label_formatter(&format_date)
            .draw()
            .map_err(|e| fail(e.to_string()))?;

        match chart.kind.chart_style() {
            ChartStyle::DailyBars => {
                ctx.draw_series(layout.primary.iter().map(|&(x, v)| {
                    Rectangle::new([(x, 0.0), (x + BAR_WIDTH_DAYS, v)], BLUE.mix(0.5).filled())
                }))
                .map_err(|e| fail(e.to_string()))?;
            }
            ChartStyle::CumulativeLine => {
                ctx.draw_series(LineSeries::new(
                    layout.primary.iter().copied(),
                    BLUE.stroke_width(2),
                ))
                .map_err(|e| fail(e.to_string()))?;
            }
        }

        if !layout.trend.is_empty() {
            ctx.draw_series(LineSeries::new(
                layout.trend.iter().copied(),
                RED.stroke_width(2),
            ))
            .map_err(|e| fail(e.to_string()))?;
        }

        root.present().map_err(|e| fail(e.to_string()))?;
        Ok(())
    }
}

impl ChartRenderer for SvgChartRenderer {
    #[instrument(skip(self, chart), fields(kind = %chart.kind, name = %chart.name))]
    fn render(&mut self, chart: &ReportChart) -> Result<Option<PathBuf>, RenderError> {
        let Some(layout) = ChartLayout::from_chart(chart) else {
            warn!("Series {} is empty, no chart written", chart.name);
            return Ok(None);
        };

        let path = self.output_path(chart);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| RenderError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        self.draw(chart, &layout, &path)?;
        debug!("Wrote {}", path.display());
        Ok(Some(path))
    }
}

/// Plot coordinates for one chart; x is days since the earliest date
#[derive(Debug, Clone, PartialEq)]
struct ChartLayout {
    origin: NaiveDate,
    x_max: f64,
    y_max: f64,
    primary: Vec<(f64, f64)>,
    trend: Vec<(f64, f64)>,
}

impl ChartLayout {
    fn from_chart(chart: &ReportChart) -> Option<Self> {
        let dates = chart.series.dates();
        let origin = *dates.iter().min()?;
        let last = *dates.iter().max()?;
        let offset = |d: &NaiveDate| (*d - origin).num_days() as f64;

        let mut primary: Vec<(f64, f64)> = match chart.kind.chart_style() {
            ChartStyle::DailyBars => dates
                .iter()
                .map(offset)
                .zip(chart.series.values().iter().copied())
                .collect(),
            ChartStyle::CumulativeLine => dates
                .iter()
                .map(offset)
                .zip(chart.derived.cumulative_sum.iter().copied())
                .collect(),
        };

        let mut trend: Vec<(f64, f64)> = match chart.kind.chart_style() {
            ChartStyle::DailyBars => dates
                .iter()
                .map(offset)
                .zip(chart.derived.rolling_mean.iter())
                .filter_map(|(x, mean)| mean.map(|m| (x, m)))
                .collect(),
            ChartStyle::CumulativeLine => Vec::new(),
        };

        primary.sort_by(|a, b| a.0.total_cmp(&b.0));
        trend.sort_by(|a, b| a.0.total_cmp(&b.0));

        let peak = primary
            .iter()
            .chain(trend.iter())
            .map(|&(_, y)| y)
            .fold(0.0f64, f64::max);

        Some(Self {
            origin,
            x_max: (last - origin).num_days() as f64 + 1.0,
            y_max: (peak * 1.05).max(1.0),
            primary,
            trend,
        })
    }
}

fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect()
}
