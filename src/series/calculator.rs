//! Cumulative totals and rolling means over a [`TimeSeries`].
//!
//! cumulative_sum[i] = values[0] + ... + values[i]
//! rolling_mean[i]   = mean(values[i-w+1 ..= i]), undefined for i < w-1

use super::TimeSeries;

/// One calendar week; the smoothing window used by every report
pub const ROLLING_WINDOW_DAYS: usize = 7;

/// Series derived from a [`TimeSeries`], index-aligned with it
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSeries {
    pub cumulative_sum: Vec<f64>,
    /// `None` until a full window of values is available
    pub rolling_mean: Vec<Option<f64>>,
}

impl DerivedSeries {
    pub fn len(&self) -> usize {
        self.cumulative_sum.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative_sum.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.cumulative_sum.last().copied().unwrap_or(0.0)
    }
}

pub fn derive(series: &TimeSeries, window_size: usize) -> DerivedSeries {
    DerivedSeries {
        cumulative_sum: cumulative_sum(series.values()),
        rolling_mean: rolling_mean(series.values(), window_size),
    }
}

pub fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |total, v| {
            *total += v;
            Some(*total)
        })
        .collect()
}

/// Each defined position averages exactly `window_size` values.
/// A zero-sized window never becomes defined.
pub fn rolling_mean(values: &[f64], window_size: usize) -> Vec<Option<f64>> {
    if window_size == 0 {
        return vec![None; values.len()];
    }
    let warmup = window_size - 1;

    (0..values.len())
        .map(|i| {
            if i < warmup {
                return None;
            }
            let window = &values[i + 1 - window_size..=i];
            Some(window.iter().sum::<f64>() / window_size as f64)
        })
        .collect()
}
