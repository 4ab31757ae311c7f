//! Date/value series read from sheets and the series derived from them

pub mod calculator;
pub mod extractor;

use chrono::NaiveDate;

pub use calculator::{derive, DerivedSeries, ROLLING_WINDOW_DAYS};
pub use extractor::{extract, ColumnSelection};

/// A named sequence of (date, value) observations.
///
/// `dates()` and `values()` always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    name: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl TimeSeries {
    pub fn from_points<I>(name: impl Into<String>, points: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let (dates, values) = points.into_iter().unzip();
        Self {
            name: name.into(),
            dates,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Observations whose date falls inside `window`, order preserved
    pub fn filter_window(&self, window: &DateWindow) -> TimeSeries {
        TimeSeries::from_points(
            self.name.clone(),
            self.points().filter(|(date, _)| window.contains(*date)),
        )
    }
}

/// Date range `(start, end]`: the start date itself is excluded, the end date included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Everything after `start`
    pub fn after(start: NaiveDate) -> Self {
        Self::new(start, NaiveDate::MAX)
    }

    /// Everything up to and including `end`
    pub fn until(end: NaiveDate) -> Self {
        Self::new(NaiveDate::MIN, end)
    }

    /// Build a window from optional bounds; `None` when both are open
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (start, end) {
            (None, None) => None,
            (start, end) => Some(Self::new(
                start.unwrap_or(NaiveDate::MIN),
                end.unwrap_or(NaiveDate::MAX),
            )),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start < date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_excludes_start_includes_end() {
        let window = DateWindow::new(date(2021, 1, 1), date(2021, 12, 31));
        assert!(!window.contains(date(2021, 1, 1)));
        assert!(window.contains(date(2021, 1, 2)));
        assert!(window.contains(date(2021, 6, 1)));
        assert!(window.contains(date(2021, 12, 31)));
        assert!(!window.contains(date(2022, 1, 1)));
    }

    #[test]
    fn test_filter_window() {
        let series = TimeSeries::from_points(
            "Antal_avlidna",
            [
                (date(2021, 1, 1), 4.0),
                (date(2021, 6, 1), 2.0),
                (date(2021, 12, 31), 7.0),
            ],
        );
        let filtered = series.filter_window(&DateWindow::new(date(2021, 1, 1), date(2021, 12, 31)));
        assert_eq!(filtered.dates(), &[date(2021, 6, 1), date(2021, 12, 31)]);
        assert_eq!(filtered.values(), &[2.0, 7.0]);
        assert_eq!(filtered.name(), "Antal_avlidna");
    }

    #[test]
    fn test_open_ended_windows() {
        assert_eq!(DateWindow::from_bounds(None, None), None);

        let after = DateWindow::from_bounds(Some(date(2021, 1, 1)), None).unwrap();
        assert_eq!(after, DateWindow::after(date(2021, 1, 1)));
        assert!(after.contains(date(2030, 1, 1)));
        assert!(!after.contains(date(2021, 1, 1)));

        let until = DateWindow::from_bounds(None, Some(date(2021, 1, 1))).unwrap();
        assert_eq!(until, DateWindow::until(date(2021, 1, 1)));
        assert!(until.contains(date(2021, 1, 1)));
        assert!(until.contains(date(1999, 1, 1)));
    }

    #[test]
    fn test_points_stay_aligned() {
        let series =
            TimeSeries::from_points("x", [(date(2020, 3, 1), 1.0), (date(2020, 3, 2), 2.0)]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.dates().len(), series.values().len());
        let points: Vec<_> = series.points().collect();
        assert_eq!(points, vec![(date(2020, 3, 1), 1.0), (date(2020, 3, 2), 2.0)]);
    }
}
