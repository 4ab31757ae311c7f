use chrono::NaiveDate;
use tracing::{debug, warn};

use super::{DateWindow, TimeSeries};
use crate::importers::{Column, SheetError, Table};
use crate::utils::{coerce_date, coerce_number};

/// Which columns of a sheet become series
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelection {
    /// Every column except the date column, in sheet order
    AllExceptDate,
    /// The named columns, in the given order
    Only(Vec<String>),
}

impl ColumnSelection {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColumnSelection::Only(names.into_iter().map(Into::into).collect())
    }

    /// Selected columns; `AllExceptDate` takes them by position
    fn resolve<'a>(
        &self,
        table: &'a Table,
        date_column: &str,
    ) -> Result<Vec<&'a Column>, SheetError> {
        match self {
            ColumnSelection::AllExceptDate => Ok(table
                .columns()
                .iter()
                .filter(|c| c.name != date_column && !c.name.is_empty())
                .collect()),
            ColumnSelection::Only(names) => {
                names.iter().map(|name| table.column(name)).collect()
            }
        }
    }
}

/// Turn sheet columns into one [`TimeSeries`] per selected column.
///
/// Rows whose date cell cannot be read as a date are dropped from every
/// series. A row with a non-numeric value is dropped from that column's series
/// only. With a window, only rows dated inside `(start, end]` are kept.
pub fn extract(
    table: &Table,
    date_column: &str,
    selection: &ColumnSelection,
    window: Option<&DateWindow>,
) -> Result<Vec<TimeSeries>, SheetError> {
    let dates: Vec<Option<NaiveDate>> = table
        .column(date_column)?
        .cells
        .iter()
        .map(coerce_date)
        .collect();

    let invalid = dates.iter().filter(|d| d.is_none()).count();
    if invalid > 0 {
        debug!(
            "Dropping {} of {} rows with unparseable {} in sheet {}",
            invalid,
            dates.len(),
            date_column,
            table.label()
        );
    }

    let value_columns = selection.resolve(table, date_column)?;
    let mut series = Vec::with_capacity(value_columns.len());

    for column in value_columns {
        let name = column.name.as_str();
        let mut missing = 0usize;

        let points: Vec<(NaiveDate, f64)> = dates
            .iter()
            .zip(column.cells.iter())
            .filter_map(|(date, cell)| {
                let date = (*date)?;
                let value = coerce_number(cell);
                if value.is_none() {
                    missing += 1;
                }
                value.map(|v| (date, v))
            })
            .collect();

        if missing > 0 {
            debug!("Column {} has {} non-numeric values, skipped", name, missing);
        }

        let full = TimeSeries::from_points(name, points);
        let kept = match window {
            Some(window) => full.filter_window(window),
            None => full,
        };
        if kept.is_empty() {
            warn!("Column {} in sheet {} yielded no observations", name, table.label());
        }

        series.push(kept);
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importers::Cell;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn row<const N: usize>(date: &str, values: [Cell; N]) -> Vec<Cell> {
        let mut cells = vec![text(date)];
        cells.extend(values);
        cells
    }

    fn regional_table() -> Table {
        Table::from_rows(
            "Antal per dag region",
            ["Statistikdatum", "Totalt_antal_fall", "Blekinge", "Dalarna"],
            vec![
                row("2021-01-01", [Cell::Number(10.0), Cell::Number(1.0), Cell::Number(2.0)]),
                row("not a date", [Cell::Number(99.0), Cell::Number(99.0), Cell::Number(99.0)]),
                row("2021-06-01", [Cell::Number(20.0), Cell::Number(3.0), Cell::Empty]),
                row("2021-12-31", [Cell::Number(30.0), Cell::Number(5.0), Cell::Number(6.0)]),
            ],
        )
    }

    #[test]
    fn test_all_columns_in_sheet_order() {
        let series = extract(
            &regional_table(),
            "Statistikdatum",
            &ColumnSelection::AllExceptDate,
            None,
        )
        .unwrap();

        let names: Vec<&str> = series.iter().map(TimeSeries::name).collect();
        assert_eq!(names, ["Totalt_antal_fall", "Blekinge", "Dalarna"]);
    }

    #[test]
    fn test_invalid_date_row_is_dropped() {
        let series = extract(
            &regional_table(),
            "Statistikdatum",
            &ColumnSelection::only(["Totalt_antal_fall"]),
            None,
        )
        .unwrap();

        let total = &series[0];
        assert_eq!(
            total.dates(),
            &[date(2021, 1, 1), date(2021, 6, 1), date(2021, 12, 31)]
        );
        assert_eq!(total.values(), &[10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_missing_value_only_affects_its_column() {
        let series = extract(
            &regional_table(),
            "Statistikdatum",
            &ColumnSelection::only(["Blekinge", "Dalarna"]),
            None,
        )
        .unwrap();

        assert_eq!(series[0].values(), &[1.0, 3.0, 5.0]);
        assert_eq!(series[1].dates(), &[date(2021, 1, 1), date(2021, 12, 31)]);
        assert_eq!(series[1].values(), &[2.0, 6.0]);
    }

    #[test]
    fn test_window_filters_dates_and_values() {
        let window = DateWindow::new(date(2021, 1, 1), date(2021, 12, 31));
        let series = extract(
            &regional_table(),
            "Statistikdatum",
            &ColumnSelection::AllExceptDate,
            Some(&window),
        )
        .unwrap();

        let total = &series[0];
        assert_eq!(total.dates(), &[date(2021, 6, 1), date(2021, 12, 31)]);
        assert_eq!(total.values(), &[20.0, 30.0]);
    }

    #[test]
    fn test_repeated_header_keeps_each_column() {
        let table = Table::from_rows(
            "Antal per dag region",
            ["Statistikdatum", "Okänd", "Okänd"],
            vec![
                row("2021-01-01", [Cell::Number(1.0), Cell::Number(7.0)]),
                row("2021-01-02", [Cell::Number(2.0), Cell::Number(8.0)]),
            ],
        );
        let series = extract(
            &table,
            "Statistikdatum",
            &ColumnSelection::AllExceptDate,
            None,
        )
        .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name(), series[1].name());
        assert_eq!(series[0].values(), &[1.0, 2.0]);
        assert_eq!(series[1].values(), &[7.0, 8.0]);
    }

    #[test]
    fn test_window_matches_filter_window() {
        let window = DateWindow::new(date(2021, 1, 1), date(2021, 6, 1));
        let selection = ColumnSelection::only(["Blekinge"]);
        let windowed = extract(&regional_table(), "Statistikdatum", &selection, Some(&window))
            .unwrap();
        let full = extract(&regional_table(), "Statistikdatum", &selection, None).unwrap();

        assert_eq!(windowed[0], full[0].filter_window(&window));
        assert_eq!(windowed[0].dates(), &[date(2021, 6, 1)]);
    }

    #[test]
    fn test_missing_date_column() {
        let result = extract(
            &regional_table(),
            "Datum_avliden",
            &ColumnSelection::AllExceptDate,
            None,
        );
        assert!(matches!(result, Err(SheetError::ColumnNotFound { .. })));
    }

    #[test]
    fn test_missing_value_column() {
        let result = extract(
            &regional_table(),
            "Statistikdatum",
            &ColumnSelection::only(["Gotland"]),
            None,
        );
        match result {
            Err(SheetError::ColumnNotFound { column, .. }) => assert_eq!(column, "Gotland"),
            other => panic!("Expected ColumnNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_table_gives_empty_series() {
        let table = Table::from_rows(
            "Antal avlidna per dag",
            ["Datum_avliden", "Antal_avlidna"],
            Vec::<Vec<Cell>>::new(),
        );
        let series = extract(
            &table,
            "Datum_avliden",
            &ColumnSelection::only(["Antal_avlidna"]),
            None,
        )
        .unwrap();
        assert_eq!(series.len(), 1);
        assert!(series[0].is_empty());
    }
}
