//! Shared cell coercion helpers

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::importers::Cell;

/// Text date layouts accepted in date columns, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Coerce a cell to a calendar date, `None` when it is not one
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fhm_covid_charts::importers::Cell;
/// use fhm_covid_charts::utils::coerce_date;
///
/// let expected = NaiveDate::from_ymd_opt(2020, 3, 1);
/// assert_eq!(coerce_date(&Cell::Text("2020-03-01".into())), expected);
/// assert_eq!(coerce_date(&Cell::Number(43891.0)), expected);
/// assert_eq!(coerce_date(&Cell::Text("Uppgift saknas".into())), None);
/// ```
pub fn coerce_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::DateTime(dt) => Some(dt.date()),
        Cell::Number(serial) => excel_serial_to_date(*serial),
        Cell::Text(s) => parse_date_text(s),
        Cell::Empty | Cell::Bool(_) | Cell::Error(_) => None,
    }
}

/// Coerce a cell to a number, `None` for anything that is not numeric
pub fn coerce_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(v) if v.is_finite() => Some(*v),
        Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Parse a date written as text
pub fn parse_date_text(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Convert an Excel serial day number (1900 date system) to a date
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let base_date = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base_date.checked_add_signed(Duration::try_days(serial.trunc() as i64)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_date_text("2021-06-01"), Some(date(2021, 6, 1)));
    }

    #[test]
    fn test_parse_date_with_whitespace() {
        assert_eq!(parse_date_text("  2021-06-01 "), Some(date(2021, 6, 1)));
    }

    #[test]
    fn test_parse_datetime_text() {
        assert_eq!(
            parse_date_text("2021-06-01 00:00:00"),
            Some(date(2021, 6, 1))
        );
        assert_eq!(
            parse_date_text("2021-06-01T12:30:00"),
            Some(date(2021, 6, 1))
        );
    }

    #[test]
    fn test_parse_slash_date() {
        assert_eq!(parse_date_text("2021/06/01"), Some(date(2021, 6, 1)));
    }

    #[test]
    fn test_parse_invalid_text() {
        assert_eq!(parse_date_text("Uppgift saknas"), None);
        assert_eq!(parse_date_text(""), None);
        assert_eq!(parse_date_text("2021-13-01"), None);
    }

    #[test]
    fn test_excel_serial() {
        assert_eq!(excel_serial_to_date(44197.0), Some(date(2021, 1, 1)));
        // fractional part is time of day
        assert_eq!(excel_serial_to_date(44197.75), Some(date(2021, 1, 1)));
    }

    #[test]
    fn test_excel_serial_out_of_range() {
        assert_eq!(excel_serial_to_date(0.0), None);
        assert_eq!(excel_serial_to_date(-3.0), None);
        assert_eq!(excel_serial_to_date(f64::NAN), None);
        assert_eq!(excel_serial_to_date(1.0e18), None);
    }

    #[test]
    fn test_coerce_date_variants() {
        let dt = date(2020, 4, 2).and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(coerce_date(&Cell::DateTime(dt)), Some(date(2020, 4, 2)));
        assert_eq!(coerce_date(&Cell::Empty), None);
        assert_eq!(coerce_date(&Cell::Bool(true)), None);
        assert_eq!(coerce_date(&Cell::Error("#N/A".into())), None);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&Cell::Number(3.0)), Some(3.0));
        assert_eq!(coerce_number(&Cell::Text(" 12 ".into())), Some(12.0));
        assert_eq!(coerce_number(&Cell::Text("n/a".into())), None);
        assert_eq!(coerce_number(&Cell::Empty), None);
        assert_eq!(coerce_number(&Cell::Number(f64::NAN)), None);
    }
}
