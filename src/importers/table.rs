use calamine::Data;
use chrono::{NaiveDate, NaiveDateTime};

use super::sheet_loader::SheetError;

/// A single typed spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    DateTime(NaiveDateTime),
    Error(String),
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::Text(s.clone()),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(excel_date) => match excel_date.as_datetime() {
                Some(dt) => Cell::DateTime(dt),
                None => Cell::Number(excel_date.as_f64()),
            },
            Data::DateTimeIso(s) => parse_iso_datetime(s)
                .map(Cell::DateTime)
                .unwrap_or_else(|| Cell::Text(s.clone())),
            Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(e) => Cell::Error(e.to_string()),
        }
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// A named column; `cells[i]` belongs to data row `i` of the sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

/// One worksheet as named, positionally aligned columns.
///
/// The first row of the sheet is the header. Every column holds exactly
/// `row_count()` cells, short rows are padded with [`Cell::Empty`].
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    label: String,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table from a header and data rows
    pub fn from_rows<H, R>(label: impl Into<String>, header: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = Vec<Cell>>,
    {
        let mut columns: Vec<Column> = header
            .into_iter()
            .map(|name| Column {
                name: name.into(),
                cells: Vec::new(),
            })
            .collect();

        let mut row_count = 0;
        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.cells.push(cells.next().unwrap_or(Cell::Empty));
            }
            row_count += 1;
        }

        Self {
            label: label.into(),
            columns,
            row_count,
        }
    }

    /// Build a table from a calamine range whose first row is the header
    pub(crate) fn from_range(
        label: &str,
        range: &calamine::Range<Data>,
    ) -> Result<Self, SheetError> {
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| SheetError::EmptySheet(label.to_string()))?;

        let header: Vec<String> = header_row.iter().map(header_name).collect();
        let data_rows = rows.map(|row| row.iter().map(Cell::from).collect::<Vec<_>>());

        Ok(Self::from_rows(label, header, data_rows))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Result<&Column, SheetError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| SheetError::ColumnNotFound {
                sheet: self.label.clone(),
                column: name.to_string(),
            })
    }

    /// Fail on the first of `names` that the sheet lacks
    pub fn require_columns(&self, names: &[&str]) -> Result<(), SheetError> {
        for name in names {
            self.column(name)?;
        }
        Ok(())
    }
}

fn header_name(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format!("{f}"),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
