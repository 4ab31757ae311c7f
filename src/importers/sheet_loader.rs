use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Reader};
use thiserror::Error;
use tracing::{debug, info, instrument};

use super::table::Table;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Failed to open workbook: {0}")]
    WorkbookOpen(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Column {column} not found in sheet {sheet}")]
    ColumnNotFound { sheet: String, column: String },

    #[error("Sheet {0} has no header row")]
    EmptySheet(String),
}

/// Reads single sheets out of the Folkhälsomyndigheten workbook.
///
/// Every call reopens and reparses the workbook; nothing is cached.
pub struct SheetLoader {
    workbook_path: PathBuf,
}

impl SheetLoader {
    pub fn new(workbook_path: impl Into<PathBuf>) -> Self {
        Self {
            workbook_path: workbook_path.into(),
        }
    }

    pub fn workbook_path(&self) -> &Path {
        &self.workbook_path
    }

    /// Load the sheet named exactly `label` (case-sensitive)
    #[instrument(skip(self), fields(path = %self.workbook_path.display()))]
    pub fn load_sheet(&self, label: &str) -> Result<Table, SheetError> {
        info!("Loading sheet: {}", label);

        // Format is sniffed from the extension (xlsx, xls, ods)
        let mut workbook = open_workbook_auto(&self.workbook_path)
            .map_err(|e| SheetError::WorkbookOpen(e.to_string()))?;

        if !workbook.sheet_names().iter().any(|name| name == label) {
            debug!("Available sheets: {:?}", workbook.sheet_names());
            return Err(SheetError::SheetNotFound(label.to_string()));
        }

        let range = workbook
            .worksheet_range(label)
            .map_err(|e| SheetError::WorkbookOpen(e.to_string()))?;

        let table = Table::from_range(label, &range)?;
        debug!(
            "Sheet {} has {} columns and {} data rows",
            label,
            table.columns().len(),
            table.row_count()
        );
        Ok(table)
    }

    /// Load a sheet and verify the columns a report needs are present
    pub fn load_with_columns(&self, label: &str, columns: &[&str]) -> Result<Table, SheetError> {
        let table = self.load_sheet(label)?;
        table.require_columns(columns)?;
        Ok(table)
    }

    pub fn sheet_names(&self) -> Result<Vec<String>, SheetError> {
        let workbook = open_workbook_auto(&self.workbook_path)
            .map_err(|e| SheetError::WorkbookOpen(e.to_string()))?;
        Ok(workbook.sheet_names())
    }
}

/// Convenience wrapper around [`SheetLoader::load_sheet`]
pub fn load_sheet(path: &Path, label: &str) -> Result<Table, SheetError> {
    SheetLoader::new(path).load_sheet(label)
}
