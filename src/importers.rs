//! Workbook access: typed tables read from named sheets

pub mod sheet_loader;
pub mod table;

// Re-export commonly used items
pub use sheet_loader::{load_sheet, SheetError, SheetLoader};
pub use table::{Cell, Column, Table};
