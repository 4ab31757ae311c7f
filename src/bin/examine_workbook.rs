use std::env;

use fhm_covid_charts::config::DEFAULT_SOURCE_PATH;
use fhm_covid_charts::importers::{Cell, SheetLoader};
use fhm_covid_charts::reports::REGIONAL_SHEET;
use fhm_covid_charts::utils::coerce_date;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let file_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_SOURCE_PATH);
    let sheet_name = args.get(2).map(String::as_str).unwrap_or(REGIONAL_SHEET);

    println!("Opening workbook: {file_path}");
    let loader = SheetLoader::new(file_path);

    println!("\nSheet names:");
    for (i, name) in loader.sheet_names()?.iter().enumerate() {
        println!("  {i}: {name}");
    }

    println!("\n\nExamining sheet: {sheet_name}");
    println!("{}", "=".repeat(100));

    let table = loader.load_sheet(sheet_name)?;
    println!(
        "Dimensions: {} columns x {} data rows",
        table.columns().len(),
        table.row_count()
    );

    println!("\nColumns:");
    for column in table.columns() {
        let filled = column
            .cells
            .iter()
            .filter(|cell| !matches!(cell, Cell::Empty))
            .count();
        let dates = column.cells.iter().filter_map(coerce_date).count();
        println!(
            "  {:30} {:5} non-empty, {:5} readable as dates",
            column.name, filled, dates
        );
    }

    println!("\nFirst 10 rows (showing first 6 columns):");
    println!("{}", "=".repeat(100));
    for row in 0..table.row_count().min(10) {
        print!("Row {:3}: ", row + 1);
        for column in table.columns().iter().take(6) {
            match &column.cells[row] {
                Cell::Empty => print!("[empty] "),
                Cell::Number(v) => print!("[{v}] "),
                Cell::Text(s) => print!("[{s}] "),
                Cell::Bool(b) => print!("[{b}] "),
                Cell::DateTime(dt) => print!("[{dt}] "),
                Cell::Error(e) => print!("[#{e}] "),
            }
        }
        println!();
    }

    Ok(())
}
