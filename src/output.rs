use crate::error::PipelineError;
use crate::types::{OrderRecord, ReportRow};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

/// Re-encode the normalized records, derived `Year`/`Month` included, as UTF-8 CSV.
pub fn export_csv(records: &[OrderRecord]) -> Result<Vec<u8>, PipelineError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    if records.is_empty() {
        wtr.write_record(EXPORT_HEADER)?;
    }
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.into_inner().map_err(|e| PipelineError::Io(e.into_error()))
}

/// Header written by `export_csv`, also used for an empty export.
pub const EXPORT_HEADER: [&str; 10] = [
    "OrderDate",
    "CustomerID",
    "CustomerName",
    "ProductID",
    "ProductName",
    "Region",
    "PaymentMethod",
    "TotalAmount",
    "Year",
    "Month",
];

/// Write a summary view. An empty view produces just the header line.
pub fn write_csv<T: ReportRow>(path: impl AsRef<Path>, rows: &[T]) -> Result<(), PipelineError> {
    let mut wtr = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        wtr.write_record(T::HEADER)?;
    }
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<(), PipelineError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
