use crate::error::{PipelineError, RowIssue};
use crate::types::{OrderRecord, RawRow};
use crate::util::{month_key, parse_f64_safe, parse_order_date};
use chrono::Datelike;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

pub const REQUIRED_COLUMNS: [&str; 8] = [
    "OrderDate",
    "CustomerID",
    "CustomerName",
    "ProductID",
    "ProductName",
    "Region",
    "PaymentMethod",
    "TotalAmount",
];

/// What to do with a row whose date or amount does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RowPolicy {
    /// Abort the whole load on the first bad row.
    #[default]
    FailFast,
    /// Drop bad rows and list them in `LoadReport::skipped`.
    SkipAndReport,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub row_policy: RowPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadWarning {
    /// The source had a header but no data rows. KPIs are all zero.
    EmptyInput,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped: Vec<RowIssue>,
    pub warnings: Vec<LoadWarning>,
}

/// The immutable snapshot every summary view is computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub records: Vec<OrderRecord>,
    pub report: LoadReport,
}

pub fn load_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Dataset, PipelineError> {
    let file = std::fs::File::open(path.as_ref())?;
    load_reader(file, options)
}

pub fn load_bytes(bytes: &[u8], options: &LoadOptions) -> Result<Dataset, PipelineError> {
    load_reader(bytes, options)
}

/// Read CSV order rows, validate the header and normalize every row.
pub fn load_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Dataset, PipelineError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    check_columns(&headers)?;

    let mut report = LoadReport::default();
    let mut records: Vec<OrderRecord> = Vec::new();

    for (row, result) in rdr.deserialize::<RawRow>().enumerate() {
        report.total_rows += 1;
        let normalized = match result {
            Ok(raw) => normalize_row(row, raw),
            Err(e) => Err(RowIssue::new(row, "record", "", e.to_string())),
        };
        match normalized {
            Ok(record) => records.push(record),
            Err(issue) => match options.row_policy {
                RowPolicy::FailFast => return Err(PipelineError::RowParse(issue)),
                RowPolicy::SkipAndReport => {
                    warn!(row = issue.row, field = issue.field, "skipping row: {}", issue.reason);
                    report.skipped.push(issue);
                }
            },
        }
    }

    report.loaded_rows = records.len();
    if report.total_rows == 0 {
        warn!("order source contained no data rows");
        report.warnings.push(LoadWarning::EmptyInput);
    }
    info!(
        total_rows = report.total_rows,
        loaded_rows = report.loaded_rows,
        skipped = report.skipped.len(),
        "loaded order records"
    );
    Ok(Dataset { records, report })
}

fn check_columns(headers: &StringRecord) -> Result<(), PipelineError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::DataFormat { missing })
    }
}

fn normalize_row(row: usize, raw: RawRow) -> Result<OrderRecord, RowIssue> {
    let order_date = parse_order_date(raw.order_date.as_deref()).ok_or_else(|| {
        RowIssue::new(
            row,
            "OrderDate",
            raw.order_date.clone().unwrap_or_default(),
            "expected an ISO-8601 date",
        )
    })?;

    let amount_text = raw.total_amount.clone().unwrap_or_default();
    let total_amount = match parse_f64_safe(raw.total_amount.as_deref()) {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        Some(_) => {
            return Err(RowIssue::new(row, "TotalAmount", amount_text, "amount must be non-negative"))
        }
        None => return Err(RowIssue::new(row, "TotalAmount", amount_text, "expected a decimal number")),
    };

    Ok(OrderRecord {
        year: order_date.year(),
        month_key: month_key(&order_date),
        order_date,
        customer_id: raw.customer_id.unwrap_or_default(),
        customer_name: raw.customer_name.unwrap_or_default(),
        product_id: raw.product_id.unwrap_or_default(),
        product_name: raw.product_name.unwrap_or_default(),
        region: raw.region.unwrap_or_default(),
        payment_method: raw.payment_method.unwrap_or_default(),
        total_amount,
    })
}
