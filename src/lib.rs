//! Order-record aggregation behind the e-commerce sales dashboard.
//!
//! Load a CSV snapshot once, then hand it by reference to the pure summary
//! functions in [`reports`]. Rendering is left to the caller.
pub mod cache;
pub mod error;
pub mod loader;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;

pub use cache::LoadCache;
pub use error::{PipelineError, RowIssue};
pub use loader::{
    load_bytes, load_path, load_reader, Dataset, LoadOptions, LoadReport, LoadWarning, RowPolicy,
};
pub use output::export_csv;
pub use reports::{
    compute_kpis, payment_breakdown, revenue_by_month, revenue_by_region, summarize,
    top_customers, top_products, DashboardConfig,
};
pub use types::{
    CustomerSpend, DashboardSummary, Kpis, MonthRevenue, OrderRecord, PaymentSummary,
    ProductRevenue, RegionRevenue, ReportRow,
};
