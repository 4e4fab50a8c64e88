use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};
use tabled::Tabled;

use crate::util::{format_number, EXPORT_DATE_FORMAT};

/// One row exactly as it appears in the CSV. Everything stays a string so that
/// bad values can be reported with their row index instead of a serde error.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "OrderDate")]
    pub order_date: Option<String>,
    #[serde(rename = "CustomerID")]
    pub customer_id: Option<String>,
    #[serde(rename = "CustomerName")]
    pub customer_name: Option<String>,
    #[serde(rename = "ProductID")]
    pub product_id: Option<String>,
    #[serde(rename = "ProductName")]
    pub product_name: Option<String>,
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: Option<String>,
    #[serde(rename = "TotalAmount")]
    pub total_amount: Option<String>,
}

/// A normalized order: the raw row plus the cached `year` and `month_key`.
///
/// Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    #[serde(rename = "OrderDate", serialize_with = "serialize_order_date")]
    pub order_date: NaiveDateTime,
    #[serde(rename = "CustomerID")]
    pub customer_id: String,
    #[serde(rename = "CustomerName")]
    pub customer_name: String,
    #[serde(rename = "ProductID")]
    pub product_id: String,
    #[serde(rename = "ProductName")]
    pub product_name: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: String,
    #[serde(rename = "TotalAmount")]
    pub total_amount: f64,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month_key: String,
}

fn serialize_order_date<S: Serializer>(date: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&date.format(EXPORT_DATE_FORMAT))
}

/// A summary row that can be written as a CSV table. `HEADER` matches the
/// serde field names so an empty view still gets its header line.
pub trait ReportRow: Serialize {
    const HEADER: &'static [&'static str];
}

fn display_amount(v: &f64) -> String {
    format_number(*v, 2)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Kpis {
    pub total_revenue: f64,
    pub total_orders: usize,
    pub total_customers: usize,
    /// Mean order value rounded to 2 decimals; 0 for an empty dataset.
    pub avg_order_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct MonthRevenue {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "TotalAmount")]
    #[tabled(rename = "TotalAmount", display_with = "display_amount")]
    pub revenue: f64,
}

impl ReportRow for MonthRevenue {
    const HEADER: &'static [&'static str] = &["Month", "TotalAmount"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ProductRevenue {
    #[serde(rename = "ProductID")]
    #[tabled(rename = "ProductID")]
    pub product_id: String,
    #[serde(rename = "ProductName")]
    #[tabled(rename = "ProductName")]
    pub product_name: String,
    #[serde(rename = "TotalAmount")]
    #[tabled(rename = "TotalAmount", display_with = "display_amount")]
    pub revenue: f64,
}

impl ReportRow for ProductRevenue {
    const HEADER: &'static [&'static str] = &["ProductID", "ProductName", "TotalAmount"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct RegionRevenue {
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "TotalAmount")]
    #[tabled(rename = "TotalAmount", display_with = "display_amount")]
    pub revenue: f64,
}

impl ReportRow for RegionRevenue {
    const HEADER: &'static [&'static str] = &["Region", "TotalAmount"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct PaymentSummary {
    #[serde(rename = "PaymentMethod")]
    #[tabled(rename = "PaymentMethod")]
    pub payment_method: String,
    #[serde(rename = "Orders")]
    #[tabled(rename = "Orders")]
    pub orders: usize,
    #[serde(rename = "Revenue")]
    #[tabled(rename = "Revenue", display_with = "display_amount")]
    pub revenue: f64,
}

impl ReportRow for PaymentSummary {
    const HEADER: &'static [&'static str] = &["PaymentMethod", "Orders", "Revenue"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct CustomerSpend {
    #[serde(rename = "CustomerID")]
    #[tabled(rename = "CustomerID")]
    pub customer_id: String,
    #[serde(rename = "CustomerName")]
    #[tabled(rename = "CustomerName")]
    pub customer_name: String,
    #[serde(rename = "TotalAmount")]
    #[tabled(rename = "TotalAmount", display_with = "display_amount")]
    pub spend: f64,
}

impl ReportRow for CustomerSpend {
    const HEADER: &'static [&'static str] = &["CustomerID", "CustomerName", "TotalAmount"];
}

/// Every view of the dashboard, computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub kpis: Kpis,
    pub revenue_by_month: Vec<MonthRevenue>,
    pub top_products: Vec<ProductRevenue>,
    pub revenue_by_region: Vec<RegionRevenue>,
    pub payment_breakdown: Vec<PaymentSummary>,
    pub top_customers: Vec<CustomerSpend>,
}
