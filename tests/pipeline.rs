use std::fs;
use std::io::Write;
use std::path::PathBuf;

use ecommerce_dashboard::{
    compute_kpis, export_csv, load_bytes, load_path, revenue_by_month, revenue_by_region,
    summarize, top_customers, top_products, DashboardConfig, LoadOptions, PipelineError,
};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn fixture(name: &str) -> Vec<u8> {
    let path = fixture_path(name);
    fs::read(&path).unwrap_or_else(|err| panic!("failed to read fixture {}: {}", path.display(), err))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn sample_orders_kpis() {
    let data = load_path(fixture_path("sample_orders.csv"), &LoadOptions::default())
        .expect("sample load failed");
    let k = compute_kpis(&data.records);
    assert!(close(k.total_revenue, 29520.5));
    assert_eq!(k.total_orders, 12);
    assert_eq!(k.total_customers, 8);
    assert_eq!(k.avg_order_value, 2460.04);
}

#[test]
fn three_independent_totals_agree() {
    let data = load_bytes(&fixture("sample_orders.csv"), &LoadOptions::default()).unwrap();
    let total = compute_kpis(&data.records).total_revenue;
    let by_month: f64 = revenue_by_month(&data.records).iter().map(|m| m.revenue).sum();
    let by_region: f64 = revenue_by_region(&data.records).iter().map(|r| r.revenue).sum();
    assert!(close(total, by_month));
    assert!(close(total, by_region));
}

#[test]
fn monthly_revenue_is_sorted_by_month() {
    let data = load_bytes(&fixture("sample_orders.csv"), &LoadOptions::default()).unwrap();
    let months = revenue_by_month(&data.records);
    let keys: Vec<&str> = months.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(keys, vec!["2023-12", "2024-01", "2024-02", "2024-03", "2024-04"]);
    assert!(close(months[1].revenue, 10948.5));
    assert!(close(months[2].revenue, 10646.0));
}

#[test]
fn top_products_is_a_sorted_subset() {
    let data = load_bytes(&fixture("sample_orders.csv"), &LoadOptions::default()).unwrap();
    let all = top_products(&data.records, usize::MAX);
    let top = top_products(&data.records, 3);
    assert_eq!(all.len(), 7);
    assert_eq!(top.len(), 3);
    assert!(top.windows(2).all(|w| w[0].revenue >= w[1].revenue));
    assert!(top.iter().all(|p| all.contains(p)));
    let ids: Vec<&str> = top.iter().map(|p| p.product_id.as_str()).collect();
    assert_eq!(ids, vec!["P11", "P16", "P14"]);
}

#[test]
fn top_customers_default_fits_small_input() {
    let data = load_bytes(&fixture("sample_orders.csv"), &LoadOptions::default()).unwrap();
    let summary = summarize(&data.records, &DashboardConfig::default());
    assert_eq!(summary.top_customers.len(), 8);
    assert_eq!(summary.top_customers[0].customer_id, "C002");
    assert_eq!(summary.top_customers, top_customers(&data.records, 15));
    assert_eq!(summary.payment_breakdown.len(), 5);
}

#[test]
fn worked_three_row_example() {
    let src = "OrderDate,CustomerID,CustomerName,ProductID,ProductName,Region,PaymentMethod,TotalAmount\n\
               2024-01-10,C1,Asha,A,ProductA,North,UPI,100\n\
               2024-02-10,C2,Ravi,A,ProductA,North,UPI,50\n\
               2024-01-20,C1,Asha,B,ProductB,South,Card,200\n";
    let data = load_bytes(src.as_bytes(), &LoadOptions::default()).unwrap();

    let months: Vec<(String, f64)> = revenue_by_month(&data.records)
        .into_iter()
        .map(|m| (m.month, m.revenue))
        .collect();
    assert_eq!(
        months,
        vec![("2024-01".to_string(), 300.0), ("2024-02".to_string(), 50.0)]
    );

    let products: Vec<(String, f64)> = top_products(&data.records, 10)
        .into_iter()
        .map(|p| (p.product_name, p.revenue))
        .collect();
    assert_eq!(
        products,
        vec![("ProductB".to_string(), 200.0), ("ProductA".to_string(), 150.0)]
    );
}

#[test]
fn export_round_trips() {
    let first = load_bytes(&fixture("sample_orders.csv"), &LoadOptions::default()).unwrap();
    let exported = export_csv(&first.records).unwrap();
    let second = load_bytes(&exported, &LoadOptions::default()).unwrap();
    assert_eq!(first.records, second.records);
    assert_eq!(export_csv(&second.records).unwrap(), exported);
}

fn assert_round_trip(src: &str) {
    let first = load_bytes(src.as_bytes(), &LoadOptions::default()).expect("source load failed");
    let exported = export_csv(&first.records).unwrap();
    let second = load_bytes(&exported, &LoadOptions::default()).unwrap_or_else(|err| {
        panic!(
            "export did not reload: {err}\n{}",
            String::from_utf8_lossy(&exported)
        )
    });
    assert_eq!(first.records, second.records);
}

const HEADER: &str =
    "OrderDate,CustomerID,CustomerName,ProductID,ProductName,Region,PaymentMethod,TotalAmount\n";

#[test]
fn extreme_amounts_round_trip() {
    let src = format!(
        "{HEADER}\
         2024-01-01,C1,Asha,P1,Lamp,North,UPI,100000000000000000000\n\
         2024-01-02,C2,Ravi,P2,Desk,South,Card,0.0000001\n\
         2024-01-03,C3,Mina,P3,Pen,East,Cash,0\n\
         2024-01-04,C4,Lee,P4,Mug,West,UPI,\"1,234,567.89\"\n"
    );
    assert_round_trip(&src);
    let data = load_bytes(src.as_bytes(), &LoadOptions::default()).unwrap();
    assert_eq!(data.records[0].total_amount, 1e20);
    assert_eq!(data.records[1].total_amount, 1e-7);
}

#[test]
fn sub_second_and_bare_dates_round_trip() {
    let src = format!(
        "{HEADER}\
         2024-01-01T10:00:00.250,C1,Asha,P1,Lamp,North,UPI,10\n\
         2024-01-01 10:00:00.000123,C1,Asha,P1,Lamp,North,UPI,11\n\
         2024-02-29,C2,Ravi,P2,Desk,South,Card,12\n\
         2024-03-01 07:05,C3,Mina,P3,Pen,East,Cash,13\n"
    );
    assert_round_trip(&src);
}

#[test]
fn quoted_fields_with_commas_round_trip() {
    let src = format!(
        "{HEADER}\
         2024-01-01,C1,\"Rao, Asha\",P1,\"Lamp, brass \"\"classic\"\"\",\"North, Zone 1\",UPI,10\n"
    );
    assert_round_trip(&src);
    let data = load_bytes(src.as_bytes(), &LoadOptions::default()).unwrap();
    assert_eq!(data.records[0].product_name, "Lamp, brass \"classic\"");
}

#[test]
fn reordered_and_extra_columns_round_trip() {
    let src = "Quantity,TotalAmount,Region,OrderID,PaymentMethod,ProductName,ProductID,CustomerName,CustomerID,OrderDate\n\
               2,19.99,North,1001,UPI,Lamp,P1,Asha,C1,2024-06-30 23:59:59\n\
               1,5,South,1002,Card,Pen,P2,Ravi,C2,2024-07-01\n";
    assert_round_trip(src);
}

#[test]
fn empty_export_reloads_as_empty() {
    let exported = export_csv(&[]).unwrap();
    let data = load_bytes(&exported, &LoadOptions::default()).unwrap();
    assert!(data.records.is_empty());
    assert_eq!(compute_kpis(&data.records).avg_order_value, 0.0);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_path(fixture_path("does_not_exist.csv"), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Io(_)));
}

#[test]
fn bad_amount_in_temp_file_aborts_load() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    write!(
        tmp,
        "OrderDate,CustomerID,CustomerName,ProductID,ProductName,Region,PaymentMethod,TotalAmount\n\
         2024-01-01,C1,Asha,P1,Lamp,North,UPI,10\n\
         2024-01-02,C2,Ravi,P2,Desk,South,Card,₹20\n"
    )
    .unwrap();
    let err = load_path(tmp.path(), &LoadOptions::default()).unwrap_err();
    match err {
        PipelineError::RowParse(issue) => {
            assert_eq!(issue.row, 1);
            assert_eq!(issue.field, "TotalAmount");
        }
        other => panic!("unexpected error: {other}"),
    }
}
