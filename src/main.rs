// Console front end for the sales dashboard.
//
// - Option [1] loads a CSV of orders (the bundled dataset by default).
// - Option [2] prints the KPI tiles and previews of every summary table,
//   writing each table to CSV plus a JSON summary.
// - Option [3] exports the normalized records, like the page's download button.
use ecommerce_dashboard::output::{preview_table_rows, write_csv, write_json};
use ecommerce_dashboard::util::{format_currency, format_int, format_number};
use ecommerce_dashboard::{
    export_csv, summarize, DashboardConfig, Dataset, LoadCache, LoadOptions, PipelineError,
};
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_DATASET: &str = "dataset/ecommerce_sales_large.csv";
const EXPORT_FILE: &str = "filtered_ecommerce.csv";

// Everything the menu loop needs between choices. Re-loading an unchanged
// file is served from the cache.
#[derive(Default)]
struct AppState {
    cache: LoadCache,
    data: Option<Arc<Dataset>>,
    options: LoadOptions,
    config: DashboardConfig,
}

/// Print `label` and read one trimmed line. `None` once stdin is closed.
fn prompt(label: &str) -> Option<String> {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Handle option [1]: load the CSV into the app state.
fn handle_load(state: &mut AppState) {
    let entered = prompt(&format!("CSV path [{}]: ", DEFAULT_DATASET)).unwrap_or_default();
    let path = if entered.is_empty() {
        DEFAULT_DATASET.to_string()
    } else {
        entered
    };
    let loaded = std::fs::read(&path)
        .map_err(PipelineError::from)
        .and_then(|bytes| state.cache.get_or_load(&bytes, &state.options));
    match loaded {
        Ok(data) => {
            println!(
                "Processing dataset... ({} rows read, {} loaded)",
                format_int(data.report.total_rows),
                format_int(data.report.loaded_rows)
            );
            if !data.report.skipped.is_empty() {
                println!(
                    "Note: {} rows skipped due to parse errors.",
                    format_int(data.report.skipped.len())
                );
            }
            if data.records.is_empty() {
                println!("Warning: the file has no order rows; all KPIs will be zero.");
            }
            println!();
            state.data = Some(data);
        }
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

/// Handle option [2]: KPIs, table previews and the report files.
fn handle_generate_reports(state: &AppState) -> Result<(), PipelineError> {
    let Some(data) = state.data.as_ref() else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return Ok(());
    };
    let summary = summarize(&data.records, &state.config);
    let k = &summary.kpis;

    println!("Total Revenue:   {}", format_currency(k.total_revenue));
    println!("Total Orders:    {}", format_int(k.total_orders));
    println!("Total Customers: {}", format_int(k.total_customers));
    println!("Avg Order Value: ₹{}\n", format_number(k.avg_order_value, 2));

    println!("Revenue by Month\n");
    preview_table_rows(&summary.revenue_by_month, 12);
    write_csv("revenue_by_month.csv", &summary.revenue_by_month)?;

    println!("Top {} Products by Revenue\n", state.config.top_products);
    preview_table_rows(&summary.top_products, state.config.top_products);
    write_csv("top_products.csv", &summary.top_products)?;

    println!("Revenue by Region\n");
    preview_table_rows(&summary.revenue_by_region, usize::MAX);
    write_csv("revenue_by_region.csv", &summary.revenue_by_region)?;

    println!("Payment Method Breakdown\n");
    preview_table_rows(&summary.payment_breakdown, usize::MAX);
    write_csv("payment_breakdown.csv", &summary.payment_breakdown)?;

    println!("Top {} Customers by Spend\n", state.config.top_customers);
    preview_table_rows(&summary.top_customers, state.config.top_customers);
    write_csv("top_customers.csv", &summary.top_customers)?;

    write_json("summary.json", &summary)?;
    println!("(Tables exported to CSV, full summary in summary.json)\n");
    Ok(())
}

/// Handle option [3]: write the normalized records back out.
fn handle_export(state: &AppState) -> Result<(), PipelineError> {
    let Some(data) = state.data.as_ref() else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return Ok(());
    };
    let bytes = export_csv(&data.records)?;
    std::fs::write(EXPORT_FILE, bytes)?;
    println!(
        "Exported {} rows to {}\n",
        format_int(data.records.len()),
        EXPORT_FILE
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut state = AppState::default();
    loop {
        println!("Ecommerce Sales Dashboard");
        println!("[1] Load the file");
        println!("[2] Generate Reports");
        println!("[3] Download Filtered Data (CSV)");
        println!("[4] Exit\n");
        let Some(choice) = prompt("Enter choice: ") else {
            break;
        };
        match choice.as_str() {
            "1" => handle_load(&mut state),
            "2" => {
                println!();
                if let Err(e) = handle_generate_reports(&state) {
                    eprintln!("Write error: {}\n", e);
                }
            }
            "3" => {
                if let Err(e) = handle_export(&state) {
                    eprintln!("Write error: {}\n", e);
                }
            }
            "4" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 1, 2, 3 or 4.\n"),
        }
    }
}
