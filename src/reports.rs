use crate::types::{
    CustomerSpend, DashboardSummary, Kpis, MonthRevenue, OrderRecord, PaymentSummary,
    ProductRevenue, RegionRevenue,
};
use crate::util::{average, round2};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

pub const DEFAULT_TOP_PRODUCTS: usize = 10;
pub const DEFAULT_TOP_CUSTOMERS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardConfig {
    pub top_products: usize,
    pub top_customers: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_products: DEFAULT_TOP_PRODUCTS,
            top_customers: DEFAULT_TOP_CUSTOMERS,
        }
    }
}

/// Sum `total_amount` per key, keeping groups in the order their key first
/// appeared so a later stable sort breaks ties by input order.
fn sum_by_first_seen<K, F>(data: &[OrderRecord], key_of: F) -> Vec<(K, f64)>
where
    K: Eq + Hash + Clone,
    F: Fn(&OrderRecord) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, f64)> = Vec::new();
    for r in data {
        let key = key_of(r);
        match index.get(&key).copied() {
            Some(i) => groups[i].1 += r.total_amount,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, r.total_amount));
            }
        }
    }
    groups
}

/// Stable descending sort on the summed amount, then truncate.
fn top_by_amount<K>(mut groups: Vec<(K, f64)>, n: usize) -> Vec<(K, f64)> {
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
    groups.truncate(n);
    groups
}

pub fn compute_kpis(data: &[OrderRecord]) -> Kpis {
    let amounts: Vec<f64> = data.iter().map(|r| r.total_amount).collect();
    let customers: HashSet<&str> = data.iter().map(|r| r.customer_id.as_str()).collect();
    Kpis {
        total_revenue: amounts.iter().sum(),
        total_orders: data.len(),
        total_customers: customers.len(),
        avg_order_value: round2(average(&amounts)),
    }
}

pub fn revenue_by_month(data: &[OrderRecord]) -> Vec<MonthRevenue> {
    let mut map: BTreeMap<&str, f64> = BTreeMap::new();
    for r in data {
        *map.entry(r.month_key.as_str()).or_insert(0.0) += r.total_amount;
    }
    map.into_iter()
        .map(|(month, revenue)| MonthRevenue {
            month: month.to_string(),
            revenue,
        })
        .collect()
}

pub fn top_products(data: &[OrderRecord], n: usize) -> Vec<ProductRevenue> {
    let groups = sum_by_first_seen(data, |r| (r.product_id.clone(), r.product_name.clone()));
    top_by_amount(groups, n)
        .into_iter()
        .map(|((product_id, product_name), revenue)| ProductRevenue {
            product_id,
            product_name,
            revenue,
        })
        .collect()
}

pub fn revenue_by_region(data: &[OrderRecord]) -> Vec<RegionRevenue> {
    let groups = sum_by_first_seen(data, |r| r.region.clone());
    top_by_amount(groups, usize::MAX)
        .into_iter()
        .map(|(region, revenue)| RegionRevenue { region, revenue })
        .collect()
}

/// Order count and revenue per payment method, ordered by method name.
pub fn payment_breakdown(data: &[OrderRecord]) -> Vec<PaymentSummary> {
    let mut map: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for r in data {
        let e = map.entry(r.payment_method.as_str()).or_insert((0, 0.0));
        e.0 += 1;
        e.1 += r.total_amount;
    }
    map.into_iter()
        .map(|(method, (orders, revenue))| PaymentSummary {
            payment_method: method.to_string(),
            orders,
            revenue,
        })
        .collect()
}

pub fn top_customers(data: &[OrderRecord], n: usize) -> Vec<CustomerSpend> {
    let groups = sum_by_first_seen(data, |r| (r.customer_id.clone(), r.customer_name.clone()));
    top_by_amount(groups, n)
        .into_iter()
        .map(|((customer_id, customer_name), spend)| CustomerSpend {
            customer_id,
            customer_name,
            spend,
        })
        .collect()
}

pub fn summarize(data: &[OrderRecord], config: &DashboardConfig) -> DashboardSummary {
    DashboardSummary {
        kpis: compute_kpis(data),
        revenue_by_month: revenue_by_month(data),
        top_products: top_products(data, config.top_products),
        revenue_by_region: revenue_by_region(data),
        payment_breakdown: payment_breakdown(data),
        top_customers: top_customers(data, config.top_customers),
    }
}
