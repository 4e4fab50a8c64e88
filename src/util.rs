// Parsing and formatting helpers.
//
// Loader and reports rely on these so the rest of the code only sees typed
// values: `f64` amounts, `NaiveDateTime` order dates and `YYYY-MM` keys.
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

/// Date-time layout used when re-encoding `OrderDate` on export. `%.f`
/// writes nothing for whole seconds and keeps sub-second precision otherwise.
pub const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a string-like value into `f64`, tolerating the usual CSV noise.
///
/// - Trims whitespace.
/// - Accepts digits, a sign, a decimal point and an `e`/`E` exponent; any other
///   letter is rejected, so `NaN`/`inf` never get through.
/// - Accepts `","` only as a thousands separator in the integer part (`1,234.5`).
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '+' | '-' | 'e' | 'E'))
    {
        return None;
    }
    if s.contains(',') {
        let int_end = s.find(|c: char| matches!(c, '.' | 'e' | 'E')).unwrap_or(s.len());
        let (int_part, rest) = s.split_at(int_end);
        if rest.contains(',') || !valid_thousands_groups(int_part) {
            return None;
        }
    }
    s.replace(",", "").parse::<f64>().ok().filter(|v| v.is_finite())
}

// `1,234,567` style: a 1-3 digit lead group, then groups of exactly three.
fn valid_thousands_groups(int_part: &str) -> bool {
    let digits = int_part.trim_start_matches(['+', '-']);
    let mut groups = digits.split(',');
    let lead_ok = groups
        .next()
        .is_some_and(|g| (1..=3).contains(&g.len()) && g.chars().all(|c| c.is_ascii_digit()));
    lead_ok && groups.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

/// Parse an ISO-8601 order date. Bare dates become midnight.
pub fn parse_order_date(s: Option<&str>) -> Option<NaiveDateTime> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Zero-padded `YYYY-MM`, so string order is chronological order.
pub fn month_key(date: &NaiveDateTime) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn average(v: &[f64]) -> f64 {
    // Arithmetic mean; 0 for an empty slice rather than NaN.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

pub fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus `en` thousands separators, e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Beyond u128 the digits are kept ungrouped rather than misreported.
    let mut res = match int_part.parse::<u128>() {
        Ok(v) => v.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let (Some(frac), true) = (frac_part, decimals > 0) {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Rupee amount with the fractional part truncated, as shown on the KPI tiles.
pub fn format_currency(n: f64) -> String {
    format!("₹{}", format_number(n.trunc(), 0))
}
