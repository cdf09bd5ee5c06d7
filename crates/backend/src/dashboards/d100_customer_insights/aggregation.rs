use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d100_customer_insights::{
    CountryRevenue, DailyRevenuePoint, KpiSummary, ProductRevenue, WeekdayRevenue,
};
use contracts::domain::a001_retail_transaction::Transaction;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Length of the top products and top countries tables.
pub const DEFAULT_TOP_N: usize = 10;

/// Fixed display order of the weekday table.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub fn kpi_summary<'a>(rows: impl IntoIterator<Item = &'a Transaction>) -> KpiSummary {
    let mut total_revenue = 0.0;
    let mut invoices: HashSet<&str> = HashSet::new();

    for t in rows {
        total_revenue += t.total_price;
        invoices.insert(t.invoice_no.as_str());
    }

    let total_orders = invoices.len() as u64;
    let avg_order_value = if total_orders > 0 {
        total_revenue / total_orders as f64
    } else {
        0.0
    };

    KpiSummary {
        total_revenue,
        total_orders,
        avg_order_value,
    }
}

/// Revenue per calendar day, chronological.
///
/// Covers every day between the first and the last day with data; days in
/// between without rows are reported with zero revenue.
pub fn daily_revenue<'a>(
    rows: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<DailyRevenuePoint> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for t in rows {
        *by_day.entry(t.invoice_day()).or_insert(0.0) += t.total_price;
    }

    let (first, last) = match (by_day.keys().next(), by_day.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Vec::new(),
    };

    first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| DailyRevenuePoint {
            date,
            revenue: by_day.get(&date).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Up to `limit` products by descending revenue.
pub fn top_products<'a>(
    rows: impl IntoIterator<Item = &'a Transaction>,
    limit: usize,
) -> Vec<ProductRevenue> {
    top_by_revenue(revenue_by(rows, |t| t.description.as_str()), limit)
        .into_iter()
        .map(|(description, revenue)| ProductRevenue {
            description: description.to_string(),
            revenue,
        })
        .collect()
}

/// Always seven entries, Monday first.
pub fn weekday_revenue<'a>(
    rows: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<WeekdayRevenue> {
    let mut totals = [0.0_f64; 7];
    for t in rows {
        totals[t.invoice_date.weekday().num_days_from_monday() as usize] += t.total_price;
    }

    WEEKDAY_NAMES
        .iter()
        .zip(totals)
        .map(|(name, revenue)| WeekdayRevenue {
            weekday: name.to_string(),
            revenue,
        })
        .collect()
}

/// Up to `limit` countries by descending revenue. Callers pass the whole
/// canonical dataset, not a filtered one.
pub fn country_revenue<'a>(
    rows: impl IntoIterator<Item = &'a Transaction>,
    limit: usize,
) -> Vec<CountryRevenue> {
    top_by_revenue(revenue_by(rows, |t| t.country.as_str()), limit)
        .into_iter()
        .map(|(country, revenue)| CountryRevenue {
            country: country.to_string(),
            revenue,
        })
        .collect()
}

/// Sum of `total_price` per key, groups in order of first appearance.
fn revenue_by<'a>(
    rows: impl IntoIterator<Item = &'a Transaction>,
    key: impl Fn(&'a Transaction) -> &'a str,
) -> Vec<(&'a str, f64)> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, f64)> = Vec::new();

    for t in rows {
        let k = key(t);
        match index.get(k) {
            Some(&i) => groups[i].1 += t.total_price,
            None => {
                index.insert(k, groups.len());
                groups.push((k, t.total_price));
            }
        }
    }

    groups
}

/// Stable sort, so equal revenues keep first-appearance order.
fn top_by_revenue(mut groups: Vec<(&str, f64)>, limit: usize) -> Vec<(&str, f64)> {
    groups.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    groups.truncate(limit);
    groups
}
