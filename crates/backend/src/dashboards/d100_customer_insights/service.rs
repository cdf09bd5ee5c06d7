use contracts::dashboards::d100_customer_insights::{
    ChartKind, ChartOrientation, ChartSpec, DashboardRequest, DashboardResponse, FilterCriteria,
    FilterOptions, KpiSummary, EMPTY_SELECTION_NOTICE,
};
use contracts::shared::indicators::{IndicatorMeta, IndicatorValue, ValueFormat};
use thiserror::Error;

use super::aggregation::{
    country_revenue, daily_revenue, kpi_summary, top_products, weekday_revenue, DEFAULT_TOP_N,
};
use super::filter::{apply_filter, resolve_criteria};
use crate::domain::a001_retail_transaction::CanonicalDataset;
use crate::shared::format::{format_money, format_number};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("dataset is empty, the request must name a country and a date range")]
    NoDefaultCriteria,
}

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    /// Length of the top products and top countries tables
    pub top_n: usize,
    pub currency_symbol: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            currency_symbol: "£".to_string(),
        }
    }
}

pub fn get_filter_options(canonical: &CanonicalDataset) -> FilterOptions {
    canonical.filter_options()
}

/// Resolve request defaults, then recompute every view.
pub fn get_dashboard(
    canonical: &CanonicalDataset,
    request: &DashboardRequest,
    settings: &DashboardSettings,
) -> Result<DashboardResponse, DashboardError> {
    let criteria =
        resolve_criteria(canonical, request).ok_or(DashboardError::NoDefaultCriteria)?;
    Ok(on_filter_change(canonical, criteria, settings))
}

/// Full synchronous recomputation for one filter selection.
///
/// The country table always covers the whole canonical dataset. An empty
/// selection yields zero KPIs, empty filtered tables and only the country chart.
pub fn on_filter_change(
    canonical: &CanonicalDataset,
    criteria: FilterCriteria,
    settings: &DashboardSettings,
) -> DashboardResponse {
    let filtered = apply_filter(canonical, &criteria);
    let is_empty = filtered.is_empty();

    tracing::debug!(
        "D100 Dashboard: {} of {} rows match country={} {}..={}",
        filtered.len(),
        canonical.len(),
        criteria.country,
        criteria.date_from,
        criteria.date_to
    );

    let (kpi, daily, products, weekdays) = if is_empty {
        (KpiSummary::default(), Vec::new(), Vec::new(), Vec::new())
    } else {
        (
            kpi_summary(filtered.iter()),
            daily_revenue(filtered.iter()),
            top_products(filtered.iter(), settings.top_n),
            weekday_revenue(filtered.iter()),
        )
    };

    DashboardResponse {
        row_count: filtered.len(),
        is_empty,
        notice: is_empty.then(|| EMPTY_SELECTION_NOTICE.to_string()),
        kpi_cards: kpi_cards(&kpi, settings),
        kpi,
        daily_revenue: daily,
        top_products: products,
        weekday_revenue: weekdays,
        country_revenue: country_revenue(canonical.rows(), settings.top_n),
        charts: chart_specs(is_empty, settings.top_n),
        criteria,
    }
}

fn kpi_indicators(settings: &DashboardSettings) -> [IndicatorMeta; 3] {
    let money = |decimals| ValueFormat::Money {
        currency: settings.currency_symbol.clone(),
        decimals,
    };
    [
        IndicatorMeta::new("total_revenue", "Total Revenue", money(0)),
        IndicatorMeta::new("total_orders", "Total Orders", ValueFormat::Integer),
        IndicatorMeta::new("avg_order_value", "Avg Order Value", money(2)),
    ]
}

fn kpi_cards(kpi: &KpiSummary, settings: &DashboardSettings) -> Vec<IndicatorValue> {
    let values = [
        kpi.total_revenue,
        kpi.total_orders as f64,
        kpi.avg_order_value,
    ];

    kpi_indicators(settings)
        .into_iter()
        .zip(values)
        .map(|(meta, value)| IndicatorValue {
            formatted: format_value(value, &meta.format),
            id: meta.id,
            label: meta.label,
            value,
        })
        .collect()
}

fn format_value(value: f64, format: &ValueFormat) -> String {
    match format {
        ValueFormat::Money { currency, decimals } => format_money(value, *decimals, currency),
        ValueFormat::Integer => format_number(value.max(0.0).round() as u64),
    }
}

fn chart(
    id: &str,
    title: impl Into<String>,
    kind: ChartKind,
    orientation: ChartOrientation,
    x_field: &str,
    y_field: &str,
) -> ChartSpec {
    ChartSpec {
        id: id.to_string(),
        title: title.into(),
        kind,
        orientation,
        x_field: x_field.to_string(),
        y_field: y_field.to_string(),
    }
}

fn chart_specs(is_empty: bool, top_n: usize) -> Vec<ChartSpec> {
    let mut charts = Vec::new();
    if !is_empty {
        charts.push(chart(
            "daily_revenue",
            "Daily Revenue Trend",
            ChartKind::Line,
            ChartOrientation::Vertical,
            "InvoiceDate",
            "TotalPrice",
        ));
        charts.push(chart(
            "top_products",
            format!("Top {} Products by Revenue", top_n),
            ChartKind::Bar,
            ChartOrientation::Horizontal,
            "TotalPrice",
            "Description",
        ));
        charts.push(chart(
            "weekday_revenue",
            "Revenue by Weekday",
            ChartKind::Bar,
            ChartOrientation::Vertical,
            "Weekday",
            "TotalPrice",
        ));
    }
    charts.push(chart(
        "country_revenue",
        format!("Top {} Countries by Revenue", top_n),
        ChartKind::Bar,
        ChartOrientation::Vertical,
        "Country",
        "TotalPrice",
    ));
    charts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::domain::a001_retail_transaction::Transaction;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// A: UK 2011-01-01 2×£5, B: UK 2011-01-02 1×£10, C: FR 2011-01-01 1×£20
    fn canonical() -> CanonicalDataset {
        let at = |d: NaiveDate| d.and_hms_opt(0, 0, 0).unwrap();
        CanonicalDataset::new(vec![
            Transaction::new("A", "MUG", 2, 5.0, at(day(2011, 1, 1)), "100", "UK"),
            Transaction::new("B", "PLATE", 1, 10.0, at(day(2011, 1, 2)), "101", "UK"),
            Transaction::new("C", "BOWL", 1, 20.0, at(day(2011, 1, 1)), "102", "FR"),
        ])
    }

    #[test]
    fn test_uk_selection() {
        let canonical = canonical();
        let criteria = FilterCriteria::new("UK", day(2011, 1, 1), day(2011, 1, 2));
        let response = on_filter_change(&canonical, criteria, &DashboardSettings::default());

        assert!(!response.is_empty);
        assert!(response.notice.is_none());
        assert_eq!(response.row_count, 2);
        assert_eq!(response.kpi.total_revenue, 20.0);
        assert_eq!(response.kpi.total_orders, 2);
        assert_eq!(response.kpi.avg_order_value, 10.0);

        assert_eq!(response.daily_revenue.len(), 2);
        assert_eq!(response.daily_revenue[0].revenue, 10.0);
        assert_eq!(response.daily_revenue[1].revenue, 10.0);
        assert_eq!(response.top_products.len(), 2);
        assert_eq!(response.weekday_revenue.len(), 7);
        assert_eq!(response.charts.len(), 4);

        let formatted: Vec<&str> = response
            .kpi_cards
            .iter()
            .map(|c| c.formatted.as_str())
            .collect();
        assert_eq!(formatted, vec!["£20", "2", "£10.00"]);
    }

    #[test]
    fn test_empty_selection_keeps_country_chart() {
        let canonical = canonical();
        let criteria = FilterCriteria::new("DE", day(2011, 1, 1), day(2011, 1, 2));
        let response = on_filter_change(&canonical, criteria, &DashboardSettings::default());

        assert!(response.is_empty);
        assert_eq!(response.notice.as_deref(), Some(EMPTY_SELECTION_NOTICE));
        assert_eq!(response.kpi, KpiSummary::default());
        assert!(response.daily_revenue.is_empty());
        assert!(response.top_products.is_empty());
        assert!(response.weekday_revenue.is_empty());

        let countries: Vec<&str> = response
            .country_revenue
            .iter()
            .map(|c| c.country.as_str())
            .collect();
        // Equal revenue, UK appears first
        assert_eq!(countries, vec!["UK", "FR"]);

        assert_eq!(response.charts.len(), 1);
        assert_eq!(response.charts[0].id, "country_revenue");
    }

    #[test]
    fn test_reversed_range_is_empty_not_error() {
        let canonical = canonical();
        let request = DashboardRequest {
            country: Some("UK".to_string()),
            date_from: Some(day(2011, 1, 2)),
            date_to: Some(day(2011, 1, 1)),
        };
        let response = get_dashboard(&canonical, &request, &DashboardSettings::default()).unwrap();
        assert!(response.is_empty);
        assert_eq!(response.criteria.date_from, day(2011, 1, 2));
    }

    #[test]
    fn test_defaults_cover_first_country_and_full_range() {
        let canonical = canonical();
        let response =
            get_dashboard(&canonical, &DashboardRequest::default(), &DashboardSettings::default())
                .unwrap();
        assert_eq!(
            response.criteria,
            FilterCriteria::new("UK", day(2011, 1, 1), day(2011, 1, 2))
        );
        assert_eq!(response.row_count, 2);
    }

    #[test]
    fn test_top_n_setting() {
        let canonical = canonical();
        let settings = DashboardSettings {
            top_n: 1,
            currency_symbol: "$".to_string(),
        };
        let criteria = FilterCriteria::new("UK", day(2011, 1, 1), day(2011, 1, 2));
        let response = on_filter_change(&canonical, criteria, &settings);
        assert_eq!(response.top_products.len(), 1);
        assert_eq!(response.country_revenue.len(), 1);
        assert_eq!(response.kpi_cards[0].formatted, "$20");

        let titles: Vec<&str> = response.charts.iter().map(|c| c.title.as_str()).collect();
        assert!(titles.contains(&"Top 1 Products by Revenue"));
        assert!(titles.contains(&"Top 1 Countries by Revenue"));
    }

    #[test]
    fn test_chart_titles_follow_default_top_n() {
        let charts = chart_specs(false, DashboardSettings::default().top_n);
        assert_eq!(charts[1].id, "top_products");
        assert_eq!(charts[1].title, "Top 10 Products by Revenue");
        assert_eq!(charts[3].title, "Top 10 Countries by Revenue");

        let charts = chart_specs(true, 5);
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].title, "Top 5 Countries by Revenue");
    }

    #[test]
    fn test_empty_dataset_without_criteria() {
        let result = get_dashboard(
            &CanonicalDataset::default(),
            &DashboardRequest::default(),
            &DashboardSettings::default(),
        );
        assert!(matches!(result, Err(DashboardError::NoDefaultCriteria)));
    }

    #[test]
    fn test_filter_options() {
        let options = get_filter_options(&canonical());
        assert_eq!(options.countries, vec!["UK", "FR"]);
        assert_eq!(options.min_date, Some(day(2011, 1, 1)));
        assert_eq!(options.max_date, Some(day(2011, 1, 2)));
    }
}
