use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::indicators::IndicatorValue;

/// Notice shown in place of the filtered charts when the selection is empty.
pub const EMPTY_SELECTION_NOTICE: &str =
    "No data available for the selected filters. Try changing country or date range.";

/// Query of the dashboard endpoint.
///
/// Every field is optional; missing fields fall back to the first country
/// and the full date range of the dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardRequest {
    #[serde(default)]
    pub country: Option<String>,
    /// Start date in format "YYYY-MM-DD"
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    /// End date in format "YYYY-MM-DD"
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

/// Effective filter: one country and an inclusive range of calendar days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub country: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl FilterCriteria {
    pub fn new(country: impl Into<String>, date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            country: country.into(),
            date_from,
            date_to,
        }
    }
}

/// Choices the presentation layer offers in its filter controls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Distinct countries in order of first appearance
    pub countries: Vec<String>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_revenue: f64,
    /// Number of distinct invoices
    pub total_orders: u64,
    pub avg_order_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenuePoint {
    pub date: NaiveDate,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRevenue {
    pub description: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayRevenue {
    /// English day name, "Monday" .. "Sunday"
    pub weekday: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRevenue {
    pub country: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartOrientation {
    Vertical,
    Horizontal,
}

/// Everything the renderer needs to draw one of the result tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Name of the response field holding the table (e.g. "daily_revenue")
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    pub orientation: ChartOrientation,
    pub x_field: String,
    pub y_field: String,
}

/// Response for the customer insights dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub criteria: FilterCriteria,
    /// Rows of the filtered dataset
    pub row_count: usize,
    pub is_empty: bool,
    /// Set when `is_empty`, see [`EMPTY_SELECTION_NOTICE`]
    pub notice: Option<String>,
    pub kpi: KpiSummary,
    /// KPI panel values with display formatting applied
    pub kpi_cards: Vec<IndicatorValue>,
    pub daily_revenue: Vec<DailyRevenuePoint>,
    pub top_products: Vec<ProductRevenue>,
    pub weekday_revenue: Vec<WeekdayRevenue>,
    /// Computed over the whole dataset, independent of `criteria`
    pub country_revenue: Vec<CountryRevenue>,
    /// Charts to render, in display order
    pub charts: Vec<ChartSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_fields_are_optional() {
        let request: DashboardRequest = serde_json::from_str("{}").unwrap();
        assert!(request.country.is_none());
        assert!(request.date_from.is_none());
        assert!(request.date_to.is_none());
    }

    #[test]
    fn test_request_parses_iso_dates() {
        let request: DashboardRequest = serde_json::from_str(
            r#"{"country":"France","date_from":"2011-01-01","date_to":"2011-01-31"}"#,
        )
        .unwrap();
        assert_eq!(request.country.as_deref(), Some("France"));
        assert_eq!(request.date_from, NaiveDate::from_ymd_opt(2011, 1, 1));
        assert_eq!(request.date_to, NaiveDate::from_ymd_opt(2011, 1, 31));
    }

    #[test]
    fn test_chart_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ChartKind::Line).unwrap();
        assert_eq!(json, "\"line\"");
        let json = serde_json::to_string(&ChartOrientation::Horizontal).unwrap();
        assert_eq!(json, "\"horizontal\"");
    }
}
