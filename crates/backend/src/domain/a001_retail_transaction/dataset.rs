use chrono::NaiveDate;
use contracts::dashboards::d100_customer_insights::FilterOptions;
use contracts::domain::a001_retail_transaction::Transaction;
use std::collections::HashSet;

/// Cleaned, de-duplicated transaction set. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalDataset {
    rows: Vec<Transaction>,
}

impl CanonicalDataset {
    pub fn new(rows: Vec<Transaction>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct countries in order of first appearance.
    pub fn countries(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter(|t| seen.insert(t.country.as_str()))
            .map(|t| t.country.clone())
            .collect()
    }

    /// First and last invoice day, `None` for an empty dataset.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut days = self.rows.iter().map(|t| t.invoice_day());
        let first = days.next()?;
        Some(days.fold((first, first), |(min, max), d| (min.min(d), max.max(d))))
    }

    pub fn filter_options(&self) -> FilterOptions {
        let bounds = self.date_bounds();
        FilterOptions {
            countries: self.countries(),
            min_date: bounds.map(|(min, _)| min),
            max_date: bounds.map(|(_, max)| max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(invoice: &str, country: &str, y: i32, m: u32, d: u32) -> Transaction {
        let date = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Transaction::new(invoice, "ITEM", 1, 1.0, date, "1", country)
    }

    #[test]
    fn test_countries_keep_first_appearance_order() {
        let dataset = CanonicalDataset::new(vec![
            tx("1", "United Kingdom", 2011, 1, 1),
            tx("2", "France", 2011, 1, 2),
            tx("3", "United Kingdom", 2011, 1, 3),
            tx("4", "Australia", 2011, 1, 4),
        ]);
        assert_eq!(
            dataset.countries(),
            vec!["United Kingdom", "France", "Australia"]
        );
    }

    #[test]
    fn test_date_bounds() {
        let dataset = CanonicalDataset::new(vec![
            tx("1", "UK", 2011, 3, 1),
            tx("2", "UK", 2010, 12, 1),
            tx("3", "UK", 2011, 12, 9),
        ]);
        assert_eq!(
            dataset.date_bounds(),
            Some((
                NaiveDate::from_ymd_opt(2010, 12, 1).unwrap(),
                NaiveDate::from_ymd_opt(2011, 12, 9).unwrap()
            ))
        );
    }

    #[test]
    fn test_empty_dataset_has_no_options() {
        let options = CanonicalDataset::default().filter_options();
        assert!(options.countries.is_empty());
        assert!(options.min_date.is_none());
        assert!(options.max_date.is_none());
    }
}
