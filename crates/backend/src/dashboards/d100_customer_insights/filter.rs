use contracts::dashboards::d100_customer_insights::{DashboardRequest, FilterCriteria};
use contracts::domain::a001_retail_transaction::Transaction;

use crate::domain::a001_retail_transaction::CanonicalDataset;

/// Rows of the canonical dataset matching one [`FilterCriteria`].
#[derive(Debug, Clone, Default)]
pub struct FilteredDataset<'a> {
    rows: Vec<&'a Transaction>,
}

impl<'a> FilteredDataset<'a> {
    pub fn rows(&self) -> &[&'a Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.rows.iter().copied()
    }
}

/// Same country and invoice day within `date_from..=date_to`.
///
/// A range with `date_from > date_to` matches nothing.
pub fn matches(transaction: &Transaction, criteria: &FilterCriteria) -> bool {
    transaction.country == criteria.country
        && (criteria.date_from..=criteria.date_to).contains(&transaction.invoice_day())
}

pub fn apply_filter<'a>(
    canonical: &'a CanonicalDataset,
    criteria: &FilterCriteria,
) -> FilteredDataset<'a> {
    FilteredDataset {
        rows: canonical
            .rows()
            .iter()
            .filter(|t| matches(t, criteria))
            .collect(),
    }
}

/// Fill fields missing from the request: first country in the dataset and
/// its full date range. `None` when a default is needed but the dataset is empty.
pub fn resolve_criteria(
    canonical: &CanonicalDataset,
    request: &DashboardRequest,
) -> Option<FilterCriteria> {
    let country = match &request.country {
        Some(country) => country.clone(),
        None => canonical.rows().first()?.country.clone(),
    };

    let bounds = canonical.date_bounds();
    let date_from = request.date_from.or(bounds.map(|(min, _)| min))?;
    let date_to = request.date_to.or(bounds.map(|(_, max)| max))?;

    Some(FilterCriteria {
        country,
        date_from,
        date_to,
    })
}
