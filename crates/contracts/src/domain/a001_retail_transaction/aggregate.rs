use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Names of the source columns, in the order the export file lists them.
pub const COLUMN_INVOICE_NO: &str = "InvoiceNo";
pub const COLUMN_DESCRIPTION: &str = "Description";
pub const COLUMN_QUANTITY: &str = "Quantity";
pub const COLUMN_UNIT_PRICE: &str = "UnitPrice";
pub const COLUMN_INVOICE_DATE: &str = "InvoiceDate";
pub const COLUMN_CUSTOMER_ID: &str = "CustomerID";
pub const COLUMN_COUNTRY: &str = "Country";

pub const REQUIRED_COLUMNS: [&str; 7] = [
    COLUMN_INVOICE_NO,
    COLUMN_DESCRIPTION,
    COLUMN_QUANTITY,
    COLUMN_UNIT_PRICE,
    COLUMN_INVOICE_DATE,
    COLUMN_CUSTOMER_ID,
    COLUMN_COUNTRY,
];

/// One cleaned transaction line of the canonical dataset.
///
/// `customer_id` is always present here: rows without a customer are
/// dropped during loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub invoice_no: String,
    pub description: String,
    /// Negative for returns.
    pub quantity: i64,
    pub unit_price: f64,
    pub invoice_date: NaiveDateTime,
    pub customer_id: String,
    pub country: String,
    /// `quantity * unit_price`
    pub total_price: f64,
}

impl Transaction {
    pub fn new(
        invoice_no: impl Into<String>,
        description: impl Into<String>,
        quantity: i64,
        unit_price: f64,
        invoice_date: NaiveDateTime,
        customer_id: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            invoice_no: invoice_no.into(),
            description: description.into(),
            quantity,
            unit_price,
            invoice_date,
            customer_id: customer_id.into(),
            country: country.into(),
            total_price: quantity as f64 * unit_price,
        }
    }

    /// Calendar day of the invoice.
    pub fn invoice_day(&self) -> NaiveDate {
        self.invoice_date.date()
    }
}
