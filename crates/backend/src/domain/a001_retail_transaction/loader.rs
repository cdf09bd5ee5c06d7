use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use contracts::domain::a001_retail_transaction::{
    Transaction, COLUMN_QUANTITY, COLUMN_UNIT_PRICE, REQUIRED_COLUMNS,
};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::dataset::CanonicalDataset;
use super::error::{DataLoadError, DateParseError};

/// InvoiceDate formats tried in order. `%.f` also matches a missing fraction.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only values are taken at midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Cell values treated as a missing CustomerID.
const NULL_MARKERS: &[&str] = &["", "nan", "na", "n/a", "null", "none"];

/// Load and clean a dataset file. The format is picked by extension.
///
/// Steps, in order: read rows, drop exact duplicates, drop rows without a
/// customer, parse InvoiceDate (one bad value rejects the whole file),
/// derive `total_price`.
pub fn load_canonical(path: impl AsRef<Path>) -> Result<CanonicalDataset, DataLoadError> {
    let path = path.as_ref();
    let started_at = std::time::Instant::now();

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let raw = match extension.as_str() {
        "csv" => read_csv(File::open(path)?)?,
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_spreadsheet(path)?,
        _ => return Err(DataLoadError::UnsupportedFormat(extension)),
    };

    let dataset = clean(raw)?;

    tracing::info!(
        "Dataset loaded from {}: rows={}, elapsed_ms={}",
        path.display(),
        dataset.len(),
        started_at.elapsed().as_millis()
    );

    Ok(dataset)
}

/// Same as [`load_canonical`] for CSV content that is already open.
pub fn load_canonical_from_csv<R: Read>(reader: R) -> Result<CanonicalDataset, DataLoadError> {
    clean(read_csv(reader)?)
}

/// A source row before cleaning.
#[derive(Debug, Clone)]
struct RawRecord {
    /// 1-based, header included
    source_row: usize,
    invoice_no: String,
    description: String,
    quantity: i64,
    unit_price: f64,
    /// Raw text kept when it does not parse; reported only if the row survives cleaning
    invoice_date: Result<NaiveDateTime, String>,
    customer_id: Option<String>,
    country: String,
}

/// Full-row identity used for duplicate detection; the row number is not part of it.
#[derive(PartialEq, Eq, Hash)]
struct RowKey<'a> {
    invoice_no: &'a str,
    description: &'a str,
    quantity: i64,
    unit_price: u64,
    invoice_date: Result<NaiveDateTime, &'a str>,
    customer_id: Option<&'a str>,
    country: &'a str,
}

impl RawRecord {
    fn key(&self) -> RowKey<'_> {
        RowKey {
            invoice_no: &self.invoice_no,
            description: &self.description,
            quantity: self.quantity,
            // 0.0 and -0.0 compare equal
            unit_price: if self.unit_price == 0.0 {
                0
            } else {
                self.unit_price.to_bits()
            },
            invoice_date: self.invoice_date.as_ref().copied().map_err(String::as_str),
            customer_id: self.customer_id.as_deref(),
            country: &self.country,
        }
    }
}

/// Position of each required column in the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    invoice_no: usize,
    description: usize,
    quantity: usize,
    unit_price: usize,
    invoice_date: usize,
    customer_id: usize,
    country: usize,
}

impl ColumnIndex {
    /// Header lookup is case-insensitive; unknown columns are ignored.
    fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, DataLoadError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| {
                    h.as_ref()
                        .trim_start_matches('\u{FEFF}')
                        .trim()
                        .eq_ignore_ascii_case(name)
                })
                .ok_or(DataLoadError::MissingColumn(name))
        };

        let mut idx = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = find(name)?;
        }
        let [invoice_no, description, quantity, unit_price, invoice_date, customer_id, country] =
            idx;

        Ok(Self {
            invoice_no,
            description,
            quantity,
            unit_price,
            invoice_date,
            customer_id,
            country,
        })
    }
}

fn read_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let source_row = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);
        records.push(parse_row(source_row, &columns, |i| record.get(i))?);
    }

    Ok(records)
}

/// First worksheet only; its first row is the header.
fn read_spreadsheet(path: &Path) -> Result<Vec<RawRecord>, DataLoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DataLoadError::NoWorksheet)??;

    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for (idx, row) in rows.enumerate() {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        let source_row = first_row + idx + 2;
        records.push(parse_row(source_row, &columns, |i| {
            cells.get(i).map(String::as_str)
        })?);
    }

    Ok(records)
}

/// Text form of a spreadsheet cell, matching what a CSV export would hold.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        // Whole floats (CustomerID 17850.0, Quantity 6.0) lose the fraction
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        other => other.to_string(),
    }
}

fn parse_row<'r>(
    source_row: usize,
    columns: &ColumnIndex,
    cell: impl Fn(usize) -> Option<&'r str>,
) -> Result<RawRecord, DataLoadError> {
    let text = |idx: usize| cell(idx).map(str::trim).unwrap_or("");

    let quantity_text = text(columns.quantity);
    let quantity = parse_quantity(quantity_text).ok_or_else(|| DataLoadError::InvalidValue {
        row: source_row,
        column: COLUMN_QUANTITY,
        value: quantity_text.to_string(),
    })?;

    let price_text = text(columns.unit_price);
    let unit_price = parse_price(price_text).ok_or_else(|| DataLoadError::InvalidValue {
        row: source_row,
        column: COLUMN_UNIT_PRICE,
        value: price_text.to_string(),
    })?;

    let date_text = text(columns.invoice_date);
    let invoice_date = parse_invoice_date(date_text).ok_or_else(|| date_text.to_string());

    Ok(RawRecord {
        source_row,
        invoice_no: text(columns.invoice_no).to_string(),
        description: text(columns.description).to_string(),
        quantity,
        unit_price,
        invoice_date,
        customer_id: normalize_customer_id(text(columns.customer_id)),
        country: text(columns.country).to_string(),
    })
}

fn clean(raw: Vec<RawRecord>) -> Result<CanonicalDataset, DataLoadError> {
    let total = raw.len();

    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<&RawRecord> = raw.iter().filter(|&r| seen.insert(r.key())).collect();
    let duplicates = total - unique.len();

    let with_customer: Vec<(&RawRecord, &str)> = unique
        .into_iter()
        .filter_map(|r| r.customer_id.as_deref().map(|customer| (r, customer)))
        .collect();
    let missing_customer = total - duplicates - with_customer.len();

    let rows = with_customer
        .into_iter()
        .map(|(r, customer)| {
            let invoice_date = match &r.invoice_date {
                Ok(parsed) => *parsed,
                Err(value) => {
                    return Err(DataLoadError::DateParse(DateParseError {
                        row: r.source_row,
                        value: value.clone(),
                    }))
                }
            };
            Ok(Transaction::new(
                r.invoice_no.as_str(),
                r.description.as_str(),
                r.quantity,
                r.unit_price,
                invoice_date,
                customer,
                r.country.as_str(),
            ))
        })
        .collect::<Result<Vec<_>, DataLoadError>>()?;

    tracing::info!(
        "Dataset cleaned: raw={}, duplicates_dropped={}, missing_customer_dropped={}, kept={}",
        total,
        duplicates,
        missing_customer,
        rows.len()
    );

    Ok(CanonicalDataset::new(rows))
}

fn parse_quantity(s: &str) -> Option<i64> {
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

fn parse_price(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// `None` for null markers; `17850.0` becomes `17850` so float exports match.
fn normalize_customer_id(s: &str) -> Option<String> {
    if NULL_MARKERS.iter().any(|m| s.eq_ignore_ascii_case(m)) {
        return None;
    }
    if s.contains('.') {
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() && f.fract() == 0.0 {
                return Some((f as i64).to_string());
            }
        }
    }
    Some(s.to_string())
}

fn parse_invoice_date(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
