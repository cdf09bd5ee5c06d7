use std::io;
use thiserror::Error;

/// An InvoiceDate value that none of the accepted formats understands.
///
/// `row` is the 1-based row number in the source sheet, header included.
#[derive(Debug, Error)]
#[error("row {row}: cannot parse InvoiceDate '{value}'")]
pub struct DateParseError {
    pub row: usize,
    pub value: String,
}

/// Ошибки загрузки датасета. Любая из них прерывает загрузку целиком.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read dataset: {0}")]
    Io(#[from] io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("workbook contains no worksheets")]
    NoWorksheet,

    #[error("unsupported dataset format '{0}' (expected csv, xlsx, xlsm, xls or ods)")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: invalid {column} value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error(transparent)]
    DateParse(#[from] DateParseError),
}
