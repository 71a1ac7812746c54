//! CSV loader for batch tax calculation.
//!
//! ## CSV Format
//!
//! The first line is a header and is not interpreted; columns are read by
//! position. Whitespace around values is ignored.
//!
//! | Position | Column        | Type    | Notes                              |
//! |----------|---------------|---------|------------------------------------|
//! | 0        | `totalIncome` | decimal | e.g. `500000.0`                    |
//! | 1        | `wht`         | decimal | tax already withheld               |
//! | 2        | `donation`    | decimal | claimed as a `donation` allowance  |
//!
//! ### Example
//!
//! ```csv
//! totalIncome,wht,donation
//! 500000.0,0.0,0.0
//! 600000.0,40000.0,20000.0
//! 750000.0,50000.0,15000.0
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;
use tax_core::models::{AllowanceDetail, AllowanceType, CalculationInput};

const COLUMNS: [&str; 3] = ["totalIncome", "wht", "donation"];

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The file is structurally invalid (e.g. a row with the wrong number
    /// of columns).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// The file has no header line.
    #[error("CSV file is empty")]
    Empty,

    /// A cell could not be read as a number. `row` is 1-based and does
    /// not count the header.
    #[error("invalid {column} '{value}' on row {row}")]
    InvalidNumber {
        column: &'static str,
        value: String,
        row: usize,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn parse_cell(
    record: &csv::StringRecord,
    position: usize,
    row_number: usize,
) -> Result<Decimal, CsvLoadError> {
    let value = record.get(position).unwrap_or_default();
    Decimal::from_str(value).map_err(|_| CsvLoadError::InvalidNumber {
        column: COLUMNS[position],
        value: value.to_string(),
        row: row_number,
    })
}

/// Convert a single CSV record into a CalculationInput.
fn convert_record(
    record: &csv::StringRecord,
    row_number: usize,
) -> Result<CalculationInput, CsvLoadError> {
    let total_income = parse_cell(record, 0, row_number)?;
    let withholding = parse_cell(record, 1, row_number)?;
    let donation = parse_cell(record, 2, row_number)?;

    Ok(CalculationInput::new(
        total_income,
        withholding,
        vec![AllowanceDetail::new(AllowanceType::Donation, donation)],
    ))
}

/// Parse CSV bytes and return one CalculationInput per data row, in file
/// order. Any bad row fails the whole file.
///
/// # Errors
///
/// * [CsvLoadError::Empty] if there is no header line.
/// * [CsvLoadError::Parse] if a row has a different column count than the
///   header.
/// * [CsvLoadError::InvalidNumber] if a cell is not a number.
pub fn load_from_bytes(input: &[u8]) -> Result<Vec<CalculationInput>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input);

    let headers = reader.headers()?;
    if headers.is_empty() {
        return Err(CsvLoadError::Empty);
    }
    if headers.len() != COLUMNS.len() {
        return Err(CsvLoadError::Parse(csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "expected {} columns ({}), found {}",
                COLUMNS.len(),
                COLUMNS.join(","),
                headers.len()
            ),
        ))));
    }

    reader
        .records()
        .enumerate()
        .map(|(idx, result)| {
            let record = result?;
            let row_number = idx + 1; // 1-based for user-facing messages
            convert_record(&record, row_number)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
