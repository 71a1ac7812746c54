//! Column readers for SQLite rows.
//!
//! Money columns are declared `REAL`, but SQLite keeps whole numbers written
//! as integer literals (seed files, manual edits) as `INTEGER`, so both
//! storage classes are accepted.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};
use tax_core::{AllowanceType, RepositoryError};

/// Read a NOT NULL money column as a [`Decimal`].
pub fn get_decimal(
    row: &SqliteRow,
    column: &str,
) -> Result<Decimal, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("Column '{}' not found: {}", column, e)))?;

    // The reported type is the declared one, so a NULL in a REAL column
    // would otherwise decode as 0.
    if value_ref.is_null() {
        return Err(RepositoryError::Database(format!(
            "Column '{}' is NULL",
            column
        )));
    }

    let type_info = value_ref.type_info();
    let type_name = type_info.name();

    match type_name {
        "INTEGER" => {
            let val: i64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!(
                    "Failed to get INTEGER from '{}': {}",
                    column, e
                ))
            })?;
            Ok(Decimal::from(val))
        }
        "REAL" => {
            let val: f64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Failed to get REAL from '{}': {}", column, e))
            })?;
            Decimal::try_from(val).map_err(|e| {
                RepositoryError::Database(format!("Failed to convert {} to Decimal: {}", val, e))
            })
        }
        _ => Err(RepositoryError::Database(format!(
            "Unexpected type '{}' for column '{}'",
            type_name, column
        ))),
    }
}

/// Read a stored allowance code such as `k-receipt`.
pub fn get_allowance_type(
    row: &SqliteRow,
    column: &str,
) -> Result<AllowanceType, RepositoryError> {
    let code: String = row
        .try_get(column)
        .map_err(|e| RepositoryError::Database(format!("Failed to get TEXT from '{}': {}", column, e)))?;

    AllowanceType::parse(&code).ok_or_else(|| {
        RepositoryError::Database(format!("Unknown allowance type '{}' in '{}'", code, column))
    })
}

/// Convert a Decimal to f64 for a `REAL` column.
pub fn decimal_to_f64(d: Decimal) -> Result<f64, RepositoryError> {
    d.to_f64()
        .ok_or_else(|| RepositoryError::Database(format!("Cannot store {} as REAL", d)))
}
