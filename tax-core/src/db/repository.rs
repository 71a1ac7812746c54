use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{AllowanceBound, AllowanceType, TaxBracket};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A write that would break a stored invariant. Nothing is persisted.
    #[error("{allowance_type} max amount {requested} is below its min amount {min}")]
    BelowMinimum {
        allowance_type: AllowanceType,
        requested: Decimal,
        min: Decimal,
    },
}

#[async_trait]
pub trait TaxRepository: Send + Sync {
    // Allowance bounds, in insertion order
    async fn list_allowance_bounds(&self) -> Result<Vec<AllowanceBound>, RepositoryError>;

    /// Overwrites the max amount of `allowance_type` as one atomic
    /// read-modify-write and returns the stored value.
    async fn set_max_allowance(
        &self,
        allowance_type: AllowanceType,
        max_amount: Decimal,
    ) -> Result<Decimal, RepositoryError>;

    // Tax brackets, ordered by min income ascending
    async fn get_tax_brackets(&self) -> Result<Vec<TaxBracket>, RepositoryError>;
}
