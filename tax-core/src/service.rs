//! Application façade: validation, configuration lookup and the engine
//! wired together over a [`TaxRepository`].

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use crate::calculations::{EngineError, TaxEngine};
use crate::db::{RepositoryError, TaxRepository};
use crate::models::{AllowanceBound, AllowanceType, CalculationInput, TaxBracket, TaxCalculation};
use crate::validation::{self, ValidationError};

#[derive(Debug, Error)]
pub enum TaxError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A batch row failed validation; rows are numbered from 1.
    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: ValidationError,
    },

    #[error("{0} allowance is not configured")]
    MissingAllowance(AllowanceType),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl TaxError {
    /// Whether the caller supplied bad input, as opposed to the service
    /// being misconfigured or the store failing.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidRow { .. } | Self::Engine(EngineError::Overflow)
        )
    }
}

/// Allowance bounds and brackets as loaded for one request.
struct TaxConfig {
    bounds: Vec<AllowanceBound>,
    brackets: Vec<TaxBracket>,
}

impl TaxConfig {
    fn bound(
        &self,
        allowance_type: AllowanceType,
    ) -> Result<&AllowanceBound, TaxError> {
        self.bounds
            .iter()
            .find(|b| b.allowance_type == allowance_type)
            .ok_or(TaxError::MissingAllowance(allowance_type))
    }
}

#[derive(Clone)]
pub struct TaxService {
    repo: Arc<dyn TaxRepository>,
}

impl TaxService {
    pub fn new(repo: Arc<dyn TaxRepository>) -> Self {
        Self { repo }
    }

    /// Validates and calculates a single request.
    pub async fn calculate(
        &self,
        input: &CalculationInput,
    ) -> Result<TaxCalculation, TaxError> {
        validation::validate_income(input.total_income, input.withholding)?;

        let config = self.load_config().await?;
        Self::validate_allowances(input, &config)?;

        self.run(input, &config)
    }

    /// Validates every row before calculating any of them, so a single bad
    /// row fails the whole batch.
    pub async fn calculate_batch(
        &self,
        inputs: &[CalculationInput],
    ) -> Result<Vec<TaxCalculation>, TaxError> {
        for (index, input) in inputs.iter().enumerate() {
            validation::validate_income(input.total_income, input.withholding)
                .map_err(|source| Self::invalid_row(index, source))?;
        }

        let config = self.load_config().await?;

        for (index, input) in inputs.iter().enumerate() {
            Self::validate_allowances(input, &config).map_err(|err| match err {
                TaxError::Validation(source) => Self::invalid_row(index, source),
                other => other,
            })?;
        }

        let results = inputs
            .iter()
            .map(|input| self.run(input, &config))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(rows = results.len(), "calculated batch");
        Ok(results)
    }

    /// Moves the max amount of an adjustable allowance and returns the
    /// stored value.
    pub async fn set_deduction(
        &self,
        allowance_type: AllowanceType,
        amount: Decimal,
    ) -> Result<Decimal, TaxError> {
        validation::validate_deduction(allowance_type, amount)?;

        let stored = self
            .repo
            .set_max_allowance(allowance_type, amount)
            .await
            .map_err(|err| match err {
                RepositoryError::BelowMinimum {
                    allowance_type,
                    min,
                    ..
                } => TaxError::Validation(ValidationError::DeductionBelowMinimum {
                    allowance_type,
                    min,
                }),
                RepositoryError::NotFound => TaxError::MissingAllowance(allowance_type),
                other => TaxError::Repository(other),
            })?;

        info!(%allowance_type, max_amount = %stored, "updated allowance max amount");
        Ok(stored)
    }

    async fn load_config(&self) -> Result<TaxConfig, TaxError> {
        let bounds = self.repo.list_allowance_bounds().await?;
        let brackets = self.repo.get_tax_brackets().await?;
        Ok(TaxConfig { bounds, brackets })
    }

    fn invalid_row(
        index: usize,
        source: ValidationError,
    ) -> TaxError {
        TaxError::InvalidRow {
            row: index + 1,
            source,
        }
    }

    fn validate_allowances(
        input: &CalculationInput,
        config: &TaxConfig,
    ) -> Result<(), TaxError> {
        for detail in &input.allowances {
            validation::validate_allowance_type(detail.allowance_type)?;
            let bound = config.bound(detail.allowance_type)?;
            validation::validate_allowance(detail, bound)?;
        }
        Ok(())
    }

    fn run(
        &self,
        input: &CalculationInput,
        config: &TaxConfig,
    ) -> Result<TaxCalculation, TaxError> {
        let personal = config.bound(AllowanceType::Personal)?;
        let engine = TaxEngine::new(&config.brackets, personal.max_amount);
        let result = engine.calculate(input)?;

        debug!(
            total_income = %input.total_income,
            taxable_income = %result.taxable_income,
            tax = %result.tax,
            "calculated tax"
        );
        Ok(result)
    }
}
