//! Progressive income tax calculation.
//!
//! # Pipeline
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Taxable base = total income - personal allowance ceiling (minimum 0) |
//! | 2    | Subtract every claimed allowance (minimum 0) |
//! | 3    | Tax = base × percent of the bracket containing the base |
//! | 4    | Breakdown: the whole tax is shown against the bracket whose bounds hold the tax amount |
//! | 5    | Net tax = tax - withholding; a negative result becomes a refund |
//!
//! A base above the highest bracket boundary is taxed at the top bracket's
//! percent over the whole base. The engine keeps full precision; callers round
//! with [`round_to_one_decimal`](crate::calculations::common::round_to_one_decimal)
//! when they present values.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::TaxEngine;
//! use tax_core::{AllowanceDetail, AllowanceType, CalculationInput, TaxBracket};
//!
//! let brackets = vec![
//!     TaxBracket::new(dec!(0), dec!(150000), dec!(0)),
//!     TaxBracket::new(dec!(150001), dec!(500000), dec!(10)),
//!     TaxBracket::new(dec!(500001), dec!(500001), dec!(15)),
//! ];
//!
//! let input = CalculationInput::new(
//!     dec!(500000),
//!     dec!(50000),
//!     vec![
//!         AllowanceDetail::new(AllowanceType::Donation, dec!(10000)),
//!         AllowanceDetail::new(AllowanceType::KReceipt, dec!(20000)),
//!     ],
//! );
//!
//! let engine = TaxEngine::new(&brackets, dec!(60000));
//! let result = engine.calculate(&input).unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(410000));
//! assert_eq!(result.tax, dec!(41000));
//! assert_eq!(result.net_tax, dec!(0));
//! assert_eq!(result.refund, Some(dec!(9000)));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::common::{max, whole_number};
use crate::models::{AllowanceDetail, BracketResult, CalculationInput, TaxBracket, TaxCalculation};

/// Errors raised when the configured brackets cannot serve a calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// No tax brackets were provided for the calculation.
    #[error("no tax brackets configured")]
    NoTaxBrackets,

    /// No tax bracket covers the given taxable income.
    #[error("no tax bracket found for taxable income {0}")]
    NoMatchingBracket(Decimal),

    /// An intermediate amount does not fit in a `Decimal`.
    #[error("amount is too large to calculate")]
    Overflow,
}

/// Calculator over a fixed bracket table and personal allowance ceiling.
#[derive(Debug, Clone)]
pub struct TaxEngine<'a> {
    tax_brackets: &'a [TaxBracket],
    personal_allowance: Decimal,
}

impl<'a> TaxEngine<'a> {
    /// Creates an engine over `tax_brackets`, which should be sorted by
    /// `min_income` ascending. `personal_allowance` is the configured maximum
    /// of the personal allowance, deducted from every taxpayer.
    pub fn new(
        tax_brackets: &'a [TaxBracket],
        personal_allowance: Decimal,
    ) -> Self {
        Self {
            tax_brackets,
            personal_allowance,
        }
    }

    /// Runs the full pipeline for one taxpayer.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if no brackets are configured, none covers
    /// the taxable base, or an amount overflows.
    pub fn calculate(
        &self,
        input: &CalculationInput,
    ) -> Result<TaxCalculation, EngineError> {
        let top = self.top_bracket()?;

        let after_personal = self.apply_personal_allowance(input.total_income)?;
        let taxable_income = self.apply_allowances(after_personal, &input.allowances)?;

        let tax = self.calculate_tax(taxable_income, top)?;
        let brackets = self.breakdown(tax, top.max_income);
        let (net_tax, refund) = self.net_of_withholding(tax, input.withholding)?;

        Ok(TaxCalculation {
            taxable_income,
            tax,
            brackets,
            net_tax,
            refund,
        })
    }

    /// The bracket with the globally highest `max_income`.
    fn top_bracket(&self) -> Result<&'a TaxBracket, EngineError> {
        self.tax_brackets
            .iter()
            .max_by(|a, b| a.max_income.cmp(&b.max_income))
            .ok_or(EngineError::NoTaxBrackets)
    }

    fn apply_personal_allowance(
        &self,
        total_income: Decimal,
    ) -> Result<Decimal, EngineError> {
        let remaining = total_income
            .checked_sub(self.personal_allowance)
            .ok_or(EngineError::Overflow)?;
        Ok(max(remaining, Decimal::ZERO))
    }

    /// Subtracts every claimed allowance; clamps once at the end.
    fn apply_allowances(
        &self,
        income: Decimal,
        allowances: &[AllowanceDetail],
    ) -> Result<Decimal, EngineError> {
        let remaining = allowances.iter().try_fold(income, |acc, allowance| {
            acc.checked_sub(allowance.amount)
                .ok_or(EngineError::Overflow)
        })?;
        Ok(max(remaining, Decimal::ZERO))
    }

    fn calculate_tax(
        &self,
        taxable_income: Decimal,
        top: &TaxBracket,
    ) -> Result<Decimal, EngineError> {
        if taxable_income > top.max_income {
            return self.apply_percent(taxable_income, top.percent);
        }

        let bracket = self
            .tax_brackets
            .iter()
            .find(|b| b.contains(taxable_income))
            .ok_or(EngineError::NoMatchingBracket(taxable_income))?;

        self.apply_percent(taxable_income, bracket.percent)
    }

    fn apply_percent(
        &self,
        income: Decimal,
        percent: Decimal,
    ) -> Result<Decimal, EngineError> {
        income
            .checked_mul(percent)
            .and_then(|amount| amount.checked_div(Decimal::ONE_HUNDRED))
            .ok_or(EngineError::Overflow)
    }

    /// One row per bracket. The tax amount itself is placed against the
    /// bracket whose bounds hold it (or the sentinel when it reaches the
    /// sentinel's max); every other row reports zero.
    fn breakdown(
        &self,
        tax: Decimal,
        top_max_income: Decimal,
    ) -> Vec<BracketResult> {
        self.tax_brackets
            .iter()
            .map(|bracket| {
                let holds_tax = bracket.contains(tax)
                    || (bracket.is_open_ended() && tax >= bracket.max_income);

                BracketResult {
                    label: self.label(bracket, top_max_income),
                    tax: if holds_tax { tax } else { Decimal::ZERO },
                }
            })
            .collect()
    }

    fn label(
        &self,
        bracket: &TaxBracket,
        top_max_income: Decimal,
    ) -> String {
        if bracket.min_income == top_max_income {
            format!("{} and above", whole_number(bracket.min_income))
        } else {
            format!(
                "{}-{}",
                whole_number(bracket.min_income),
                whole_number(bracket.max_income)
            )
        }
    }

    /// Returns `(net_tax, refund)`.
    fn net_of_withholding(
        &self,
        tax: Decimal,
        withholding: Decimal,
    ) -> Result<(Decimal, Option<Decimal>), EngineError> {
        let net = tax.checked_sub(withholding).ok_or(EngineError::Overflow)?;
        if net < Decimal::ZERO {
            Ok((Decimal::ZERO, Some(-net)))
        } else {
            Ok((net, None))
        }
    }
}
