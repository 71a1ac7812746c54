use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AllowanceDetail;

/// Everything the engine needs from one taxpayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationInput {
    pub total_income: Decimal,
    pub withholding: Decimal,
    pub allowances: Vec<AllowanceDetail>,
}

impl CalculationInput {
    pub fn new(
        total_income: Decimal,
        withholding: Decimal,
        allowances: Vec<AllowanceDetail>,
    ) -> Self {
        Self {
            total_income,
            withholding,
            allowances,
        }
    }
}

/// One display row of the per-bracket breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketResult {
    pub label: String,
    pub tax: Decimal,
}

/// Full-precision engine output. Rounding happens where values leave the
/// process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculation {
    /// Income left after the personal and claimed allowances.
    pub taxable_income: Decimal,
    /// Tax before withholding is netted.
    pub tax: Decimal,
    pub brackets: Vec<BracketResult>,
    /// Tax still owed after withholding, never negative.
    pub net_tax: Decimal,
    /// Present only when withholding exceeded the tax.
    pub refund: Option<Decimal>,
}
