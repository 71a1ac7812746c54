use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One progressive income band.
///
/// The top band is stored with `min_income == max_income` and stands for
/// "`min_income` and above".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Decimal,
    /// Whole-number percentage, e.g. `10` for 10%.
    pub percent: Decimal,
}

impl TaxBracket {
    pub fn new(
        min_income: Decimal,
        max_income: Decimal,
        percent: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            percent,
        }
    }

    pub fn is_open_ended(&self) -> bool {
        self.min_income == self.max_income
    }

    /// Inclusive on both ends.
    pub fn contains(
        &self,
        income: Decimal,
    ) -> bool {
        income >= self.min_income && income <= self.max_income
    }
}
