//! Input rules checked before the engine or the store is touched.
//!
//! Every check is a pure function; the first failing rule wins.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{AllowanceBound, AllowanceDetail, AllowanceType};

/// Upper limit an administrator may set for any allowance maximum.
pub const MAX_DEDUCTION_AMOUNT: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("total income must be greater than zero")]
    IncomeNotPositive,

    #[error("wht must be between 0 and total income")]
    WithholdingOutOfRange,

    #[error("invalid allowance type: {0}")]
    InvalidAllowanceType(AllowanceType),

    #[error("{allowance_type} amount must be between {min:.1} and {max:.1}")]
    AllowanceOutOfRange {
        allowance_type: AllowanceType,
        min: Decimal,
        max: Decimal,
    },

    #[error("{0} deduction cannot be adjusted")]
    DeductionNotAdjustable(AllowanceType),

    #[error("amount must not be negative")]
    DeductionNegative,

    #[error("amount must not be greater than 100000")]
    DeductionTooLarge,

    #[error("{allowance_type} amount must not be less than {min:.1}")]
    DeductionBelowMinimum {
        allowance_type: AllowanceType,
        min: Decimal,
    },
}

pub fn validate_income(
    total_income: Decimal,
    withholding: Decimal,
) -> Result<(), ValidationError> {
    if total_income <= Decimal::ZERO {
        return Err(ValidationError::IncomeNotPositive);
    }
    if withholding < Decimal::ZERO || withholding > total_income {
        return Err(ValidationError::WithholdingOutOfRange);
    }
    Ok(())
}

/// Rejects allowance types a request may not claim.
pub fn validate_allowance_type(allowance_type: AllowanceType) -> Result<(), ValidationError> {
    if allowance_type.is_claimable() {
        Ok(())
    } else {
        Err(ValidationError::InvalidAllowanceType(allowance_type))
    }
}

/// Checks a claimed allowance against the stored bound for its type.
///
/// `bound` must be the bound for `detail.allowance_type`.
pub fn validate_allowance(
    detail: &AllowanceDetail,
    bound: &AllowanceBound,
) -> Result<(), ValidationError> {
    validate_allowance_type(detail.allowance_type)?;

    if bound.contains(detail.amount) {
        Ok(())
    } else {
        Err(ValidationError::AllowanceOutOfRange {
            allowance_type: detail.allowance_type,
            min: bound.min_amount,
            max: bound.max_amount,
        })
    }
}

/// Checks an administrator's new maximum before the store is touched.
pub fn validate_deduction(
    allowance_type: AllowanceType,
    amount: Decimal,
) -> Result<(), ValidationError> {
    if !allowance_type.is_adjustable() {
        return Err(ValidationError::DeductionNotAdjustable(allowance_type));
    }
    if amount < Decimal::ZERO {
        return Err(ValidationError::DeductionNegative);
    }
    if amount > MAX_DEDUCTION_AMOUNT {
        return Err(ValidationError::DeductionTooLarge);
    }
    Ok(())
}
