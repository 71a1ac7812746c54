//! Common utility functions for tax calculations.
//!
//! This module provides the rounding and clamping helpers shared by the
//! engine and by the layers that format its output.

use rust_decimal::Decimal;

/// Rounds a decimal value to one decimal place using half-up rounding.
///
/// Values at exactly 0.05 round away from zero, so `0.05` becomes `0.1`
/// and `-0.05` becomes `-0.1`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_to_one_decimal;
///
/// assert_eq!(round_to_one_decimal(dec!(123.44)), dec!(123.4));
/// assert_eq!(round_to_one_decimal(dec!(123.45)), dec!(123.5));
/// assert_eq!(round_to_one_decimal(dec!(-123.45)), dec!(-123.5)); // Away from zero
/// ```
pub fn round_to_one_decimal(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Formats a bracket boundary as a whole number, dropping any fraction
/// and trailing zeros (`150000.00` → `150000`).
pub fn whole_number(value: Decimal) -> Decimal {
    value.trunc().normalize()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_to_one_decimal tests
    // =========================================================================

    #[test]
    fn round_to_one_decimal_rounds_down_below_midpoint() {
        let result = round_to_one_decimal(dec!(123.44));

        assert_eq!(result, dec!(123.4));
    }

    #[test]
    fn round_to_one_decimal_rounds_up_at_midpoint() {
        let result = round_to_one_decimal(dec!(123.45));

        assert_eq!(result, dec!(123.5));
    }

    #[test]
    fn round_to_one_decimal_handles_negative_values() {
        let result = round_to_one_decimal(dec!(-123.45));

        assert_eq!(result, dec!(-123.5));
    }

    #[test]
    fn round_to_one_decimal_carries_into_integer_part() {
        let result = round_to_one_decimal(dec!(999999.96));

        assert_eq!(result, dec!(1000000.0));
    }

    #[test]
    fn round_to_one_decimal_handles_zero() {
        let result = round_to_one_decimal(dec!(0));

        assert_eq!(result, dec!(0));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
        assert_eq!(max(dec!(200.00), dec!(100.00)), dec!(200.00));
    }

    #[test]
    fn max_handles_equal_values() {
        assert_eq!(max(dec!(150.00), dec!(150.00)), dec!(150.00));
    }

    #[test]
    fn max_clamps_negative_to_zero() {
        assert_eq!(max(dec!(-50.00), Decimal::ZERO), Decimal::ZERO);
    }

    // =========================================================================
    // whole_number tests
    // =========================================================================

    #[test]
    fn whole_number_drops_fraction_and_scale() {
        assert_eq!(whole_number(dec!(150000.00)).to_string(), "150000");
        assert_eq!(whole_number(dec!(150001.75)).to_string(), "150001");
        assert_eq!(whole_number(dec!(0.00)).to_string(), "0");
    }
}
