//! Shared helpers for the Modelo 210 calculators: financial rounding and
//! the euro formatting used in audit formula strings.

use rust_decimal::Decimal;

/// Rounds a monetary value to two decimal places, half up.
///
/// Values at exactly 0.005 round away from zero, the convention used on
/// every derived amount in the declaration paperwork.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use m210_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(313.494)), dec!(313.49));
/// assert_eq!(round_half_up(dec!(313.495)), dec!(313.50));
/// assert_eq!(round_half_up(dec!(-313.495)), dec!(-313.50));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to four decimal places, half up.
///
/// Used for the reported construction percentage and the stored
/// imputation percentage, which persist at 4-decimal precision.
pub fn round_dp4(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(4, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Formats a monetary value the way the declaration paperwork prints
/// euros (es-ES): comma decimal separator, point thousands separator,
/// trailing `€`.
///
/// Matching es-ES convention, the thousands separator only appears once
/// the integer part exceeds four digits, so `1650` prints as `1650,00 €`
/// while `16500` prints as `16.500,00 €`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use m210_core::calculations::common::format_euros;
///
/// assert_eq!(format_euros(dec!(1650)), "1650,00 €");
/// assert_eq!(format_euros(dec!(16500.5)), "16.500,50 €");
/// assert_eq!(format_euros(dec!(1234567.891)), "1.234.567,89 €");
/// assert_eq!(format_euros(dec!(-313.495)), "-313,50 €");
/// ```
pub fn format_euros(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    if int_part.len() > 4 {
        for (i, digit) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }
    } else {
        grouped.push_str(int_part);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{frac_part} €")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(187.394)), dec!(187.39));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(187.395)), dec!(187.40));
    }

    #[test]
    fn round_half_up_rounds_negative_away_from_zero() {
        assert_eq!(round_half_up(dec!(-187.395)), dec!(-187.40));
    }

    #[test]
    fn round_half_up_preserves_rounded_values() {
        assert_eq!(round_half_up(dec!(187.39)), dec!(187.39));
    }

    // =========================================================================
    // round_dp4 tests
    // =========================================================================

    #[test]
    fn round_dp4_keeps_four_decimals() {
        assert_eq!(round_dp4(dec!(0.69995)), dec!(0.7000));
    }

    #[test]
    fn round_dp4_truncates_longer_fractions() {
        assert_eq!(round_dp4(dec!(0.12344999)), dec!(0.1234));
    }

    // =========================================================================
    // format_euros tests
    // =========================================================================

    #[test]
    fn format_euros_uses_comma_decimal_separator() {
        assert_eq!(format_euros(dec!(313.5)), "313,50 €");
    }

    #[test]
    fn format_euros_skips_grouping_below_five_digits() {
        assert_eq!(format_euros(dec!(1650)), "1650,00 €");
    }

    #[test]
    fn format_euros_groups_from_five_digits_up() {
        assert_eq!(format_euros(dec!(16500)), "16.500,00 €");
    }

    #[test]
    fn format_euros_groups_every_three_digits() {
        assert_eq!(format_euros(dec!(150000)), "150.000,00 €");
        assert_eq!(format_euros(dec!(1234567.891)), "1.234.567,89 €");
    }

    #[test]
    fn format_euros_rounds_before_formatting() {
        assert_eq!(format_euros(dec!(986.30136)), "986,30 €");
    }

    #[test]
    fn format_euros_handles_zero() {
        assert_eq!(format_euros(dec!(0)), "0,00 €");
    }

    #[test]
    fn format_euros_prefixes_negative_sign() {
        assert_eq!(format_euros(dec!(-16500)), "-16.500,00 €");
    }
}
