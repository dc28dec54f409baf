//! Number formatting for the dashboard.
//!
//! Currency renders as `$#,##0.00`, margins as `0.00%` and deltas as a
//! signed percentage. Rounding is half away from zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats `value` as `$1,234.50` (negative: `-$1,234.50`).
pub fn format_currency(value: Decimal) -> String {
    let (negative, digits) = two_places(value);
    format!("{}${}", if negative { "-" } else { "" }, digits)
}

/// Formats a percentage value as `6.67%`.
pub fn format_percent(value: Decimal) -> String {
    let (negative, digits) = two_places(value);
    format!("{}{}%", if negative { "-" } else { "" }, digits)
}

/// Formats a percentage difference with an explicit sign: `+1.25%`, `-3.40%`.
pub fn format_signed_percent(value: Decimal) -> String {
    let (negative, digits) = two_places(value);
    format!("{}{}%", if negative { "-" } else { "+" }, digits)
}

/// A text bar proportional to `|value| / max`, at most `width` cells wide.
/// Negative values are drawn with a lighter shade.
pub fn bar(value: Decimal, max: Decimal, width: usize) -> String {
    if max <= Decimal::ZERO || width == 0 {
        return String::new();
    }

    let ratio = value
        .abs()
        .checked_div(max)
        .unwrap_or(Decimal::ONE)
        .min(Decimal::ONE);
    let cells = (ratio * Decimal::from(width))
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);

    let glyph = if value.is_sign_negative() { "░" } else { "█" };
    glyph.repeat(cells)
}

/// Largest absolute value in `values`, used to scale bars.
pub fn max_abs(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .map(|v| v.abs())
        .max()
        .unwrap_or(Decimal::ZERO)
}

/// Rounds to two places and returns the sign plus grouped digits, e.g. `1,234.50`.
fn two_places(value: Decimal) -> (bool, String) {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    rounded = rounded.abs();
    rounded.rescale(2);

    let text = rounded.to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    (negative, format!("{}.{}", group_thousands(int_part), frac_part))
}

fn group_thousands(digits: &str) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(150)), "$150.00");
        assert_eq!(format_currency(dec!(1234.5)), "$1,234.50");
        assert_eq!(format_currency(dec!(2297200.8603)), "$2,297,200.86");
        assert_eq!(format_currency(dec!(-10)), "-$10.00");
        assert_eq!(format_currency(dec!(-383.031)), "-$383.03");
        assert_eq!(format_currency(dec!(0.005)), "$0.01");
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn test_format_percent() {
        let margin = dec!(10) / dec!(150) * dec!(100);
        assert_eq!(format_percent(margin), "6.67%");
        assert_eq!(format_percent(dec!(-20)), "-20.00%");
        assert_eq!(format_percent(Decimal::ZERO), "0.00%");
        assert!(format_percent(Decimal::MAX).starts_with("79,228,162,514"));
    }

    #[test]
    fn test_format_signed_percent() {
        assert_eq!(format_signed_percent(dec!(1.254)), "+1.25%");
        assert_eq!(format_signed_percent(dec!(-3.4)), "-3.40%");
        assert_eq!(format_signed_percent(Decimal::ZERO), "+0.00%");
        // Rounds to zero: no negative zero.
        assert_eq!(format_signed_percent(dec!(-0.001)), "+0.00%");
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(dec!(50), dec!(100), 10), "█████");
        assert_eq!(bar(dec!(100), dec!(100), 10), "██████████");
        assert_eq!(bar(dec!(-25), dec!(100), 8), "░░");
        assert_eq!(bar(dec!(10), Decimal::ZERO, 10), "");
        assert_eq!(bar(Decimal::MAX, Decimal::new(1, 28), 4), "████");
    }

    #[test]
    fn test_max_abs() {
        assert_eq!(max_abs(vec![dec!(3), dec!(-7), dec!(5)]), dec!(7));
        assert_eq!(max_abs(Vec::new()), Decimal::ZERO);
    }
}
