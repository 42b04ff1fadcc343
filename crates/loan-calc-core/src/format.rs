//! Display helpers for currency amounts.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{Currency, Money};

/// Thousands-separated amount with up to two decimals, trailing zeros
/// dropped: `1234567.5` → `1,234,567.5`.
pub fn format_currency(amount: Money) -> String {
    let rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + whole.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if let Some(f) = frac {
        out.push('.');
        out.push_str(f);
    }
    out
}

/// Amount followed by its currency code: `1,234.5 JMD`.
pub fn format_with_code(amount: Money, currency: &Currency) -> String {
    format!("{} {}", format_currency(amount), currency.code())
}

/// Short form used on slider labels: `$1.2M`, `$50K`, `$950`.
pub fn format_compact(amount: Money) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = amount.abs();

    if abs >= dec!(1_000_000) {
        let millions = (abs / dec!(1_000_000))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        format!("{sign}${millions:.1}M")
    } else if abs >= dec!(1_000) {
        let thousands = (abs / dec!(1_000))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        format!("{sign}${thousands}K")
    } else {
        format!("{sign}${}", format_currency(abs))
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Try to parse a decimal rendered as text (as `rust_decimal` serializes).
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    text.trim().parse::<Decimal>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_grouping() {
        assert_eq!(format_currency(dec!(1234567.5)), "1,234,567.5");
        assert_eq!(format_currency(dec!(100)), "100");
        assert_eq!(format_currency(dec!(999.999)), "1,000");
        assert_eq!(format_currency(dec!(9783.074109)), "9,783.07");
    }

    #[test]
    fn test_format_currency_negative_and_zero() {
        assert_eq!(format_currency(dec!(-45000)), "-45,000");
        assert_eq!(format_currency(dec!(-0.001)), "0");
    }

    #[test]
    fn test_format_with_code() {
        assert_eq!(format_with_code(dec!(12600), &Currency::JMD), "12,600 JMD");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(dec!(50_000_000)), "$50.0M");
        assert_eq!(format_compact(dec!(1_250_000)), "$1.3M");
        assert_eq!(format_compact(dec!(100_000)), "$100K");
        assert_eq!(format_compact(dec!(50_000)), "$50K");
        assert_eq!(format_compact(dec!(950)), "$950");
        assert_eq!(format_compact(dec!(0)), "$0");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal(" 12.50 "), Some(dec!(12.5)));
        assert_eq!(parse_decimal("monthly"), None);
    }
}
