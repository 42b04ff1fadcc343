//! Level-payment annuity primitives shared by the amortization engine and the
//! affordability inverse. Every function here is total: inputs outside the
//! annuity domain, and results outside the `Decimal` range, yield zero
//! instead of an error or a panic.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Percent, Rate};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Convert an annual percentage (6.5 = 6.5%) to a monthly decimal rate.
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / dec!(100) / MONTHS_PER_YEAR
}

/// Compound growth factor (1 + rate)^nper.
///
/// Returns `None` when the factor leaves the 96-bit decimal range.
pub fn growth_factor(rate: Rate, nper: u32) -> Option<Decimal> {
    Decimal::ONE.checked_add(rate)?.checked_powu(u64::from(nper))
}

/// Level payment that retires `present_value` over `nper` periods at `rate`.
///
/// Zero rate is straight-line. When the growth factor overflows, the payment
/// has already converged to the interest-only limit `pv × rate`. A payment
/// that does not itself fit in a `Decimal` yields zero.
pub fn level_payment(present_value: Money, rate: Rate, nper: u32) -> Money {
    if present_value <= Decimal::ZERO || nper == 0 || rate < Decimal::ZERO {
        return Decimal::ZERO;
    }

    let payment = if rate.is_zero() {
        present_value.checked_div(Decimal::from(nper))
    } else {
        match growth_factor(rate, nper) {
            Some(factor) => {
                let denom = factor - Decimal::ONE;
                if denom <= Decimal::ZERO {
                    // Rate too small to register in 28 digits over this term.
                    present_value.checked_div(Decimal::from(nper))
                } else {
                    present_value
                        .checked_mul(rate)
                        .and_then(|interest| interest.checked_mul(factor / denom))
                }
            }
            None => {
                tracing::warn!(%rate, nper, "growth factor overflowed; using interest-only payment");
                present_value.checked_mul(rate)
            }
        }
    };

    payment.unwrap_or_else(|| {
        tracing::warn!(%present_value, %rate, nper, "level payment out of decimal range");
        Decimal::ZERO
    })
}

/// Present value of `nper` level payments of `payment` at `rate`.
///
/// Algebraic inverse of [`level_payment`]; overflow converges to the
/// perpetuity value `payment / rate`. A value out of `Decimal` range yields
/// zero.
pub fn present_value(payment: Money, rate: Rate, nper: u32) -> Money {
    if payment <= Decimal::ZERO || nper == 0 || rate < Decimal::ZERO {
        return Decimal::ZERO;
    }

    let value = if rate.is_zero() {
        payment.checked_mul(Decimal::from(nper))
    } else {
        match growth_factor(rate, nper) {
            Some(factor) => {
                let denom = factor - Decimal::ONE;
                if denom <= Decimal::ZERO {
                    payment.checked_mul(Decimal::from(nper))
                } else {
                    payment
                        .checked_mul(denom / factor)
                        .and_then(|discounted| discounted.checked_div(rate))
                }
            }
            None => {
                tracing::warn!(%rate, nper, "growth factor overflowed; using perpetuity value");
                payment.checked_div(rate)
            }
        }
    };

    value.unwrap_or_else(|| {
        tracing::warn!(%payment, %rate, nper, "present value out of decimal range");
        Decimal::ZERO
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_rate_from_percent() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_growth_factor_small_term() {
        let f = growth_factor(dec!(0.1), 2).unwrap();
        assert_eq!(f, dec!(1.21));
    }

    #[test]
    fn test_growth_factor_overflow_is_none() {
        assert!(growth_factor(dec!(10), 480).is_none());
        assert!(growth_factor(Decimal::MAX, 1).is_none());
    }

    #[test]
    fn test_level_payment_standard_mortgage() {
        // 200,000 at 6% over 30 years => 1,199.10 per month
        let pmt = level_payment(dec!(200_000), dec!(0.005), 360);
        assert!((pmt - dec!(1199.10)).abs() < dec!(0.01));
    }

    #[test]
    fn test_level_payment_zero_rate() {
        assert_eq!(level_payment(dec!(1200), Decimal::ZERO, 12), dec!(100));
    }

    #[test]
    fn test_level_payment_overflow_converges_to_interest_only() {
        let pmt = level_payment(dec!(1000), dec!(10), 480);
        assert_eq!(pmt, dec!(10000));
    }

    #[test]
    fn test_present_value_inverts_level_payment() {
        let pmt = level_payment(dec!(50_000), dec!(0.01), 60);
        let pv = present_value(pmt, dec!(0.01), 60);
        assert!((pv - dec!(50_000)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_degenerate_inputs_return_zero() {
        assert_eq!(level_payment(Decimal::ZERO, dec!(0.01), 12), Decimal::ZERO);
        assert_eq!(level_payment(dec!(100), dec!(0.01), 0), Decimal::ZERO);
        assert_eq!(level_payment(dec!(100), dec!(-0.01), 12), Decimal::ZERO);
        assert_eq!(present_value(dec!(-5), dec!(0.01), 12), Decimal::ZERO);
    }

    #[test]
    fn test_out_of_range_results_return_zero() {
        // Interest-only fallback P·r itself overflows.
        assert_eq!(level_payment(Decimal::MAX, dec!(10), 480), Decimal::ZERO);
        assert_eq!(level_payment(dec!(1_000_000), Decimal::MAX, 60), Decimal::ZERO);
        // Straight-line total n·M overflows.
        assert_eq!(present_value(dec!(1e27), Decimal::ZERO, 480), Decimal::ZERO);
        assert_eq!(present_value(Decimal::MAX, dec!(1e-20), 480), Decimal::ZERO);
    }
}
