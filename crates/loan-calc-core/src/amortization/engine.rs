//! Fixed-rate installment loan engine: level monthly payment, its inverse
//! (largest principal a payment can carry), and the period-by-period
//! amortization schedule. All math in `rust_decimal::Decimal`.
//!
//! Degenerate inputs (no principal, no term, negative rate) are expected while
//! a borrower is still editing the figures, so they produce zero results
//! rather than errors. Terms beyond [`MAX_TERM_MONTHS`] and figures whose
//! totals leave the `Decimal` range are treated the same way.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::annuity;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};

/// Residual balance below which a loan counts as retired.
const BALANCE_EPSILON: Decimal = dec!(0.01);

/// Longest term the engine schedules (100 years).
pub const MAX_TERM_MONTHS: u32 = 1200;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Terms of a fixed-rate installment loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount borrowed.
    pub principal: Money,
    /// Nominal annual rate as a percentage (8.5 = 8.5%).
    pub annual_rate_percent: Percent,
    /// Number of monthly payments.
    pub term_months: u32,
}

/// One month of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPeriod {
    /// 1-based period number.
    pub index: u32,
    pub payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    /// Balance outstanding after this payment. Never negative.
    pub remaining_balance: Money,
}

/// Payment, totals and full schedule for a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub schedule: Vec<PaymentPeriod>,
}

/// Request wrapper used by the CLI and bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    #[serde(flatten)]
    pub loan: LoanParameters,
    /// Round every schedule line to cents, letting the final payment absorb
    /// the accumulated residue.
    #[serde(default)]
    pub round_to_cents: bool,
}

// ---------------------------------------------------------------------------
// Core formulas
// ---------------------------------------------------------------------------

/// Level monthly payment for a fixed-rate loan.
///
/// `P·r·(1+r)^n / ((1+r)^n − 1)` with `r` the monthly rate; zero rate is
/// straight-line `P / n`.
pub fn compute_monthly_payment(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: u32,
) -> Money {
    if principal <= Decimal::ZERO || term_months == 0 || term_months > MAX_TERM_MONTHS {
        return Decimal::ZERO;
    }
    let payment = annuity::level_payment(
        principal,
        annuity::monthly_rate(annual_rate_percent),
        term_months,
    );

    // Totals and the cent true-up sum payments over the whole term; keep one
    // payment of headroom for the final-period residue.
    if payment
        .checked_mul(Decimal::from(term_months + 1))
        .is_none()
    {
        tracing::warn!(%principal, term_months, "total payments out of decimal range");
        return Decimal::ZERO;
    }
    payment
}

/// Period-by-period split of the level payment into interest and principal.
///
/// Yields exactly `term_months` periods, or none for a degenerate loan.
pub fn compute_schedule(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: u32,
) -> Vec<PaymentPeriod> {
    let payment = compute_monthly_payment(principal, annual_rate_percent, term_months);
    if payment.is_zero() {
        return Vec::new();
    }

    let monthly_rate = annuity::monthly_rate(annual_rate_percent);
    let mut balance = principal;
    let mut schedule = Vec::with_capacity(term_months as usize);

    for index in 1..=term_months {
        let interest_portion = balance * monthly_rate;
        let principal_portion = payment - interest_portion;
        balance = (balance - principal_portion).max(Decimal::ZERO);

        schedule.push(PaymentPeriod {
            index,
            payment,
            principal_portion,
            interest_portion,
            remaining_balance: balance,
        });
    }

    schedule
}

/// Largest principal that `max_monthly_payment` retires over the term.
pub fn compute_max_principal(
    max_monthly_payment: Money,
    annual_rate_percent: Percent,
    term_months: u32,
) -> Money {
    if max_monthly_payment <= Decimal::ZERO
        || annual_rate_percent < Decimal::ZERO
        || term_months == 0
        || term_months > MAX_TERM_MONTHS
    {
        return Decimal::ZERO;
    }
    annuity::present_value(
        max_monthly_payment,
        annuity::monthly_rate(annual_rate_percent),
        term_months,
    )
}

/// Payment, totals and schedule in one pass.
pub fn compute_amortization(loan: &LoanParameters) -> AmortizationResult {
    let monthly_payment =
        compute_monthly_payment(loan.principal, loan.annual_rate_percent, loan.term_months);
    let schedule = compute_schedule(loan.principal, loan.annual_rate_percent, loan.term_months);
    totals(loan, monthly_payment, schedule)
}

/// Schedule with every line in whole cents.
///
/// The payment is rounded half away from zero; each period's interest is
/// rounded the same way. The last period pays off whatever remains, so the
/// principal portions sum to the (rounded) principal exactly and the final
/// balance is 0.00.
pub fn compute_rounded_schedule(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: u32,
) -> Vec<PaymentPeriod> {
    let exact = compute_monthly_payment(principal, annual_rate_percent, term_months);
    if exact.is_zero() {
        return Vec::new();
    }

    let payment = to_cents(exact);
    let monthly_rate = annuity::monthly_rate(annual_rate_percent);
    let mut balance = to_cents(principal);
    let mut schedule = Vec::with_capacity(term_months as usize);

    for index in 1..=term_months {
        let interest_portion = to_cents(balance * monthly_rate);
        let principal_portion = if index == term_months {
            balance
        } else {
            (payment - interest_portion).min(balance)
        };
        balance -= principal_portion;

        schedule.push(PaymentPeriod {
            index,
            payment: principal_portion + interest_portion,
            principal_portion,
            interest_portion,
            remaining_balance: balance,
        });
    }

    schedule
}

// ---------------------------------------------------------------------------
// Request-level API
// ---------------------------------------------------------------------------

/// Full amortization for a request, wrapped with methodology and warnings.
pub fn calculate_amortization(input: &AmortizationInput) -> ComputationOutput<AmortizationResult> {
    let start = Instant::now();
    let loan = &input.loan;
    let mut warnings = Vec::new();

    tracing::debug!(
        principal = %loan.principal,
        annual_rate_percent = %loan.annual_rate_percent,
        term_months = loan.term_months,
        round_to_cents = input.round_to_cents,
        "calculating amortization"
    );

    let result = if input.round_to_cents {
        let schedule =
            compute_rounded_schedule(loan.principal, loan.annual_rate_percent, loan.term_months);
        let monthly_payment = schedule.first().map(|p| p.payment).unwrap_or_default();
        let mut result = totals(loan, monthly_payment, schedule);
        result.total_payment = result.schedule.iter().map(|p| p.payment).sum();
        result.total_interest = result.schedule.iter().map(|p| p.interest_portion).sum();
        result
    } else {
        compute_amortization(loan)
    };

    if result.schedule.is_empty() {
        tracing::warn!(
            principal = %loan.principal,
            term_months = loan.term_months,
            "degenerate loan terms, returning zero schedule"
        );
        warnings.push(degenerate_warning(loan));
    } else if let Some(last) = result.schedule.last() {
        if last.remaining_balance >= BALANCE_EPSILON {
            warnings.push(format!(
                "Rate {}% is too high for the payment to retire the loan; balance {} remains",
                loan.annual_rate_percent, last.remaining_balance
            ));
        }
    }

    let methodology = if input.round_to_cents {
        "Level-payment amortization, cent-rounded with final-period true-up"
    } else {
        "Level-payment amortization (annuity formula)"
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(methodology, input, warnings, elapsed, result)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn totals(loan: &LoanParameters, monthly_payment: Money, schedule: Vec<PaymentPeriod>) -> AmortizationResult {
    if schedule.is_empty() {
        return AmortizationResult {
            monthly_payment: Decimal::ZERO,
            total_payment: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            schedule,
        };
    }
    let total_payment = monthly_payment * Decimal::from(loan.term_months);
    AmortizationResult {
        monthly_payment,
        total_payment,
        total_interest: total_payment - loan.principal,
        schedule,
    }
}

pub(crate) fn to_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn degenerate_warning(loan: &LoanParameters) -> String {
    if loan.principal <= Decimal::ZERO {
        "Principal is zero or negative; no payment is due".to_string()
    } else if loan.term_months == 0 {
        "Term is zero months; no payment can be computed".to_string()
    } else if loan.term_months > MAX_TERM_MONTHS {
        format!(
            "Term of {} months exceeds the {MAX_TERM_MONTHS}-month limit; no payment computed",
            loan.term_months
        )
    } else if loan.annual_rate_percent < Decimal::ZERO {
        format!(
            "Annual rate {}% is outside the supported domain; no payment computed",
            loan.annual_rate_percent
        )
    } else {
        "Loan figures are too large to compute; no payment computed".to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: Decimal = dec!(0.01);

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        assert_eq!(compute_monthly_payment(dec!(1200), dec!(0), 12), dec!(100));
    }

    #[test]
    fn test_degenerate_principal_and_term() {
        assert_eq!(compute_monthly_payment(dec!(0), dec!(8.5), 60), Decimal::ZERO);
        assert_eq!(compute_monthly_payment(dec!(50000), dec!(8.5), 0), Decimal::ZERO);
        assert_eq!(compute_monthly_payment(dec!(-100), dec!(8.5), 60), Decimal::ZERO);
    }

    #[test]
    fn test_negative_rate_returns_zero() {
        assert_eq!(compute_monthly_payment(dec!(1000), dec!(-1), 12), Decimal::ZERO);
        assert!(compute_schedule(dec!(1000), dec!(-1), 12).is_empty());
        assert_eq!(compute_max_principal(dec!(100), dec!(-1), 12), Decimal::ZERO);
    }

    #[test]
    fn test_mortgage_payment_known_answer() {
        // 500,000 at 6.5% over 60 months
        let pmt = compute_monthly_payment(dec!(500_000), dec!(6.5), 60);
        assert_close(pmt, dec!(9783.07), TOL, "5y mortgage payment");
    }

    #[test]
    fn test_auto_loan_known_answer() {
        // 50,000 at 8.5% over 60 months
        let pmt = compute_monthly_payment(dec!(50_000), dec!(8.5), 60);
        assert_close(pmt, dec!(1025.83), TOL, "auto loan payment");
    }

    #[test]
    fn test_schedule_length_and_final_balance() {
        let schedule = compute_schedule(dec!(50_000), dec!(8.5), 60);
        assert_eq!(schedule.len(), 60);
        assert_eq!(schedule[0].index, 1);
        assert_eq!(schedule[59].index, 60);
        assert!(schedule.iter().all(|p| p.remaining_balance >= Decimal::ZERO));
        assert_close(schedule[59].remaining_balance, Decimal::ZERO, TOL, "final balance");
    }

    #[test]
    fn test_schedule_first_period_split() {
        // 12% annual => 1% monthly; interest on 1,000 is 10.
        let schedule = compute_schedule(dec!(1000), dec!(12), 12);
        assert_eq!(schedule[0].interest_portion, dec!(10));
        assert_close(schedule[0].principal_portion, dec!(78.85), TOL, "first principal");
        assert!(schedule[11].interest_portion < schedule[0].interest_portion);
    }

    #[test]
    fn test_zero_rate_schedule_has_no_interest() {
        let schedule = compute_schedule(dec!(1200), dec!(0), 12);
        assert_eq!(schedule.len(), 12);
        assert!(schedule.iter().all(|p| p.interest_portion.is_zero()));
        assert_eq!(schedule[11].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_degenerate_schedule_is_empty() {
        assert!(compute_schedule(dec!(0), dec!(5), 12).is_empty());
        assert!(compute_schedule(dec!(1000), dec!(5), 0).is_empty());
    }

    #[test]
    fn test_max_principal_zero_rate() {
        assert_eq!(compute_max_principal(dec!(100), dec!(0), 12), dec!(1200));
    }

    #[test]
    fn test_max_principal_degenerate() {
        assert_eq!(compute_max_principal(dec!(0), dec!(6), 12), Decimal::ZERO);
        assert_eq!(compute_max_principal(dec!(100), dec!(6), 0), Decimal::ZERO);
    }

    #[test]
    fn test_rounded_schedule_closes_exactly() {
        let schedule = compute_rounded_schedule(dec!(1000), dec!(12), 12);
        assert_eq!(schedule.len(), 12);
        assert_eq!(schedule[0].payment, dec!(88.85));
        assert_eq!(schedule[11].remaining_balance, Decimal::ZERO);
        let principal_sum: Decimal = schedule.iter().map(|p| p.principal_portion).sum();
        assert_eq!(principal_sum, dec!(1000));
        assert_close(schedule[11].payment, dec!(88.85), dec!(0.05), "final true-up");
    }

    #[test]
    fn test_rounded_schedule_lines_are_whole_cents() {
        let schedule = compute_rounded_schedule(dec!(50_000), dec!(8.5), 60);
        for p in &schedule {
            assert_eq!(p.payment, to_cents(p.payment));
            assert_eq!(p.interest_portion, to_cents(p.interest_portion));
            assert_eq!(p.principal_portion, to_cents(p.principal_portion));
        }
    }

    #[test]
    fn test_calculate_amortization_totals() {
        let input = AmortizationInput {
            loan: LoanParameters {
                principal: dec!(1200),
                annual_rate_percent: dec!(0),
                term_months: 12,
            },
            round_to_cents: false,
        };
        let out = calculate_amortization(&input);
        assert_eq!(out.result.monthly_payment, dec!(100));
        assert_eq!(out.result.total_payment, dec!(1200));
        assert_eq!(out.result.total_interest, Decimal::ZERO);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_calculate_amortization_degenerate_warns() {
        let input = AmortizationInput {
            loan: LoanParameters {
                principal: dec!(0),
                annual_rate_percent: dec!(8.5),
                term_months: 60,
            },
            round_to_cents: false,
        };
        let out = calculate_amortization(&input);
        assert_eq!(out.result.monthly_payment, Decimal::ZERO);
        assert!(out.result.schedule.is_empty());
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_term_beyond_limit_is_degenerate() {
        assert_eq!(compute_monthly_payment(dec!(1000), dec!(5), u32::MAX), Decimal::ZERO);
        assert!(compute_schedule(dec!(1000), dec!(5), u32::MAX).is_empty());
        assert!(compute_rounded_schedule(dec!(1000), dec!(5), MAX_TERM_MONTHS + 1).is_empty());
        assert_eq!(compute_max_principal(dec!(100), dec!(5), u32::MAX), Decimal::ZERO);

        let schedule = compute_schedule(dec!(1000), dec!(5), MAX_TERM_MONTHS);
        assert_eq!(schedule.len(), MAX_TERM_MONTHS as usize);
    }

    #[test]
    fn test_calculate_amortization_long_term_warns() {
        let input = AmortizationInput {
            loan: LoanParameters {
                principal: dec!(1000),
                annual_rate_percent: dec!(5),
                term_months: 100_000_000,
            },
            round_to_cents: true,
        };
        let out = calculate_amortization(&input);
        assert!(out.result.schedule.is_empty());
        assert_eq!(out.result.total_payment, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("1200-month limit"));
    }

    #[test]
    fn test_huge_figures_return_zero() {
        assert_eq!(compute_max_principal(dec!(1e27), dec!(0), 480), Decimal::ZERO);
        assert_eq!(
            compute_monthly_payment(dec!(1_000_000), Decimal::MAX, 60),
            Decimal::ZERO
        );
        // Fits as a payment, but not as payment × term.
        assert_eq!(compute_monthly_payment(Decimal::MAX, dec!(0), 2), Decimal::ZERO);
        assert!(compute_schedule(Decimal::MAX, dec!(12), 360).is_empty());
        assert!(compute_rounded_schedule(Decimal::MAX, dec!(0), 1).is_empty());
    }

    #[test]
    fn test_calculate_amortization_huge_principal_warns() {
        let input = AmortizationInput {
            loan: LoanParameters {
                principal: Decimal::MAX,
                annual_rate_percent: dec!(8.5),
                term_months: 60,
            },
            round_to_cents: false,
        };
        let out = calculate_amortization(&input);
        assert_eq!(out.result.monthly_payment, Decimal::ZERO);
        assert!(out.warnings[0].contains("too large"));
    }

    #[test]
    fn test_calculate_amortization_rounded_totals_match_schedule() {
        let input = AmortizationInput {
            loan: LoanParameters {
                principal: dec!(1000),
                annual_rate_percent: dec!(12),
                term_months: 12,
            },
            round_to_cents: true,
        };
        let out = calculate_amortization(&input);
        let interest: Decimal = out.result.schedule.iter().map(|p| p.interest_portion).sum();
        assert_eq!(out.result.total_interest, interest);
        assert_eq!(out.result.total_payment, dec!(1000) + interest);
    }
}
