//! Loan quote: what a borrower sees after entering loan amount, deposit,
//! term and rate. Builds on the amortization engine and adds the first-month
//! interest/principal split, effective cost of credit and payback date.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Instant;

use super::engine::compute_monthly_payment;
use crate::annuity;
use crate::types::{percent_of, with_metadata, ComputationOutput, Currency, Money, Percent};

// ---------------------------------------------------------------------------
// Calculator ranges
// ---------------------------------------------------------------------------

pub const LOAN_AMOUNT_RANGE: RangeInclusive<Money> = dec!(100_000)..=dec!(50_000_000);
pub const DEPOSIT_RANGE: RangeInclusive<Money> = dec!(0)..=dec!(5_000_000);
pub const RATE_RANGE: RangeInclusive<Percent> = dec!(0)..=dec!(25);
pub const TERM_RANGE: RangeInclusive<u32> = 12..=480;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Figures entered into the loan calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanQuoteInput {
    /// Price of the item being financed.
    pub loan_amount: Money,
    /// Up-front deposit, deducted from the amount financed.
    #[serde(default)]
    pub deposit: Money,
    pub annual_rate_percent: Percent,
    pub term_months: u32,
    /// First payment month; drives the payback date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub currency: Currency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanQuote {
    /// Amount financed: loan amount less deposit, floored at zero.
    pub principal: Money,
    pub monthly_payment: Money,
    pub first_month_principal: Money,
    pub first_month_interest: Money,
    /// Share of the first payment that reduces the balance.
    pub principal_percentage: Percent,
    /// Share of the first payment that is interest.
    pub interest_percentage: Percent,
    pub total_payment: Money,
    pub total_interest: Money,
    /// Total interest as a percentage of the amount financed.
    pub effective_rate_percent: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payback_date: Option<NaiveDate>,
    pub currency: Currency,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Quote a loan from calculator inputs.
///
/// Out-of-range inputs are still priced; each one adds a warning.
pub fn quote_loan(input: &LoanQuoteInput) -> ComputationOutput<LoanQuote> {
    let start = Instant::now();
    let mut warnings = range_warnings(input);

    let principal = financed_amount(input);
    let monthly_payment =
        compute_monthly_payment(principal, input.annual_rate_percent, input.term_months);

    tracing::debug!(
        loan_amount = %input.loan_amount,
        deposit = %input.deposit,
        principal = %principal,
        monthly_payment = %monthly_payment,
        "quoting loan"
    );

    let quote = if monthly_payment.is_zero() {
        tracing::warn!(principal = %principal, term_months = input.term_months, "zero quote");
        warnings.push(if principal.is_zero() {
            "Deposit covers the loan amount; nothing to finance".to_string()
        } else {
            "Loan terms do not produce a payment".to_string()
        });
        zero_quote(input, principal)
    } else {
        let first_month_interest = principal * annuity::monthly_rate(input.annual_rate_percent);
        let first_month_principal = monthly_payment - first_month_interest;
        let total_payment = monthly_payment * Decimal::from(input.term_months);
        let total_interest = total_payment - principal;

        let payback_date = input.start_date.and_then(|d| {
            let date = d.checked_add_months(Months::new(input.term_months));
            if date.is_none() {
                warnings.push(format!(
                    "Payback date for a {}-month term is out of calendar range",
                    input.term_months
                ));
            }
            date
        });

        let effective_rate_percent = percent_of(total_interest, principal).unwrap_or_else(|| {
            warnings.push("Effective rate is too large to express; reported as zero".to_string());
            Decimal::ZERO
        });

        LoanQuote {
            principal,
            monthly_payment,
            first_month_principal,
            first_month_interest,
            principal_percentage: percent_of(first_month_principal, monthly_payment)
                .unwrap_or_default(),
            interest_percentage: percent_of(first_month_interest, monthly_payment)
                .unwrap_or_default(),
            total_payment,
            total_interest,
            effective_rate_percent,
            payback_date,
            currency: input.currency.clone(),
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Loan quote (level-payment annuity, deposit netted from amount)",
        input,
        warnings,
        elapsed,
        quote,
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn range_warnings(input: &LoanQuoteInput) -> Vec<String> {
    let mut warnings = Vec::new();
    if !LOAN_AMOUNT_RANGE.contains(&input.loan_amount) {
        warnings.push(format!(
            "Loan amount {} is outside the offered range {}–{}",
            input.loan_amount,
            LOAN_AMOUNT_RANGE.start(),
            LOAN_AMOUNT_RANGE.end()
        ));
    }
    if !DEPOSIT_RANGE.contains(&input.deposit) {
        warnings.push(format!(
            "Deposit {} is outside the accepted range {}–{}",
            input.deposit,
            DEPOSIT_RANGE.start(),
            DEPOSIT_RANGE.end()
        ));
    }
    if !RATE_RANGE.contains(&input.annual_rate_percent) {
        warnings.push(format!(
            "Annual rate {}% is outside the quoted range {}–{}%",
            input.annual_rate_percent,
            RATE_RANGE.start(),
            RATE_RANGE.end()
        ));
    }
    if !TERM_RANGE.contains(&input.term_months) {
        warnings.push(format!(
            "Term of {} months is outside the offered range {}–{} months",
            input.term_months,
            TERM_RANGE.start(),
            TERM_RANGE.end()
        ));
    }
    warnings
}

/// Loan amount less deposit, floored at zero and capped at `Decimal::MAX`.
fn financed_amount(input: &LoanQuoteInput) -> Money {
    input
        .loan_amount
        .saturating_sub(input.deposit)
        .max(Decimal::ZERO)
}

fn zero_quote(input: &LoanQuoteInput, principal: Money) -> LoanQuote {
    LoanQuote {
        principal,
        monthly_payment: Decimal::ZERO,
        first_month_principal: Decimal::ZERO,
        first_month_interest: Decimal::ZERO,
        principal_percentage: Decimal::ZERO,
        interest_percentage: Decimal::ZERO,
        total_payment: Decimal::ZERO,
        total_interest: Decimal::ZERO,
        effective_rate_percent: Decimal::ZERO,
        payback_date: None,
        currency: input.currency.clone(),
    }
}
