use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;

use loan_calc_core::amortization::engine::{self, AmortizationInput, LoanParameters};
use loan_calc_core::amortization::presets::{self, LOAN_TYPES};
use loan_calc_core::amortization::quote::{self, LoanQuoteInput};
use loan_calc_core::types::{with_metadata, Currency};

use crate::input;

/// Loan terms shared by the payment and schedule commands
#[derive(Args)]
pub struct LoanTermArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 8.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Use the rate of a loan type preset (unsecured, auto, mortgage, payday)
    #[arg(long, conflicts_with = "rate")]
    pub loan_type: Option<String>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,
}

/// Arguments for the monthly payment calculation
#[derive(Args)]
pub struct PaymentArgs {
    #[command(flatten)]
    pub loan: LoanTermArgs,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanTermArgs,

    /// Round each line to cents; the final payment absorbs the residue
    #[arg(long)]
    pub round_to_cents: bool,
}

/// Arguments for the maximum principal (inverse payment) calculation
#[derive(Args)]
pub struct MaxPrincipalArgs {
    /// Largest monthly payment the borrower can make
    #[arg(long)]
    pub payment: Decimal,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Use the rate of a loan type preset
    #[arg(long, conflicts_with = "rate")]
    pub loan_type: Option<String>,

    /// Term in months
    #[arg(long)]
    pub term: u32,
}

/// Arguments for a loan quote
#[derive(Args)]
pub struct QuoteArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Price of the item being financed
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Up-front deposit
    #[arg(long, default_value = "0")]
    pub deposit: Decimal,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Use the rate of a loan type preset
    #[arg(long, conflicts_with = "rate")]
    pub loan_type: Option<String>,

    /// Term in months
    #[arg(long, default_value = "60")]
    pub term: u32,

    /// First payment date (YYYY-MM-DD) for the payback date; defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

/// Rate from `--rate`, else a named preset, else the default preset.
pub(crate) fn resolve_rate(
    rate: Option<Decimal>,
    loan_type: Option<&str>,
) -> Result<Decimal, Box<dyn std::error::Error>> {
    if let Some(rate) = rate {
        return Ok(rate);
    }
    let id = loan_type.unwrap_or(presets::DEFAULT_LOAN_TYPE);
    let preset = presets::find_loan_type(id)?;
    tracing::info!(loan_type = preset.id, rate = %preset.annual_rate_percent, "using preset rate");
    Ok(preset.annual_rate_percent)
}

fn loan_from_args(args: &LoanTermArgs) -> Result<LoanParameters, Box<dyn std::error::Error>> {
    if let Some(loan) = input::load::<LoanParameters>(args.input.as_deref())? {
        return Ok(loan);
    }
    let principal = args
        .principal
        .ok_or("--principal is required (or provide --input)")?;
    let term_months = args.term.ok_or("--term is required (or provide --input)")?;
    Ok(LoanParameters {
        principal,
        annual_rate_percent: resolve_rate(args.rate, args.loan_type.as_deref())?,
        term_months,
    })
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = loan_from_args(&args.loan)?;
    let output = engine::calculate_amortization(&AmortizationInput {
        loan,
        round_to_cents: false,
    });

    let mut value = serde_json::to_value(output)?;
    if let Some(result) = value.get_mut("result").and_then(Value::as_object_mut) {
        result.remove("schedule");
    }
    Ok(value)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AmortizationInput =
        if let Some(request) = input::load::<AmortizationInput>(args.loan.input.as_deref())? {
            request
        } else {
            AmortizationInput {
                loan: loan_from_args(&args.loan)?,
                round_to_cents: args.round_to_cents,
            }
        };
    let output = engine::calculate_amortization(&request);
    Ok(serde_json::to_value(output)?)
}

#[derive(Serialize)]
struct MaxPrincipalAssumptions {
    max_monthly_payment: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
}

pub fn run_max_principal(args: MaxPrincipalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let assumptions = MaxPrincipalAssumptions {
        max_monthly_payment: args.payment,
        annual_rate_percent: resolve_rate(args.rate, args.loan_type.as_deref())?,
        term_months: args.term,
    };

    let max_principal = engine::compute_max_principal(
        assumptions.max_monthly_payment,
        assumptions.annual_rate_percent,
        assumptions.term_months,
    );
    let mut warnings = Vec::new();
    if max_principal.is_zero() {
        warnings.push("Payment, rate or term is degenerate; no principal can be carried".to_string());
    }

    let output = with_metadata(
        "Annuity present value (inverse of level payment)",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        json!({ "max_principal": max_principal }),
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_quote(args: QuoteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut quote_input: LoanQuoteInput =
        if let Some(request) = input::load::<LoanQuoteInput>(args.input.as_deref())? {
            request
        } else {
            let loan_amount = args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?;
            LoanQuoteInput {
                loan_amount,
                deposit: args.deposit,
                annual_rate_percent: resolve_rate(args.rate, args.loan_type.as_deref())?,
                term_months: args.term,
                start_date: args.start_date,
                currency: Currency::default(),
            }
        };

    quote_input.start_date = Some(start_or_today(quote_input.start_date));

    let output = quote::quote_loan(&quote_input);
    Ok(serde_json::to_value(output)?)
}

/// Payback is counted from today unless a start date is given.
fn start_or_today(start_date: Option<NaiveDate>) -> NaiveDate {
    start_date.unwrap_or_else(|| Local::now().date_naive())
}

pub fn run_presets() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(LOAN_TYPES)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_rate_wins() {
        let rate = resolve_rate(Some(Decimal::new(75, 1)), Some("payday")).unwrap();
        assert_eq!(rate, Decimal::new(75, 1));
    }

    #[test]
    fn test_preset_rate() {
        let rate = resolve_rate(None, Some("mortgage")).unwrap();
        assert_eq!(rate, Decimal::new(65, 1));
    }

    #[test]
    fn test_default_preset_rate() {
        let rate = resolve_rate(None, None).unwrap();
        assert_eq!(rate, Decimal::new(85, 1));
    }

    #[test]
    fn test_start_date_defaults_to_today() {
        assert_eq!(start_or_today(None), Local::now().date_naive());
        let given = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert_eq!(start_or_today(Some(given)), given);
    }

    #[test]
    fn test_unknown_preset_is_error() {
        assert!(resolve_rate(None, Some("balloon")).is_err());
    }
}
