//! Node bindings for the loan calculators. Every function takes a JSON
//! request string and returns a JSON response string, so the UI can call it
//! on each form change without sharing types across the boundary.

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use loan_calc_core::affordability::{analysis, ratio};
use loan_calc_core::amortization::{engine, presets, quote};
use loan_calc_core::budget::{Budget, ExpenseKind, IncomeKind, PayFrequency};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn respond(value: &impl Serialize) -> NapiResult<String> {
    serde_json::to_string(value).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct MaxPrincipalRequest {
    max_monthly_payment: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
}

#[derive(Deserialize)]
struct NewIncome {
    kind: IncomeKind,
    amount: Decimal,
    #[serde(default)]
    frequency: PayFrequency,
}

#[derive(Deserialize)]
struct NewExpense {
    kind: ExpenseKind,
    amount: Decimal,
    #[serde(default)]
    custom_name: Option<String>,
}

#[derive(Serialize)]
struct AmountResponse {
    amount: Decimal,
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn monthly_payment(input_json: String) -> NapiResult<String> {
    let loan: engine::LoanParameters = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    respond(&AmountResponse {
        amount: engine::compute_monthly_payment(
            loan.principal,
            loan.annual_rate_percent,
            loan.term_months,
        ),
    })
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: engine::AmortizationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    respond(&engine::calculate_amortization(&input))
}

#[napi]
pub fn max_principal(input_json: String) -> NapiResult<String> {
    let req: MaxPrincipalRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    respond(&AmountResponse {
        amount: engine::compute_max_principal(
            req.max_monthly_payment,
            req.annual_rate_percent,
            req.term_months,
        ),
    })
}

#[napi]
pub fn loan_quote(input_json: String) -> NapiResult<String> {
    let input: quote::LoanQuoteInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    respond(&quote::quote_loan(&input))
}

#[napi]
pub fn loan_types() -> NapiResult<String> {
    respond(&presets::LOAN_TYPES)
}

// ---------------------------------------------------------------------------
// Affordability
// ---------------------------------------------------------------------------

#[napi]
pub fn affordability(input_json: String) -> NapiResult<String> {
    let input: ratio::AffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    respond(&ratio::compute_affordability(
        input.monthly_income,
        input.monthly_expenses,
        input.existing_debt,
        input.basis,
    ))
}

#[napi]
pub fn affordability_analysis(input_json: String) -> NapiResult<String> {
    let input: analysis::AffordabilityAnalysisInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    respond(&analysis::analyze_affordability(&input))
}

// ---------------------------------------------------------------------------
// Budget
// ---------------------------------------------------------------------------

#[napi]
pub fn budget_add_income(budget_json: String, item_json: String) -> NapiResult<String> {
    let mut budget: Budget = serde_json::from_str(&budget_json).map_err(to_napi_error)?;
    let item: NewIncome = serde_json::from_str(&item_json).map_err(to_napi_error)?;
    budget
        .add_income(item.kind, item.amount, item.frequency)
        .map_err(to_napi_error)?;
    respond(&budget)
}

#[napi]
pub fn budget_add_expense(budget_json: String, item_json: String) -> NapiResult<String> {
    let mut budget: Budget = serde_json::from_str(&budget_json).map_err(to_napi_error)?;
    let item: NewExpense = serde_json::from_str(&item_json).map_err(to_napi_error)?;
    budget
        .add_expense(item.kind, item.amount, item.custom_name)
        .map_err(to_napi_error)?;
    respond(&budget)
}

#[napi]
pub fn budget_remove_expense(budget_json: String, id: u32) -> NapiResult<String> {
    let mut budget: Budget = serde_json::from_str(&budget_json).map_err(to_napi_error)?;
    budget.remove_expense(id).map_err(to_napi_error)?;
    respond(&budget)
}
