//! Affordability analysis: from a household's monthly figures (or a full
//! budget) to the largest loan and purchase price it can carry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::ratio::{compute_affordability, AffordabilityResult, DtiBasis, RiskLevel};
use crate::amortization::engine::{compute_max_principal, MAX_TERM_MONTHS};
use crate::budget::Budget;
use crate::types::{percent_of, with_metadata, ComputationOutput, Money, Percent};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Where the monthly figures come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finances {
    /// Pre-aggregated monthly totals.
    Summary {
        monthly_income: Money,
        monthly_expenses: Money,
        #[serde(default)]
        existing_debt: Money,
    },
    /// Itemised budget; debt repayments are split out of the expenses.
    Budget(Budget),
}

impl Finances {
    /// (income, living expenses, existing debt), all monthly.
    fn monthly_figures(&self) -> (Money, Money, Money) {
        match self {
            Finances::Summary {
                monthly_income,
                monthly_expenses,
                existing_debt,
            } => (*monthly_income, *monthly_expenses, *existing_debt),
            Finances::Budget(budget) => (
                budget.total_monthly_income(),
                budget.living_expenses(),
                budget.debt_obligations(),
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityAnalysisInput {
    pub finances: Finances,
    /// Rate the new loan would carry.
    pub annual_rate_percent: Percent,
    pub term_months: u32,
    /// Cash the buyer brings on top of the loan.
    #[serde(default)]
    pub deposit: Money,
    pub basis: DtiBasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityAnalysis {
    pub monthly_income: Money,
    pub monthly_expenses: Money,
    pub existing_debt: Money,
    pub affordability: AffordabilityResult,
    /// Principal the max monthly payment retires over the term.
    pub max_loan_amount: Money,
    /// Max loan plus deposit.
    pub total_affordable_price: Money,
    /// Share of the affordable price financed by the loan.
    pub loan_to_price_percent: Percent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn analyze_affordability(
    input: &AffordabilityAnalysisInput,
) -> ComputationOutput<AffordabilityAnalysis> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let (monthly_income, monthly_expenses, existing_debt) = input.finances.monthly_figures();
    let affordability =
        compute_affordability(monthly_income, monthly_expenses, existing_debt, input.basis);

    let max_loan_amount = compute_max_principal(
        affordability.max_monthly_payment,
        input.annual_rate_percent,
        input.term_months,
    );
    let deposit = input.deposit.max(Decimal::ZERO);
    let total_affordable_price = max_loan_amount.saturating_add(deposit);
    let loan_to_price_percent =
        percent_of(max_loan_amount, total_affordable_price).unwrap_or_default();

    tracing::debug!(
        monthly_income = %monthly_income,
        available_income = %affordability.available_income,
        max_monthly_payment = %affordability.max_monthly_payment,
        max_loan_amount = %max_loan_amount,
        "affordability analysed"
    );

    if monthly_income <= Decimal::ZERO {
        warnings.push("No income recorded; ratios reported as zero".to_string());
    } else if affordability.available_income < Decimal::ZERO {
        warnings.push(format!(
            "Expenses exceed income by {}; no new payment is affordable",
            -affordability.available_income
        ));
    }
    if input.term_months > MAX_TERM_MONTHS {
        warnings.push(format!(
            "Term of {} months exceeds the {MAX_TERM_MONTHS}-month limit; no loan amount computed",
            input.term_months
        ));
    }
    if input.deposit < Decimal::ZERO {
        warnings.push("Negative deposit ignored".to_string());
    }
    if affordability.risk_level == RiskLevel::High {
        warnings.push(format!(
            "{:?} ratio {:.2}% is above the moderate-risk ceiling",
            input.basis,
            affordability.selected_ratio()
        ));
    }

    let analysis = AffordabilityAnalysis {
        monthly_income,
        monthly_expenses,
        existing_debt,
        affordability,
        max_loan_amount,
        total_affordable_price,
        loan_to_price_percent,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Debt-to-income affordability (28% of available income) with annuity inverse",
        input,
        warnings,
        elapsed,
        analysis,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn reference_input() -> AffordabilityAnalysisInput {
        AffordabilityAnalysisInput {
            finances: Finances::Summary {
                monthly_income: dec!(150_000),
                monthly_expenses: dec!(80_000),
                existing_debt: dec!(25_000),
            },
            annual_rate_percent: dec!(0),
            term_months: 60,
            deposit: dec!(244_000),
            basis: DtiBasis::Obligations,
        }
    }

    #[test]
    fn test_zero_rate_max_loan() {
        let out = analyze_affordability(&reference_input());
        let a = &out.result;
        assert_eq!(a.max_loan_amount, dec!(756_000));
        assert_eq!(a.total_affordable_price, dec!(1_000_000));
        assert_eq!(a.loan_to_price_percent, dec!(75.6));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_overspent_household_warns() {
        let mut input = reference_input();
        input.finances = Finances::Summary {
            monthly_income: dec!(50_000),
            monthly_expenses: dec!(60_000),
            existing_debt: dec!(0),
        };
        input.deposit = dec!(0);
        let out = analyze_affordability(&input);
        assert_eq!(out.result.max_loan_amount, Decimal::ZERO);
        assert_eq!(out.result.loan_to_price_percent, Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.contains("exceed income")));
    }

    #[test]
    fn test_term_beyond_limit_warns() {
        let mut input = reference_input();
        input.term_months = u32::MAX;
        let out = analyze_affordability(&input);
        assert_eq!(out.result.max_loan_amount, Decimal::ZERO);
        assert_eq!(out.result.total_affordable_price, dec!(244_000));
        assert!(out.warnings.iter().any(|w| w.contains("month limit")));
    }

    #[test]
    fn test_huge_deposit_saturates_price() {
        let mut input = reference_input();
        input.deposit = Decimal::MAX;
        let out = analyze_affordability(&input);
        assert_eq!(out.result.total_affordable_price, Decimal::MAX);
        assert!(out.result.loan_to_price_percent < dec!(0.000001));
    }

    #[test]
    fn test_finances_deserialize_from_summary() {
        let json = r#"{
            "finances": {"summary": {"monthly_income": "150000", "monthly_expenses": "80000", "existing_debt": "25000"}},
            "annual_rate_percent": "6.5",
            "term_months": 60,
            "basis": "total_expenses"
        }"#;
        let input: AffordabilityAnalysisInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.deposit, Decimal::ZERO);
        assert_eq!(input.basis, DtiBasis::TotalExpenses);
    }
}
