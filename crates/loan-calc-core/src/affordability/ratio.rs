//! Debt-to-income affordability: how much of a borrower's monthly income can
//! go to a new loan payment.
//!
//! Two ratio definitions circulate for the same screen. The obligations ratio
//! counts only existing debt repayments; the total-expenses ratio counts every
//! outgoing. Both are always reported and the caller names the one that
//! drives the risk band.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{percent_of, Money, Percent};

/// Share of available income that may be committed to a new payment.
pub const AFFORDABILITY_RATIO: Decimal = dec!(0.28);

/// Ratios at or below this are low risk.
pub const LOW_RISK_CEILING: Percent = dec!(28);

/// Ratios at or below this (and above the low ceiling) are moderate risk.
pub const MODERATE_RISK_CEILING: Percent = dec!(36);

/// Which ratio drives the risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtiBasis {
    /// Existing debt repayments / income.
    Obligations,
    /// All expenses including debt repayments / income.
    TotalExpenses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_ratio(ratio_percent: Percent) -> Self {
        if ratio_percent <= LOW_RISK_CEILING {
            RiskLevel::Low
        } else if ratio_percent <= MODERATE_RISK_CEILING {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub monthly_income: Money,
    pub monthly_expenses: Money,
    #[serde(default)]
    pub existing_debt: Money,
    pub basis: DtiBasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityResult {
    /// Income left after expenses and debt. May be negative.
    pub available_income: Money,
    /// Largest new monthly payment the policy allows. Never negative.
    pub max_monthly_payment: Money,
    /// Existing debt repayments as a percentage of income.
    pub debt_to_income_ratio: Percent,
    /// Expenses plus debt repayments as a percentage of income.
    pub expense_to_income_ratio: Percent,
    pub basis: DtiBasis,
    pub risk_level: RiskLevel,
}

impl AffordabilityResult {
    /// The ratio selected by `basis`.
    pub fn selected_ratio(&self) -> Percent {
        match self.basis {
            DtiBasis::Obligations => self.debt_to_income_ratio,
            DtiBasis::TotalExpenses => self.expense_to_income_ratio,
        }
    }
}

/// Affordability from monthly figures.
///
/// Zero or negative income yields zero ratios rather than a division error.
/// Sums and ratios that leave the `Decimal` range saturate.
pub fn compute_affordability(
    monthly_income: Money,
    monthly_expenses: Money,
    existing_debt: Money,
    basis: DtiBasis,
) -> AffordabilityResult {
    let outgoings = monthly_expenses.saturating_add(existing_debt);
    let available_income = monthly_income.saturating_sub(outgoings);
    let max_monthly_payment = (available_income * AFFORDABILITY_RATIO).max(Decimal::ZERO);

    let (debt_to_income_ratio, expense_to_income_ratio) = if monthly_income > Decimal::ZERO {
        (
            saturating_percent(existing_debt, monthly_income),
            saturating_percent(outgoings, monthly_income),
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let mut result = AffordabilityResult {
        available_income,
        max_monthly_payment,
        debt_to_income_ratio,
        expense_to_income_ratio,
        basis,
        risk_level: RiskLevel::Low,
    };
    result.risk_level = RiskLevel::from_ratio(result.selected_ratio());
    result
}

/// Income is positive here, so an out-of-range ratio saturates toward the
/// sign of `part`.
fn saturating_percent(part: Money, monthly_income: Money) -> Percent {
    percent_of(part, monthly_income).unwrap_or(if part.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_household() {
        let r = compute_affordability(dec!(150_000), dec!(80_000), dec!(25_000), DtiBasis::Obligations);
        assert_eq!(r.available_income, dec!(45_000));
        assert_eq!(r.max_monthly_payment, dec!(12_600));
        assert_eq!(r.expense_to_income_ratio, dec!(70));
        assert!((r.debt_to_income_ratio - dec!(16.6667)).abs() < dec!(0.0001));
        assert_eq!(r.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_basis_selects_risk_driver() {
        let r = compute_affordability(dec!(150_000), dec!(80_000), dec!(25_000), DtiBasis::TotalExpenses);
        assert_eq!(r.selected_ratio(), dec!(70));
        assert_eq!(r.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_overspent_household_gets_zero_payment() {
        let r = compute_affordability(dec!(50_000), dec!(45_000), dec!(10_000), DtiBasis::Obligations);
        assert_eq!(r.available_income, dec!(-5_000));
        assert_eq!(r.max_monthly_payment, Decimal::ZERO);
    }

    #[test]
    fn test_zero_income() {
        let r = compute_affordability(dec!(0), dec!(1_000), dec!(0), DtiBasis::TotalExpenses);
        assert_eq!(r.debt_to_income_ratio, Decimal::ZERO);
        assert_eq!(r.expense_to_income_ratio, Decimal::ZERO);
        assert_eq!(r.max_monthly_payment, Decimal::ZERO);
        assert_eq!(r.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_extreme_figures_saturate() {
        let r = compute_affordability(dec!(0.01), Decimal::MAX, Decimal::MAX, DtiBasis::Obligations);
        assert!(r.available_income < Decimal::ZERO);
        assert_eq!(r.max_monthly_payment, Decimal::ZERO);
        assert_eq!(r.debt_to_income_ratio, Decimal::MAX);
        assert_eq!(r.expense_to_income_ratio, Decimal::MAX);
        assert_eq!(r.risk_level, RiskLevel::High);

        let r = compute_affordability(Decimal::MAX, Decimal::MIN, dec!(0), DtiBasis::TotalExpenses);
        assert_eq!(r.available_income, Decimal::MAX);
        assert_eq!(r.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_risk_band_edges() {
        assert_eq!(RiskLevel::from_ratio(dec!(28)), RiskLevel::Low);
        assert_eq!(RiskLevel::from_ratio(dec!(28.01)), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_ratio(dec!(36)), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_ratio(dec!(36.01)), RiskLevel::High);
    }
}
