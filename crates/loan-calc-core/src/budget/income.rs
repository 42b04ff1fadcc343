use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// How often an income stream pays out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    Annual,
    #[default]
    Monthly,
    Biweekly,
    Weekly,
}

impl PayFrequency {
    /// Convert an amount received at this frequency to a monthly amount.
    ///
    /// Biweekly and weekly use 26 and 52 pay periods per year.
    pub fn to_monthly(self, amount: Money) -> Money {
        match self {
            PayFrequency::Annual => amount / dec!(12),
            PayFrequency::Monthly => amount,
            PayFrequency::Biweekly => amount.saturating_mul(dec!(26)) / dec!(12),
            PayFrequency::Weekly => amount.saturating_mul(dec!(52)) / dec!(12),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeKind {
    #[default]
    Salary,
    BusinessIncome,
    RentalIncome,
    InvestmentIncome,
    Freelancing,
    Pension,
    Benefits,
    Other,
}

/// One income stream in a household budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeItem {
    pub id: u32,
    pub kind: IncomeKind,
    pub amount: Money,
    #[serde(default)]
    pub frequency: PayFrequency,
}

impl IncomeItem {
    pub fn monthly_amount(&self) -> Money {
        self.frequency.to_monthly(self.amount).max(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_conversion() {
        assert_eq!(PayFrequency::Annual.to_monthly(dec!(120_000)), dec!(10_000));
        assert_eq!(PayFrequency::Monthly.to_monthly(dec!(5_000)), dec!(5_000));
        assert_eq!(PayFrequency::Biweekly.to_monthly(dec!(1_200)), dec!(2_600));
        assert_eq!(PayFrequency::Weekly.to_monthly(dec!(600)), dec!(2_600));
    }

    #[test]
    fn test_frequency_serde_names() {
        let f: PayFrequency = serde_json::from_str("\"biweekly\"").unwrap();
        assert_eq!(f, PayFrequency::Biweekly);
        assert_eq!(serde_json::to_string(&IncomeKind::RentalIncome).unwrap(), "\"rental_income\"");
    }
}
