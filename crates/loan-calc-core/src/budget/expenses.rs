use serde::{Deserialize, Serialize};

use crate::types::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    Grocery,
    CarLoan,
    Utilities,
    Insurance,
    CreditCard,
    RentMortgage,
    PhoneBill,
    Internet,
    GasFuel,
    Medical,
    Entertainment,
    DiningOut,
    Subscriptions,
    Childcare,
    StudentLoan,
    PersonalLoan,
    Transportation,
    Clothing,
    HomeMaintenance,
    Savings,
    Other,
}

impl ExpenseKind {
    /// Repayments on existing credit, as opposed to living costs.
    pub fn is_debt_obligation(self) -> bool {
        matches!(
            self,
            ExpenseKind::CarLoan
                | ExpenseKind::CreditCard
                | ExpenseKind::StudentLoan
                | ExpenseKind::PersonalLoan
        )
    }
}

/// One monthly outgoing in a household budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub id: u32,
    pub kind: ExpenseKind,
    pub amount: Money,
    /// Free-text label, only kept for `Other`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
}

impl ExpenseItem {
    /// Whether a new entry of `kind`/`custom_name` would repeat this one.
    ///
    /// Every kind may appear once, except `Other`, which may repeat under
    /// distinct custom names.
    pub fn duplicates(&self, kind: ExpenseKind, custom_name: Option<&str>) -> bool {
        self.kind == kind && (kind != ExpenseKind::Other || self.custom_name.as_deref() == custom_name)
    }
}
