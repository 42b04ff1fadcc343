//! Household budget: income streams at mixed pay frequencies and monthly
//! expenses, reduced to the monthly figures the affordability calculation
//! consumes.

pub mod expenses;
pub mod income;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use expenses::{ExpenseItem, ExpenseKind};
pub use income::{IncomeItem, IncomeKind, PayFrequency};

use crate::error::LoanCalcError;
use crate::types::Money;
use crate::LoanCalcResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default)]
    pub income: Vec<IncomeItem>,
    #[serde(default)]
    pub expenses: Vec<ExpenseItem>,
}

impl Budget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an income stream and return its id.
    pub fn add_income(
        &mut self,
        kind: IncomeKind,
        amount: Money,
        frequency: PayFrequency,
    ) -> LoanCalcResult<u32> {
        require_positive("income.amount", amount)?;
        let id = next_id(self.income.iter().map(|i| i.id))?;
        self.income.push(IncomeItem {
            id,
            kind,
            amount,
            frequency,
        });
        Ok(id)
    }

    /// Add a monthly expense and return its id.
    ///
    /// Rejects a second entry of the same kind; `Other` entries are told apart
    /// by their custom name, which is dropped for every other kind.
    pub fn add_expense(
        &mut self,
        kind: ExpenseKind,
        amount: Money,
        custom_name: Option<String>,
    ) -> LoanCalcResult<u32> {
        require_positive("expense.amount", amount)?;
        let custom_name = if kind == ExpenseKind::Other {
            custom_name
        } else {
            None
        };

        if self
            .expenses
            .iter()
            .any(|e| e.duplicates(kind, custom_name.as_deref()))
        {
            return Err(LoanCalcError::DuplicateItem(match &custom_name {
                Some(name) => format!("expense {kind:?} '{name}' is already listed"),
                None => format!("expense {kind:?} is already listed"),
            }));
        }

        let id = next_id(self.expenses.iter().map(|e| e.id))?;
        self.expenses.push(ExpenseItem {
            id,
            kind,
            amount,
            custom_name,
        });
        Ok(id)
    }

    pub fn update_income(
        &mut self,
        id: u32,
        amount: Money,
        frequency: PayFrequency,
    ) -> LoanCalcResult<()> {
        require_non_negative("income.amount", amount)?;
        let item = self
            .income
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| LoanCalcError::ItemNotFound(format!("income #{id}")))?;
        item.amount = amount;
        item.frequency = frequency;
        Ok(())
    }

    pub fn update_expense(&mut self, id: u32, amount: Money) -> LoanCalcResult<()> {
        require_non_negative("expense.amount", amount)?;
        let item = self
            .expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| LoanCalcError::ItemNotFound(format!("expense #{id}")))?;
        item.amount = amount;
        Ok(())
    }

    pub fn remove_income(&mut self, id: u32) -> LoanCalcResult<IncomeItem> {
        let pos = self
            .income
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| LoanCalcError::ItemNotFound(format!("income #{id}")))?;
        Ok(self.income.remove(pos))
    }

    /// Remove an expense. The last remaining expense cannot be removed.
    pub fn remove_expense(&mut self, id: u32) -> LoanCalcResult<ExpenseItem> {
        let pos = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| LoanCalcError::ItemNotFound(format!("expense #{id}")))?;
        if self.expenses.len() <= 1 {
            return Err(LoanCalcError::InvalidInput {
                field: "expenses".into(),
                reason: "At least one expense must remain listed".into(),
            });
        }
        Ok(self.expenses.remove(pos))
    }

    /// All income converted to a monthly amount.
    pub fn total_monthly_income(&self) -> Money {
        saturating_sum(self.income.iter().map(IncomeItem::monthly_amount))
    }

    /// All listed expenses, debt repayments included.
    pub fn total_monthly_expenses(&self) -> Money {
        saturating_sum(self.expenses.iter().map(|e| e.amount.max(Decimal::ZERO)))
    }

    /// Repayments on existing credit.
    pub fn debt_obligations(&self) -> Money {
        saturating_sum(
            self.expenses
                .iter()
                .filter(|e| e.kind.is_debt_obligation())
                .map(|e| e.amount.max(Decimal::ZERO)),
        )
    }

    /// Expenses other than debt repayments.
    pub fn living_expenses(&self) -> Money {
        saturating_sum(
            self.expenses
                .iter()
                .filter(|e| !e.kind.is_debt_obligation())
                .map(|e| e.amount.max(Decimal::ZERO)),
        )
    }
}

fn next_id(ids: impl Iterator<Item = u32>) -> LoanCalcResult<u32> {
    match ids.max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or_else(|| LoanCalcError::InvalidInput {
            field: "id".into(),
            reason: format!("No id left after {max}"),
        }),
    }
}

fn saturating_sum(amounts: impl Iterator<Item = Money>) -> Money {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn require_positive(field: &str, amount: Money) -> LoanCalcResult<()> {
    if amount <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: field.into(),
            reason: "Amount must be greater than zero".into(),
        });
    }
    Ok(())
}

fn require_non_negative(field: &str, amount: Money) -> LoanCalcResult<()> {
    if amount < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: field.into(),
            reason: "Amount must not be negative".into(),
        });
    }
    Ok(())
}
