use rust_decimal_macros::dec;
use serde::Serialize;

use crate::error::LoanCalcError;
use crate::types::Percent;
use crate::LoanCalcResult;

/// A loan product with its advertised annual rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanType {
    pub id: &'static str,
    pub name: &'static str,
    pub annual_rate_percent: Percent,
}

/// Loan products offered by the calculator, in display order.
pub const LOAN_TYPES: &[LoanType] = &[
    LoanType {
        id: "unsecured",
        name: "Unsecured",
        annual_rate_percent: dec!(12),
    },
    LoanType {
        id: "auto",
        name: "Auto Loan",
        annual_rate_percent: dec!(8.5),
    },
    LoanType {
        id: "mortgage",
        name: "Mortgage",
        annual_rate_percent: dec!(6.5),
    },
    LoanType {
        id: "payday",
        name: "Pay Day",
        annual_rate_percent: dec!(36),
    },
];

/// Product preselected when the calculator opens.
pub const DEFAULT_LOAN_TYPE: &str = "auto";

/// Look up a loan product by id (case-insensitive).
pub fn find_loan_type(id: &str) -> LoanCalcResult<&'static LoanType> {
    LOAN_TYPES
        .iter()
        .find(|t| t.id.eq_ignore_ascii_case(id))
        .ok_or_else(|| LoanCalcError::InvalidInput {
            field: "loan_type".into(),
            reason: format!(
                "Unknown loan type '{}'; expected one of: {}",
                id,
                LOAN_TYPES.iter().map(|t| t.id).collect::<Vec<_>>().join(", ")
            ),
        })
}
