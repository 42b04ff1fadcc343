pub mod annuity;
pub mod error;
pub mod format;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "affordability")]
pub mod affordability;

#[cfg(feature = "budget")]
pub mod budget;

pub use error::LoanCalcError;
pub use types::*;

/// Standard result type for all loan-calc operations
pub type LoanCalcResult<T> = Result<T, LoanCalcError>;
