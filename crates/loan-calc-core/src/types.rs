use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.005 = 0.5% per period).
pub type Rate = Decimal;

/// Rates and ratios expressed as percentages (6.5 = 6.5%), the way loan
/// terms are quoted to borrowers.
pub type Percent = Decimal;

/// Currency code
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    JMD,
    USD,
    GBP,
    EUR,
    CAD,
    Other(String),
}

impl Currency {
    pub fn code(&self) -> &str {
        match self {
            Currency::JMD => "JMD",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
            Currency::EUR => "EUR",
            Currency::CAD => "CAD",
            Currency::Other(code) => code,
        }
    }
}

/// `part / whole × 100`, or `None` when `whole` is zero or the ratio leaves
/// the `Decimal` range.
pub fn percent_of(part: Decimal, whole: Decimal) -> Option<Percent> {
    part.checked_div(whole)?.checked_mul(Decimal::ONE_HUNDRED)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
