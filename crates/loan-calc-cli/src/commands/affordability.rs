use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use loan_calc_core::affordability::analysis::{
    self, AffordabilityAnalysisInput, Finances,
};
use loan_calc_core::affordability::ratio::{self, AffordabilityInput, DtiBasis};
use loan_calc_core::types::with_metadata;

use crate::commands::amortization::resolve_rate;
use crate::input;

/// Ratio that drives the risk band
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BasisArg {
    /// Existing debt repayments / income
    Obligations,
    /// All expenses including debt repayments / income
    TotalExpenses,
}

impl From<BasisArg> for DtiBasis {
    fn from(arg: BasisArg) -> Self {
        match arg {
            BasisArg::Obligations => DtiBasis::Obligations,
            BasisArg::TotalExpenses => DtiBasis::TotalExpenses,
        }
    }
}

/// Arguments for the affordability ratio
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Monthly living expenses
    #[arg(long)]
    pub expenses: Option<Decimal>,

    /// Monthly repayments on existing debt
    #[arg(long, default_value = "0")]
    pub debt: Decimal,

    /// Ratio that drives the risk band
    #[arg(long, value_enum)]
    pub basis: Option<BasisArg>,
}

/// Arguments for the full affordability analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON/YAML input file, summary or itemised budget
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Monthly living expenses
    #[arg(long)]
    pub expenses: Option<Decimal>,

    /// Monthly repayments on existing debt
    #[arg(long, default_value = "0")]
    pub debt: Decimal,

    /// Annual interest rate of the new loan in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Use the rate of a loan type preset
    #[arg(long, conflicts_with = "rate")]
    pub loan_type: Option<String>,

    /// Term of the new loan in months
    #[arg(long, default_value = "60")]
    pub term: u32,

    /// Cash deposit available on top of the loan
    #[arg(long, default_value = "0")]
    pub deposit: Decimal,

    /// Ratio that drives the risk band
    #[arg(long, value_enum)]
    pub basis: Option<BasisArg>,
}

fn required_basis(basis: Option<BasisArg>) -> Result<DtiBasis, Box<dyn std::error::Error>> {
    basis
        .map(DtiBasis::from)
        .ok_or_else(|| "--basis is required: obligations or total-expenses".into())
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let request: AffordabilityInput =
        if let Some(request) = input::load::<AffordabilityInput>(args.input.as_deref())? {
            request
        } else {
            AffordabilityInput {
                monthly_income: args
                    .income
                    .ok_or("--income is required (or provide --input)")?,
                monthly_expenses: args
                    .expenses
                    .ok_or("--expenses is required (or provide --input)")?,
                existing_debt: args.debt,
                basis: required_basis(args.basis)?,
            }
        };

    let result = ratio::compute_affordability(
        request.monthly_income,
        request.monthly_expenses,
        request.existing_debt,
        request.basis,
    );

    let output = with_metadata(
        "Debt-to-income affordability (28% of available income)",
        &request,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AffordabilityAnalysisInput = if let Some(request) =
        input::load::<AffordabilityAnalysisInput>(args.input.as_deref())?
    {
        request
    } else {
        AffordabilityAnalysisInput {
            finances: Finances::Summary {
                monthly_income: args
                    .income
                    .ok_or("--income is required (or provide --input)")?,
                monthly_expenses: args
                    .expenses
                    .ok_or("--expenses is required (or provide --input)")?,
                existing_debt: args.debt,
            },
            annual_rate_percent: resolve_rate(args.rate, args.loan_type.as_deref())?,
            term_months: args.term,
            deposit: args.deposit,
            basis: required_basis(args.basis)?,
        }
    };

    let output = analysis::analyze_affordability(&request);
    Ok(serde_json::to_value(output)?)
}
