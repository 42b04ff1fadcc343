mod commands;
mod input;
mod logging;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::affordability::{AffordabilityArgs, AnalyzeArgs};
use commands::amortization::{MaxPrincipalArgs, PaymentArgs, QuoteArgs, ScheduleArgs};

/// Loan payment, amortization and affordability calculations
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Loan payment, amortization and affordability calculations",
    long_about = "A CLI for fixed-rate loan calculations with decimal precision. \
                  Computes monthly payments, amortization schedules, the largest \
                  loan a payment can carry, loan quotes with deposits, and \
                  debt-to-income affordability from monthly figures or a budget."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Increase log verbosity on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Level monthly payment and totals for a loan
    Payment(PaymentArgs),
    /// Period-by-period amortization schedule
    Schedule(ScheduleArgs),
    /// Largest principal a monthly payment can retire
    MaxPrincipal(MaxPrincipalArgs),
    /// Affordability from monthly income, expenses and existing debt
    Affordability(AffordabilityArgs),
    /// Loan quote: deposit, first-month split, effective rate, payback date
    Quote(QuoteArgs),
    /// Max loan and affordable price from monthly figures or a budget file
    Analyze(AnalyzeArgs),
    /// List loan type presets and their rates
    Presets,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::amortization::run_payment(args),
        Commands::Schedule(args) => commands::amortization::run_schedule(args),
        Commands::MaxPrincipal(args) => commands::amortization::run_max_principal(args),
        Commands::Affordability(args) => commands::affordability::run_affordability(args),
        Commands::Quote(args) => commands::amortization::run_quote(args),
        Commands::Analyze(args) => commands::affordability::run_analyze(args),
        Commands::Presets => commands::amortization::run_presets(),
        Commands::Version => {
            println!("loancalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
