mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::compare::CompareArgs;
use commands::schedule::ScheduleArgs;

/// Rent-vs-buy comparison with decimal precision
#[derive(Parser)]
#[command(
    name = "rvb",
    version,
    about = "Compare buying a home against renting and investing the difference",
    long_about = "Projects two long-horizon strategies year by year: purchasing a home \
                  via a fixed-rate mortgage, versus renting and investing the cash-flow \
                  difference. Produces an amortization schedule, per-year net-worth \
                  series for both sides, and a terminal summary."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full rent-vs-buy comparison
    Compare(CompareArgs),
    /// Print the mortgage amortization schedule on its own
    Schedule(ScheduleArgs),
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

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Version => {
            println!("rvb {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
