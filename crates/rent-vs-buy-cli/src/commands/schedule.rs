use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use rent_vs_buy_core::amortization;

/// Arguments for the standalone amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Financed principal
    #[arg(long, default_value = "200000")]
    pub principal: Decimal,

    /// Annual nominal rate, percent
    #[arg(long, default_value = "2.5")]
    pub annual_rate_pct: Decimal,

    /// Loan term in years
    #[arg(long, default_value = "25")]
    pub term_years: u32,

    /// Number of years to tabulate (defaults to the term)
    #[arg(long)]
    pub horizon_years: Option<u32>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.annual_rate_pct < Decimal::ZERO {
        return Err("annual rate must be >= 0".into());
    }

    let monthly_rate = args.annual_rate_pct / dec!(100) / dec!(12);
    let horizon = args.horizon_years.unwrap_or(args.term_years);
    let schedule = amortization::amortization_schedule(
        args.principal,
        monthly_rate,
        args.term_years * 12,
        horizon,
    )?;

    Ok(serde_json::to_value(schedule)?)
}
