use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use rent_vs_buy_core::comparison::{self, PurchaseInput, RentalInput};

use crate::input;

/// Arguments for the rent-vs-buy comparison.
///
/// Defaults mirror a typical scenario: a 250k home with 20% down and a
/// 25-year mortgage at 2.5%, against an 800/month rental.
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON input file holding {"purchase": {...}, "rental": {...}}
    #[arg(long)]
    pub input: Option<String>,

    /// Property price
    #[arg(long, default_value = "250000")]
    pub property_price: Decimal,

    /// Down payment as a percentage of the price
    #[arg(long, default_value = "20")]
    pub down_payment_pct: Decimal,

    /// One-time purchase costs (notary, taxes, registry) as a percentage of the price
    #[arg(long, default_value = "10")]
    pub purchase_costs_pct: Decimal,

    /// Annual nominal mortgage rate, percent
    #[arg(long, default_value = "2.5")]
    pub mortgage_rate_pct: Decimal,

    /// Mortgage term in years
    #[arg(long, default_value = "25")]
    pub mortgage_term_years: u32,

    /// Expected annual property appreciation, percent (may be negative)
    #[arg(long, default_value = "5.5", allow_hyphen_values = true)]
    pub appreciation_pct: Decimal,

    /// Annual owner costs (maintenance, community fees, property tax) as a percentage of the price
    #[arg(long, default_value = "1.5")]
    pub owner_costs_pct: Decimal,

    /// Fixed annual home insurance cost
    #[arg(long, default_value = "0")]
    pub home_insurance_annual: Decimal,

    /// Fixed annual life insurance cost
    #[arg(long, default_value = "0")]
    pub life_insurance_annual: Decimal,

    /// Current monthly rent
    #[arg(long, default_value = "800")]
    pub monthly_rent: Decimal,

    /// Expected annual rent increase, percent
    #[arg(long, default_value = "2.0")]
    pub rent_growth_pct: Decimal,

    /// Expected annual return on invested savings, percent
    #[arg(long, default_value = "12.0")]
    pub investment_return_pct: Decimal,

    /// Comparison horizon in years (defaults to the mortgage term)
    #[arg(long)]
    pub horizon_years: Option<u32>,
}

#[derive(Deserialize)]
struct CompareFile {
    purchase: PurchaseInput,
    rental: RentalInput,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (purchase, rental) = if let Some(ref path) = args.input {
        let file: CompareFile = input::file::read_json(path)?;
        (file.purchase, file.rental)
    } else if let Some(data) = input::stdin::read_stdin()? {
        let file: CompareFile = serde_json::from_value(data)?;
        (file.purchase, file.rental)
    } else {
        let purchase = PurchaseInput {
            property_price: args.property_price,
            down_payment_pct: args.down_payment_pct,
            purchase_costs_pct: args.purchase_costs_pct,
            mortgage_rate_pct: args.mortgage_rate_pct,
            mortgage_term_years: args.mortgage_term_years,
            appreciation_pct: args.appreciation_pct,
            owner_costs_pct: args.owner_costs_pct,
            home_insurance_annual: args.home_insurance_annual,
            life_insurance_annual: args.life_insurance_annual,
        };
        let rental = RentalInput {
            monthly_rent: args.monthly_rent,
            rent_growth_pct: args.rent_growth_pct,
            investment_return_pct: args.investment_return_pct,
            horizon_years: args.horizon_years.unwrap_or(args.mortgage_term_years),
        };
        (purchase, rental)
    };

    let result = comparison::compare(&purchase, &rental)?;
    Ok(serde_json::to_value(result)?)
}
