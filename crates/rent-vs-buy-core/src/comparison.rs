use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::amortization_schedule;
use crate::error::RentVsBuyError;
use crate::types::{compound, with_metadata, ComputationOutput, Money, Percent};
use crate::RentVsBuyResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Purchase-side parameters for the comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseInput {
    pub property_price: Money,
    /// Down payment as a percentage of the price (0–100).
    pub down_payment_pct: Percent,
    /// One-time transaction costs (notary, taxes, registry) as a percentage of the price.
    pub purchase_costs_pct: Percent,
    /// Annual nominal mortgage rate.
    pub mortgage_rate_pct: Percent,
    pub mortgage_term_years: u32,
    /// Expected annual appreciation of the property. May be negative.
    pub appreciation_pct: Percent,
    /// Annual owner costs (maintenance, community fees, property tax) as a
    /// percentage of the property price.
    pub owner_costs_pct: Percent,
    pub home_insurance_annual: Money,
    pub life_insurance_annual: Money,
}

/// Rental-side parameters for the comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalInput {
    pub monthly_rent: Money,
    /// Expected annual rent increase.
    pub rent_growth_pct: Percent,
    /// Expected annual return on the renter's invested savings.
    pub investment_return_pct: Percent,
    /// Comparison window in years. Independent of the mortgage term.
    pub horizon_years: u32,
}

/// Which strategy ends the horizon with the larger net worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Buy,
    Rent,
}

/// One year of the side-by-side projection. Year 0 is the initialization row
/// (purchase closed, renter's opening capital invested, no running costs yet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyProjection {
    pub year: u32,
    pub property_value: Money,
    pub cumulative_principal_paid: Money,
    pub remaining_debt: Money,
    pub owner_annual_cost: Money,
    pub owner_cumulative_cost: Money,
    pub net_ownership_equity: Money,
    pub annual_rent_cost: Money,
    pub cumulative_rent_cost: Money,
    pub cash_invested_this_year: Money,
    pub cumulative_cash_invested: Money,
    pub investment_value: Money,
    pub net_renter_equity: Money,
}

/// Terminal-year aggregates of the comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub down_payment: Money,
    pub purchase_costs: Money,
    pub financed_principal: Money,
    pub monthly_payment: Money,
    /// Down payment plus purchase costs; seeds both the buyer's cumulative
    /// cost and the renter's opening investment.
    pub initial_outlay: Money,
    pub horizon_years: u32,
    pub final_property_value: Money,
    pub final_remaining_debt: Money,
    pub net_ownership_equity: Money,
    pub net_renter_equity: Money,
    pub cumulative_owner_cost: Money,
    pub cumulative_rent_cost: Money,
    /// net_renter_equity - net_ownership_equity
    pub equity_difference: Money,
    /// cumulative_rent_cost - cumulative_owner_cost
    pub cost_difference: Money,
    pub advantaged: Strategy,
}

/// Full output of `compare`: terminal summary plus the year-by-year table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub summary: ComparisonSummary,
    pub projections: Vec<YearlyProjection>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Compare buying a home via mortgage against renting and investing the
/// cash-flow difference, year by year over the rental horizon.
///
/// The renter's portfolio compounds before the year's contribution lands,
/// and a year where renting costs more than owning contributes nothing
/// (the delta is floored at zero, never a withdrawal).
pub fn compare(
    purchase: &PurchaseInput,
    rental: &RentalInput,
) -> RentVsBuyResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // --- Validation ---
    if purchase.property_price <= Decimal::ZERO {
        return Err(RentVsBuyError::InvalidInput {
            field: "property_price".into(),
            reason: "property price must be > 0".into(),
        });
    }
    if purchase.mortgage_term_years == 0 {
        return Err(RentVsBuyError::InvalidInput {
            field: "mortgage_term_years".into(),
            reason: "mortgage term must be > 0 years".into(),
        });
    }
    if rental.horizon_years == 0 {
        return Err(RentVsBuyError::InvalidInput {
            field: "horizon_years".into(),
            reason: "comparison horizon must be > 0 years".into(),
        });
    }
    if purchase.down_payment_pct < Decimal::ZERO || purchase.down_payment_pct > dec!(100) {
        return Err(RentVsBuyError::InvalidInput {
            field: "down_payment_pct".into(),
            reason: "down payment must be between 0 and 100 percent".into(),
        });
    }
    if purchase.mortgage_rate_pct < Decimal::ZERO {
        return Err(RentVsBuyError::InvalidInput {
            field: "mortgage_rate_pct".into(),
            reason: "mortgage rate must be >= 0".into(),
        });
    }
    if rental.monthly_rent <= Decimal::ZERO {
        return Err(RentVsBuyError::InvalidInput {
            field: "monthly_rent".into(),
            reason: "monthly rent must be > 0".into(),
        });
    }

    let pct = dec!(100);
    let twelve = dec!(12);

    // --- Upfront figures ---
    let down_payment = purchase.property_price * purchase.down_payment_pct / pct;
    let purchase_costs = purchase.property_price * purchase.purchase_costs_pct / pct;
    let financed_principal = purchase.property_price - down_payment;
    let initial_outlay = down_payment + purchase_costs;

    // --- Mortgage schedule over the comparison horizon ---
    let monthly_rate = purchase.mortgage_rate_pct / pct / twelve;
    let term_months = purchase.mortgage_term_years * 12;
    let schedule = amortization_schedule(
        financed_principal,
        monthly_rate,
        term_months,
        rental.horizon_years,
    )?;
    let mortgage_annual_payment = schedule.monthly_payment * twelve;

    if rental.horizon_years < purchase.mortgage_term_years {
        warnings.push(format!(
            "Comparison window ends after {} years with the {}-year mortgage still outstanding",
            rental.horizon_years, purchase.mortgage_term_years
        ));
    }

    let appreciation = purchase.appreciation_pct / pct;
    let rent_growth = rental.rent_growth_pct / pct;
    let investment_return = rental.investment_return_pct / pct;

    // Fixed annual carrying cost of ownership, owed every year regardless of
    // mortgage status.
    let owner_annual_cost = purchase.property_price * purchase.owner_costs_pct / pct
        + purchase.home_insurance_annual
        + purchase.life_insurance_annual;

    // --- Year 0: initialization row ---
    let mut projections: Vec<YearlyProjection> =
        Vec::with_capacity(rental.horizon_years as usize + 1);
    projections.push(YearlyProjection {
        year: 0,
        property_value: purchase.property_price,
        cumulative_principal_paid: Decimal::ZERO,
        remaining_debt: financed_principal,
        owner_annual_cost: Decimal::ZERO,
        owner_cumulative_cost: initial_outlay,
        net_ownership_equity: purchase.property_price - financed_principal,
        annual_rent_cost: Decimal::ZERO,
        cumulative_rent_cost: Decimal::ZERO,
        cash_invested_this_year: initial_outlay,
        cumulative_cash_invested: initial_outlay,
        investment_value: initial_outlay,
        net_renter_equity: initial_outlay,
    });

    let mut owner_cumulative_cost = initial_outlay;
    let mut cumulative_rent_cost = Decimal::ZERO;
    let mut cumulative_cash_invested = initial_outlay;
    let mut investment_value = initial_outlay;
    let mut final_property_value = purchase.property_price;
    let mut final_remaining_debt = financed_principal;
    let mut final_ownership_equity = purchase.property_price - financed_principal;

    // --- Years 1..=horizon ---
    for year in 1..=rental.horizon_years {
        // Appreciation compounds from the original price, not off the
        // previous year's value.
        let property_value = purchase.property_price * compound(appreciation, year);

        let entry = &schedule.years[year as usize];
        let net_ownership_equity = property_value - entry.remaining_debt;

        let mortgage_cost = if year <= purchase.mortgage_term_years {
            mortgage_annual_payment
        } else {
            Decimal::ZERO
        };
        owner_cumulative_cost += owner_annual_cost + mortgage_cost;

        // Year 1 pays the base rent; growth applies from year 2 on.
        let annual_rent_cost = rental.monthly_rent * compound(rent_growth, year - 1) * twelve;
        cumulative_rent_cost += annual_rent_cost;

        // A renter invests only what they save relative to the owner's
        // outlay this year; a costlier rental year contributes nothing.
        let cash_invested_this_year =
            (owner_annual_cost + mortgage_cost - annual_rent_cost).max(Decimal::ZERO);

        // Grow the prior balance first: this year's contribution has not yet
        // earned a return.
        investment_value =
            investment_value * (Decimal::ONE + investment_return) + cash_invested_this_year;
        cumulative_cash_invested += cash_invested_this_year;

        final_property_value = property_value;
        final_remaining_debt = entry.remaining_debt;
        final_ownership_equity = net_ownership_equity;

        projections.push(YearlyProjection {
            year,
            property_value,
            cumulative_principal_paid: entry.cumulative_principal_paid,
            remaining_debt: entry.remaining_debt,
            owner_annual_cost,
            owner_cumulative_cost,
            net_ownership_equity,
            annual_rent_cost,
            cumulative_rent_cost,
            cash_invested_this_year,
            cumulative_cash_invested,
            investment_value,
            net_renter_equity: investment_value,
        });
    }

    // --- Summary at the horizon ---
    let net_renter_equity = investment_value;
    let advantaged = if net_renter_equity > final_ownership_equity {
        Strategy::Rent
    } else {
        Strategy::Buy
    };

    let summary = ComparisonSummary {
        down_payment,
        purchase_costs,
        financed_principal,
        monthly_payment: schedule.monthly_payment,
        initial_outlay,
        horizon_years: rental.horizon_years,
        final_property_value,
        final_remaining_debt,
        net_ownership_equity: final_ownership_equity,
        net_renter_equity,
        cumulative_owner_cost: owner_cumulative_cost,
        cumulative_rent_cost,
        equity_difference: net_renter_equity - final_ownership_equity,
        cost_difference: cumulative_rent_cost - owner_cumulative_cost,
        advantaged,
    };

    let output = ComparisonOutput {
        summary,
        projections,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rent vs buy comparison (French amortization schedule, annual net-worth projection)",
        &serde_json::json!({
            "property_price": purchase.property_price.to_string(),
            "down_payment_pct": purchase.down_payment_pct.to_string(),
            "mortgage_rate_pct": purchase.mortgage_rate_pct.to_string(),
            "mortgage_term_years": purchase.mortgage_term_years,
            "appreciation_pct": purchase.appreciation_pct.to_string(),
            "monthly_rent": rental.monthly_rent.to_string(),
            "rent_growth_pct": rental.rent_growth_pct.to_string(),
            "investment_return_pct": rental.investment_return_pct.to_string(),
            "horizon_years": rental.horizon_years,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// The worked reference scenario: 250k home, 20% down, 10% costs,
    /// 2.5% mortgage over 25 years, 5.5% appreciation, 1.5% owner costs;
    /// 800/month rent growing 2%/yr, 12% investment return, 25-year window.
    fn reference_purchase() -> PurchaseInput {
        PurchaseInput {
            property_price: dec!(250_000),
            down_payment_pct: dec!(20),
            purchase_costs_pct: dec!(10),
            mortgage_rate_pct: dec!(2.5),
            mortgage_term_years: 25,
            appreciation_pct: dec!(5.5),
            owner_costs_pct: dec!(1.5),
            home_insurance_annual: Decimal::ZERO,
            life_insurance_annual: Decimal::ZERO,
        }
    }

    fn reference_rental() -> RentalInput {
        RentalInput {
            monthly_rent: dec!(800),
            rent_growth_pct: dec!(2.0),
            investment_return_pct: dec!(12.0),
            horizon_years: 25,
        }
    }

    // ---------------------------------------------------------------
    // 1. Upfront figures of the reference scenario
    // ---------------------------------------------------------------
    #[test]
    fn test_reference_upfront_figures() {
        let result = compare(&reference_purchase(), &reference_rental()).unwrap();
        let summary = &result.result.summary;

        assert_eq!(summary.down_payment, dec!(50_000));
        assert_eq!(summary.purchase_costs, dec!(25_000));
        assert_eq!(summary.financed_principal, dec!(200_000));
        assert_eq!(summary.initial_outlay, dec!(75_000));

        let diff = (summary.monthly_payment - dec!(897.23)).abs();
        assert!(diff < dec!(0.01), "payment={}", summary.monthly_payment);
    }

    // ---------------------------------------------------------------
    // 2. Terminal property value and fully amortized debt
    // ---------------------------------------------------------------
    #[test]
    fn test_reference_terminal_values() {
        let result = compare(&reference_purchase(), &reference_rental()).unwrap();
        let summary = &result.result.summary;

        // 250_000 * 1.055^25 ≈ 953_348
        let expected = dec!(250_000) * compound(dec!(0.055), 25);
        assert_eq!(summary.final_property_value, expected);
        assert!(summary.final_property_value > dec!(950_000));
        assert!(summary.final_property_value < dec!(957_000));

        assert_eq!(summary.final_remaining_debt, Decimal::ZERO);
        assert_eq!(summary.net_ownership_equity, summary.final_property_value);
    }

    // ---------------------------------------------------------------
    // 3. Horizon shorter than the term: debt matches the schedule
    // ---------------------------------------------------------------
    #[test]
    fn test_short_horizon_reports_outstanding_debt() {
        let mut rental = reference_rental();
        rental.horizon_years = 10;

        let result = compare(&reference_purchase(), &rental).unwrap();
        let summary = &result.result.summary;

        assert!(summary.final_remaining_debt > Decimal::ZERO);

        // Must equal the engine's own month-120 schedule value.
        let monthly_rate = dec!(2.5) / dec!(100) / dec!(12);
        let schedule =
            amortization_schedule(dec!(200_000), monthly_rate, 300, 10).unwrap();
        assert_eq!(
            summary.final_remaining_debt,
            schedule.years[10].remaining_debt
        );

        assert!(!result.warnings.is_empty());
    }

    // ---------------------------------------------------------------
    // 4. Equity identity holds for every year
    // ---------------------------------------------------------------
    #[test]
    fn test_equity_identity_per_year() {
        let result = compare(&reference_purchase(), &reference_rental()).unwrap();

        for row in &result.result.projections {
            let expected = row.property_value - row.remaining_debt;
            assert_eq!(row.net_ownership_equity, expected, "year {}", row.year);
        }
    }

    // ---------------------------------------------------------------
    // 5. Zero appreciation: property value stays at the price
    // ---------------------------------------------------------------
    #[test]
    fn test_zero_appreciation_constant_value() {
        let mut purchase = reference_purchase();
        purchase.appreciation_pct = Decimal::ZERO;

        let result = compare(&purchase, &reference_rental()).unwrap();
        for row in &result.result.projections {
            assert_eq!(row.property_value, dec!(250_000), "year {}", row.year);
        }
    }

    // ---------------------------------------------------------------
    // 6. One-year horizon: exactly one non-initial row
    // ---------------------------------------------------------------
    #[test]
    fn test_one_year_horizon() {
        let mut rental = reference_rental();
        rental.horizon_years = 1;

        let result = compare(&reference_purchase(), &rental).unwrap();
        assert_eq!(result.result.projections.len(), 2);
        assert_eq!(result.result.projections[1].year, 1);
    }

    // ---------------------------------------------------------------
    // 7. Idempotence: identical inputs, identical outputs
    // ---------------------------------------------------------------
    #[test]
    fn test_idempotent() {
        let a = compare(&reference_purchase(), &reference_rental()).unwrap();
        let b = compare(&reference_purchase(), &reference_rental()).unwrap();

        let a_json = serde_json::to_value(&a.result).unwrap();
        let b_json = serde_json::to_value(&b.result).unwrap();
        assert_eq!(a_json, b_json);
    }

    // ---------------------------------------------------------------
    // 8. Year 0 seeds both sides with the initial outlay
    // ---------------------------------------------------------------
    #[test]
    fn test_year_zero_seeding() {
        let result = compare(&reference_purchase(), &reference_rental()).unwrap();
        let year0 = &result.result.projections[0];

        assert_eq!(year0.owner_cumulative_cost, dec!(75_000));
        assert_eq!(year0.investment_value, dec!(75_000));
        assert_eq!(year0.cumulative_cash_invested, dec!(75_000));
        assert_eq!(year0.remaining_debt, dec!(200_000));
        assert_eq!(year0.net_ownership_equity, dec!(50_000));
        assert_eq!(year0.annual_rent_cost, Decimal::ZERO);
    }

    // ---------------------------------------------------------------
    // 9. Rent grows from year 2: year 1 pays the base rent
    // ---------------------------------------------------------------
    #[test]
    fn test_rent_growth_from_year_two() {
        let result = compare(&reference_purchase(), &reference_rental()).unwrap();
        let rows = &result.result.projections;

        assert_eq!(rows[1].annual_rent_cost, dec!(9_600));
        assert_eq!(rows[2].annual_rent_cost, dec!(9_600) * dec!(1.02));
        assert_eq!(
            rows[2].cumulative_rent_cost,
            rows[1].annual_rent_cost + rows[2].annual_rent_cost
        );
    }

    // ---------------------------------------------------------------
    // 10. Investment order: grow the prior balance, then contribute
    // ---------------------------------------------------------------
    #[test]
    fn test_investment_grows_before_contribution() {
        let mut rental = reference_rental();
        rental.horizon_years = 1;

        let result = compare(&reference_purchase(), &rental).unwrap();
        let rows = &result.result.projections;

        let owner_outlay =
            rows[1].owner_annual_cost + result.result.summary.monthly_payment * dec!(12);
        let delta = (owner_outlay - rows[1].annual_rent_cost).max(Decimal::ZERO);
        let expected = dec!(75_000) * dec!(1.12) + delta;
        assert_eq!(rows[1].investment_value, expected);
    }

    // ---------------------------------------------------------------
    // 11. Delta floors at zero when renting is the costlier year
    // ---------------------------------------------------------------
    #[test]
    fn test_delta_floored_at_zero() {
        let mut purchase = reference_purchase();
        purchase.owner_costs_pct = Decimal::ZERO;

        let mut rental = reference_rental();
        rental.monthly_rent = dec!(3_000); // 36k/yr, far above the ~10.8k mortgage
        rental.horizon_years = 5;

        let result = compare(&purchase, &rental).unwrap();
        for row in result.result.projections.iter().skip(1) {
            assert_eq!(row.cash_invested_this_year, Decimal::ZERO, "year {}", row.year);
        }
        // Nothing beyond the opening capital was ever contributed.
        assert_eq!(
            result.result.summary.net_renter_equity,
            dec!(75_000) * compound(dec!(0.12), 5)
        );
    }

    // ---------------------------------------------------------------
    // 12. Mortgage stops contributing to owner cost after the term
    // ---------------------------------------------------------------
    #[test]
    fn test_mortgage_cost_stops_after_term() {
        let mut purchase = reference_purchase();
        purchase.mortgage_term_years = 10;

        let mut rental = reference_rental();
        rental.horizon_years = 15;

        let result = compare(&purchase, &rental).unwrap();
        let rows = &result.result.projections;

        let annual_fixed = dec!(250_000) * dec!(1.5) / dec!(100);
        // Inside the term the yearly increment includes the mortgage.
        let within = rows[5].owner_cumulative_cost - rows[4].owner_cumulative_cost;
        assert!(within > annual_fixed);
        // Past the term only the fixed carrying cost accrues.
        let beyond = rows[14].owner_cumulative_cost - rows[13].owner_cumulative_cost;
        assert_eq!(beyond, annual_fixed);
    }

    // ---------------------------------------------------------------
    // 13. Advantaged strategy flips with the investment return
    // ---------------------------------------------------------------
    #[test]
    fn test_advantaged_strategy() {
        // 12% return on 75k over 25 years dwarfs the property equity.
        let result = compare(&reference_purchase(), &reference_rental()).unwrap();
        assert_eq!(result.result.summary.advantaged, Strategy::Rent);
        assert!(result.result.summary.equity_difference > Decimal::ZERO);

        // With no return on savings the house wins.
        let mut rental = reference_rental();
        rental.investment_return_pct = Decimal::ZERO;
        let result = compare(&reference_purchase(), &rental).unwrap();
        assert_eq!(result.result.summary.advantaged, Strategy::Buy);
        assert!(result.result.summary.equity_difference < Decimal::ZERO);
    }

    // ---------------------------------------------------------------
    // 14. Summary mirrors the last projection row
    // ---------------------------------------------------------------
    #[test]
    fn test_summary_matches_last_row() {
        let result = compare(&reference_purchase(), &reference_rental()).unwrap();
        let summary = &result.result.summary;
        let last = result.result.projections.last().unwrap();

        assert_eq!(summary.final_property_value, last.property_value);
        assert_eq!(summary.final_remaining_debt, last.remaining_debt);
        assert_eq!(summary.net_ownership_equity, last.net_ownership_equity);
        assert_eq!(summary.net_renter_equity, last.investment_value);
        assert_eq!(summary.cumulative_owner_cost, last.owner_cumulative_cost);
        assert_eq!(summary.cumulative_rent_cost, last.cumulative_rent_cost);
        assert_eq!(
            summary.cost_difference,
            last.cumulative_rent_cost - last.owner_cumulative_cost
        );
    }

    // ---------------------------------------------------------------
    // 15. Zero-rate mortgage is a valid degenerate case
    // ---------------------------------------------------------------
    #[test]
    fn test_zero_rate_mortgage() {
        let mut purchase = reference_purchase();
        purchase.mortgage_rate_pct = Decimal::ZERO;

        let result = compare(&purchase, &reference_rental()).unwrap();
        let summary = &result.result.summary;

        // 200k / 300 months
        assert_eq!(summary.monthly_payment, dec!(200_000) / dec!(300));
        assert_eq!(summary.final_remaining_debt, Decimal::ZERO);
    }

    // ---------------------------------------------------------------
    // Validation errors
    // ---------------------------------------------------------------
    #[test]
    fn test_validation_nonpositive_price() {
        let mut purchase = reference_purchase();
        purchase.property_price = Decimal::ZERO;
        assert!(compare(&purchase, &reference_rental()).is_err());
    }

    #[test]
    fn test_validation_zero_term() {
        let mut purchase = reference_purchase();
        purchase.mortgage_term_years = 0;
        assert!(compare(&purchase, &reference_rental()).is_err());
    }

    #[test]
    fn test_validation_zero_horizon() {
        let mut rental = reference_rental();
        rental.horizon_years = 0;
        assert!(compare(&reference_purchase(), &rental).is_err());
    }

    #[test]
    fn test_validation_down_payment_range() {
        let mut purchase = reference_purchase();
        purchase.down_payment_pct = dec!(101);
        assert!(compare(&purchase, &reference_rental()).is_err());
    }

    #[test]
    fn test_validation_negative_rate() {
        let mut purchase = reference_purchase();
        purchase.mortgage_rate_pct = dec!(-0.5);
        assert!(compare(&purchase, &reference_rental()).is_err());
    }

    #[test]
    fn test_validation_nonpositive_rent() {
        let mut rental = reference_rental();
        rental.monthly_rent = Decimal::ZERO;
        assert!(compare(&reference_purchase(), &rental).is_err());
    }
}
