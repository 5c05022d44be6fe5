use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RentVsBuyError;
use crate::types::{compound, Money, Rate};
use crate::RentVsBuyResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The amortization state sampled at a 12-month boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleYear {
    pub year: u32,
    pub cumulative_principal_paid: Money,
    pub remaining_debt: Money,
}

/// Year-indexed schedule for a fixed-rate (French system) mortgage,
/// sampled from loan start (year 0) through the comparison horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub monthly_payment: Money,
    pub years: Vec<ScheduleYear>,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Fixed monthly payment under the standard annuity formula:
/// `P * r * (1+r)^n / ((1+r)^n - 1)`.
///
/// A zero rate is the interest-free degenerate case, amortized straight-line
/// as `P / n` rather than rejected.
pub fn monthly_payment(
    principal: Money,
    monthly_rate: Rate,
    term_months: u32,
) -> RentVsBuyResult<Money> {
    if principal < Decimal::ZERO {
        return Err(RentVsBuyError::InvalidInput {
            field: "principal".into(),
            reason: "financed principal must be >= 0".into(),
        });
    }
    if monthly_rate < Decimal::ZERO {
        return Err(RentVsBuyError::InvalidInput {
            field: "monthly_rate".into(),
            reason: "monthly rate must be >= 0".into(),
        });
    }
    if term_months == 0 {
        return Err(RentVsBuyError::InvalidInput {
            field: "term_months".into(),
            reason: "loan term must be > 0 months".into(),
        });
    }

    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(term_months));
    }

    let factor = compound(monthly_rate, term_months);
    Ok(principal * monthly_rate * factor / (factor - Decimal::ONE))
}

/// Amortize month by month and sample the schedule at every 12-month boundary
/// up to `horizon_years`.
///
/// The horizon is independent of the loan term: past the term the schedule
/// flattens at the fully-amortized values, and a horizon inside the term
/// simply stops early with debt still outstanding.
pub fn amortization_schedule(
    principal: Money,
    monthly_rate: Rate,
    term_months: u32,
    horizon_years: u32,
) -> RentVsBuyResult<AmortizationSchedule> {
    if horizon_years == 0 {
        return Err(RentVsBuyError::InvalidInput {
            field: "horizon_years".into(),
            reason: "comparison horizon must be > 0 years".into(),
        });
    }

    let payment = monthly_payment(principal, monthly_rate, term_months)?;

    let mut years = Vec::with_capacity(horizon_years as usize + 1);
    years.push(ScheduleYear {
        year: 0,
        cumulative_principal_paid: Decimal::ZERO,
        remaining_debt: principal,
    });

    let mut remaining = principal;
    let mut paid = Decimal::ZERO;

    for month in 1..=horizon_years * 12 {
        if month <= term_months {
            let interest = remaining * monthly_rate;
            // The final payment may overshoot by a rounding residue; never
            // let the balance go negative.
            let principal_portion = (payment - interest).min(remaining);
            remaining -= principal_portion;
            paid += principal_portion;

            if month == term_months {
                // Absorb sub-cent residue so the loan ends exactly at zero.
                paid += remaining;
                remaining = Decimal::ZERO;
            }
        }

        if month % 12 == 0 {
            years.push(ScheduleYear {
                year: month / 12,
                cumulative_principal_paid: paid,
                remaining_debt: remaining,
            });
        }
    }

    Ok(AmortizationSchedule {
        monthly_payment: payment,
        years,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
