//! Spreads a cost total over the project duration.
//!
//! The total is distributed in equal annual amounts. Year `k` (0-based)
//! carries:
//!
//! - `inflated = nominal * (1 + i)^k`
//! - `discounted = nominal / (1 + d)^k`
//! - `cumulative`: running sum of nominal spend
//!
//! The projection is regenerated from its inputs, never patched.

use crate::errors::{CostError, CostResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lower bound (exclusive) and upper bound (inclusive) of accepted
/// percentage rates.
const MIN_RATE_PCT: f64 = -100.0;
const MAX_RATE_PCT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashflowYear {
    pub year: i32,
    pub nominal: f64,
    pub inflated: f64,
    pub discounted: f64,
    pub cumulative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowProjection {
    pub years: Vec<CashflowYear>,
    pub npv: f64,
}

impl CashflowProjection {
    pub fn total_nominal(&self) -> f64 {
        self.years.iter().map(|y| y.nominal).sum()
    }

    pub fn total_inflated(&self) -> f64 {
        self.years.iter().map(|y| y.inflated).sum()
    }

    pub fn total_discounted(&self) -> f64 {
        self.years.iter().map(|y| y.discounted).sum()
    }

    pub fn duration_years(&self) -> usize {
        self.years.len()
    }

    pub fn final_year(&self) -> Option<i32> {
        self.years.last().map(|y| y.year)
    }
}

/// Reject rates that are not finite or fall outside (-100, 100].
pub fn validate_rate(name: &str, value_pct: f64) -> CostResult<f64> {
    if value_pct.is_finite() && value_pct > MIN_RATE_PCT && value_pct <= MAX_RATE_PCT {
        Ok(value_pct)
    } else {
        Err(CostError::invalid_rate(name, value_pct))
    }
}

pub fn validate_duration(duration_years: i32) -> CostResult<i32> {
    if duration_years > 0 {
        Ok(duration_years)
    } else {
        Err(CostError::InvalidDuration {
            duration: duration_years,
        })
    }
}

fn validate_amount(name: &str, value: f64) -> CostResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CostError::invalid_amount(name, value))
    }
}

fn growth(rate_pct: f64, years: i32) -> f64 {
    (1.0 + rate_pct / 100.0).powi(years)
}

/// Distribute `total_cost` over `duration_years` starting at `start_year`.
pub fn project(
    total_cost: f64,
    start_year: i32,
    duration_years: i32,
    inflation_pct: f64,
    discount_pct: f64,
) -> CostResult<CashflowProjection> {
    let total_cost = validate_amount("total cost", total_cost)?;
    let duration = validate_duration(duration_years)?;
    let inflation_pct = validate_rate("inflation", inflation_pct)?;
    let discount_pct = validate_rate("discount", discount_pct)?;
    // Last calendar year must fit in i32
    start_year
        .checked_add(duration - 1)
        .ok_or(CostError::InvalidDuration { duration })?;

    let annual = total_cost / f64::from(duration);

    let years: Vec<CashflowYear> = (0..duration)
        .scan(0.0, |cumulative, k| {
            *cumulative += annual;
            Some(CashflowYear {
                year: start_year + k,
                nominal: annual,
                inflated: annual * growth(inflation_pct, k),
                discounted: annual / growth(discount_pct, k),
                cumulative: *cumulative,
            })
        })
        .collect();

    let npv = net_present_value(total_cost, duration, discount_pct)?;
    debug!(total_cost, duration, start_year, npv, "Projected cashflow");

    Ok(CashflowProjection { years, npv })
}

/// NPV of `total_cost` spread evenly over `duration_years`, year 0
/// undiscounted.
pub fn net_present_value(total_cost: f64, duration_years: i32, discount_pct: f64) -> CostResult<f64> {
    let total_cost = validate_amount("total cost", total_cost)?;
    let duration = validate_duration(duration_years)?;
    let discount_pct = validate_rate("discount", discount_pct)?;

    let annual = total_cost / f64::from(duration);
    Ok((0..duration).map(|k| annual / growth(discount_pct, k)).sum())
}
