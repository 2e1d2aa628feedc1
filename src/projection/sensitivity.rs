//! What-if scenarios over the grand total.
//!
//! Two families, never combined in a single scenario:
//!
//! - unit factor scenarios scale the base cost by a multiplier and discount it
//!   over a fixed horizon of [`UNIT_FACTOR_NPV_HORIZON_YEARS`];
//! - deferral scenarios grow the base cost by
//!   [`DEFERRAL_STORAGE_GROWTH_PER_YEAR`] per deferred year and discount it
//!   over the deferral period.
//!
//! A bad scenario parameter is recorded in [`SensitivityReport::rejected`]
//! and the remaining scenarios are still evaluated.

use super::cashflow::validate_rate;
use crate::errors::{CostError, CostResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Discounting horizon used by unit factor scenarios, independent of the
/// actual project duration.
// TODO: discount over the project schedule once the horizon for unit factor
// scenarios is agreed with the cost engineers.
pub const UNIT_FACTOR_NPV_HORIZON_YEARS: i32 = 5;

/// Storage and maintenance cost growth per deferred year (1%).
pub const DEFERRAL_STORAGE_GROWTH_PER_YEAR: f64 = 0.01;

pub const DEFAULT_UNIT_FACTOR_MULTIPLIERS: [f64; 4] = [0.8, 0.9, 1.1, 1.2];
pub const DEFAULT_DEFERRAL_YEARS: [i32; 4] = [5, 10, 20, 30];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    UnitFactor,
    Deferral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityScenario {
    pub name: String,
    pub kind: ScenarioKind,
    pub unit_factor_multiplier: f64,
    pub deferral_years: i32,
    pub total_cost: f64,
    pub npv: f64,
    pub percent_change_vs_base: f64,
}

/// Scenario parameter that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedScenario {
    pub kind: ScenarioKind,
    pub parameter: String,
    pub error: CostError,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityReport {
    pub base_cost: f64,
    pub discount_rate: f64,
    /// Unit factor scenarios first, then deferrals, each in input order
    pub scenarios: Vec<SensitivityScenario>,
    pub rejected: Vec<RejectedScenario>,
}

impl SensitivityReport {
    /// Scenario with the lowest NPV across both families.
    pub fn best(&self) -> Option<&SensitivityScenario> {
        self.scenarios.iter().min_by(|a, b| by_npv(a, b))
    }

    /// Scenarios ordered by ascending NPV. Ties keep input order.
    pub fn ranked(&self) -> Vec<&SensitivityScenario> {
        let mut ranked: Vec<_> = self.scenarios.iter().collect();
        ranked.sort_by(|a, b| by_npv(a, b));
        ranked
    }

    pub fn of_kind(&self, kind: ScenarioKind) -> impl Iterator<Item = &SensitivityScenario> {
        self.scenarios.iter().filter(move |s| s.kind == kind)
    }
}

fn by_npv(a: &SensitivityScenario, b: &SensitivityScenario) -> Ordering {
    a.npv.total_cmp(&b.npv)
}

fn percent_change(adjusted: f64, base: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        (adjusted - base) / base * 100.0
    }
}

fn discount(amount: f64, discount_pct: f64, years: i32) -> f64 {
    amount / (1.0 + discount_pct / 100.0).powi(years)
}

fn unit_factor_scenario(
    base_cost: f64,
    discount_pct: f64,
    multiplier: f64,
) -> CostResult<SensitivityScenario> {
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(CostError::invalid_amount("unit factor multiplier", multiplier));
    }

    let adjusted = base_cost * multiplier;
    Ok(SensitivityScenario {
        name: format!("Unit factors x{multiplier}"),
        kind: ScenarioKind::UnitFactor,
        unit_factor_multiplier: multiplier,
        deferral_years: 0,
        total_cost: adjusted,
        npv: discount(adjusted, discount_pct, UNIT_FACTOR_NPV_HORIZON_YEARS),
        percent_change_vs_base: percent_change(adjusted, base_cost),
    })
}

fn deferral_scenario(
    base_cost: f64,
    discount_pct: f64,
    years: i32,
) -> CostResult<SensitivityScenario> {
    if years < 0 {
        return Err(CostError::InvalidDuration { duration: years });
    }

    let storage_factor = 1.0 + f64::from(years) * DEFERRAL_STORAGE_GROWTH_PER_YEAR;
    let adjusted = base_cost * storage_factor;
    Ok(SensitivityScenario {
        name: format!("Deferred {years} years"),
        kind: ScenarioKind::Deferral,
        unit_factor_multiplier: 1.0,
        deferral_years: years,
        total_cost: adjusted,
        npv: discount(adjusted, discount_pct, years),
        percent_change_vs_base: percent_change(adjusted, base_cost),
    })
}

/// Evaluate every unit factor multiplier and every deferral period against
/// `base_cost`.
///
/// Fails only when the shared inputs are unusable: a non-finite base cost
/// or a discount rate outside (-100, 100].
pub fn run_scenarios(
    base_cost: f64,
    discount_pct: f64,
    unit_factor_multipliers: &[f64],
    deferral_years: &[i32],
) -> CostResult<SensitivityReport> {
    if !base_cost.is_finite() {
        return Err(CostError::invalid_amount("base cost", base_cost));
    }
    let discount_pct = validate_rate("discount", discount_pct)?;

    let mut scenarios = Vec::with_capacity(unit_factor_multipliers.len() + deferral_years.len());
    let mut rejected = Vec::new();

    let unit_factor_results = unit_factor_multipliers.iter().map(|&m| {
        (
            ScenarioKind::UnitFactor,
            m.to_string(),
            unit_factor_scenario(base_cost, discount_pct, m),
        )
    });
    let deferral_results = deferral_years.iter().map(|&years| {
        (
            ScenarioKind::Deferral,
            years.to_string(),
            deferral_scenario(base_cost, discount_pct, years),
        )
    });

    for (kind, parameter, result) in unit_factor_results.chain(deferral_results) {
        match result {
            Ok(scenario) => scenarios.push(scenario),
            Err(error) => {
                warn!(?kind, parameter = %parameter, error = %error, "Rejected scenario");
                rejected.push(RejectedScenario {
                    kind,
                    parameter,
                    error,
                });
            }
        }
    }

    debug!(
        evaluated = scenarios.len(),
        rejected = rejected.len(),
        "Ran sensitivity scenarios"
    );

    Ok(SensitivityReport {
        base_cost,
        discount_rate: discount_pct,
        scenarios,
        rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6 * b.abs().max(1.0)
    }

    #[test]
    fn test_unit_factor_horizon_is_five_years() {
        assert_eq!(UNIT_FACTOR_NPV_HORIZON_YEARS, 5);

        let report = run_scenarios(1_000_000.0, 3.0, &[1.1], &[]).unwrap();
        let scenario = &report.scenarios[0];

        assert!(close(scenario.total_cost, 1_100_000.0));
        assert!(close(scenario.npv, 1_100_000.0 / 1.03f64.powi(5)));
        assert!(close(scenario.percent_change_vs_base, 10.0));
    }

    #[test]
    fn test_deferral_grows_cost_and_discounts_over_deferral() {
        let report = run_scenarios(1_000_000.0, 3.0, &[], &[10]).unwrap();
        let scenario = &report.scenarios[0];

        assert_eq!(scenario.kind, ScenarioKind::Deferral);
        assert!(close(scenario.total_cost, 1_100_000.0));
        assert!(close(scenario.npv, 1_100_000.0 / 1.03f64.powi(10)));
        assert_eq!(scenario.unit_factor_multiplier, 1.0);
    }

    #[test]
    fn test_families_are_not_combined() {
        let report = run_scenarios(
            500.0,
            4.0,
            &DEFAULT_UNIT_FACTOR_MULTIPLIERS,
            &DEFAULT_DEFERRAL_YEARS,
        )
        .unwrap();

        assert_eq!(report.scenarios.len(), 8);
        assert_eq!(report.of_kind(ScenarioKind::UnitFactor).count(), 4);
        assert!(report
            .of_kind(ScenarioKind::UnitFactor)
            .all(|s| s.deferral_years == 0));
        assert!(report
            .of_kind(ScenarioKind::Deferral)
            .all(|s| s.unit_factor_multiplier == 1.0));
        assert_eq!(report.scenarios[0].kind, ScenarioKind::UnitFactor);
        assert_eq!(report.scenarios[4].deferral_years, 5);
    }

    #[test]
    fn test_best_is_minimum_npv() {
        let report = run_scenarios(1_000_000.0, 5.0, &[0.8, 1.2], &[30]).unwrap();

        let best = report.best().unwrap();
        let min = report
            .scenarios
            .iter()
            .map(|s| s.npv)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(best.npv, min);
        assert_eq!(best.kind, ScenarioKind::Deferral);

        let ranked: Vec<f64> = report.ranked().iter().map(|s| s.npv).collect();
        assert!(ranked.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_bad_parameters_do_not_abort_others() {
        let report = run_scenarios(100.0, 3.0, &[1.1, f64::NAN, -0.5], &[-2, 10]).unwrap();

        assert_eq!(report.scenarios.len(), 2);
        assert_eq!(report.rejected.len(), 3);
        assert_eq!(report.rejected[2].kind, ScenarioKind::Deferral);
        assert_eq!(report.rejected[2].parameter, "-2");
    }

    #[test]
    fn test_invalid_shared_inputs_fail_call() {
        assert!(matches!(
            run_scenarios(100.0, -100.0, &[1.0], &[5]),
            Err(CostError::InvalidRate { .. })
        ));
        assert!(matches!(
            run_scenarios(f64::NAN, 3.0, &[1.0], &[5]),
            Err(CostError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_zero_base_reports_zero_change() {
        let report = run_scenarios(0.0, 3.0, &[1.2], &[10]).unwrap();
        assert!(report
            .scenarios
            .iter()
            .all(|s| s.percent_change_vs_base == 0.0 && s.npv == 0.0));
    }

    #[test]
    fn test_empty_parameter_lists() {
        let report = run_scenarios(100.0, 3.0, &[], &[]).unwrap();
        assert!(report.scenarios.is_empty());
        assert!(report.best().is_none());
    }
}
