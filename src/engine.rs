//! End-to-end estimate for one project snapshot.
//!
//! Stages run in one direction: validate → price items → roll up through the
//! ISDC tree → project over time. Validation failures stop the run before any
//! calculation; everything after that degrades per item or per projection.

use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::config::validation::{combine_validations, EstimatorValidation};
use crate::config::{validate_config, validate_snapshot, EstimatorConfig};
use crate::core::{ProjectSnapshot, Schedule};
use crate::costing::{cost_items, CostContext, CostingOutcome, ItemCost, UnitFactorTable};
use crate::errors::SkipSummary;
use crate::isdc::{aggregate_with_tree, IsdcRollup, IsdcTree, RejectedCode};
use crate::projection::{project, run_scenarios, CashflowProjection, SensitivityReport};

/// Everything computed for a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    pub project_name: Option<String>,
    pub items: Vec<ItemCost>,
    pub rollup: IsdcRollup,
    pub skipped: SkipSummary,
    pub missing_unit_factor_codes: Vec<String>,
    pub rejected_isdc_codes: Vec<RejectedCode>,
    pub cashflow: Option<CashflowProjection>,
    pub sensitivity: Option<SensitivityReport>,
    /// Projection failures; the roll-up above is still valid
    pub projection_errors: Vec<String>,
}

impl Estimate {
    pub fn grand_total(&self) -> f64 {
        self.rollup.grand_total.total
    }
}

/// Validate `snapshot` and `config`, then compute the estimate.
///
/// Returns every validation problem at once when the inputs are inconsistent.
pub fn estimate(snapshot: &ProjectSnapshot, config: &EstimatorConfig) -> EstimatorValidation<Estimate> {
    let span = info_span!(
        "estimate",
        project = snapshot.project.name.as_deref().unwrap_or("unnamed"),
        items = snapshot.items.len()
    );
    let _guard = span.enter();

    combine_validations(vec![validate_config(config), validate_snapshot(snapshot)])
        .map(|_| compute(snapshot, config))
}

fn canonical_tree(snapshot: &ProjectSnapshot) -> IsdcTree {
    if snapshot.isdc_codes.is_empty() {
        IsdcTree::infer_from_codes(
            snapshot
                .activated_items()
                .filter_map(|item| item.isdc_code.as_deref()),
        )
    } else {
        IsdcTree::from_codes(&snapshot.isdc_codes)
    }
}

/// Price every activated item of an already validated snapshot.
pub fn price_snapshot(snapshot: &ProjectSnapshot, config: &EstimatorConfig) -> CostingOutcome {
    let table = UnitFactorTable::new(snapshot.unit_factors.clone());
    let ctx = CostContext::for_project(
        &table,
        &snapshot.project,
        config.unit_factors.missing_policy,
    );
    let categories = snapshot.category_quantities_by_item();
    cost_items(&snapshot.items, &categories, &ctx, config.parallel)
}

fn compute(snapshot: &ProjectSnapshot, config: &EstimatorConfig) -> Estimate {
    let outcome = price_snapshot(snapshot, config);
    debug!(
        priced = outcome.priced_count(),
        skipped = outcome.skipped_count(),
        "Priced items"
    );

    let tree = canonical_tree(snapshot);
    let rollup = aggregate_with_tree(&snapshot.items, &outcome.costs, &tree);
    debug!(
        l1 = rollup.by_l1.len(),
        l2 = rollup.by_l2.len(),
        l3 = rollup.by_l3.len(),
        unassigned = rollup.unassigned.item_count,
        "Aggregated ISDC hierarchy"
    );

    let mut projection_errors = Vec::new();
    let (cashflow, sensitivity) = match &snapshot.project.schedule {
        Some(schedule) => project_schedule(
            rollup.grand_total.total,
            schedule,
            config,
            &mut projection_errors,
        ),
        None => (None, None),
    };

    info!(
        grand_total = rollup.grand_total.total,
        skipped = outcome.skipped_count(),
        "Estimate complete"
    );

    Estimate {
        project_name: snapshot.project.name.clone(),
        items: outcome.item_costs(&snapshot.items),
        skipped: outcome.skip_summary(),
        missing_unit_factor_codes: outcome.missing_unit_factor_codes.into_iter().collect(),
        rejected_isdc_codes: tree.rejected().to_vec(),
        rollup,
        cashflow,
        sensitivity,
        projection_errors,
    }
}

fn project_schedule(
    grand_total: f64,
    schedule: &Schedule,
    config: &EstimatorConfig,
    errors: &mut Vec<String>,
) -> (Option<CashflowProjection>, Option<SensitivityReport>) {
    let cashflow = project(
        grand_total,
        schedule.start_year,
        schedule.duration_years,
        schedule.inflation_rate,
        schedule.discount_rate,
    )
    .map_err(|e| errors.push(format!("cashflow: {e}")))
    .ok();

    let sensitivity = run_scenarios(
        grand_total,
        schedule.discount_rate,
        &config.sensitivity.unit_factor_multipliers,
        &config.sensitivity.deferral_years,
    )
    .map_err(|e| errors.push(format!("sensitivity: {e}")))
    .ok();

    (cashflow, sensitivity)
}
