//! Validation with error accumulation.
//!
//! Configuration files, project parameters and snapshots are checked with
//! stillwater's `Validation` so a single run reports every problem instead of
//! stopping at the first one. Shell code converts the result with
//! [`run_validation`].
//!
//! # Example
//!
//! ```rust
//! use isdc_estimator::config::validation::validate_config;
//! use isdc_estimator::config::EstimatorConfig;
//!
//! let validation = validate_config(&EstimatorConfig::default());
//! assert!(validation.is_success());
//! ```

use std::collections::{HashMap, HashSet};

use stillwater::{NonEmptyVec, Validation};

use super::core::EstimatorConfig;
use crate::core::{ProjectParameters, ProjectSnapshot};
use crate::errors::CostError;

pub type EstimatorErrors = NonEmptyVec<CostError>;
pub type EstimatorValidation<T> = Validation<T, EstimatorErrors>;

pub fn validation_success<T>(value: T) -> EstimatorValidation<T> {
    Validation::Success(value)
}

pub fn validation_failure<T>(error: CostError) -> EstimatorValidation<T> {
    Validation::Failure(NonEmptyVec::new(error, Vec::new()))
}

/// Success when `errors` is empty, otherwise a failure carrying all of them.
pub fn from_errors(errors: Vec<CostError>) -> EstimatorValidation<()> {
    match NonEmptyVec::from_vec(errors) {
        Some(errors) => Validation::Failure(errors),
        None => validation_success(()),
    }
}

/// Combine validations, accumulating every error.
pub fn combine_validations<T>(validations: Vec<EstimatorValidation<T>>) -> EstimatorValidation<Vec<T>> {
    let mut successes = Vec::new();
    let mut failures: Vec<CostError> = Vec::new();

    for v in validations {
        match v {
            Validation::Success(value) => successes.push(value),
            Validation::Failure(errors) => failures.extend(errors),
        }
    }

    match NonEmptyVec::from_vec(failures) {
        Some(errors) => Validation::Failure(errors),
        None => Validation::Success(successes),
    }
}

pub fn errors_to_anyhow(errors: Vec<CostError>) -> anyhow::Error {
    let mut errors = errors.into_iter();
    match (errors.next(), errors.len()) {
        (None, _) => anyhow::anyhow!("Unknown error (no errors provided)"),
        (Some(only), 0) => only.into(),
        (Some(first), _) => {
            let list = std::iter::once(first)
                .chain(errors)
                .enumerate()
                .map(|(i, e)| format!("  {}. {}", i + 1, e))
                .collect::<Vec<_>>()
                .join("\n");
            anyhow::anyhow!("Multiple errors occurred:\n{list}")
        }
    }
}

/// Convert to `anyhow::Result` at the shell boundary.
pub fn run_validation<T>(validation: EstimatorValidation<T>) -> anyhow::Result<T> {
    match validation {
        Validation::Success(value) => Ok(value),
        Validation::Failure(errors) => Err(errors_to_anyhow(errors.into_vec())),
    }
}

/// Collect the errors of a validation, empty on success.
pub fn into_errors<T>(validation: EstimatorValidation<T>) -> Vec<CostError> {
    match validation {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.into_vec(),
    }
}

pub fn validate_config(config: &EstimatorConfig) -> EstimatorValidation<()> {
    let mut errors = Vec::new();

    for &m in &config.sensitivity.unit_factor_multipliers {
        if !m.is_finite() || m < 0.0 {
            errors.push(CostError::config(format!(
                "sensitivity.unit_factor_multipliers: multiplier {m} must be a finite non-negative number"
            )));
        }
    }

    for &years in &config.sensitivity.deferral_years {
        if years < 0 {
            errors.push(CostError::config(format!(
                "sensitivity.deferral_years: deferral of {years} years cannot be negative"
            )));
        }
    }

    from_errors(errors)
}

fn non_negative(name: &str, value: f64, errors: &mut Vec<CostError>) {
    if !value.is_finite() || value < 0.0 {
        errors.push(CostError::validation(format!(
            "{name} must be a finite non-negative number, got {value}"
        )));
    }
}

/// Check project rates and settings.
///
/// The schedule is left to the projections: a bad duration or rate only
/// costs the cashflow and sensitivity results, never the roll-up.
pub fn validate_project(project: &ProjectParameters) -> EstimatorValidation<()> {
    let mut errors = Vec::new();

    non_negative("project.rates.reference_labor_rate", project.rates.reference_labor_rate, &mut errors);
    if let Some(rate) = project.rates.contractor_rate {
        non_negative("project.rates.contractor_rate", rate, &mut errors);
    }
    non_negative("project.contingency.default_rate", project.contingency.default_rate, &mut errors);
    non_negative("project.wdf.global_multiplier", project.wdf.global_multiplier, &mut errors);

    from_errors(errors)
}

fn duplicates<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    values
        .filter(|v| !seen.insert(*v) && reported.insert(*v))
        .collect()
}

fn validate_references(snapshot: &ProjectSnapshot) -> EstimatorValidation<()> {
    let mut errors = Vec::new();

    for id in duplicates(snapshot.items.iter().map(|i| i.id.as_str())) {
        errors.push(CostError::validation(format!("duplicate inventory item id '{id}'")));
    }
    for code in duplicates(snapshot.unit_factors.iter().map(|uf| uf.code.as_str())) {
        errors.push(CostError::validation(format!(
            "duplicate unit factor code '{code}' (first entry is used)"
        )));
    }

    let item_ids: HashSet<&str> = snapshot.items.iter().map(|i| i.id.as_str()).collect();
    let mut unknown: HashMap<&str, usize> = HashMap::new();
    for row in &snapshot.category_quantities {
        if !item_ids.contains(row.inventory_item_id.as_str()) {
            *unknown.entry(row.inventory_item_id.as_str()).or_default() += 1;
        }
    }
    let mut unknown: Vec<_> = unknown.into_iter().collect();
    unknown.sort_unstable();
    for (id, rows) in unknown {
        errors.push(CostError::validation(format!(
            "{rows} category row(s) reference unknown inventory item '{id}'"
        )));
    }

    for uf in &snapshot.unit_factors {
        if !uf.investment_uf.is_finite() || !uf.expenses_uf.is_finite() {
            errors.push(CostError::validation(format!(
                "unit factor '{}' has a non-finite value",
                uf.code
            )));
        }
    }

    from_errors(errors)
}

/// Check a snapshot for consistency before any calculation runs.
///
/// Item-level data problems (negative quantities and the like) are not
/// reported here; those skip the single item during costing.
pub fn validate_snapshot(snapshot: &ProjectSnapshot) -> EstimatorValidation<()> {
    combine_validations(vec![
        validate_project(&snapshot.project),
        validate_references(snapshot),
    ])
    .map(|_| ())
}
