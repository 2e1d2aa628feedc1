use crate::config::{resolve_config, run_validation};
use crate::costing::MissingUnitFactorPolicy;
use crate::engine::{estimate, Estimate};
use crate::io::{self, create_writer, OutputFormat};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Options of the `estimate` subcommand.
#[derive(Debug, Clone)]
pub struct EstimateConfig {
    pub snapshot: PathBuf,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub sequential: bool,
    pub missing_unit_factor: Option<MissingUnitFactorPolicy>,
}

/// Load, estimate and report.
pub fn run_estimate(options: EstimateConfig) -> Result<Estimate> {
    let mut config = resolve_config(options.config.as_deref())?;
    if options.sequential {
        config.parallel = false;
    }
    if let Some(policy) = options.missing_unit_factor {
        config.unit_factors.missing_policy = policy;
    }

    let snapshot = io::read_snapshot(&options.snapshot)?;
    let estimate = run_validation(estimate(&snapshot, &config))
        .with_context(|| format!("Snapshot {} is inconsistent", options.snapshot.display()))?;

    let format = options.format.unwrap_or(config.output.default_format);
    let sink = io::open_output(options.output.as_deref())?;
    let mut writer = create_writer(format, sink);
    writer.write_estimate(&estimate)?;
    writer.flush()?;

    if !estimate.skipped.is_empty() {
        log::warn!("{}", estimate.skipped.headline());
    }

    Ok(estimate)
}
