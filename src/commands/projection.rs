use crate::config::resolve_config;
use crate::io::{self, create_writer, OutputFormat};
use crate::projection::{project, run_scenarios};
use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CashflowConfig {
    pub total_cost: f64,
    pub start_year: i32,
    pub duration: i32,
    pub inflation: f64,
    pub discount: f64,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
}

pub fn run_cashflow(options: CashflowConfig) -> Result<()> {
    let cashflow = project(
        options.total_cost,
        options.start_year,
        options.duration,
        options.inflation,
        options.discount,
    )?;

    let sink = io::open_output(options.output.as_deref())?;
    let mut writer = create_writer(options.format.unwrap_or_default(), sink);
    writer.write_cashflow(&cashflow)?;
    writer.flush()
}

#[derive(Debug, Clone)]
pub struct SensitivityConfig {
    pub base_cost: f64,
    pub discount: f64,
    pub multipliers: Option<Vec<f64>>,
    pub deferrals: Option<Vec<i32>>,
    pub config: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
}

pub fn run_sensitivity(options: SensitivityConfig) -> Result<()> {
    let config = resolve_config(options.config.as_deref())?;
    let multipliers = options
        .multipliers
        .unwrap_or(config.sensitivity.unit_factor_multipliers);
    let deferrals = options
        .deferrals
        .unwrap_or(config.sensitivity.deferral_years);

    let report = run_scenarios(options.base_cost, options.discount, &multipliers, &deferrals)?;

    let format = options.format.unwrap_or(config.output.default_format);
    let sink = io::open_output(options.output.as_deref())?;
    let mut writer = create_writer(format, sink);
    writer.write_sensitivity(&report)?;
    writer.flush()
}
