use anyhow::Result;
use clap::Parser;
use isdc_estimator::cli::{Cli, Commands};
use isdc_estimator::commands::{estimate, init, projection};
use isdc_estimator::observability::init_tracing;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    match cli.command {
        Commands::Estimate {
            snapshot,
            format,
            output,
            config,
            sequential,
            missing_unit_factor,
        } => {
            estimate::run_estimate(estimate::EstimateConfig {
                snapshot,
                format,
                output,
                config,
                sequential,
                missing_unit_factor,
            })?;
            Ok(())
        }
        Commands::Cashflow {
            total_cost,
            start_year,
            duration,
            inflation,
            discount,
            format,
            output,
        } => projection::run_cashflow(projection::CashflowConfig {
            total_cost,
            start_year,
            duration,
            inflation,
            discount,
            format,
            output,
        }),
        Commands::Sensitivity {
            base_cost,
            discount,
            multipliers,
            deferrals,
            config,
            format,
            output,
        } => projection::run_sensitivity(projection::SensitivityConfig {
            base_cost,
            discount,
            multipliers,
            deferrals,
            config,
            format,
            output,
        }),
        Commands::Init { force } => init::init_config(force),
    }
}
