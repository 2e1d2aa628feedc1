use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::costing::MissingUnitFactorPolicy;
use crate::io::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "isdc-estimator")]
#[command(about = "ISDC decommissioning cost estimator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Price a project snapshot and roll costs up the ISDC hierarchy
    Estimate {
        /// Snapshot file (.json or .toml)
        snapshot: PathBuf,

        /// Output format (defaults to the config file's choice)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (skips discovery of .isdc-estimator.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Price items on a single thread
        #[arg(long)]
        sequential: bool,

        /// Policy for categories without a unit factor (zero, reject)
        #[arg(long = "missing-unit-factor")]
        missing_unit_factor: Option<MissingUnitFactorPolicy>,
    },

    /// Project a total cost over the project duration
    Cashflow {
        #[arg(long = "total-cost")]
        total_cost: f64,

        #[arg(long = "start-year")]
        start_year: i32,

        /// Duration in years
        #[arg(long)]
        duration: i32,

        /// Annual inflation rate, percent
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        inflation: f64,

        /// Annual discount rate, percent
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        discount: f64,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare unit factor and deferral scenarios by NPV
    Sensitivity {
        #[arg(long = "base-cost")]
        base_cost: f64,

        /// Annual discount rate, percent
        #[arg(long, allow_negative_numbers = true)]
        discount: f64,

        /// Unit factor multipliers (comma-separated, defaults from config)
        #[arg(long, value_delimiter = ',')]
        multipliers: Option<Vec<f64>>,

        /// Deferral periods in years (comma-separated, defaults from config)
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        deferrals: Option<Vec<i32>>,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Initialize an .isdc-estimator.toml configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
