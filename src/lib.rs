// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod costing;
pub mod engine;
pub mod errors;
pub mod io;
pub mod isdc;
pub mod observability;
pub mod projection;

// Re-export commonly used types
pub use crate::core::{
    CategoryQuantity, ContingencySettings, CostBreakdown, InventoryItem, IsdcCodeEntry,
    LaborRates, ProjectParameters, ProjectSnapshot, Schedule, UnitFactor, WdfFlags, WdfSettings,
};

pub use crate::costing::{
    calculate_item_cost, cost_items, lookup, total_workforce, CostContext, CostingOutcome,
    MissingUnitFactorPolicy, UnitFactorTable,
};

pub use crate::isdc::{aggregate, aggregate_with_tree, IsdcLevel, IsdcRollup, IsdcTree};

pub use crate::projection::{
    net_present_value, project, run_scenarios, CashflowProjection, CashflowYear,
    SensitivityReport, SensitivityScenario,
};

pub use crate::engine::{estimate, Estimate};
pub use crate::errors::{CostError, CostResult, SkipSummary};
pub use crate::config::EstimatorConfig;
pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
