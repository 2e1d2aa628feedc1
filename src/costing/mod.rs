//! Item-level costing: unit factor lookup, work difficulty adjustment, the
//! per-item calculator and the batch map over item sets.

pub mod batch;
pub mod item_cost;
pub mod unit_factors;
pub mod wdf;

pub use batch::{cost_items, CostingOutcome, ItemCost};
pub use item_cost::{calculate_item_cost, contingency_cost, CategoryCosts, CostContext};
pub use unit_factors::{lookup, MissingUnitFactorPolicy, UnitFactorTable};
pub use wdf::total_workforce;
