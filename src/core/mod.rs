//! Core data model shared by every engine component.

pub mod breakdown;
pub mod snapshot;
pub mod types;

pub use breakdown::CostBreakdown;
pub use snapshot::{IsdcCodeEntry, ProjectSnapshot};
pub use types::{
    CategoryQuantity, ContingencySettings, InventoryItem, ItemId, LaborRates, ProjectParameters,
    Schedule, UnitFactor, WdfFlags, WdfSettings, DEFAULT_CONTINGENCY_RATE, WDF_FLAG_COUNT,
};
