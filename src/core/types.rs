//! Input records supplied by the persistence collaborator.
//!
//! These are plain immutable snapshots. The engine never mutates them and
//! never reads any ambient "current project" state: everything it needs
//! arrives through these records and [`ProjectParameters`].

use serde::{Deserialize, Serialize};

/// Identifier of an inventory item as assigned by the data store.
pub type ItemId = String;

/// Number of independent work difficulty flags (F1-F7).
pub const WDF_FLAG_COUNT: usize = 7;

/// Per-unit multipliers for a D&D or waste category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitFactor {
    pub code: String,
    /// Manpower hours per unit
    #[serde(default)]
    pub manpower_uf: f64,
    /// Investment cost per unit
    #[serde(default)]
    pub investment_uf: f64,
    /// Expense cost per unit
    #[serde(default)]
    pub expenses_uf: f64,
    #[serde(default)]
    pub unit: String,
}

impl UnitFactor {
    pub fn new(code: impl Into<String>, investment_uf: f64, expenses_uf: f64) -> Self {
        Self {
            code: code.into(),
            manpower_uf: 0.0,
            investment_uf,
            expenses_uf,
            unit: String::new(),
        }
    }
}

/// Work difficulty percentages, one per flag. `0` means no effect.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WdfFlags(pub [f64; WDF_FLAG_COUNT]);

impl WdfFlags {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &[f64; WDF_FLAG_COUNT] {
        &self.0
    }
}

impl From<[f64; WDF_FLAG_COUNT]> for WdfFlags {
    fn from(flags: [f64; WDF_FLAG_COUNT]) -> Self {
        Self(flags)
    }
}

/// A cost-bearing inventory or activity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    /// Full ISDC code (normally L3). `None` lands in the unassigned bucket.
    #[serde(default)]
    pub isdc_code: Option<String>,
    /// Declared inventory quantity (informational; costs are driven by
    /// the item's category quantities)
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub basic_workforce: f64,
    #[serde(default)]
    pub wdf_flags: WdfFlags,
    /// Contingency percentage; falls back to the project default when absent
    #[serde(default)]
    pub contingency_rate: Option<f64>,
    #[serde(default)]
    pub is_contractor: bool,
    #[serde(default = "default_activated")]
    pub is_activated: bool,
}

fn default_activated() -> bool {
    true
}

impl InventoryItem {
    pub fn new(id: impl Into<ItemId>, isdc_code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            isdc_code: Some(isdc_code.into()),
            quantity: 0.0,
            basic_workforce: 0.0,
            wdf_flags: WdfFlags::none(),
            contingency_rate: None,
            is_contractor: false,
            is_activated: true,
        }
    }

    pub fn with_workforce(mut self, basic_workforce: f64) -> Self {
        self.basic_workforce = basic_workforce;
        self
    }

    pub fn with_wdf_flags(mut self, flags: [f64; WDF_FLAG_COUNT]) -> Self {
        self.wdf_flags = WdfFlags(flags);
        self
    }

    pub fn with_contingency_rate(mut self, rate: f64) -> Self {
        self.contingency_rate = Some(rate);
        self
    }

    pub fn contractor(mut self) -> Self {
        self.is_contractor = true;
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_activated = false;
        self
    }
}

/// Quantity of one unit-factor category attributable to an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryQuantity {
    pub inventory_item_id: ItemId,
    pub category_code: String,
    pub quantity: f64,
}

impl CategoryQuantity {
    pub fn new(item_id: impl Into<ItemId>, category_code: impl Into<String>, quantity: f64) -> Self {
        Self {
            inventory_item_id: item_id.into(),
            category_code: category_code.into(),
            quantity,
        }
    }
}

/// Reference and contractor hourly rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaborRates {
    pub reference_labor_rate: f64,
    /// Applied to contractor items; the reference rate is used when absent
    #[serde(default)]
    pub contractor_rate: Option<f64>,
}

impl LaborRates {
    pub fn new(reference_labor_rate: f64) -> Self {
        Self {
            reference_labor_rate,
            contractor_rate: None,
        }
    }

    pub fn with_contractor_rate(mut self, rate: f64) -> Self {
        self.contractor_rate = Some(rate);
        self
    }

    /// Hourly rate that applies to the given item.
    pub fn rate_for(&self, item: &InventoryItem) -> f64 {
        match (item.is_contractor, self.contractor_rate) {
            (true, Some(rate)) => rate,
            _ => self.reference_labor_rate,
        }
    }
}

impl Default for LaborRates {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Project-level contingency switch and fallback rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContingencySettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Percentage used for items without their own rate
    #[serde(default = "default_contingency_rate")]
    pub default_rate: f64,
}

pub const DEFAULT_CONTINGENCY_RATE: f64 = 10.0;

fn default_contingency_rate() -> f64 {
    DEFAULT_CONTINGENCY_RATE
}

fn default_true() -> bool {
    true
}

impl Default for ContingencySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            default_rate: DEFAULT_CONTINGENCY_RATE,
        }
    }
}

impl ContingencySettings {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn rate_for(&self, item: &InventoryItem) -> f64 {
        item.contingency_rate.unwrap_or(self.default_rate)
    }
}

/// Global work difficulty controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WdfSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Scales every flag before summation; 1.0 leaves flags untouched
    #[serde(default = "default_global_multiplier")]
    pub global_multiplier: f64,
}

fn default_global_multiplier() -> f64 {
    1.0
}

impl Default for WdfSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            global_multiplier: 1.0,
        }
    }
}

/// Timing inputs for cashflow and sensitivity projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub start_year: i32,
    /// Sum of phase durations, computed by the caller
    pub duration_years: i32,
    /// Annual inflation, percent
    #[serde(default)]
    pub inflation_rate: f64,
    /// Annual discount rate, percent
    #[serde(default)]
    pub discount_rate: f64,
}

/// All project-level scalars, passed explicitly to every calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectParameters {
    #[serde(default)]
    pub name: Option<String>,
    pub rates: LaborRates,
    #[serde(default)]
    pub contingency: ContingencySettings,
    #[serde(default)]
    pub wdf: WdfSettings,
    #[serde(default)]
    pub schedule: Option<Schedule>,
}
