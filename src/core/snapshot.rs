//! Complete, immutable input snapshot for one estimate.

use super::types::{CategoryQuantity, InventoryItem, ItemId, ProjectParameters, UnitFactor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of a canonical ISDC code table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsdcCodeEntry {
    pub code: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl IsdcCodeEntry {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: None,
        }
    }

    pub fn titled(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: Some(title.into()),
        }
    }
}

/// Everything the engine needs for a project, handed over by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub project: ProjectParameters,
    #[serde(default)]
    pub unit_factors: Vec<UnitFactor>,
    #[serde(default)]
    pub items: Vec<InventoryItem>,
    #[serde(default)]
    pub category_quantities: Vec<CategoryQuantity>,
    /// Canonical ISDC code table; inferred from item codes when empty
    #[serde(default)]
    pub isdc_codes: Vec<IsdcCodeEntry>,
}

impl ProjectSnapshot {
    pub fn from_json_str(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Group category rows by the item they belong to, preserving row order.
    pub fn category_quantities_by_item(&self) -> HashMap<&str, Vec<CategoryQuantity>> {
        let mut grouped: HashMap<&str, Vec<CategoryQuantity>> = HashMap::new();
        for row in &self.category_quantities {
            grouped
                .entry(row.inventory_item_id.as_str())
                .or_default()
                .push(row.clone());
        }
        grouped
    }

    pub fn activated_items(&self) -> impl Iterator<Item = &InventoryItem> {
        self.items.iter().filter(|item| item.is_activated)
    }

    pub fn item_ids(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter().map(|item| &item.id)
    }
}
