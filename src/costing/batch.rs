//! Batch costing over an item set.
//!
//! Each item is priced independently (map), then successes and failures are
//! separated (reduce). A bad item never aborts the batch: it becomes a
//! [`SkippedItem`] and the rest of the set is still priced.

use super::item_cost::{calculate_item_cost, CostContext};
use crate::core::{CategoryQuantity, CostBreakdown, InventoryItem, ItemId};
use crate::errors::{CostError, SkipSummary, SkippedItem};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, warn};

/// Cost of one priced item, kept alongside its ISDC code for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemCost {
    pub item_id: ItemId,
    pub isdc_code: Option<String>,
    pub cost: CostBreakdown,
}

/// Outcome of pricing a batch of items.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CostingOutcome {
    /// Priced items ordered by item id
    pub costs: BTreeMap<ItemId, CostBreakdown>,
    pub skipped: Vec<SkippedItem>,
    /// Category codes referenced by priced items with no unit factor
    pub missing_unit_factor_codes: BTreeSet<String>,
}

impl CostingOutcome {
    pub fn priced_count(&self) -> usize {
        self.costs.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn skip_summary(&self) -> SkipSummary {
        SkipSummary::from_skipped(&self.skipped)
    }

    /// Priced items joined back with their ISDC codes, in item id order.
    pub fn item_costs(&self, items: &[InventoryItem]) -> Vec<ItemCost> {
        let codes: HashMap<&str, Option<&String>> = items
            .iter()
            .map(|item| (item.id.as_str(), item.isdc_code.as_ref()))
            .collect();

        self.costs
            .iter()
            .map(|(id, cost)| ItemCost {
                item_id: id.clone(),
                isdc_code: codes.get(id.as_str()).copied().flatten().cloned(),
                cost: *cost,
            })
            .collect()
    }
}

/// Price every activated item.
///
/// `categories_by_item` holds the category rows of each item; items without
/// an entry have no category contribution. Deactivated items are ignored.
/// Parallel and sequential runs produce identical outcomes.
pub fn cost_items(
    items: &[InventoryItem],
    categories_by_item: &HashMap<&str, Vec<CategoryQuantity>>,
    ctx: &CostContext<'_>,
    parallel: bool,
) -> CostingOutcome {
    let price = |item: &InventoryItem| -> (ItemId, Result<CostBreakdown, CostError>) {
        let rows = categories_by_item
            .get(item.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        (item.id.clone(), calculate_item_cost(item, rows, ctx))
    };

    let activated: Vec<&InventoryItem> = items.iter().filter(|item| item.is_activated).collect();
    debug!(
        activated = activated.len(),
        total = items.len(),
        parallel,
        "Pricing inventory items"
    );

    let results: Vec<(ItemId, Result<CostBreakdown, CostError>)> = if parallel {
        activated.par_iter().map(|&item| price(item)).collect()
    } else {
        activated.iter().map(|&item| price(item)).collect()
    };

    let mut outcome = fold_results(results);
    outcome.missing_unit_factor_codes = missing_codes(&outcome.costs, categories_by_item, ctx);
    outcome
}

fn fold_results(results: Vec<(ItemId, Result<CostBreakdown, CostError>)>) -> CostingOutcome {
    let mut outcome = CostingOutcome::default();

    for (item_id, result) in results {
        match result {
            Ok(cost) => {
                outcome.costs.insert(item_id, cost);
            }
            Err(error) => {
                warn!(item_id = %item_id, error = %error, "Skipping item");
                outcome.skipped.push(SkippedItem::new(item_id, error));
            }
        }
    }

    outcome.skipped.sort_by(|a, b| a.item_id.cmp(&b.item_id));
    outcome
}

fn missing_codes(
    costs: &BTreeMap<ItemId, CostBreakdown>,
    categories_by_item: &HashMap<&str, Vec<CategoryQuantity>>,
    ctx: &CostContext<'_>,
) -> BTreeSet<String> {
    costs
        .keys()
        .filter_map(|id| categories_by_item.get(id.as_str()))
        .flatten()
        .filter(|row| !ctx.unit_factors.contains(&row.category_code))
        .map(|row| row.category_code.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LaborRates, UnitFactor};
    use crate::costing::unit_factors::{MissingUnitFactorPolicy, UnitFactorTable};

    fn fixture() -> (Vec<InventoryItem>, Vec<CategoryQuantity>, UnitFactorTable) {
        let items = vec![
            InventoryItem::new("a", "010101").with_workforce(10.0),
            InventoryItem::new("b", "010102").with_workforce(20.0),
            InventoryItem::new("c", "020101").with_workforce(30.0).deactivated(),
            InventoryItem::new("d", "020102").with_workforce(40.0),
        ];
        let rows = vec![
            CategoryQuantity::new("a", "M1", 2.0),
            CategoryQuantity::new("b", "M2", 1.0),
            CategoryQuantity::new("d", "M1", -5.0),
        ];
        let table = UnitFactorTable::new(vec![UnitFactor::new("M1", 100.0, 10.0)]);
        (items, rows, table)
    }

    fn group(rows: &[CategoryQuantity]) -> HashMap<&str, Vec<CategoryQuantity>> {
        let mut grouped: HashMap<&str, Vec<CategoryQuantity>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.inventory_item_id.as_str())
                .or_default()
                .push(row.clone());
        }
        grouped
    }

    #[test]
    fn test_skips_invalid_and_ignores_deactivated() {
        let (items, rows, table) = fixture();
        let ctx = CostContext::new(&table, LaborRates::new(1.0));

        let outcome = cost_items(&items, &group(&rows), &ctx, false);

        assert_eq!(outcome.costs.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(outcome.skipped_count(), 1);
        assert_eq!(outcome.skipped[0].item_id, "d");
        assert_eq!(
            outcome.skip_summary().headline(),
            "1 item skipped due to invalid data"
        );
    }

    #[test]
    fn test_reports_missing_unit_factor_codes() {
        let (items, rows, table) = fixture();
        let ctx = CostContext::new(&table, LaborRates::new(1.0));

        let outcome = cost_items(&items, &group(&rows), &ctx, false);

        assert_eq!(
            outcome.missing_unit_factor_codes.iter().collect::<Vec<_>>(),
            vec!["M2"]
        );
    }

    #[test]
    fn test_reject_policy_skips_item_with_missing_factor() {
        let (items, rows, table) = fixture();
        let ctx = CostContext::new(&table, LaborRates::new(1.0))
            .with_missing_unit_factor(MissingUnitFactorPolicy::Reject);

        let outcome = cost_items(&items, &group(&rows), &ctx, false);

        assert_eq!(outcome.costs.keys().collect::<Vec<_>>(), vec!["a"]);
        let skipped: Vec<_> = outcome.skipped.iter().map(|s| s.item_id.as_str()).collect();
        assert_eq!(skipped, vec!["b", "d"]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (items, rows, table) = fixture();
        let ctx = CostContext::new(&table, LaborRates::new(3.5));
        let grouped = group(&rows);

        let sequential = cost_items(&items, &grouped, &ctx, false);
        let parallel = cost_items(&items, &grouped, &ctx, true);

        assert_eq!(sequential.costs, parallel.costs);
        assert_eq!(sequential.skipped, parallel.skipped);
    }

    #[test]
    fn test_item_costs_carry_isdc_codes() {
        let (items, rows, table) = fixture();
        let ctx = CostContext::new(&table, LaborRates::new(1.0));

        let outcome = cost_items(&items, &group(&rows), &ctx, false);
        let priced = outcome.item_costs(&items);

        assert_eq!(priced.len(), 2);
        assert_eq!(priced[0].isdc_code.as_deref(), Some("010101"));
        assert_eq!(priced[1].item_id, "b");
    }
}
