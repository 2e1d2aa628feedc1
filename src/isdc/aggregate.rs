//! ISDC roll-up: item costs → L3 → L2 → L1 → grand total (L0).
//!
//! Every cost component is a plain sum at every level. Items that cannot be
//! placed in the tree go to the [`UNASSIGNED`] bucket, which counts towards
//! the grand total but not towards L1/L2 shares.

use super::hierarchy::{IsdcLevel, IsdcTree, UNASSIGNED};
use crate::core::{CostBreakdown, InventoryItem, ItemId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Add;

/// Summed costs of all items under one ISDC code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketTotal {
    pub code: String,
    pub level: Option<IsdcLevel>,
    pub title: Option<String>,
    pub parent: Option<String>,
    pub item_count: usize,
    pub cost: CostBreakdown,
}

impl BucketTotal {
    fn empty(code: &str, level: Option<IsdcLevel>) -> Self {
        Self {
            code: code.to_string(),
            level,
            title: None,
            parent: None,
            item_count: 0,
            cost: CostBreakdown::zero(),
        }
    }

    fn absorb(&mut self, cost: &CostBreakdown) {
        self.item_count += 1;
        self.cost += *cost;
    }

    fn merge(&mut self, other: BucketTotal) {
        self.item_count += other.item_count;
        self.cost += other.cost;
        if self.title.is_none() {
            self.title = other.title;
        }
        if self.parent.is_none() {
            self.parent = other.parent;
        }
    }
}

/// Share of one bucket in the grand total, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketShare {
    pub code: String,
    pub total: f64,
    pub percent: f64,
}

/// Hierarchical totals for one item set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsdcRollup {
    pub by_l3: BTreeMap<String, BucketTotal>,
    pub by_l2: BTreeMap<String, BucketTotal>,
    pub by_l1: BTreeMap<String, BucketTotal>,
    pub unassigned: BucketTotal,
    /// Level 0: all activated, priced items
    pub grand_total: CostBreakdown,
    /// Activated items with no cost entry (rejected during costing)
    pub skipped_items: usize,
}

impl Default for IsdcRollup {
    fn default() -> Self {
        Self {
            by_l3: BTreeMap::new(),
            by_l2: BTreeMap::new(),
            by_l1: BTreeMap::new(),
            unassigned: BucketTotal::empty(UNASSIGNED, None),
            grand_total: CostBreakdown::zero(),
            skipped_items: 0,
        }
    }
}

impl IsdcRollup {
    /// Bucket total as a percentage of the grand total; 0 when the grand
    /// total is zero.
    pub fn percent_of_total(&self, bucket_total: f64) -> f64 {
        if self.grand_total.total == 0.0 {
            0.0
        } else {
            bucket_total / self.grand_total.total * 100.0
        }
    }

    pub fn l1_shares(&self) -> Vec<BucketShare> {
        self.shares(&self.by_l1)
    }

    pub fn l2_shares(&self) -> Vec<BucketShare> {
        self.shares(&self.by_l2)
    }

    fn shares(&self, buckets: &BTreeMap<String, BucketTotal>) -> Vec<BucketShare> {
        buckets
            .values()
            .map(|bucket| BucketShare {
                code: bucket.code.clone(),
                total: bucket.cost.total,
                percent: self.percent_of_total(bucket.cost.total),
            })
            .collect()
    }

    pub fn priced_items(&self) -> usize {
        self.by_l3.values().map(|b| b.item_count).sum::<usize>() + self.unassigned.item_count
    }

    /// Componentwise comparison with an absolute tolerance.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        fn levels_match(
            a: &BTreeMap<String, BucketTotal>,
            b: &BTreeMap<String, BucketTotal>,
            tolerance: f64,
        ) -> bool {
            a.len() == b.len()
                && a.iter().zip(b.iter()).all(|((ka, va), (kb, vb))| {
                    ka == kb
                        && va.item_count == vb.item_count
                        && va.cost.approx_eq(&vb.cost, tolerance)
                })
        }

        levels_match(&self.by_l3, &other.by_l3, tolerance)
            && levels_match(&self.by_l2, &other.by_l2, tolerance)
            && levels_match(&self.by_l1, &other.by_l1, tolerance)
            && self.unassigned.item_count == other.unassigned.item_count
            && self.unassigned.cost.approx_eq(&other.unassigned.cost, tolerance)
            && self.grand_total.approx_eq(&other.grand_total, tolerance)
            && self.skipped_items == other.skipped_items
    }
}

fn merge_level(
    mut into: BTreeMap<String, BucketTotal>,
    from: BTreeMap<String, BucketTotal>,
) -> BTreeMap<String, BucketTotal> {
    for (code, bucket) in from {
        match into.get_mut(&code) {
            Some(existing) => existing.merge(bucket),
            None => {
                into.insert(code, bucket);
            }
        }
    }
    into
}

impl Add for IsdcRollup {
    type Output = Self;

    /// Merge roll-ups of two disjoint item sets.
    fn add(self, rhs: Self) -> Self {
        let mut unassigned = self.unassigned;
        unassigned.merge(rhs.unassigned);

        Self {
            by_l3: merge_level(self.by_l3, rhs.by_l3),
            by_l2: merge_level(self.by_l2, rhs.by_l2),
            by_l1: merge_level(self.by_l1, rhs.by_l1),
            unassigned,
            grand_total: self.grand_total + rhs.grand_total,
            skipped_items: self.skipped_items + rhs.skipped_items,
        }
    }
}

/// Aggregate using a tree inferred from the items' own codes.
pub fn aggregate(
    items: &[InventoryItem],
    costs_by_item: &BTreeMap<ItemId, CostBreakdown>,
) -> IsdcRollup {
    let tree = IsdcTree::infer_from_codes(items.iter().filter_map(|item| item.isdc_code.as_deref()));
    aggregate_with_tree(items, costs_by_item, &tree)
}

/// Aggregate activated items against a canonical tree.
pub fn aggregate_with_tree(
    items: &[InventoryItem],
    costs_by_item: &BTreeMap<ItemId, CostBreakdown>,
    tree: &IsdcTree,
) -> IsdcRollup {
    let mut rollup = IsdcRollup::default();

    for item in items.iter().filter(|item| item.is_activated) {
        let Some(cost) = costs_by_item.get(&item.id) else {
            rollup.skipped_items += 1;
            continue;
        };

        rollup.grand_total += *cost;

        let path = item.isdc_code.as_deref().and_then(|code| tree.resolve(code));
        let Some(path) = path else {
            rollup.unassigned.absorb(cost);
            continue;
        };

        let leaf_code = path.leaf.code.as_str();
        rollup
            .by_l3
            .entry(leaf_code.to_string())
            .or_insert_with(|| BucketTotal {
                title: path.leaf.title.clone(),
                parent: Some(path.l2.code.clone()),
                ..BucketTotal::empty(leaf_code, Some(path.leaf.level))
            })
            .absorb(cost);
        rollup
            .by_l2
            .entry(path.l2.code.clone())
            .or_insert_with(|| BucketTotal {
                title: path.l2.title.clone(),
                parent: path.l2.parent.clone(),
                ..BucketTotal::empty(&path.l2.code, Some(IsdcLevel::L2))
            })
            .absorb(cost);
        rollup
            .by_l1
            .entry(path.l1.code.clone())
            .or_insert_with(|| BucketTotal {
                title: path.l1.title.clone(),
                ..BucketTotal::empty(&path.l1.code, Some(IsdcLevel::L1))
            })
            .absorb(cost);
    }

    rollup
}
