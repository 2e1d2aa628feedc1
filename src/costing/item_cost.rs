//! Item-level cost calculation.
//!
//! Converts one inventory record plus its category quantities into a
//! [`CostBreakdown`]:
//!
//! ```text
//! workforce   = basic_workforce * (100 + Σ WDF) / 100
//! labour      = workforce * labour_rate
//! investment  = Σ quantity * investment_uf
//! expenses    = Σ quantity * expenses_uf
//! contingency = (labour + investment + expenses) * rate / 100   (if enabled)
//! total       = labour + investment + expenses + contingency
//! ```
//!
//! The calculation is a pure function of its arguments, so items can be
//! priced in any order or in parallel.

use super::unit_factors::{MissingUnitFactorPolicy, UnitFactorTable};
use super::wdf::total_workforce;
use crate::core::{
    CategoryQuantity, ContingencySettings, CostBreakdown, InventoryItem, LaborRates,
    ProjectParameters, WdfSettings,
};
use crate::errors::{CostError, CostResult};
use tracing::warn;

/// Everything the calculator needs besides the item itself.
#[derive(Debug, Clone, Copy)]
pub struct CostContext<'a> {
    pub unit_factors: &'a UnitFactorTable,
    pub rates: LaborRates,
    pub contingency: ContingencySettings,
    pub wdf: WdfSettings,
    pub missing_unit_factor: MissingUnitFactorPolicy,
}

impl<'a> CostContext<'a> {
    pub fn new(unit_factors: &'a UnitFactorTable, rates: LaborRates) -> Self {
        Self {
            unit_factors,
            rates,
            contingency: ContingencySettings::default(),
            wdf: WdfSettings::default(),
            missing_unit_factor: MissingUnitFactorPolicy::default(),
        }
    }

    pub fn for_project(
        unit_factors: &'a UnitFactorTable,
        project: &ProjectParameters,
        missing_unit_factor: MissingUnitFactorPolicy,
    ) -> Self {
        Self {
            unit_factors,
            rates: project.rates,
            contingency: project.contingency,
            wdf: project.wdf,
            missing_unit_factor,
        }
    }

    pub fn with_contingency(mut self, contingency: ContingencySettings) -> Self {
        self.contingency = contingency;
        self
    }

    pub fn with_wdf(mut self, wdf: WdfSettings) -> Self {
        self.wdf = wdf;
        self
    }

    pub fn with_missing_unit_factor(mut self, policy: MissingUnitFactorPolicy) -> Self {
        self.missing_unit_factor = policy;
        self
    }
}

/// Investment and expense contributions of an item's categories.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryCosts {
    pub investment: f64,
    pub expenses: f64,
}

/// Compute the full cost breakdown of one item.
///
/// `categories` are the category rows attached to `item`; rows belonging to
/// other items are the caller's mistake and are priced anyway.
pub fn calculate_item_cost(
    item: &InventoryItem,
    categories: &[CategoryQuantity],
    ctx: &CostContext<'_>,
) -> CostResult<CostBreakdown> {
    validate_item(item, categories)?;

    let workforce = total_workforce(item.basic_workforce, &ctx.wdf.effective_flags(&item.wdf_flags));
    let labour = workforce * ctx.rates.rate_for(item);
    let CategoryCosts {
        investment,
        expenses,
    } = price_categories(
        &item.id,
        categories,
        ctx.unit_factors,
        ctx.missing_unit_factor,
    )?;

    let contingency = contingency_cost(
        labour + investment + expenses,
        ctx.contingency.enabled,
        ctx.contingency.rate_for(item),
    );

    Ok(CostBreakdown {
        workforce,
        labour,
        investment,
        expenses,
        contingency,
        total: labour + investment + expenses + contingency,
    })
}

/// Accumulate investment and expenses over category rows.
pub fn price_categories(
    item_id: &str,
    categories: &[CategoryQuantity],
    unit_factors: &UnitFactorTable,
    policy: MissingUnitFactorPolicy,
) -> CostResult<CategoryCosts> {
    categories
        .iter()
        .try_fold(CategoryCosts::default(), |acc, row| {
            match unit_factors.lookup(&row.category_code) {
                Ok(uf) => Ok(CategoryCosts {
                    investment: acc.investment + row.quantity * uf.investment_uf,
                    expenses: acc.expenses + row.quantity * uf.expenses_uf,
                }),
                Err(err) => match policy {
                    MissingUnitFactorPolicy::Zero => {
                        warn!(
                            item_id,
                            category = %row.category_code,
                            "No unit factor for category, contribution treated as zero"
                        );
                        Ok(acc)
                    }
                    MissingUnitFactorPolicy::Reject => Err(err),
                },
            }
        })
}

/// Contingency on the direct cost; zero when disabled regardless of rate.
pub fn contingency_cost(direct_cost: f64, enabled: bool, rate_pct: f64) -> f64 {
    if enabled {
        direct_cost * (rate_pct / 100.0)
    } else {
        0.0
    }
}

fn validate_item(item: &InventoryItem, categories: &[CategoryQuantity]) -> CostResult<()> {
    if !item.basic_workforce.is_finite() {
        return Err(CostError::invalid_item(
            &item.id,
            format!("basic workforce is not a finite number ({})", item.basic_workforce),
        ));
    }

    if item.quantity < 0.0 || !item.quantity.is_finite() {
        return Err(CostError::invalid_item(
            &item.id,
            format!("invalid item quantity {}", item.quantity),
        ));
    }

    if let Some(flag) = item.wdf_flags.values().iter().find(|f| !f.is_finite()) {
        return Err(CostError::invalid_item(
            &item.id,
            format!("work difficulty flag is not a finite number ({flag})"),
        ));
    }

    if let Some(row) = categories
        .iter()
        .find(|row| row.quantity < 0.0 || !row.quantity.is_finite())
    {
        return Err(CostError::invalid_item(
            &item.id,
            format!(
                "invalid quantity {} for category '{}'",
                row.quantity, row.category_code
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UnitFactor;

    const TOLERANCE: f64 = 1e-9;

    fn reference_table() -> UnitFactorTable {
        UnitFactorTable::new(vec![UnitFactor::new("INV1", 15.0, 8.0)])
    }

    fn reference_item() -> InventoryItem {
        InventoryItem::new("item-1", "010101")
            .with_workforce(100.0)
            .with_wdf_flags([10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
            .with_contingency_rate(10.0)
    }

    fn reference_rows() -> Vec<CategoryQuantity> {
        vec![CategoryQuantity::new("item-1", "INV1", 10.0)]
    }

    #[test]
    fn test_reference_scenario() {
        let table = reference_table();
        let ctx = CostContext::new(&table, LaborRates::new(50.0));

        let cost = calculate_item_cost(&reference_item(), &reference_rows(), &ctx).unwrap();

        assert!((cost.workforce - 110.0).abs() < TOLERANCE);
        assert!((cost.labour - 5500.0).abs() < TOLERANCE);
        assert!((cost.investment - 150.0).abs() < TOLERANCE);
        assert!((cost.expenses - 80.0).abs() < TOLERANCE);
        assert!((cost.contingency - 573.0).abs() < TOLERANCE);
        assert!((cost.total - 6303.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_repeated_calls_are_bit_identical() {
        let table = reference_table();
        let ctx = CostContext::new(&table, LaborRates::new(47.3));

        let first = calculate_item_cost(&reference_item(), &reference_rows(), &ctx).unwrap();
        let second = calculate_item_cost(&reference_item(), &reference_rows(), &ctx).unwrap();

        assert_eq!(first.total.to_bits(), second.total.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn test_disabled_contingency_is_zero_regardless_of_rate() {
        let table = reference_table();
        let ctx = CostContext::new(&table, LaborRates::new(50.0))
            .with_contingency(ContingencySettings::disabled());
        let item = reference_item().with_contingency_rate(75.0);

        let cost = calculate_item_cost(&item, &reference_rows(), &ctx).unwrap();

        assert_eq!(cost.contingency, 0.0);
        assert!((cost.total - 5730.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_project_default_contingency_rate() {
        let table = reference_table();
        let ctx = CostContext::new(&table, LaborRates::new(50.0));
        let mut item = reference_item();
        item.contingency_rate = None;

        let cost = calculate_item_cost(&item, &reference_rows(), &ctx).unwrap();

        assert!((cost.contingency - 573.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_contractor_uses_contractor_rate() {
        let table = reference_table();
        let ctx = CostContext::new(&table, LaborRates::new(50.0).with_contractor_rate(70.0));
        let item = reference_item().contractor();

        let cost = calculate_item_cost(&item, &[], &ctx).unwrap();

        assert!((cost.labour - 110.0 * 70.0).abs() < TOLERANCE);
        assert_eq!(cost.investment, 0.0);
    }

    #[test]
    fn test_disabled_wdf_uses_basic_workforce() {
        let table = reference_table();
        let ctx = CostContext::new(&table, LaborRates::new(50.0)).with_wdf(WdfSettings {
            enabled: false,
            global_multiplier: 1.0,
        });

        let cost = calculate_item_cost(&reference_item(), &[], &ctx).unwrap();

        assert_eq!(cost.workforce, 100.0);
        assert_eq!(cost.labour, 5000.0);
    }

    #[test]
    fn test_multiple_categories_accumulate() {
        let table = UnitFactorTable::new(vec![
            UnitFactor::new("A", 2.0, 1.0),
            UnitFactor::new("B", 10.0, 0.5),
        ]);
        let ctx = CostContext::new(&table, LaborRates::new(0.0))
            .with_contingency(ContingencySettings::disabled());
        let rows = vec![
            CategoryQuantity::new("x", "A", 3.0),
            CategoryQuantity::new("x", "B", 4.0),
        ];

        let cost = calculate_item_cost(&InventoryItem::new("x", "0101"), &rows, &ctx).unwrap();

        assert_eq!(cost.investment, 46.0);
        assert_eq!(cost.expenses, 5.0);
        assert_eq!(cost.total, 51.0);
    }

    #[test]
    fn test_missing_unit_factor_zero_policy() {
        let table = reference_table();
        let ctx = CostContext::new(&table, LaborRates::new(0.0));
        let rows = vec![
            CategoryQuantity::new("item-1", "INV1", 10.0),
            CategoryQuantity::new("item-1", "UNKNOWN", 1000.0),
        ];

        let cost = calculate_item_cost(&InventoryItem::new("item-1", "0101"), &rows, &ctx).unwrap();

        assert_eq!(cost.investment, 150.0);
        assert_eq!(cost.expenses, 80.0);
    }

    #[test]
    fn test_missing_unit_factor_reject_policy() {
        let table = reference_table();
        let ctx = CostContext::new(&table, LaborRates::new(0.0))
            .with_missing_unit_factor(MissingUnitFactorPolicy::Reject);
        let rows = vec![CategoryQuantity::new("item-1", "UNKNOWN", 1.0)];

        let err = calculate_item_cost(&InventoryItem::new("item-1", "0101"), &rows, &ctx)
            .unwrap_err();

        assert_eq!(err, CostError::not_found("UNKNOWN"));
    }

    #[test]
    fn test_negative_category_quantity_is_invalid() {
        let table = reference_table();
        let ctx = CostContext::new(&table, LaborRates::new(50.0));
        let rows = vec![CategoryQuantity::new("item-1", "INV1", -1.0)];

        let err = calculate_item_cost(&reference_item(), &rows, &ctx).unwrap_err();

        assert_eq!(err.kind(), "invalid_item");
        assert!(err.to_string().contains("INV1"));
    }

    #[test]
    fn test_nan_workforce_is_invalid() {
        let table = reference_table();
        let ctx = CostContext::new(&table, LaborRates::new(50.0));
        let item = reference_item().with_workforce(f64::NAN);

        assert!(calculate_item_cost(&item, &[], &ctx).is_err());
    }

    #[test]
    fn test_contingency_cost_helper() {
        assert_eq!(contingency_cost(1000.0, true, 15.0), 150.0);
        assert_eq!(contingency_cost(1000.0, false, 15.0), 0.0);
    }
}
