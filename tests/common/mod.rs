#![allow(dead_code)]

use isdc_estimator::{
    CategoryQuantity, InventoryItem, LaborRates, ProjectParameters, ProjectSnapshot, Schedule,
    UnitFactor,
};

pub const SNAPSHOT_JSON: &str = r#"{
  "project": {
    "name": "Research reactor",
    "rates": { "reference_labor_rate": 50.0, "contractor_rate": 80.0 },
    "schedule": {
      "start_year": 2026,
      "duration_years": 10,
      "inflation_rate": 2.5,
      "discount_rate": 3.0
    }
  },
  "unit_factors": [
    { "code": "INV1", "investment_uf": 15.0, "expenses_uf": 8.0, "unit": "t" },
    { "code": "EXP1", "investment_uf": 0.0, "expenses_uf": 4.0, "unit": "m2" }
  ],
  "items": [
    {
      "id": "pump",
      "isdc_code": "010101",
      "basic_workforce": 100.0,
      "wdf_flags": [10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
    },
    { "id": "tank", "isdc_code": "040101", "basic_workforce": 20.0 },
    { "id": "cutting", "isdc_code": "040102", "basic_workforce": 10.0, "is_contractor": true },
    { "id": "survey", "isdc_code": "0102", "basic_workforce": 4.0, "contingency_rate": 0.0 },
    { "id": "legacy", "isdc_code": "010101", "basic_workforce": 1000.0, "is_activated": false }
  ],
  "category_quantities": [
    { "inventory_item_id": "pump", "category_code": "INV1", "quantity": 10.0 },
    { "inventory_item_id": "tank", "category_code": "EXP1", "quantity": 25.0 }
  ]
}"#;

/// Reference scenario: one item priced at exactly 6303.
pub fn reference_snapshot() -> ProjectSnapshot {
    ProjectSnapshot {
        project: ProjectParameters {
            rates: LaborRates::new(50.0),
            ..Default::default()
        },
        unit_factors: vec![UnitFactor::new("INV1", 15.0, 8.0)],
        items: vec![InventoryItem::new("pump", "010101")
            .with_workforce(100.0)
            .with_wdf_flags([10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])],
        category_quantities: vec![CategoryQuantity::new("pump", "INV1", 10.0)],
        isdc_codes: Vec::new(),
    }
}

/// Synthetic plant with `count` items spread over ten principal activities.
pub fn large_snapshot(count: usize) -> ProjectSnapshot {
    let items: Vec<InventoryItem> = (0..count)
        .map(|i| {
            let code = format!("{:02}{:02}{:02}", i % 10 + 1, i % 7 + 1, i % 5 + 1);
            InventoryItem::new(format!("item-{i:05}"), code)
                .with_workforce((i % 50) as f64 + 1.0)
                .with_wdf_flags([(i % 3) as f64 * 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0])
        })
        .collect();
    let category_quantities = items
        .iter()
        .enumerate()
        .map(|(i, item)| CategoryQuantity::new(item.id.clone(), format!("UF{}", i % 4), (i % 9) as f64))
        .collect();

    ProjectSnapshot {
        project: ProjectParameters {
            name: Some("Synthetic plant".to_string()),
            rates: LaborRates::new(42.0).with_contractor_rate(65.0),
            schedule: Some(Schedule {
                start_year: 2030,
                duration_years: 15,
                inflation_rate: 2.0,
                discount_rate: 4.0,
            }),
            ..Default::default()
        },
        unit_factors: (0..4)
            .map(|k| UnitFactor::new(format!("UF{k}"), 10.0 * (k + 1) as f64, 2.5))
            .collect(),
        items,
        category_quantities,
        isdc_codes: Vec::new(),
    }
}
