use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use isdc_estimator::engine::price_snapshot;
use isdc_estimator::{
    aggregate, estimate, run_scenarios, CategoryQuantity, EstimatorConfig, InventoryItem,
    LaborRates, ProjectParameters, ProjectSnapshot, Schedule, UnitFactor,
};
use std::hint::black_box;

fn create_plant(item_count: usize) -> ProjectSnapshot {
    let items: Vec<InventoryItem> = (0..item_count)
        .map(|i| {
            let code = format!("{:02}{:02}{:02}", i % 11 + 1, i % 6 + 1, i % 9 + 1);
            InventoryItem::new(format!("item-{i:06}"), code)
                .with_workforce((i % 80) as f64 + 0.5)
                .with_wdf_flags([(i % 4) as f64 * 5.0, 0.0, 3.0, 0.0, 0.0, 0.0, 1.0])
        })
        .collect();

    // Three category rows per item
    let category_quantities = items
        .iter()
        .enumerate()
        .flat_map(|(i, item)| {
            (0..3).map(move |k| {
                CategoryQuantity::new(item.id.clone(), format!("UF{}", (i + k) % 20), (i % 13) as f64)
            })
        })
        .collect();

    ProjectSnapshot {
        project: ProjectParameters {
            name: Some("Benchmark plant".to_string()),
            rates: LaborRates::new(48.0).with_contractor_rate(70.0),
            schedule: Some(Schedule {
                start_year: 2030,
                duration_years: 20,
                inflation_rate: 2.0,
                discount_rate: 3.5,
            }),
            ..Default::default()
        },
        unit_factors: (0..20)
            .map(|k| UnitFactor::new(format!("UF{k}"), 5.0 + k as f64, 1.5))
            .collect(),
        items,
        category_quantities,
        isdc_codes: Vec::new(),
    }
}

fn benchmark_pricing(c: &mut Criterion) {
    let mut group = c.benchmark_group("pricing");
    let sequential = EstimatorConfig {
        parallel: false,
        ..Default::default()
    };
    let parallel = EstimatorConfig::default();

    for size in [1_000, 10_000, 50_000] {
        let snapshot = create_plant(size);
        group.bench_with_input(BenchmarkId::new("sequential", size), &snapshot, |b, s| {
            b.iter(|| black_box(price_snapshot(black_box(s), &sequential)))
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), &snapshot, |b, s| {
            b.iter(|| black_box(price_snapshot(black_box(s), &parallel)))
        });
    }

    group.finish();
}

fn benchmark_rollup(c: &mut Criterion) {
    let snapshot = create_plant(50_000);
    let outcome = price_snapshot(&snapshot, &EstimatorConfig::default());

    c.bench_function("rollup_50k_items", |b| {
        b.iter(|| black_box(aggregate(black_box(&snapshot.items), black_box(&outcome.costs))))
    });
}

fn benchmark_full_estimate(c: &mut Criterion) {
    let snapshot = create_plant(10_000);
    let config = EstimatorConfig::default();

    c.bench_function("estimate_10k_items", |b| {
        b.iter(|| black_box(estimate(black_box(&snapshot), &config)))
    });
}

fn benchmark_sensitivity(c: &mut Criterion) {
    let multipliers: Vec<f64> = (1..=40).map(|m| m as f64 * 0.05).collect();
    let deferrals: Vec<i32> = (1..=60).collect();

    c.bench_function("sensitivity_100_scenarios", |b| {
        b.iter(|| black_box(run_scenarios(black_box(2.5e8), 4.0, &multipliers, &deferrals)))
    });
}

criterion_group!(
    benches,
    benchmark_pricing,
    benchmark_rollup,
    benchmark_full_estimate,
    benchmark_sensitivity
);
criterion_main!(benches);
