use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use shelfwise_ai::WorkerPool;
use shelfwise_ai::discount::evaluate_batch;
use shelfwise_ai::forecast::{ForecastConfig, forecast_batch};
use shelfwise_inventory::InventoryRecord;
use shelfwise_sales::SalesRecord;

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

fn inventory(n: usize) -> Vec<InventoryRecord> {
    (0..n)
        .map(|i| {
            InventoryRecord::new(
                format!("item-{i}"),
                (i as u64 * 13) % 400,
                Decimal::new(150 + (i as i64 % 900), 2),
                reference() + Duration::days((i as i64 % 150) - 10),
            )
            .with_sales_volume(Decimal::from(i as u64 % 25))
        })
        .collect()
}

fn sales(products: usize, days: i64) -> Vec<SalesRecord> {
    let mut out = Vec::new();
    for p in 0..products {
        for d in 0..days {
            let qty = 10.0 + ((d + p as i64) % 7) as f64 * 2.0;
            out.push(SalesRecord::new(format!("p{p}"), reference() + Duration::days(d), qty));
        }
    }
    out
}

fn bench_discount_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("discount_engine");

    for size in [100usize, 1_000, 10_000].iter() {
        let records = inventory(*size);
        group.throughput(Throughput::Elements(*size as u64));
        for workers in [1usize, 4] {
            group.bench_with_input(
                BenchmarkId::new(format!("workers_{workers}"), size),
                &records,
                |b, records| {
                    let pool = WorkerPool::new(workers);
                    b.iter(|| evaluate_batch(black_box(records), reference(), pool));
                },
            );
        }
    }

    group.finish();
}

fn bench_forecast_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("forecast_pipeline");
    let config = ForecastConfig::default();

    for days in [30i64, 180, 365].iter() {
        let records = sales(10, *days);
        group.throughput(Throughput::Elements(records.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(days), &records, |b, records| {
            b.iter(|| forecast_batch(black_box(records.clone()), &config, WorkerPool::new(4)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_discount_engine, bench_forecast_pipeline);
criterion_main!(benches);
