//! Benchmarks for the sales aggregator
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use luma::analytics::{aggregate, resolve_columns, Row};
use luma::sheet::CsvSource;

const ITEMS: [&str; 12] = [
    "Latte", "Mocha", "Espresso", "Momo", "Croissant", "Brownie", "Cold Brew", "Chai",
    "Bagel", "Muffin", "Sandwich", "Lemonade",
];

fn create_test_rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            Row::new()
                .cell("Order Date", format!("2024-03-{:02}", i % 28 + 1))
                .cell("Menu Item", ITEMS[i % ITEMS.len()])
                .cell("Qty", format!("{}", i % 4 + 1))
                .cell("Total Amount", format!("₹{}", (i % 9 + 1) * 120))
                .cell("Category", if i % 3 == 0 { "Food" } else { "Drinks" })
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let columns = resolve_columns(&["Order Date", "Menu Item", "Qty", "Total Amount", "Category"]);

    for size in [100, 1000, 10000] {
        let rows = create_test_rows(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("rows_{}", size), |b| {
            b.iter(|| aggregate(black_box(&rows), black_box(&columns)))
        });
    }

    group.finish();
}

fn bench_csv_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv");

    let mut data = String::from("Order Date,Menu Item,Qty,Total Amount\n");
    for i in 0..1000 {
        data.push_str(&format!(
            "2024-03-{:02},{},{},{}\n",
            i % 28 + 1,
            ITEMS[i % ITEMS.len()],
            i % 4 + 1,
            (i % 9 + 1) * 120
        ));
    }

    group.throughput(Throughput::Elements(1000));
    group.bench_function("parse_1000", |b| {
        b.iter(|| CsvSource::parse_str(black_box(&data)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_aggregate, bench_csv_parse);
criterion_main!(benches);
