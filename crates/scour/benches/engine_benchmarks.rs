//! Cleaning engine benchmarks.
//!
//! Measures parsing, duplicate removal, outlier detection and KNN imputation
//! across table sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use scour::{Augmentor, Cleaner, Keep, Parser};

/// Generate synthetic CSV with numeric, label and sparse columns.
fn generate_csv_data(rows: usize) -> String {
    let mut data = String::from("id,amount,ratio,region,visits\n");

    for row in 0..rows {
        let amount = if row % 17 == 0 {
            String::new()
        } else {
            format!("{:.2}", (row % 250) as f64 * 1.5)
        };
        let visits = if row % 11 == 0 {
            "NA".to_string()
        } else {
            (row % 40).to_string()
        };
        data.push_str(&format!(
            "{},{},{:.3},region_{},{}\n",
            row % (rows / 2).max(1),
            amount,
            (row % 13) as f64 / 13.0,
            row % 6,
            visits
        ));
    }

    data
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_csv");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_csv_data(*rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            let parser = Parser::new();
            b.iter(|| black_box(parser.parse_str(data).unwrap()));
        });
    }

    group.finish();
}

fn bench_remove_duplicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_duplicates");

    for rows in [1_000, 10_000].iter() {
        let table = Parser::new().parse_str(&generate_csv_data(*rows)).unwrap();
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| {
                let mut cleaner = Cleaner::new(table);
                black_box(cleaner.remove_duplicates(None, Keep::First).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_detect_outliers(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_outliers");
    group.sample_size(20);

    for rows in [500, 5_000].iter() {
        let table = Parser::new().parse_str(&generate_csv_data(*rows)).unwrap();
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| {
                let mut engine = Augmentor::new(table);
                black_box(engine.detect_outliers(None, 0.05).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_smart_impute(c: &mut Criterion) {
    let mut group = c.benchmark_group("smart_impute");
    group.sample_size(10);

    for rows in [200, 2_000].iter() {
        let table = Parser::new().parse_str(&generate_csv_data(*rows)).unwrap();
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| {
                let mut engine = Augmentor::new(table);
                black_box(engine.smart_impute(None).unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_remove_duplicates,
    bench_detect_outliers,
    bench_smart_impute
);
criterion_main!(benches);
