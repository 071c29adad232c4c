// Splitting strategy benchmarks - measure per-batch filter throughput
//
// Isolates strategy evaluation from Parquet I/O: batches are built in
// memory and split repeatedly. Covers the cheap integer strategies and
// the hash-per-row worst case.

use std::sync::Arc;

use arrow::array::{ArrayRef, Date32Array, Int64Array, RecordBatch, StringArray};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tablesplit::{split_batch, BatchIdentifiers, HashFunction, SplitStrategy};

/// Workload size presets
#[derive(Debug, Clone, Copy)]
enum WorkloadSize {
    Small,  // 10k rows
    Medium, // 250k rows
}

impl WorkloadSize {
    fn row_count(&self) -> usize {
        match self {
            WorkloadSize::Small => 10_000,
            WorkloadSize::Medium => 250_000,
        }
    }
}

/// Generate a synthetic table: sequential ids, dates cycling over 2021,
/// and a low-cardinality user column.
fn generate_batch(rows: usize) -> RecordBatch {
    // 2021-01-01 in days since the Unix epoch.
    const EPOCH_2021: i32 = 18_628;

    let ids = Int64Array::from_iter_values(0..rows as i64);
    let days = Date32Array::from_iter_values((0..rows).map(|i| EPOCH_2021 + (i % 365) as i32));
    let users = StringArray::from_iter_values((0..rows).map(|i| format!("user-{}", i % 1_000)));

    RecordBatch::try_from_iter(vec![
        ("id", Arc::new(ids) as ArrayRef),
        ("day", Arc::new(days) as ArrayRef),
        ("user", Arc::new(users) as ArrayRef),
    ])
    .unwrap()
}

fn identifiers(value: serde_json::Value) -> BatchIdentifiers {
    serde_json::from_value(value).unwrap()
}

fn bench_mod_integer(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_on_mod_integer");

    let strategy = SplitStrategy::ModInteger {
        column: "id".to_string(),
        modulus: 10,
    };
    let ids = identifiers(serde_json::json!({"id": 3}));

    for size in [WorkloadSize::Small, WorkloadSize::Medium] {
        let batch = generate_batch(size.row_count());
        group.throughput(Throughput::Elements(size.row_count() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", size)),
            &batch,
            |b, batch| {
                b.iter(|| {
                    black_box(split_batch(batch, &strategy, &ids).unwrap());
                });
            },
        );
    }

    group.finish();
}

fn bench_year_and_month(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_on_year_and_month");

    let strategy = SplitStrategy::YearAndMonth {
        column: "day".to_string(),
    };
    let ids = identifiers(serde_json::json!({"day": {"year": 2021, "month": 5}}));

    for size in [WorkloadSize::Small, WorkloadSize::Medium] {
        let batch = generate_batch(size.row_count());
        group.throughput(Throughput::Elements(size.row_count() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", size)),
            &batch,
            |b, batch| {
                b.iter(|| {
                    black_box(split_batch(batch, &strategy, &ids).unwrap());
                });
            },
        );
    }

    group.finish();
}

fn bench_hashed_column(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_on_hashed_column");

    let strategy = SplitStrategy::HashedColumn {
        column: "user".to_string(),
        hash_digits: 2,
        hash_function: HashFunction::Md5,
    };
    let ids = identifiers(serde_json::json!({"hash_value": "a1"}));

    for size in [WorkloadSize::Small, WorkloadSize::Medium] {
        let batch = generate_batch(size.row_count());
        group.throughput(Throughput::Elements(size.row_count() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", size)),
            &batch,
            |b, batch| {
                b.iter(|| {
                    black_box(split_batch(batch, &strategy, &ids).unwrap());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_mod_integer,
    bench_year_and_month,
    bench_hashed_column
);
criterion_main!(benches);
