//! Update application benchmark: cost of a steady-state tick.
//!
//! What it measures
//! - Builds a table of 100k rows with a key column and two payload columns.
//! - Each iteration applies one update that removes a strided set of keys,
//!   shifts a tail block, adds the same number of rows back, and measures
//!   the whole `apply_update` call including snapshot creation.
//! - Runs once per storage backing. The array backing copies on every
//!   snapshot; the persistent backing shares structure.
//!
//! Run:
//!   cargo bench --bench apply_update_bench

#![forbid(unsafe_code)]

use std::hint::black_box;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use ticktab_table::{
    RowKeySet, ShiftSpec, StorageBacking, TableSchema, TableStateConfig, TableUpdate,
    TickingTableState,
};

const TABLE_ROWS: u64 = 100_000;
const CHURN: u64 = 1_000;
const STRIDE: u64 = TABLE_ROWS / CHURN;

fn build_schema() -> TableSchema {
    TableSchema::from_arrow(&Schema::new(vec![
        Field::new("Key", DataType::Int64, false),
        Field::new("Qty", DataType::Int64, true),
        Field::new("Px", DataType::Float64, true),
    ]))
    .expect("schema")
}

fn build_columns(keys: &RowKeySet) -> Vec<ArrayRef> {
    let ids: Vec<i64> = keys.iter().map(|k| k as i64).collect();
    let qty: Vec<i64> = ids.iter().map(|k| k * 3).collect();
    let px: Vec<f64> = ids.iter().map(|&k| k as f64 * 0.25).collect();
    vec![
        Arc::new(Int64Array::from(ids)),
        Arc::new(Int64Array::from(qty)),
        Arc::new(Float64Array::from(px)),
    ]
}

fn build_state(backing: StorageBacking) -> TickingTableState {
    let keys = RowKeySet::from_range(0, TABLE_ROWS);
    let config = TableStateConfig {
        backing,
        verify_invariants: false,
    };
    let batches = vec![build_columns(&keys)];
    TickingTableState::with_initial_data(build_schema(), config, keys, batches)
        .expect("initial data")
}

/// Remove every `STRIDE`-th key, shift the upper half up by one block, and
/// re-add the removed keys below the shifted block.
fn build_update() -> TableUpdate {
    let removed = RowKeySet::from_keys((0..CHURN).map(|i| i * STRIDE)).expect("removed");
    let half = TABLE_ROWS / 2;
    let shifts =
        ShiftSpec::from_triples([(half, TABLE_ROWS - 1, half + TABLE_ROWS)]).expect("shifts");
    let added = removed.clone();
    let batches = vec![build_columns(&added)];
    TableUpdate::new()
        .with_removed(removed)
        .with_shifts(shifts)
        .with_added(added, batches)
}

fn bench_apply_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_update_100k_rows");
    group.sample_size(20);
    group.throughput(Throughput::Elements(CHURN * 2));

    for backing in [StorageBacking::Array, StorageBacking::Persistent] {
        group.bench_function(BenchmarkId::from_parameter(format!("{backing:?}")), |b| {
            b.iter_batched(
                || (build_state(backing), build_update()),
                |(mut state, update)| {
                    let ticking = state.apply_update(update).expect("apply");
                    black_box(ticking.current().num_rows());
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_apply_update);
criterion_main!(benches);
