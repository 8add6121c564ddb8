use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Int64Type, Schema};
use ticktab_table::{
    ColumnChunk, ColumnType, Error, Phase, Result, RowKeySet, ShiftSpec, SpaceMapper,
    StorageBacking, Table, TableSchema, TableStateConfig, TableUpdate, TickingTableState,
};
use ticktab_test_utils::init_tracing_for_tests;

const BACKINGS: [StorageBacking; 2] = [StorageBacking::Array, StorageBacking::Persistent];

fn id_val_schema() -> Result<TableSchema> {
    init_tracing_for_tests();
    TableSchema::from_arrow(&Schema::new(vec![
        Field::new("Id", DataType::Int64, false),
        Field::new("Val", DataType::Int64, false),
    ]))
}

fn config(backing: StorageBacking) -> TableStateConfig {
    TableStateConfig {
        backing,
        verify_invariants: true,
    }
}

fn ints(values: Vec<i64>) -> ArrayRef {
    Arc::new(Int64Array::from(values))
}

fn column(table: &Table, name: &str) -> Result<Vec<i64>> {
    let array = table.column_by_name(name)?.to_arrow()?;
    Ok(array.as_primitive::<Int64Type>().values().to_vec())
}

/// `Id = key`, `Val = key * 10` for every key in `keys`.
fn id_val_state(backing: StorageBacking, keys: &[u64]) -> Result<TickingTableState> {
    let ids: Vec<i64> = keys.iter().map(|&k| k as i64).collect();
    let vals: Vec<i64> = ids.iter().map(|v| v * 10).collect();
    TickingTableState::with_initial_data(
        id_val_schema()?,
        config(backing),
        RowKeySet::from_keys(keys.iter().copied())?,
        vec![vec![ints(ids), ints(vals)]],
    )
}

#[test]
fn remove_one_add_one_end_to_end() -> Result<()> {
    for backing in BACKINGS {
        let mut state = TickingTableState::with_initial_data(
            id_val_schema()?,
            config(backing),
            RowKeySet::from_range(0, 5),
            vec![vec![ints(vec![0, 1, 2, 3, 4]), ints(vec![10, 20, 30, 40, 50])]],
        )?;

        let update = TableUpdate::new()
            .with_removed(RowKeySet::from_keys([2])?)
            .with_added(
                RowKeySet::from_keys([5])?,
                vec![vec![ints(vec![5]), ints(vec![60])]],
            );
        let ticking = state.apply_update(update)?;

        assert_eq!(state.row_keys()?.to_vec(), vec![0, 1, 3, 4, 5]);
        let current = ticking.current();
        assert_eq!(current.num_rows(), 5);
        assert_eq!(column(current, "Id")?, vec![0, 1, 3, 4, 5]);
        assert_eq!(column(current, "Val")?, vec![10, 20, 40, 50, 60]);

        assert_eq!(ticking.removed().to_vec(), vec![2]);
        assert_eq!(ticking.added().to_vec(), vec![4]);
        assert!(ticking.modified().is_empty());
        assert_eq!(column(ticking.before_removes(), "Val")?, vec![10, 20, 30, 40, 50]);
        assert_eq!(column(ticking.before_modifies(), "Val")?, vec![10, 20, 40, 50]);
    }
    Ok(())
}

#[test]
fn remove_shift_add_order() -> Result<()> {
    for backing in BACKINGS {
        let keys: Vec<u64> = (0..10).collect();
        let mut state = id_val_state(backing, &keys)?;

        let update = TableUpdate::new()
            .with_removed(RowKeySet::from_keys([5])?)
            .with_shifts(ShiftSpec::from_triples([(6, 9, 106)])?)
            .with_added(
                RowKeySet::from_keys([100])?,
                vec![vec![ints(vec![-1]), ints(vec![-10])]],
            );
        let ticking = state.apply_update(update)?;

        let mut expected_keys: Vec<u64> = (0..5).collect();
        expected_keys.push(100);
        expected_keys.extend(106..110);
        assert_eq!(state.row_keys()?.to_vec(), expected_keys);

        // Shifted rows keep their payload; the new row lands between.
        assert_eq!(
            column(ticking.current(), "Id")?,
            vec![0, 1, 2, 3, 4, -1, 6, 7, 8, 9]
        );
        assert_eq!(ticking.removed().to_vec(), vec![5]);
        assert_eq!(ticking.added().to_vec(), vec![5]);
        assert_eq!(ticking.before_modifies().num_rows(), 9);
    }
    Ok(())
}

#[test]
fn multi_range_shifts_next_to_occupied_keys() -> Result<()> {
    for backing in BACKINGS {
        let keys: Vec<u64> = (0..30).collect();
        let mut state = id_val_state(backing, &keys)?;
        let ids: Vec<i64> = (0..5).chain(10..30).collect();
        let vals: Vec<i64> = ids.iter().map(|v| v * 10).collect();

        // Both blocks move up by 5; the upper one must go first.
        let update = TableUpdate::new()
            .with_removed(RowKeySet::from_range(5, 10))
            .with_shifts(ShiftSpec::from_triples([(10, 19, 15), (20, 29, 25)])?);
        let ticking = state.apply_update(update)?;
        let expected: Vec<u64> = (0..5).chain(15..35).collect();
        assert_eq!(state.row_keys()?.to_vec(), expected);
        assert_eq!(column(ticking.current(), "Id")?, ids);
        assert_eq!(column(ticking.current(), "Val")?, vals);
        assert_eq!(ticking.removed().to_vec(), (5..10).collect::<Vec<_>>());
        assert!(ticking.added().is_empty());

        // Both blocks move down by 10; the lower one must go first.
        let update = TableUpdate::new()
            .with_shifts(ShiftSpec::from_triples([(15, 24, 5), (25, 34, 15)])?);
        let ticking = state.apply_update(update)?;
        assert_eq!(state.row_keys()?.to_vec(), (0..25).collect::<Vec<_>>());
        assert_eq!(column(ticking.current(), "Id")?, ids);
        assert_eq!(column(ticking.current(), "Val")?, vals);
        assert!(ticking.removed().is_empty());
        assert!(ticking.added().is_empty());
    }
    Ok(())
}

#[test]
fn removes_run_before_shifts() -> Result<()> {
    // Remove key 5 then shift 6..=9 down onto 5..=8.
    let update = TableUpdate::new()
        .with_removed(RowKeySet::from_keys([5])?)
        .with_shifts(ShiftSpec::from_triples([(6, 9, 5)])?);
    let mut state = id_val_state(StorageBacking::Persistent, &(0..10).collect::<Vec<_>>())?;
    let ticking = state.apply_update(update)?;
    assert_eq!(state.row_keys()?.to_vec(), (0..9).collect::<Vec<_>>());
    assert_eq!(
        column(ticking.current(), "Id")?,
        vec![0, 1, 2, 3, 4, 6, 7, 8, 9]
    );

    // Running the shift first collides with the key that is about to go.
    let mut mapper = SpaceMapper::new();
    mapper.add_range(0, 10)?;
    assert!(matches!(
        mapper.apply_shift(6, 10, 5),
        Err(Error::DuplicateKeyError(5))
    ));
    Ok(())
}

#[test]
fn modifies_write_per_column_rows() -> Result<()> {
    for backing in BACKINGS {
        let mut state = id_val_state(backing, &[10, 20, 30, 40])?;
        let update = TableUpdate::new().with_modified(
            vec![RowKeySet::empty(), RowKeySet::from_keys([20, 40])?],
            vec![vec![ints(vec![]), ints(vec![-2, -4])]],
        );
        let ticking = state.apply_update(update)?;

        assert_eq!(ticking.modified()[0].len(), 0);
        assert_eq!(ticking.modified()[1].to_vec(), vec![1, 3]);
        assert_eq!(column(ticking.current(), "Val")?, vec![100, -2, 300, -4]);
        assert_eq!(column(ticking.current(), "Id")?, vec![10, 20, 30, 40]);
        assert_eq!(
            column(ticking.before_modifies(), "Val")?,
            vec![100, 200, 300, 400]
        );
    }
    Ok(())
}

#[test]
fn modified_rows_read_back_through_fill() -> Result<()> {
    let mut state = id_val_state(StorageBacking::Array, &[1, 2, 3])?;
    let ticking = state.apply_update(TableUpdate::new().with_modified(
        vec![RowKeySet::empty(), RowKeySet::from_keys([3])?],
        vec![vec![ints(vec![]), ints(vec![99])]],
    ))?;
    let rows = &ticking.modified()[1];
    let mut old = ColumnChunk::new(ColumnType::Int64, rows.len() as usize);
    let mut new = ColumnChunk::new(ColumnType::Int64, rows.len() as usize);
    ticking.before_modifies().fill_column(1, rows, &mut old)?;
    ticking.current().fill_column(1, rows, &mut new)?;
    assert_eq!(old.to_arrow()?.as_primitive::<Int64Type>().value(0), 30);
    assert_eq!(new.to_arrow()?.as_primitive::<Int64Type>().value(0), 99);
    Ok(())
}

#[test]
fn snapshots_survive_later_updates() -> Result<()> {
    for backing in BACKINGS {
        let mut state = id_val_state(backing, &[0, 1, 2])?;
        let first = state.apply_update(
            TableUpdate::new().with_removed(RowKeySet::from_keys([0])?),
        )?;
        let held = first.before_removes().clone();

        state.apply_update(TableUpdate::new().with_added(
            RowKeySet::from_keys([7])?,
            vec![vec![ints(vec![7]), ints(vec![70])]],
        ))?;
        state.apply_update(TableUpdate::new().with_modified(
            vec![RowKeySet::from_keys([1])?, RowKeySet::empty()],
            vec![vec![ints(vec![-1]), ints(vec![])]],
        ))?;

        assert_eq!(held.num_rows(), 3);
        assert_eq!(column(&held, "Id")?, vec![0, 1, 2]);
        assert_eq!(column(first.current(), "Id")?, vec![1, 2]);
        assert_eq!(column(&state.snapshot(), "Id")?, vec![-1, 2, 7]);
    }
    Ok(())
}

#[test]
fn add_and_mod_batches_together_are_rejected() -> Result<()> {
    let mut state = id_val_state(StorageBacking::Persistent, &[0, 1])?;
    let mut update = TableUpdate::new().with_added(
        RowKeySet::from_keys([2])?,
        vec![vec![ints(vec![2]), ints(vec![20])]],
    );
    update.modified = vec![RowKeySet::from_keys([0])?, RowKeySet::empty()];
    update.mod_batches = vec![vec![ints(vec![5]), ints(vec![])]];

    let err = state.apply_update(update).unwrap_err();
    assert!(matches!(err, Error::ProtocolError(_)));
    assert!(err.is_fatal_to_subscription());
    assert_eq!(state.row_keys()?.to_vec(), vec![0, 1]);
    assert!(!state.is_poisoned());
    Ok(())
}

#[test]
fn late_validation_failure_leaves_state_untouched() -> Result<()> {
    for backing in BACKINGS {
        let mut state = id_val_state(backing, &[0, 1, 2, 3])?;
        // Removing 1 is fine; adding 3 collides with a present key.
        let update = TableUpdate::new()
            .with_removed(RowKeySet::from_keys([1])?)
            .with_added(
                RowKeySet::from_keys([3])?,
                vec![vec![ints(vec![3]), ints(vec![33])]],
            );
        let err = state.apply_update(update).unwrap_err();
        assert!(matches!(err, Error::DuplicateKeyError(3)));

        assert!(!state.is_poisoned());
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.row_keys()?.to_vec(), vec![0, 1, 2, 3]);
        assert_eq!(column(&state.snapshot(), "Val")?, vec![0, 10, 20, 30]);

        state.apply_update(TableUpdate::new().with_removed(RowKeySet::from_keys([1])?))?;
        assert_eq!(state.row_keys()?.to_vec(), vec![0, 2, 3]);
    }
    Ok(())
}

#[test]
fn removing_absent_key_is_key_not_found() -> Result<()> {
    let mut state = id_val_state(StorageBacking::Array, &[0, 2])?;
    let err = state
        .apply_update(TableUpdate::new().with_removed(RowKeySet::from_keys([1])?))
        .unwrap_err();
    assert!(matches!(err, Error::KeyNotFoundError(1)));
    assert_eq!(state.num_rows(), 2);
    Ok(())
}

#[test]
fn modifying_absent_key_is_key_not_found() -> Result<()> {
    let mut state = id_val_state(StorageBacking::Persistent, &[0, 2])?;
    let err = state
        .apply_update(TableUpdate::new().with_modified(
            vec![RowKeySet::empty(), RowKeySet::from_keys([1])?],
            vec![vec![ints(vec![]), ints(vec![5])]],
        ))
        .unwrap_err();
    assert!(matches!(err, Error::KeyNotFoundError(1)));
    assert_eq!(column(&state.snapshot(), "Val")?, vec![0, 20]);
    Ok(())
}

#[test]
fn mismatched_shift_sequences_are_protocol_errors() -> Result<()> {
    let mut state = id_val_state(StorageBacking::Array, &[0, 1])?;
    let shifts = ShiftSpec::new(
        RowKeySet::from_keys([0, 1])?,
        RowKeySet::from_keys([0])?,
        RowKeySet::from_keys([10, 11])?,
    );
    let err = state
        .apply_update(TableUpdate::new().with_shifts(shifts))
        .unwrap_err();
    assert!(matches!(err, Error::ProtocolError(_)));
    Ok(())
}

#[test]
fn adds_split_across_runs_consume_data_in_key_order() -> Result<()> {
    for backing in BACKINGS {
        let mut state = id_val_state(backing, &[5, 6, 20])?;
        let added = RowKeySet::from_keys([0, 1, 10, 30])?;
        let ticking = state.apply_update(TableUpdate::new().with_added(
            added,
            vec![
                vec![ints(vec![0, 1]), ints(vec![0, 10])],
                vec![ints(vec![10, 30]), ints(vec![100, 300])],
            ],
        ))?;
        assert_eq!(
            column(ticking.current(), "Id")?,
            vec![0, 1, 5, 6, 10, 20, 30]
        );
        assert_eq!(ticking.added().to_string(), "[0..1],[4],[6]");
    }
    Ok(())
}

#[test]
fn record_batch_export() -> Result<()> {
    let schema = TableSchema::from_arrow(&Schema::new(vec![
        Field::new("Sym", DataType::Utf8, true),
        Field::new("Px", DataType::Int64, true),
    ]))?;
    let state = TickingTableState::with_initial_data(
        schema,
        TableStateConfig::default(),
        RowKeySet::from_range(100, 102),
        vec![vec![
            Arc::new(StringArray::from(vec!["a", "b"])) as ArrayRef,
            ints(vec![1, 2]),
        ]],
    )?;
    let batch = state.snapshot().to_record_batch()?;
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.num_columns(), 2);
    assert_eq!(batch.column(0).as_string::<i32>().value(1), "b");

    let empty = TickingTableState::new(id_val_schema()?, TableStateConfig::default());
    let batch = empty.snapshot().to_record_batch()?;
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 2);
    assert_eq!(batch.column(1).len(), 0);
    Ok(())
}

#[test]
fn unknown_column_lookup_is_invalid_argument() -> Result<()> {
    let state = id_val_state(StorageBacking::Array, &[0])?;
    let snapshot = state.snapshot();
    assert!(matches!(
        snapshot.column_by_name("Nope"),
        Err(Error::InvalidArgumentError(_))
    ));
    assert_eq!(snapshot.column_index("Val"), Some(1));
    assert!(snapshot.column(2).is_err());
    Ok(())
}
