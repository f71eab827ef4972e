// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Pins the order in which events of one partition are emitted.
//!
//! Partition and range deletions come first, in the order they were encountered, whatever their
//! timestamps. Row events follow row by row; only the events of a single row are sorted by timestamp.

mod common;

use common::{clustering_table, ms};
use cqlcdc_cdc::{
	ChangeKind, PartitionMutation, to_change_events,
	mutation::{Bound, Cell, PartitionKey, RangeTombstone, RowMutation},
};
use cqlcdc_type::{Timestamp, Value};

fn key() -> PartitionKey {
	PartitionKey::Values(vec![Value::text("pk"), Value::int(1)])
}

fn timeline(mutation: &PartitionMutation) -> Vec<(ChangeKind, Timestamp)> {
	to_change_events(&clustering_table(), mutation).unwrap().iter().map(|e| (e.kind(), e.timestamp)).collect()
}

#[test]
fn test_partition_level_deletions_precede_rows() {
	let mutation = PartitionMutation {
		key: key(),
		deletion: Some(ms(500)),
		range_tombstones: vec![RangeTombstone {
			deleted_at: ms(400),
			start: Bound::inclusive([Value::int(1)]),
			end: Bound::inclusive([Value::int(2)]),
		}],
		rows: vec![
			RowMutation::new([Value::int(5), Value::int(5)], ms(1)).with_column(Cell::live("v", 1, ms(1))),
		],
		..Default::default()
	};

	assert_eq!(
		timeline(&mutation),
		[(ChangeKind::Delete, ms(500)), (ChangeKind::Delete, ms(400)), (ChangeKind::Update, ms(1))]
	);
}

#[test]
fn test_range_tombstones_keep_encounter_order() {
	let tombstone = |at: i64, from: i32| RangeTombstone {
		deleted_at: ms(at),
		start: Bound::inclusive([Value::int(from)]),
		end: Bound::exclusive([Value::int(from + 10)]),
	};
	let mutation = PartitionMutation {
		key: key(),
		range_tombstones: vec![tombstone(2000, 10), tombstone(1000, 0)],
		..Default::default()
	};

	assert_eq!(timeline(&mutation), [(ChangeKind::Delete, ms(2000)), (ChangeKind::Delete, ms(1000))]);
}

#[test]
fn test_rows_are_not_interleaved() {
	let mutation = PartitionMutation {
		key: key(),
		rows: vec![
			RowMutation::new([Value::int(1), Value::int(1)], ms(10))
				.with_column(Cell::live("a", 1, ms(10)))
				.with_column(Cell::live("b", 2, ms(30))),
			RowMutation::new([Value::int(2), Value::int(2)], ms(20))
				.with_column(Cell::live("a", 3, ms(20)))
				.with_column(Cell::tombstone("b", ms(5))),
		],
		..Default::default()
	};

	assert_eq!(
		timeline(&mutation),
		[
			(ChangeKind::Update, ms(10)),
			(ChangeKind::Update, ms(30)),
			(ChangeKind::Delete, ms(5)),
			(ChangeKind::Update, ms(20)),
		]
	);
}

#[test]
fn test_static_row_precedes_regular_rows() {
	let mutation = PartitionMutation {
		key: key(),
		static_row: Some(cqlcdc_cdc::mutation::StaticRow {
			columns: vec![Cell::live("s", "x", ms(90)).into()],
		}),
		rows: vec![RowMutation::new([Value::int(1), Value::int(1)], ms(10)).with_column(Cell::live("a", 1, ms(10)))],
		..Default::default()
	};

	assert_eq!(timeline(&mutation), [(ChangeKind::Update, ms(90)), (ChangeKind::Update, ms(10))]);
}
