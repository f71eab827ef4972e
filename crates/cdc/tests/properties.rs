// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod common;

use common::{clustering_table, ms, simple_table};
use cqlcdc_cdc::{
	Change, ChangeKind, Criteria, PartitionMutation, Row, encode::to_value, to_change_events,
	mutation::{Cell, ComplexColumn, ComplexEntry, ComplexKind, PartitionKey, RowMutation},
};
use cqlcdc_type::Value;
use serde_json::json;

fn partition(key: Vec<Value>, rows: Vec<RowMutation>) -> PartitionMutation {
	PartitionMutation {
		key: PartitionKey::Values(key),
		rows,
		..Default::default()
	}
}

#[test]
fn test_each_event_is_update_xor_delete() {
	let mutation = PartitionMutation {
		deletion: Some(ms(1)),
		..partition(
			vec![Value::text("pk"), Value::int(1)],
			vec![
				RowMutation::new([Value::int(1), Value::int(2)], ms(2))
					.with_column(Cell::live("a", 1, ms(2)))
					.with_column(Cell::tombstone("b", ms(3))),
			],
		)
	};

	for event in to_change_events(&clustering_table(), &mutation).unwrap() {
		assert!(event.row().is_some() != event.deletion().is_some());
		let document = to_value(&event).unwrap();
		assert!(document.get("row").is_some() != document.get("criteria").is_some());
	}
}

#[test]
fn test_partition_deletion_criteria_are_partition_key_only() {
	let mutation = PartitionMutation {
		deletion: Some(ms(7)),
		..partition(
			vec![Value::text("pk"), Value::int(1)],
			vec![RowMutation::new([Value::int(1), Value::int(2)], ms(2)).with_column(Cell::live("a", 1, ms(2)))],
		)
	};

	let events = to_change_events(&clustering_table(), &mutation).unwrap();
	let deletion = events[0].deletion().unwrap();
	assert!(deletion.columns().is_empty());
	assert_eq!(
		deletion.criteria(),
		[Criteria::equal("key1", Value::text("pk")), Criteria::equal("key2", Value::int(1))]
	);
}

#[test]
fn test_k_write_timestamps_yield_k_updates() {
	let mut row = RowMutation::new([], ms(1));
	for (i, name) in ["a", "b", "c", "d"].iter().enumerate() {
		row = row.with_column(Cell::live(*name, i as i64, ms(10 * (i as i64 + 1))));
	}
	// same millisecond as "a"
	row = row.with_column(Cell::live("e", 99, ms(10)));

	let events = to_change_events(&simple_table(), &partition(vec![Value::text("k")], vec![row])).unwrap();
	assert_eq!(events.len(), 4);
	assert!(events.iter().all(|e| e.kind() == ChangeKind::Update));

	let names: Vec<Vec<&str>> = events.iter().map(|e| e.row().unwrap().names().collect()).collect();
	assert_eq!(names, [vec!["key", "a", "e"], vec!["key", "b"], vec!["key", "c"], vec!["key", "d"]]);
}

#[test]
fn test_clustering_only_row_is_key_only_update() {
	let row = RowMutation::new([Value::int(1), Value::int(2)], ms(8));
	let mutation = partition(vec![Value::text("pk"), Value::int(1)], vec![row]);

	let events = to_change_events(&clustering_table(), &mutation).unwrap();
	assert_eq!(events.len(), 1);
	let expected: Row = [
		("key1", Value::text("pk")),
		("key2", Value::int(1)),
		("cluster1", Value::int(1)),
		("cluster2", Value::int(2)),
	]
	.into_iter()
	.collect();
	assert_eq!(events[0].change, Change::Update(expected));
	assert_eq!(events[0].timestamp, ms(8));
}

#[test]
fn test_deleted_row_is_key_only_delete() {
	let row = RowMutation::new([Value::int(1), Value::int(2)], cqlcdc_type::Timestamp::NONE).deleted_at(ms(9));
	let mutation = partition(vec![Value::text("pk"), Value::int(1)], vec![row]);

	let events = to_change_events(&clustering_table(), &mutation).unwrap();
	assert_eq!(events.len(), 1);
	let deletion = events[0].deletion().unwrap();
	assert!(deletion.columns().is_empty());
	assert_eq!(deletion.criteria().len(), 4);
	assert!(deletion.criteria().iter().all(Criteria::is_equal));
}

#[test]
fn test_empty_collection_write_is_column_deletion() {
	let cleared = ComplexColumn::new("tags", ComplexKind::Set).cleared_at(ms(12));
	let row = RowMutation::new([], ms(12)).with_column(cleared);

	let events = to_change_events(&simple_table(), &partition(vec![Value::text("k")], vec![row])).unwrap();
	assert_eq!(events.len(), 1);
	assert_eq!(
		to_value(&events[0]).unwrap(),
		json!({
			"timestamp": "1970-01-01T00:00:00.012Z",
			"keyspace": "ks",
			"table": "tbl",
			"table_id": common::TABLE_ID,
			"type": "delete",
			"columns": ["tags"],
			"criteria": {"key": "k"}
		})
	);
}

#[test]
fn test_collection_write_stamped_with_newest_entry() {
	let tags = ComplexColumn::new("tags", ComplexKind::Map)
		.with_entry(ComplexEntry::live("a", 1, ms(3)))
		.with_entry(ComplexEntry::live("b", 2, ms(6)));
	let row = RowMutation::new([], ms(3)).with_column(tags);

	let events = to_change_events(&simple_table(), &partition(vec![Value::text("k")], vec![row])).unwrap();
	assert_eq!(events.len(), 1);
	assert_eq!(events[0].timestamp, ms(6));
	assert_eq!(to_value(&events[0]).unwrap()["row"]["tags"], json!({"a": 1, "b": 2}));
}

#[test]
fn test_equal_range_bounds_encode_as_literal() {
	let deletion_criteria = Criteria::range("c", Value::int(4), Value::int(4), false, true);
	assert!(deletion_criteria.is_equal());

	let mutation = PartitionMutation {
		range_tombstones: vec![cqlcdc_cdc::mutation::RangeTombstone {
			deleted_at: ms(1),
			start: cqlcdc_cdc::mutation::Bound::exclusive([Value::int(4), Value::int(1)]),
			end: cqlcdc_cdc::mutation::Bound::inclusive([Value::int(4), Value::int(1)]),
		}],
		..partition(vec![Value::text("pk"), Value::int(1)], Vec::new())
	};
	let events = to_change_events(&clustering_table(), &mutation).unwrap();
	assert_eq!(
		to_value(&events[0]).unwrap()["criteria"],
		json!({"key1": "pk", "key2": 1, "cluster1": 4, "cluster2": 1})
	);
}
