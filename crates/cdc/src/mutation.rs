// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Decoded partition mutations, as handed over by the commit log reader.
//!
//! Everything here is already parsed out of the binary segment. Key values are positional: partition key
//! values and clustering values line up with the column order of the owning [`TableLayout`].
//!
//! [`TableLayout`]: crate::schema::TableLayout

use cqlcdc_type::{Timestamp, Value};
use serde::Deserialize;

/// All changes to one partition of one table carried by a single mutation.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PartitionMutation {
	pub key: PartitionKey,
	/// Present when the whole partition was deleted.
	#[serde(default)]
	pub deletion: Option<Timestamp>,
	/// In the order they are stored in the mutation.
	#[serde(default)]
	pub range_tombstones: Vec<RangeTombstone>,
	#[serde(default)]
	pub static_row: Option<StaticRow>,
	#[serde(default)]
	pub rows: Vec<RowMutation>,
}

/// The partition key, either decoded per column or as the raw key bytes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionKey {
	/// One value per partition key column.
	Values(Vec<Value>),
	/// Serialized key; composite when the table declares more than one partition key column.
	Raw(Vec<u8>),
}

impl Default for PartitionKey {
	fn default() -> Self {
		PartitionKey::Values(Vec::new())
	}
}

/// Deletion of an interval of clustering keys.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RangeTombstone {
	pub deleted_at: Timestamp,
	pub start: Bound,
	pub end: Bound,
}

/// One side of a clustering interval. `values` is a prefix of the clustering columns, possibly empty.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Bound {
	#[serde(default)]
	pub values: Vec<Value>,
	#[serde(default)]
	pub inclusive: bool,
}

impl Bound {
	pub fn inclusive(values: impl IntoIterator<Item = Value>) -> Self {
		Self {
			values: values.into_iter().collect(),
			inclusive: true,
		}
	}

	pub fn exclusive(values: impl IntoIterator<Item = Value>) -> Self {
		Self {
			values: values.into_iter().collect(),
			inclusive: false,
		}
	}

	/// The bottom or top of the partition.
	pub fn unbounded() -> Self {
		Self::default()
	}
}

/// Static columns of the partition; they have no clustering key.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct StaticRow {
	#[serde(default)]
	pub columns: Vec<ColumnData>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RowMutation {
	#[serde(default)]
	pub clustering: Vec<Value>,
	/// When the row's existence was last asserted, independent of its columns.
	#[serde(default = "no_timestamp")]
	pub liveness: Timestamp,
	/// Present when the row was deleted.
	#[serde(default)]
	pub deletion: Option<Timestamp>,
	#[serde(default)]
	pub columns: Vec<ColumnData>,
}

fn no_timestamp() -> Timestamp {
	Timestamp::NONE
}

impl RowMutation {
	pub fn new(clustering: impl IntoIterator<Item = Value>, liveness: Timestamp) -> Self {
		Self {
			clustering: clustering.into_iter().collect(),
			liveness,
			deletion: None,
			columns: Vec::new(),
		}
	}

	pub fn deleted_at(mut self, timestamp: Timestamp) -> Self {
		self.deletion = Some(timestamp);
		self
	}

	pub fn with_column(mut self, column: impl Into<ColumnData>) -> Self {
		self.columns.push(column.into());
		self
	}
}

/// The data of one column within a row.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "cell", rename_all = "snake_case")]
pub enum ColumnData {
	Simple(Cell),
	Complex(ComplexColumn),
}

impl From<Cell> for ColumnData {
	fn from(cell: Cell) -> Self {
		ColumnData::Simple(cell)
	}
}

impl From<ComplexColumn> for ColumnData {
	fn from(column: ComplexColumn) -> Self {
		ColumnData::Complex(column)
	}
}

/// A single-valued column write or tombstone. A missing value marks a tombstone.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Cell {
	pub column: String,
	pub timestamp: Timestamp,
	#[serde(default)]
	pub value: Option<Value>,
}

impl Cell {
	pub fn live(column: impl Into<String>, value: impl Into<Value>, timestamp: Timestamp) -> Self {
		Self {
			column: column.into(),
			timestamp,
			value: Some(value.into()),
		}
	}

	pub fn tombstone(column: impl Into<String>, timestamp: Timestamp) -> Self {
		Self {
			column: column.into(),
			timestamp,
			value: None,
		}
	}

	pub fn is_tombstone(&self) -> bool {
		self.value.is_none()
	}
}

/// How the sub-entries of a complex column are keyed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexKind {
	/// Paths are cell identifiers (time uuids); values are the elements.
	List,
	/// Paths are the elements; values are empty.
	Set,
	/// Paths are map keys.
	Map,
	/// Paths are field positions, or already resolved field names.
	Udt {
		fields: Vec<String>,
	},
}

/// A non-frozen collection or user-defined type column, stored as timestamped sub-entries.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ComplexColumn {
	pub column: String,
	pub kind: ComplexKind,
	/// The "clear" marker: present when prior contents were deleted at this timestamp.
	#[serde(default)]
	pub deletion: Option<Timestamp>,
	#[serde(default)]
	pub entries: Vec<ComplexEntry>,
}

impl ComplexColumn {
	pub fn new(column: impl Into<String>, kind: ComplexKind) -> Self {
		Self {
			column: column.into(),
			kind,
			deletion: None,
			entries: Vec::new(),
		}
	}

	pub fn cleared_at(mut self, timestamp: Timestamp) -> Self {
		self.deletion = Some(timestamp);
		self
	}

	pub fn with_entry(mut self, entry: ComplexEntry) -> Self {
		self.entries.push(entry);
		self
	}
}

/// One timestamped sub-entry of a complex column. A missing value marks an element tombstone.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ComplexEntry {
	pub path: Value,
	pub timestamp: Timestamp,
	#[serde(default)]
	pub value: Option<Value>,
}

impl ComplexEntry {
	pub fn live(path: impl Into<Value>, value: impl Into<Value>, timestamp: Timestamp) -> Self {
		Self {
			path: path.into(),
			timestamp,
			value: Some(value.into()),
		}
	}

	pub fn tombstone(path: impl Into<Value>, timestamp: Timestamp) -> Self {
		Self {
			path: path.into(),
			timestamp,
			value: None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_deserialize_complex_column() {
		let column: ColumnData = serde_json::from_value(serde_json::json!({
			"cell": "complex",
			"column": "col1",
			"kind": "map",
			"deletion": 999,
			"entries": [{
				"path": {"type": "text", "value": "foo"},
				"timestamp": 1000,
				"value": {"type": "integer", "value": 1}
			}]
		}))
		.unwrap();

		let expected = ComplexColumn::new("col1", ComplexKind::Map)
			.cleared_at(Timestamp::from_micros(999))
			.with_entry(ComplexEntry::live("foo", 1, Timestamp::from_micros(1000)));
		assert_eq!(column, ColumnData::Complex(expected));
	}

	#[test]
	fn test_deserialize_udt_kind() {
		let kind: ComplexKind = serde_json::from_value(serde_json::json!({"udt": {"fields": ["street", "zip"]}}))
			.unwrap();
		assert_eq!(
			kind,
			ComplexKind::Udt {
				fields: vec!["street".to_string(), "zip".to_string()]
			}
		);
	}

	#[test]
	fn test_deserialize_rows_and_tombstones() {
		let mutation: PartitionMutation = serde_json::from_value(serde_json::json!({
			"key": {"raw": [0, 1]},
			"deletion": 500,
			"range_tombstones": [{
				"deleted_at": 1000,
				"start": {"values": [{"type": "integer", "value": 1}], "inclusive": true},
				"end": {"values": [{"type": "integer", "value": 5}]}
			}],
			"rows": [{
				"liveness": 2000,
				"columns": [
					{"cell": "simple", "column": "col1", "timestamp": 2000, "value": {"type": "integer", "value": 5}},
					{"cell": "simple", "column": "col2", "timestamp": 2000}
				]
			}]
		}))
		.unwrap();

		assert_eq!(mutation.key, PartitionKey::Raw(vec![0, 1]));
		assert_eq!(mutation.deletion, Some(Timestamp::from_micros(500)));
		assert_eq!(mutation.range_tombstones[0].start, Bound::inclusive([Value::int(1)]));
		assert_eq!(mutation.range_tombstones[0].end, Bound::exclusive([Value::int(5)]));

		let row = &mutation.rows[0];
		assert_eq!(row.liveness, Timestamp::from_micros(2000));
		assert!(row.clustering.is_empty());
		assert_eq!(row.columns[0], ColumnData::Simple(Cell::live("col1", 5, Timestamp::from_micros(2000))));
		assert_eq!(row.columns[1], ColumnData::Simple(Cell::tombstone("col2", Timestamp::from_micros(2000))));
	}

	#[test]
	fn test_row_liveness_defaults_to_none() {
		let row: RowMutation = serde_json::from_value(serde_json::json!({})).unwrap();
		assert!(row.liveness.is_none());
	}
}
