// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Collects the changes of one partition and turns them into ordered change events.

use cqlcdc_type::{Timestamp, Value};
use tracing::trace;

mod row;

pub use row::RowAccumulator;

use crate::{
	error::{CdcError, CdcResult},
	event::{Change, ChangeEvent, Criteria, Deletion, TableRef},
};

/// Position of a row within an [`EventAssembler`], in begin order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub usize);

/// Builds the change events of a single partition.
///
/// Partition and range deletions become events immediately, in call order. Row changes are accumulated
/// per row and only turned into events by [`EventAssembler::finish`], which appends them after all
/// partition-level events, row by row in begin order. The result is therefore not globally sorted by
/// timestamp.
#[derive(Debug)]
pub struct EventAssembler {
	table: TableRef,
	partition_key: Vec<(String, Value)>,
	rows: Vec<RowAccumulator>,
	current: Option<RowId>,
	events: Vec<ChangeEvent>,
}

impl EventAssembler {
	pub fn new(table: TableRef, partition_key: Vec<(String, Value)>) -> Self {
		Self {
			table,
			partition_key,
			rows: Vec::new(),
			current: None,
			events: Vec::new(),
		}
	}

	pub fn table(&self) -> &TableRef {
		&self.table
	}

	pub fn partition_key(&self) -> &[(String, Value)] {
		&self.partition_key
	}

	pub fn current_row(&self) -> Option<RowId> {
		self.current
	}

	pub fn row(&self, id: RowId) -> Option<&RowAccumulator> {
		self.rows.get(id.0)
	}

	fn ensure_partition_key(&self) -> CdcResult<()> {
		if self.partition_key.is_empty() {
			return Err(CdcError::MissingPartitionKey {
				keyspace: self.table.keyspace.clone(),
				table: self.table.name.clone(),
			});
		}
		Ok(())
	}

	fn partition_criteria(&self) -> Vec<Criteria> {
		self.partition_key.iter().map(|(name, value)| Criteria::equal(name.clone(), value.clone())).collect()
	}

	/// Emits a deletion of the whole partition.
	pub fn partition_deleted_at(&mut self, timestamp: Timestamp) -> CdcResult<()> {
		self.ensure_partition_key()?;
		let deletion = Deletion::new(Vec::new(), self.partition_criteria());
		self.events.push(ChangeEvent::new(&self.table, timestamp.truncate_to_millis(), Change::Delete(deletion)));
		Ok(())
	}

	/// Emits a deletion of a clustering range. `clustering` holds the clustering criteria, partition key
	/// equalities are prepended.
	pub fn range_deleted_at(&mut self, timestamp: Timestamp, clustering: Vec<Criteria>) -> CdcResult<()> {
		self.ensure_partition_key()?;
		let mut criteria = self.partition_criteria();
		criteria.extend(clustering);
		let deletion = Deletion::new(Vec::new(), criteria);
		self.events.push(ChangeEvent::new(&self.table, timestamp.truncate_to_millis(), Change::Delete(deletion)));
		Ok(())
	}

	/// Begins the static row of the partition. It has no clustering key and no liveness.
	pub fn begin_static_row(&mut self) -> RowId {
		self.begin_row(Timestamp::NONE)
	}

	/// Begins a new row; it becomes the current row.
	pub fn begin_row(&mut self, liveness: Timestamp) -> RowId {
		let id = RowId(self.rows.len());
		self.rows.push(RowAccumulator::new(liveness));
		self.current = Some(id);
		id
	}

	fn current_mut(&mut self, operation: &'static str) -> CdcResult<&mut RowAccumulator> {
		let id = self.current.ok_or(CdcError::NoActiveRow {
			operation,
		})?;
		self.rows.get_mut(id.0).ok_or(CdcError::NoActiveRow {
			operation,
		})
	}

	pub fn mark_deleted_at(&mut self, timestamp: Timestamp) -> CdcResult<()> {
		self.current_mut("mark_deleted_at")?.mark_deleted_at(timestamp);
		Ok(())
	}

	pub fn add_clustering_column(&mut self, name: impl Into<String>, value: Value) -> CdcResult<()> {
		self.current_mut("add_clustering_column")?.add_clustering_column(name, value);
		Ok(())
	}

	pub fn add_column(&mut self, name: impl Into<String>, value: Value, timestamp: Timestamp) -> CdcResult<()> {
		self.current_mut("add_column")?.add_column(name, value, timestamp);
		Ok(())
	}

	pub fn add_deleted_column(&mut self, name: impl Into<String>, timestamp: Timestamp) -> CdcResult<()> {
		self.current_mut("add_deleted_column")?.add_deleted_column(name, timestamp);
		Ok(())
	}

	/// Consumes the assembler and returns every event of the partition.
	pub fn finish(self) -> CdcResult<Vec<ChangeEvent>> {
		self.ensure_partition_key()?;

		let Self {
			table,
			partition_key,
			rows,
			mut events,
			..
		} = self;

		trace!(table = %table.name, rows = rows.len(), partition_events = events.len(), "finishing partition");

		for row in rows {
			events.extend(row.build(&table, &partition_key));
		}
		Ok(events)
	}
}

#[cfg(test)]
mod tests {
	use uuid::Uuid;

	use super::*;
	use crate::event::ChangeKind;

	fn table() -> TableRef {
		TableRef {
			keyspace: "ks".to_string(),
			name: "t".to_string(),
			id: Uuid::nil(),
		}
	}

	fn assembler() -> EventAssembler {
		EventAssembler::new(table(), vec![("key".to_string(), Value::text("k"))])
	}

	fn ms(millis: i64) -> Timestamp {
		Timestamp::from_millis(millis)
	}

	#[test]
	fn test_column_before_row_is_rejected() {
		let mut assembler = assembler();
		assert_eq!(
			assembler.add_column("a", Value::int(1), ms(1)),
			Err(CdcError::NoActiveRow {
				operation: "add_column"
			})
		);
		assert!(matches!(assembler.add_deleted_column("a", ms(1)), Err(CdcError::NoActiveRow { .. })));
		assert!(matches!(assembler.add_clustering_column("c", Value::int(1)), Err(CdcError::NoActiveRow { .. })));
		assert!(matches!(assembler.mark_deleted_at(ms(1)), Err(CdcError::NoActiveRow { .. })));
	}

	#[test]
	fn test_finish_without_partition_key_is_rejected() {
		let assembler = EventAssembler::new(table(), Vec::new());
		assert_eq!(
			assembler.finish(),
			Err(CdcError::MissingPartitionKey {
				keyspace: "ks".to_string(),
				table: "t".to_string()
			})
		);
	}

	#[test]
	fn test_partition_deletion_without_partition_key_is_rejected() {
		let mut assembler = EventAssembler::new(table(), Vec::new());
		assert!(matches!(assembler.partition_deleted_at(ms(1)), Err(CdcError::MissingPartitionKey { .. })));
	}

	#[test]
	fn test_operations_target_latest_row() {
		let mut assembler = assembler();
		let first = assembler.begin_row(ms(1));
		assembler.add_clustering_column("c", Value::int(1)).unwrap();
		let second = assembler.begin_row(ms(2));
		assembler.add_clustering_column("c", Value::int(2)).unwrap();
		assembler.add_column("a", Value::int(9), ms(2)).unwrap();

		assert_eq!(assembler.current_row(), Some(second));
		assert_ne!(first, second);

		let events = assembler.finish().unwrap();
		assert_eq!(events.len(), 2);
		// first row only saw its clustering key
		assert_eq!(events[0].row().unwrap().len(), 2);
		assert_eq!(events[1].row().unwrap().get("a"), Some(&Value::int(9)));
		assert_eq!(events[1].row().unwrap().get("c"), Some(&Value::int(2)));
	}

	#[test]
	fn test_partition_events_precede_row_events() {
		let mut assembler = assembler();
		assembler.begin_row(ms(1));
		assembler.add_column("a", Value::int(1), ms(1)).unwrap();
		assembler.partition_deleted_at(ms(100)).unwrap();

		let events = assembler.finish().unwrap();
		assert_eq!(events.iter().map(ChangeEvent::kind).collect::<Vec<_>>(), [ChangeKind::Delete, ChangeKind::Update]);
		assert_eq!(events[0].timestamp, ms(100));
		assert_eq!(events[1].timestamp, ms(1));
	}

	#[test]
	fn test_range_deletion_prepends_partition_key() {
		let mut assembler = assembler();
		assembler
			.range_deleted_at(ms(5), vec![Criteria::range("c", Value::int(1), Value::Null, true, false)])
			.unwrap();

		let events = assembler.finish().unwrap();
		let criteria = events[0].deletion().unwrap().criteria();
		assert_eq!(criteria[0], Criteria::equal("key", Value::text("k")));
		assert_eq!(criteria[1].column(), "c");
	}

	#[test]
	fn test_static_row_has_no_liveness() {
		let mut assembler = assembler();
		let id = assembler.begin_static_row();
		assert!(assembler.row(id).unwrap().liveness().is_none());
	}
}
