// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::BTreeMap;

use cqlcdc_type::{Timestamp, Value};
use indexmap::IndexMap;

use crate::event::{Change, ChangeEvent, Criteria, Deletion, Row, TableRef};

/// Scratch state for one row of a partition while its cells are visited.
///
/// Writes and deletions are bucketed by their millisecond timestamp; each bucket later becomes one event.
#[derive(Debug)]
pub struct RowAccumulator {
	liveness: Timestamp,
	deleted_at: Option<Timestamp>,
	clustering: Vec<(String, Value)>,
	writes: BTreeMap<Timestamp, IndexMap<String, Value>>,
	deletions: BTreeMap<Timestamp, Vec<String>>,
}

impl RowAccumulator {
	pub fn new(liveness: Timestamp) -> Self {
		Self {
			liveness,
			deleted_at: None,
			clustering: Vec::new(),
			writes: BTreeMap::new(),
			deletions: BTreeMap::new(),
		}
	}

	pub fn liveness(&self) -> Timestamp {
		self.liveness
	}

	pub fn deleted_at(&self) -> Option<Timestamp> {
		self.deleted_at
	}

	pub fn mark_deleted_at(&mut self, timestamp: Timestamp) {
		self.deleted_at = Some(timestamp);
	}

	pub fn add_clustering_column(&mut self, name: impl Into<String>, value: Value) {
		self.clustering.push((name.into(), value));
	}

	pub fn add_column(&mut self, name: impl Into<String>, value: Value, timestamp: Timestamp) {
		self.writes.entry(timestamp.truncate_to_millis()).or_default().insert(name.into(), value);
	}

	pub fn add_deleted_column(&mut self, name: impl Into<String>, timestamp: Timestamp) {
		let name = name.into();
		let columns = self.deletions.entry(timestamp.truncate_to_millis()).or_default();
		if !columns.contains(&name) {
			columns.push(name);
		}
	}

	fn key_criteria(&self, partition_key: &[(String, Value)]) -> Vec<Criteria> {
		partition_key
			.iter()
			.chain(self.clustering.iter())
			.map(|(name, value)| Criteria::equal(name.clone(), value.clone()))
			.collect()
	}

	fn key_row(&self, partition_key: &[(String, Value)]) -> Row {
		partition_key.iter().chain(self.clustering.iter()).map(|(name, value)| (name.clone(), value.clone())).collect()
	}

	/// Turns the accumulated state into this row's events, ordered by timestamp.
	///
	/// One update per write timestamp, then one delete per deletion timestamp; the sort is stable, so at
	/// equal timestamps updates come before deletes. A row that saw neither yields a single event at its
	/// own timestamp: a key-only delete when the row was deleted, a key-only update otherwise.
	pub fn build(self, table: &TableRef, partition_key: &[(String, Value)]) -> Vec<ChangeEvent> {
		let mut events = Vec::with_capacity(self.writes.len() + self.deletions.len());

		for (timestamp, columns) in &self.writes {
			let mut row = self.key_row(partition_key);
			for (name, value) in columns {
				row.insert(name.clone(), value.clone());
			}
			events.push(ChangeEvent::new(table, *timestamp, Change::Update(row)));
		}

		for (timestamp, columns) in &self.deletions {
			let deletion = Deletion::new(columns.clone(), self.key_criteria(partition_key));
			events.push(ChangeEvent::new(table, *timestamp, Change::Delete(deletion)));
		}

		if events.is_empty() {
			let timestamp = self.deleted_at.unwrap_or(self.liveness).truncate_to_millis();
			let change = if self.deleted_at.is_some() {
				Change::Delete(Deletion::new(Vec::new(), self.key_criteria(partition_key)))
			} else {
				Change::Update(self.key_row(partition_key))
			};
			events.push(ChangeEvent::new(table, timestamp, change));
		}

		events.sort_by_key(|event| event.timestamp);
		events
	}
}
