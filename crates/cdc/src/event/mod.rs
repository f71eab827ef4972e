// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use cqlcdc_type::Timestamp;
use uuid::Uuid;

mod deletion;
mod row;

pub use deletion::{Condition, Criteria, Deletion};
pub use row::Row;

use crate::schema::TableLayout;

/// The table an event belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRef {
	pub keyspace: String,
	pub name: String,
	/// Stable across renames.
	pub id: Uuid,
}

impl From<&TableLayout> for TableRef {
	fn from(layout: &TableLayout) -> Self {
		Self {
			keyspace: layout.keyspace.clone(),
			name: layout.name.clone(),
			id: layout.id,
		}
	}
}

/// What changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change {
	/// Upsert of the row's columns.
	Update(Row),
	/// Deletion bounded by criteria.
	Delete(Deletion),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
	Update,
	Delete,
}

impl ChangeKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ChangeKind::Update => "update",
			ChangeKind::Delete => "delete",
		}
	}
}

impl Display for ChangeKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One semantic change to one table, effective at one timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
	pub keyspace: String,
	pub table: String,
	pub table_id: Uuid,
	/// Millisecond precision.
	pub timestamp: Timestamp,
	pub change: Change,
}

impl ChangeEvent {
	pub fn new(table: &TableRef, timestamp: Timestamp, change: Change) -> Self {
		Self {
			keyspace: table.keyspace.clone(),
			table: table.name.clone(),
			table_id: table.id,
			timestamp,
			change,
		}
	}

	pub fn kind(&self) -> ChangeKind {
		match self.change {
			Change::Update(_) => ChangeKind::Update,
			Change::Delete(_) => ChangeKind::Delete,
		}
	}

	pub fn row(&self) -> Option<&Row> {
		match &self.change {
			Change::Update(row) => Some(row),
			Change::Delete(_) => None,
		}
	}

	pub fn deletion(&self) -> Option<&Deletion> {
		match &self.change {
			Change::Update(_) => None,
			Change::Delete(deletion) => Some(deletion),
		}
	}
}
