// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use cqlcdc_type::Value;
use indexmap::IndexMap;

/// Columns of an upserted row, in insertion order: partition key, clustering key, then changed columns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
	columns: IndexMap<String, Value>,
}

impl Row {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets a column. A name seen before keeps its position and takes the new value.
	pub fn insert(&mut self, name: impl Into<String>, value: Value) {
		self.columns.insert(name.into(), value);
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.columns.get(name)
	}

	pub fn len(&self) -> usize {
		self.columns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.columns.is_empty()
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.columns.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.columns.iter().map(|(k, v)| (k.as_str(), v))
	}
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
	fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
		let mut row = Row::new();
		for (name, value) in iter {
			row.insert(name, value);
		}
		row
	}
}
