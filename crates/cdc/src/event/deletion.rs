// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use cqlcdc_type::Value;

/// Condition on one key column.
///
/// Either an equality (`column = value`, start and end are the same value) or a range
/// (`start < column <= end` and the like). A missing bound is [`Value::Null`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Criteria {
	column: String,
	start: Value,
	end: Value,
	start_inclusive: bool,
	end_inclusive: bool,
}

/// What a [`Criteria`] renders to: the literal value for equalities, bracket notation otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition<'a> {
	Equal(&'a Value),
	Range(String),
}

impl Criteria {
	pub fn equal(column: impl Into<String>, value: Value) -> Self {
		Self {
			column: column.into(),
			start: value.clone(),
			end: value,
			start_inclusive: true,
			end_inclusive: true,
		}
	}

	pub fn range(
		column: impl Into<String>,
		start: Value,
		end: Value,
		start_inclusive: bool,
		end_inclusive: bool,
	) -> Self {
		Self {
			column: column.into(),
			start,
			end,
			start_inclusive,
			end_inclusive,
		}
	}

	pub fn column(&self) -> &str {
		&self.column
	}

	pub fn start(&self) -> &Value {
		&self.start
	}

	pub fn end(&self) -> &Value {
		&self.end
	}

	pub fn start_inclusive(&self) -> bool {
		self.start_inclusive
	}

	pub fn end_inclusive(&self) -> bool {
		self.end_inclusive
	}

	/// Start equals end, by value. Two null bounds compare equal.
	pub fn is_equal(&self) -> bool {
		self.start == self.end
	}

	pub fn condition(&self) -> Condition<'_> {
		if self.is_equal() {
			return Condition::Equal(&self.start);
		}

		let mut out = String::new();
		out.push(if self.start_inclusive {
			'['
		} else {
			'('
		});
		if !self.start.is_null() {
			out.push_str(&self.start.to_string());
		}
		out.push_str(", ");
		if !self.end.is_null() {
			out.push_str(&self.end.to_string());
		}
		out.push(if self.end_inclusive {
			']'
		} else {
			')'
		});
		Condition::Range(out)
	}
}

/// Scope of a deletion: key criteria, plus the columns removed when not the whole row.
///
/// Criteria start with one equality per partition key column, continue with clustering equalities in
/// clustering order, and end with at most one range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deletion {
	columns: Vec<String>,
	criteria: Vec<Criteria>,
}

impl Deletion {
	pub fn new(columns: Vec<String>, criteria: Vec<Criteria>) -> Self {
		debug_assert!(!criteria.is_empty(), "deletion without criteria");
		debug_assert!(
			criteria.iter().rev().skip(1).all(Criteria::is_equal),
			"range criteria must be last"
		);
		Self {
			columns,
			criteria,
		}
	}

	/// Explicitly deleted column names; empty when the keyed rows are deleted as a whole.
	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	pub fn criteria(&self) -> &[Criteria] {
		&self.criteria
	}
}
