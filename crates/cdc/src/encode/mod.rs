// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Canonical JSON rendering of change events.
//!
//! Field order is fixed: `timestamp`, `keyspace`, `table`, `table_id`, `type`, then `row` for updates, or
//! `columns` (only when non-empty) and `criteria` for deletes.

use cqlcdc_type::Value;
use serde::{
	Serialize, Serializer,
	ser::{Error as _, SerializeMap, SerializeSeq},
};
use thiserror::Error;

mod lines;

pub use lines::LineSink;

use crate::event::{Change, ChangeEvent, Condition, Criteria, Row};

#[derive(Debug, Error)]
pub enum EncodeError {
	#[error("column '{column}' holds a non-finite float")]
	NonFiniteFloat {
		column: String,
	},

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

pub type EncodeResult<T> = std::result::Result<T, EncodeError>;

/// Renders one event as a single-line JSON document.
pub fn to_json(event: &ChangeEvent) -> EncodeResult<String> {
	check_encodable(event)?;
	Ok(serde_json::to_string(&EventDocument(event))?)
}

/// Same document as [`to_json`], as a JSON tree.
pub fn to_value(event: &ChangeEvent) -> EncodeResult<serde_json::Value> {
	check_encodable(event)?;
	Ok(serde_json::to_value(EventDocument(event))?)
}

fn check_encodable(event: &ChangeEvent) -> EncodeResult<()> {
	let offending = match &event.change {
		Change::Update(row) => row.iter().find(|(_, value)| !is_finite(value)).map(|(name, _)| name),
		Change::Delete(deletion) => deletion
			.criteria()
			.iter()
			.find(|c| !is_finite(c.start()) || !is_finite(c.end()))
			.map(Criteria::column),
	};

	match offending {
		Some(column) => Err(EncodeError::NonFiniteFloat {
			column: column.to_string(),
		}),
		None => Ok(()),
	}
}

fn is_finite(value: &Value) -> bool {
	match value {
		Value::Float(v) => v.is_finite(),
		Value::List(values) => values.iter().all(is_finite),
		Value::Map(entries) => entries.iter().all(|(k, v)| is_finite(k) && is_finite(v)),
		Value::Struct(fields) => fields.iter().all(|(_, v)| is_finite(v)),
		_ => true,
	}
}

struct EventDocument<'a>(&'a ChangeEvent);

impl Serialize for EventDocument<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let event = self.0;
		let mut map = serializer.serialize_map(None)?;
		map.serialize_entry("timestamp", &event.timestamp.to_string())?;
		map.serialize_entry("keyspace", &event.keyspace)?;
		map.serialize_entry("table", &event.table)?;
		map.serialize_entry("table_id", &event.table_id.hyphenated().to_string())?;
		map.serialize_entry("type", event.kind().as_str())?;

		match &event.change {
			Change::Update(row) => map.serialize_entry("row", &RowDocument(row))?,
			Change::Delete(deletion) => {
				if !deletion.columns().is_empty() {
					map.serialize_entry("columns", deletion.columns())?;
				}
				map.serialize_entry("criteria", &CriteriaDocument(deletion.criteria()))?;
			}
		}
		map.end()
	}
}

struct RowDocument<'a>(&'a Row);

impl Serialize for RowDocument<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.0.len()))?;
		for (name, value) in self.0.iter() {
			map.serialize_entry(name, &ValueDocument(value))?;
		}
		map.end()
	}
}

struct CriteriaDocument<'a>(&'a [Criteria]);

impl Serialize for CriteriaDocument<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.0.len()))?;
		for criteria in self.0 {
			match criteria.condition() {
				Condition::Equal(value) => map.serialize_entry(criteria.column(), &ValueDocument(value))?,
				Condition::Range(range) => map.serialize_entry(criteria.column(), &range)?,
			}
		}
		map.end()
	}
}

/// Null, booleans and numbers are native JSON. Timestamps are ISO-8601 strings, bytes `0x`-prefixed hex.
/// Map keys are rendered as text.
struct ValueDocument<'a>(&'a Value);

impl Serialize for ValueDocument<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self.0 {
			Value::Null => serializer.serialize_unit(),
			Value::Boolean(v) => serializer.serialize_bool(*v),
			Value::Integer(v) => serializer.serialize_i64(*v),
			Value::Float(v) => {
				if !v.is_finite() {
					return Err(S::Error::custom(format!("non-finite float {}", v)));
				}
				serializer.serialize_f64(v.value())
			}
			Value::Text(v) => serializer.serialize_str(v),
			Value::Bytes(_) | Value::Timestamp(_) => serializer.collect_str(self.0),
			Value::List(values) => {
				let mut seq = serializer.serialize_seq(Some(values.len()))?;
				for value in values {
					seq.serialize_element(&ValueDocument(value))?;
				}
				seq.end()
			}
			Value::Map(entries) => {
				let mut map = serializer.serialize_map(Some(entries.len()))?;
				for (key, value) in entries {
					map.serialize_entry(&key.to_string(), &ValueDocument(value))?;
				}
				map.end()
			}
			Value::Struct(fields) => {
				let mut map = serializer.serialize_map(Some(fields.len()))?;
				for (name, value) in fields {
					map.serialize_entry(name, &ValueDocument(value))?;
				}
				map.end()
			}
		}
	}
}
