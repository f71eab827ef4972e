// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

mod ordered_f64;
mod timestamp;
pub mod r#type;

pub use ordered_f64::{OrderedF64, OrderedFloatError};
pub use timestamp::Timestamp;

/// A deserialized column value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
	/// Absent value (null in CQL)
	Null,
	/// A boolean: true or false.
	Boolean(bool),
	/// Any signed integer up to 8 bytes wide (tinyint, smallint, int, bigint, counter)
	Integer(i64),
	/// A float or double
	Float(OrderedF64),
	/// UTF-8 text (text, varchar, ascii, and uuids rendered in hyphenated form)
	Text(String),
	/// Opaque bytes (blob)
	Bytes(Vec<u8>),
	/// A point in time
	Timestamp(Timestamp),
	/// Ordered elements of a list or set
	List(Vec<Value>),
	/// Ordered key/value pairs, keys unique
	Map(Vec<(Value, Value)>),
	/// Named fields of a user-defined type
	Struct(Vec<(String, Value)>),
}

impl Value {
	pub fn null() -> Self {
		Value::Null
	}

	pub fn bool(v: impl Into<bool>) -> Self {
		Value::Boolean(v.into())
	}

	pub fn int(v: impl Into<i64>) -> Self {
		Value::Integer(v.into())
	}

	/// NaN has no ordered representation and becomes [`Value::Null`]; decoding rejects it before this point.
	pub fn float(v: impl Into<f64>) -> Self {
		OrderedF64::try_from(v.into()).map(Value::Float).unwrap_or(Value::Null)
	}

	pub fn text(v: impl Into<String>) -> Self {
		Value::Text(v.into())
	}

	pub fn bytes(v: impl Into<Vec<u8>>) -> Self {
		Value::Bytes(v.into())
	}

	pub fn timestamp(v: impl Into<Timestamp>) -> Self {
		Value::Timestamp(v.into())
	}

	pub fn list(values: impl IntoIterator<Item = Value>) -> Self {
		Value::List(values.into_iter().collect())
	}

	/// Builds a map, keeping the position of the first occurrence of a key and the value of the last.
	pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
		let mut result: Vec<(Value, Value)> = Vec::new();
		for (key, value) in entries {
			match result.iter_mut().find(|(k, _)| *k == key) {
				Some(existing) => existing.1 = value,
				None => result.push((key, value)),
			}
		}
		Value::Map(result)
	}

	/// Builds a struct, with the same duplicate-field rule as [`Value::map`].
	pub fn record(fields: impl IntoIterator<Item = (String, Value)>) -> Self {
		let mut result: Vec<(String, Value)> = Vec::new();
		for (name, value) in fields {
			match result.iter_mut().find(|(n, _)| *n == name) {
				Some(existing) => existing.1 = value,
				None => result.push((name, value)),
			}
		}
		Value::Struct(result)
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// Renders the value the way a CQL statement would spell it: text is single-quoted, everything else
	/// uses [`Display`].
	pub fn to_cql_literal(&self) -> String {
		match self {
			Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
			other => other.to_string(),
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Null => f.write_str("null"),
			Value::Boolean(v) => Display::fmt(v, f),
			Value::Integer(v) => Display::fmt(v, f),
			Value::Float(v) => Display::fmt(v, f),
			Value::Text(v) => f.write_str(v),
			Value::Bytes(v) => {
				f.write_str("0x")?;
				for byte in v {
					write!(f, "{:02x}", byte)?;
				}
				Ok(())
			}
			Value::Timestamp(v) => Display::fmt(v, f),
			Value::List(values) => {
				f.write_str("[")?;
				for (i, value) in values.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					Display::fmt(value, f)?;
				}
				f.write_str("]")
			}
			Value::Map(entries) => {
				f.write_str("{")?;
				for (i, (key, value)) in entries.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}={}", key, value)?;
				}
				f.write_str("}")
			}
			Value::Struct(fields) => {
				f.write_str("{")?;
				for (i, (name, value)) in fields.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}={}", name, value)?;
				}
				f.write_str("}")
			}
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Boolean(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Integer(v as i64)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Integer(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Text(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Text(v)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Self {
		v.map(Into::into).unwrap_or(Value::Null)
	}
}
