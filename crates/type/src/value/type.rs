// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde::Deserialize;

use crate::{
	error::{Result, TypeError},
	value::{Timestamp, Value},
};

/// A named field of a user-defined type.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UdtField {
	pub name: String,
	#[serde(rename = "type")]
	pub ty: ColumnType,
}

/// The declared type of a column, as far as it is needed to deserialize cell and key bytes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ColumnTypeRepr")]
pub enum ColumnType {
	Boolean,
	TinyInt,
	SmallInt,
	Int,
	BigInt,
	Counter,
	Float,
	Double,
	Text,
	Ascii,
	Blob,
	Timestamp,
	Uuid,
	TimeUuid,
	List(Box<ColumnType>),
	Set(Box<ColumnType>),
	Map(Box<ColumnType>, Box<ColumnType>),
	Udt {
		name: String,
		fields: Vec<UdtField>,
	},
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnTypeRepr {
	Name(String),
	Udt {
		udt: String,
		fields: Vec<UdtField>,
	},
}

impl TryFrom<ColumnTypeRepr> for ColumnType {
	type Error = TypeError;

	fn try_from(repr: ColumnTypeRepr) -> Result<Self> {
		match repr {
			ColumnTypeRepr::Name(name) => name.parse(),
			ColumnTypeRepr::Udt {
				udt,
				fields,
			} => Ok(ColumnType::Udt {
				name: udt,
				fields,
			}),
		}
	}
}

impl FromStr for ColumnType {
	type Err = TypeError;

	/// Parses CQL type names such as `int`, `frozen<list<text>>` or `map<text, int>`.
	fn from_str(s: &str) -> Result<Self> {
		let s = s.trim();
		let lower = s.to_ascii_lowercase();

		if let Some(inner) = generic_argument(&lower, "frozen") {
			return inner.parse();
		}
		if let Some(inner) = generic_argument(&lower, "list") {
			return Ok(ColumnType::List(Box::new(inner.parse()?)));
		}
		if let Some(inner) = generic_argument(&lower, "set") {
			return Ok(ColumnType::Set(Box::new(inner.parse()?)));
		}
		if let Some(inner) = generic_argument(&lower, "map") {
			let (key, value) = split_top_level(inner).ok_or_else(|| TypeError::UnknownType(s.to_string()))?;
			return Ok(ColumnType::Map(Box::new(key.parse()?), Box::new(value.parse()?)));
		}

		match lower.as_str() {
			"boolean" => Ok(ColumnType::Boolean),
			"tinyint" => Ok(ColumnType::TinyInt),
			"smallint" => Ok(ColumnType::SmallInt),
			"int" => Ok(ColumnType::Int),
			"bigint" => Ok(ColumnType::BigInt),
			"counter" => Ok(ColumnType::Counter),
			"float" => Ok(ColumnType::Float),
			"double" => Ok(ColumnType::Double),
			"text" | "varchar" => Ok(ColumnType::Text),
			"ascii" => Ok(ColumnType::Ascii),
			"blob" => Ok(ColumnType::Blob),
			"timestamp" => Ok(ColumnType::Timestamp),
			"uuid" => Ok(ColumnType::Uuid),
			"timeuuid" => Ok(ColumnType::TimeUuid),
			_ => Err(TypeError::UnknownType(s.to_string())),
		}
	}
}

fn generic_argument<'a>(s: &'a str, name: &str) -> Option<&'a str> {
	s.strip_prefix(name)?.trim_start().strip_prefix('<')?.strip_suffix('>').map(str::trim)
}

fn split_top_level(s: &str) -> Option<(&str, &str)> {
	let mut depth = 0usize;
	for (i, c) in s.char_indices() {
		match c {
			'<' => depth += 1,
			'>' => depth = depth.checked_sub(1)?,
			',' if depth == 0 => return Some((s[..i].trim(), s[i + 1..].trim())),
			_ => {}
		}
	}
	None
}

impl Display for ColumnType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			ColumnType::Boolean => f.write_str("boolean"),
			ColumnType::TinyInt => f.write_str("tinyint"),
			ColumnType::SmallInt => f.write_str("smallint"),
			ColumnType::Int => f.write_str("int"),
			ColumnType::BigInt => f.write_str("bigint"),
			ColumnType::Counter => f.write_str("counter"),
			ColumnType::Float => f.write_str("float"),
			ColumnType::Double => f.write_str("double"),
			ColumnType::Text => f.write_str("text"),
			ColumnType::Ascii => f.write_str("ascii"),
			ColumnType::Blob => f.write_str("blob"),
			ColumnType::Timestamp => f.write_str("timestamp"),
			ColumnType::Uuid => f.write_str("uuid"),
			ColumnType::TimeUuid => f.write_str("timeuuid"),
			ColumnType::List(element) => write!(f, "list<{}>", element),
			ColumnType::Set(element) => write!(f, "set<{}>", element),
			ColumnType::Map(key, value) => write!(f, "map<{}, {}>", key, value),
			ColumnType::Udt {
				name,
				..
			} => f.write_str(name),
		}
	}
}

impl ColumnType {
	/// Deserializes one serialized value of this type.
	///
	/// An empty buffer is the "empty value" and maps to [`Value::Null`] for every type that has no natural
	/// empty form; text and blob decode it as empty text and empty bytes.
	pub fn deserialize(&self, bytes: &[u8]) -> Result<Value> {
		if bytes.is_empty() && !matches!(self, ColumnType::Text | ColumnType::Ascii | ColumnType::Blob) {
			return Ok(Value::Null);
		}

		match self {
			ColumnType::Boolean => Ok(Value::Boolean(fixed::<1>(self, bytes)?[0] != 0)),
			ColumnType::TinyInt => Ok(Value::Integer(i8::from_be_bytes(fixed(self, bytes)?) as i64)),
			ColumnType::SmallInt => Ok(Value::Integer(i16::from_be_bytes(fixed(self, bytes)?) as i64)),
			ColumnType::Int => Ok(Value::Integer(i32::from_be_bytes(fixed(self, bytes)?) as i64)),
			ColumnType::BigInt | ColumnType::Counter => Ok(Value::Integer(i64::from_be_bytes(fixed(self, bytes)?))),
			ColumnType::Float => float(self, f32::from_be_bytes(fixed(self, bytes)?).into()),
			ColumnType::Double => float(self, f64::from_be_bytes(fixed(self, bytes)?)),
			ColumnType::Text | ColumnType::Ascii => Ok(Value::Text(std::str::from_utf8(bytes)?.to_string())),
			ColumnType::Blob => Ok(Value::Bytes(bytes.to_vec())),
			ColumnType::Timestamp => {
				Ok(Value::Timestamp(Timestamp::from_millis(i64::from_be_bytes(fixed(self, bytes)?))))
			}
			ColumnType::Uuid | ColumnType::TimeUuid => {
				let raw: [u8; 16] = fixed(self, bytes)?;
				Ok(Value::Text(uuid::Uuid::from_bytes(raw).hyphenated().to_string()))
			}
			ColumnType::List(element) | ColumnType::Set(element) => {
				let mut reader = Reader::new(self, bytes);
				let count = reader.count()?;
				let mut values = Vec::with_capacity(count);
				for _ in 0..count {
					values.push(reader.element(element)?);
				}
				reader.finish()?;
				Ok(Value::List(values))
			}
			ColumnType::Map(key, value) => {
				let mut reader = Reader::new(self, bytes);
				let count = reader.count()?;
				let mut entries = Vec::with_capacity(count);
				for _ in 0..count {
					let k = reader.element(key)?;
					let v = reader.element(value)?;
					entries.push((k, v));
				}
				reader.finish()?;
				Ok(Value::map(entries))
			}
			ColumnType::Udt {
				fields,
				..
			} => {
				let mut reader = Reader::new(self, bytes);
				let mut values = Vec::with_capacity(fields.len());
				for field in fields {
					let value = if reader.is_exhausted() {
						Value::Null
					} else {
						reader.element(&field.ty)?
					};
					values.push((field.name.clone(), value));
				}
				reader.finish()?;
				Ok(Value::Struct(values))
			}
		}
	}
}

fn float(ty: &ColumnType, v: f64) -> Result<Value> {
	if v.is_nan() {
		return Err(TypeError::NotANumber(ty.to_string()));
	}
	Ok(Value::float(v))
}

fn fixed<const N: usize>(ty: &ColumnType, bytes: &[u8]) -> Result<[u8; N]> {
	bytes.try_into().map_err(|_| TypeError::InvalidWidth {
		ty: ty.to_string(),
		expected: N,
		actual: bytes.len(),
	})
}

/// Cursor over the length-prefixed layout shared by collections and UDTs.
struct Reader<'a> {
	ty: &'a ColumnType,
	bytes: &'a [u8],
}

impl<'a> Reader<'a> {
	fn new(ty: &'a ColumnType, bytes: &'a [u8]) -> Self {
		Self {
			ty,
			bytes,
		}
	}

	fn is_exhausted(&self) -> bool {
		self.bytes.is_empty()
	}

	fn take(&mut self, n: usize) -> Result<&'a [u8]> {
		if self.bytes.len() < n {
			return Err(TypeError::Truncated {
				ty: self.ty.to_string(),
				expected: n,
				actual: self.bytes.len(),
			});
		}
		let (head, tail) = self.bytes.split_at(n);
		self.bytes = tail;
		Ok(head)
	}

	fn int(&mut self) -> Result<i32> {
		let raw = self.take(4)?;
		Ok(i32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
	}

	fn count(&mut self) -> Result<usize> {
		let count = self.int()?;
		usize::try_from(count).map_err(|_| TypeError::NegativeLength {
			ty: self.ty.to_string(),
			len: count,
		})
	}

	/// A negative length marks a null element.
	fn element(&mut self, ty: &ColumnType) -> Result<Value> {
		let len = self.int()?;
		if len < 0 {
			return Ok(Value::Null);
		}
		let raw = self.take(len as usize)?;
		ty.deserialize(raw)
	}

	fn finish(self) -> Result<()> {
		if self.bytes.is_empty() {
			Ok(())
		} else {
			Err(TypeError::TrailingBytes {
				ty: self.ty.to_string(),
				remaining: self.bytes.len(),
			})
		}
	}
}
