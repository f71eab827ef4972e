// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Drives an [`EventAssembler`] through a decoded partition mutation.

use cqlcdc_type::{Timestamp, TypeError, Value};
use tracing::{debug, trace};

use crate::{
	assemble::EventAssembler,
	error::{CdcError, CdcResult},
	event::{ChangeEvent, Criteria, TableRef},
	mutation::{ColumnData, ComplexColumn, ComplexKind, PartitionKey, PartitionMutation, RangeTombstone},
	schema::TableLayout,
};

/// Walks partition mutations of one table.
///
/// Traversal order: partition key, partition deletion, range tombstones in stored order, static row, then
/// the rows in mutation order. Walking is stateless; every call starts a fresh assembler.
#[derive(Debug, Clone, Copy)]
pub struct PartitionWalker<'a> {
	layout: &'a TableLayout,
}

/// Convenience for `PartitionWalker::new(layout).walk(mutation)`.
pub fn to_change_events(layout: &TableLayout, mutation: &PartitionMutation) -> CdcResult<Vec<ChangeEvent>> {
	PartitionWalker::new(layout).walk(mutation)
}

impl<'a> PartitionWalker<'a> {
	pub fn new(layout: &'a TableLayout) -> Self {
		Self {
			layout,
		}
	}

	pub fn walk(&self, mutation: &PartitionMutation) -> CdcResult<Vec<ChangeEvent>> {
		trace!(
			keyspace = %self.layout.keyspace,
			table = %self.layout.name,
			rows = mutation.rows.len(),
			range_tombstones = mutation.range_tombstones.len(),
			"walking partition"
		);

		let partition_key = self.partition_key(&mutation.key)?;
		let mut assembler = EventAssembler::new(TableRef::from(self.layout), partition_key);

		if let Some(timestamp) = mutation.deletion {
			assembler.partition_deleted_at(timestamp)?;
		}

		for tombstone in &mutation.range_tombstones {
			let criteria = self.range_criteria(tombstone)?;
			assembler.range_deleted_at(tombstone.deleted_at, criteria)?;
		}

		if let Some(static_row) = mutation.static_row.as_ref().filter(|row| !row.columns.is_empty()) {
			assembler.begin_static_row();
			for column in &static_row.columns {
				visit_column(&mut assembler, column)?;
			}
		}

		for row in &mutation.rows {
			assembler.begin_row(row.liveness);

			if let Some(timestamp) = row.deletion {
				assembler.mark_deleted_at(timestamp)?;
			}

			self.check_clustering_width(row.clustering.len(), self.layout.clustering.len())?;
			for (def, value) in self.layout.clustering.iter().zip(&row.clustering) {
				assembler.add_clustering_column(def.name.clone(), value.clone())?;
			}

			for column in &row.columns {
				visit_column(&mut assembler, column)?;
			}
		}

		let events = assembler.finish()?;
		debug!(
			keyspace = %self.layout.keyspace,
			table = %self.layout.name,
			events = events.len(),
			"partition walked"
		);
		Ok(events)
	}

	fn check_clustering_width(&self, actual: usize, expected: usize) -> CdcResult<()> {
		if actual != expected {
			return Err(CdcError::ClusteringArity {
				table: self.layout.qualified_name(),
				expected,
				actual,
			});
		}
		Ok(())
	}

	/// Resolves the partition key into one `(column, value)` pair per declared partition key column.
	fn partition_key(&self, key: &PartitionKey) -> CdcResult<Vec<(String, Value)>> {
		let columns = &self.layout.partition_key;

		let values = match key {
			PartitionKey::Values(values) => values.clone(),
			PartitionKey::Raw(bytes) => {
				let components = if columns.len() > 1 {
					split_composite(bytes)?
				} else {
					vec![bytes.as_slice()]
				};
				if components.len() != columns.len() {
					return Err(CdcError::PartitionKeyArity {
						table: self.layout.qualified_name(),
						expected: columns.len(),
						actual: components.len(),
					});
				}
				columns.iter()
					.zip(components)
					.map(|(def, raw)| {
						def.ty.deserialize(raw).map_err(|source| CdcError::Decode {
							column: def.name.clone(),
							source,
						})
					})
					.collect::<CdcResult<Vec<_>>>()?
			}
		};

		if values.len() != columns.len() {
			return Err(CdcError::PartitionKeyArity {
				table: self.layout.qualified_name(),
				expected: columns.len(),
				actual: values.len(),
			});
		}

		Ok(columns.iter().map(|def| def.name.clone()).zip(values).collect())
	}

	/// Equalities on the leading clustering columns where both bounds agree, then one range on the first
	/// column where they diverge. Later columns stay unconstrained.
	///
	/// A bound that does not reach a column leaves that side open, whatever its inclusivity.
	fn range_criteria(&self, tombstone: &RangeTombstone) -> CdcResult<Vec<Criteria>> {
		let (start, end) = (&tombstone.start, &tombstone.end);
		let width = start.values.len().max(end.values.len());
		if width > self.layout.clustering.len() {
			return Err(CdcError::ClusteringArity {
				table: self.layout.qualified_name(),
				expected: self.layout.clustering.len(),
				actual: width,
			});
		}

		let mut criteria = Vec::with_capacity(width);
		for (i, def) in self.layout.clustering.iter().take(width).enumerate() {
			let start_value = start.values.get(i);
			let end_value = end.values.get(i);

			match (start_value, end_value) {
				(Some(s), Some(e)) if s == e => criteria.push(Criteria::equal(def.name.clone(), s.clone())),
				_ => {
					criteria.push(Criteria::range(
						def.name.clone(),
						start_value.cloned().unwrap_or(Value::Null),
						end_value.cloned().unwrap_or(Value::Null),
						start.inclusive && start_value.is_some(),
						end.inclusive && end_value.is_some(),
					));
					break;
				}
			}
		}
		Ok(criteria)
	}
}

/// Splits a composite key: each component is a 2-byte big-endian length, the bytes, and an
/// end-of-component byte.
fn split_composite(bytes: &[u8]) -> CdcResult<Vec<&[u8]>> {
	let mut components = Vec::new();
	let mut rest = bytes;

	while !rest.is_empty() {
		if rest.len() < 2 {
			return Err(CdcError::MalformedKey(format!("{} dangling bytes", rest.len())));
		}
		let len = u16::from_be_bytes([rest[0], rest[1]]) as usize;
		rest = &rest[2..];
		if rest.len() < len + 1 {
			return Err(CdcError::MalformedKey(format!(
				"component {} needs {} bytes, {} left",
				components.len(),
				len + 1,
				rest.len()
			)));
		}
		components.push(&rest[..len]);
		rest = &rest[len + 1..];
	}

	Ok(components)
}

fn visit_column(assembler: &mut EventAssembler, column: &ColumnData) -> CdcResult<()> {
	match column {
		ColumnData::Simple(cell) => match &cell.value {
			None => assembler.add_deleted_column(cell.column.clone(), cell.timestamp),
			Some(value) => assembler.add_column(cell.column.clone(), value.clone(), cell.timestamp),
		},
		ColumnData::Complex(complex) => visit_complex(assembler, complex),
	}
}

/// A cleared container is registered as a deletion of the whole column, which is how assigning a fresh
/// collection also deletes the prior contents. Live entries are collapsed into one write stamped with the
/// newest entry timestamp; per-entry timestamps are lost.
fn visit_complex(assembler: &mut EventAssembler, complex: &ComplexColumn) -> CdcResult<()> {
	if let Some(timestamp) = complex.deletion {
		assembler.add_deleted_column(complex.column.clone(), timestamp)?;
	}

	let mut live: Vec<(&Value, &Value)> = Vec::with_capacity(complex.entries.len());
	let mut newest: Option<Timestamp> = None;

	for entry in &complex.entries {
		match &entry.value {
			None => assembler.add_deleted_column(element_name(complex, &entry.path)?, entry.timestamp)?,
			Some(value) => {
				live.push((&entry.path, value));
				newest = newest.max(Some(entry.timestamp));
			}
		}
	}

	if let Some(timestamp) = newest {
		assembler.add_column(complex.column.clone(), flatten(complex, live)?, timestamp)?;
	}
	Ok(())
}

/// Collections become a map keyed by cell path: map keys, set elements (with empty values) or list
/// element ids.
fn flatten(complex: &ComplexColumn, live: Vec<(&Value, &Value)>) -> CdcResult<Value> {
	Ok(match &complex.kind {
		ComplexKind::Map | ComplexKind::Set | ComplexKind::List => {
			Value::map(live.into_iter().map(|(path, value)| (path.clone(), value.clone())))
		}
		ComplexKind::Udt {
			fields,
		} => {
			let mut record = Vec::with_capacity(live.len());
			for (path, value) in live {
				record.push((field_name(&complex.column, fields, path)?, value.clone()));
			}
			Value::record(record)
		}
	})
}

/// `col['key']` for collection elements, `col.field` for UDT fields.
fn element_name(complex: &ComplexColumn, path: &Value) -> CdcResult<String> {
	match &complex.kind {
		ComplexKind::Udt {
			fields,
		} => Ok(format!("{}.{}", complex.column, field_name(&complex.column, fields, path)?)),
		_ => Ok(format!("{}[{}]", complex.column, path.to_cql_literal())),
	}
}

/// UDT cell paths are field positions; already resolved names pass through.
fn field_name(column: &str, fields: &[String], path: &Value) -> CdcResult<String> {
	let unknown = |index: usize| CdcError::Decode {
		column: column.to_string(),
		source: TypeError::UnknownField {
			index,
			fields: fields.len(),
		},
	};

	match path {
		Value::Text(name) => Ok(name.clone()),
		Value::Integer(index) => {
			let index = usize::try_from(*index).map_err(|_| unknown(usize::MAX))?;
			fields.get(index).cloned().ok_or_else(|| unknown(index))
		}
		other => Err(CdcError::Decode {
			column: column.to_string(),
			source: TypeError::UnknownType(format!("udt field path {}", other)),
		}),
	}
}
