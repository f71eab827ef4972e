// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::io::{self, Write};

use tracing::error;

use super::to_json;
use crate::event::ChangeEvent;

/// Writes one JSON document per line.
///
/// Events that cannot be encoded are logged and skipped; only I/O failures of the underlying writer are
/// returned.
pub struct LineSink<W: Write> {
	out: W,
	written: u64,
	skipped: u64,
}

impl<W: Write> LineSink<W> {
	pub fn new(out: W) -> Self {
		Self {
			out,
			written: 0,
			skipped: 0,
		}
	}

	/// Returns whether the event was written.
	pub fn write_event(&mut self, event: &ChangeEvent) -> io::Result<bool> {
		match to_json(event) {
			Ok(line) => {
				self.out.write_all(line.as_bytes())?;
				self.out.write_all(b"\n")?;
				self.written += 1;
				Ok(true)
			}
			Err(err) => {
				error!(
					keyspace = %event.keyspace,
					table = %event.table,
					timestamp = %event.timestamp,
					error = %err,
					"skipping change event that cannot be encoded"
				);
				self.skipped += 1;
				Ok(false)
			}
		}
	}

	pub fn write_events<'a>(&mut self, events: impl IntoIterator<Item = &'a ChangeEvent>) -> io::Result<()> {
		for event in events {
			self.write_event(event)?;
		}
		Ok(())
	}

	pub fn flush(&mut self) -> io::Result<()> {
		self.out.flush()
	}

	pub fn written(&self) -> u64 {
		self.written
	}

	pub fn skipped(&self) -> u64 {
		self.skipped
	}

	pub fn into_inner(self) -> W {
		self.out
	}
}

#[cfg(test)]
mod tests {
	use cqlcdc_type::{Timestamp, Value};
	use uuid::Uuid;

	use super::*;
	use crate::event::{Change, Row, TableRef};

	fn event(value: Value) -> ChangeEvent {
		let table = TableRef {
			keyspace: "ks".to_string(),
			name: "t".to_string(),
			id: Uuid::nil(),
		};
		let row: Row = [("key", Value::text("k")), ("v", value)].into_iter().collect();
		ChangeEvent::new(&table, Timestamp::from_millis(1), Change::Update(row))
	}

	#[test]
	fn test_one_line_per_event() {
		let mut sink = LineSink::new(Vec::new());
		sink.write_events(&[event(Value::int(1)), event(Value::int(2))]).unwrap();

		let out = String::from_utf8(sink.into_inner()).unwrap();
		let lines: Vec<&str> = out.lines().collect();
		assert_eq!(lines.len(), 2);
		assert!(lines[0].ends_with(r#""row":{"key":"k","v":1}}"#));
		assert!(lines[1].ends_with(r#""row":{"key":"k","v":2}}"#));
	}

	#[test]
	fn test_encode_fault_skips_only_that_event() {
		let mut sink = LineSink::new(Vec::new());
		let events = [event(Value::int(1)), event(Value::float(f64::NEG_INFINITY)), event(Value::int(3))];
		sink.write_events(&events).unwrap();

		assert_eq!(sink.written(), 2);
		assert_eq!(sink.skipped(), 1);
		let out = String::from_utf8(sink.into_inner()).unwrap();
		assert_eq!(out.lines().count(), 2);
	}
}
