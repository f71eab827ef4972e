// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{io::Write, path::Path};

use cqlcdc_cdc::{LineSink, PartitionMutation, PartitionWalker};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
	error::{Error, Result},
	schema::SchemaRegistry,
	segment::{MutationHandler, SegmentReader, SegmentReport},
};

/// Turns each mutation into change events and writes them, one JSON document per line.
pub struct EventHandler<W: Write> {
	registry: SchemaRegistry,
	sink: LineSink<W>,
}

impl<W: Write> EventHandler<W> {
	pub fn new(registry: SchemaRegistry, out: W) -> Self {
		Self {
			registry,
			sink: LineSink::new(out),
		}
	}

	pub fn sink(&self) -> &LineSink<W> {
		&self.sink
	}
}

impl<W: Write> MutationHandler for EventHandler<W> {
	fn handle(&mut self, table_id: Uuid, partition: &PartitionMutation) -> Result<()> {
		let layout = self.registry.get(&table_id).ok_or(Error::UnknownTable(table_id))?;
		let events = PartitionWalker::new(layout).walk(partition)?;
		self.sink.write_events(&events)?;
		Ok(())
	}
}

/// Runs one segment through a reader and an [`EventHandler`], then reports what could not be handled.
pub struct SegmentProcessor<R: SegmentReader, W: Write> {
	reader: R,
	handler: EventHandler<W>,
}

impl<R: SegmentReader, W: Write> SegmentProcessor<R, W> {
	pub fn new(reader: R, handler: EventHandler<W>) -> Self {
		Self {
			reader,
			handler,
		}
	}

	pub fn handler(&self) -> &EventHandler<W> {
		&self.handler
	}

	pub fn process(&mut self, path: &Path) -> Result<SegmentReport> {
		let written_before = self.handler.sink.written();
		let report = self.reader.read_segment(path, &mut self.handler);
		self.handler.sink.flush()?;
		let report = report?;

		for invalid in &report.invalid {
			error!(
				segment = %path.display(),
				line = invalid.line,
				reason = %invalid.reason,
				"invalid mutation"
			);
		}

		if report.mutations == 0 && report.invalid.is_empty() {
			warn!(segment = %path.display(), "segment holds no mutations");
		}

		info!(
			segment = %path.display(),
			mutations = report.mutations,
			invalid = report.invalid.len(),
			events = self.handler.sink.written() - written_before,
			"segment processed"
		);
		Ok(report)
	}
}
