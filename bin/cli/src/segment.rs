// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Reading decoded commit log segments.
//!
//! A segment file holds one JSON document per line: `{"table_id": <uuid>, "partition": <mutation>}`.

use std::{
	fs::File,
	io::{BufRead, BufReader},
	path::Path,
};

use cqlcdc_cdc::PartitionMutation;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct SegmentEntry {
	pub table_id: Uuid,
	pub partition: PartitionMutation,
}

/// A mutation that could not be turned into events. Reported, never fatal to the segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMutation {
	/// 1-based
	pub line: usize,
	pub reason: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SegmentReport {
	pub mutations: usize,
	pub invalid: Vec<InvalidMutation>,
}

/// Receives every mutation of a segment, in segment order.
pub trait MutationHandler {
	fn handle(&mut self, table_id: Uuid, partition: &PartitionMutation) -> Result<()>;
}

pub trait SegmentReader {
	/// Feeds the segment's mutations to `handler`.
	///
	/// Mutations that fail to decode, or that the handler rejects with a recoverable error, end up in the
	/// report. Any other error aborts the segment.
	fn read_segment(&mut self, path: &Path, handler: &mut dyn MutationHandler) -> Result<SegmentReport>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSegmentReader;

impl SegmentReader for JsonSegmentReader {
	fn read_segment(&mut self, path: &Path, handler: &mut dyn MutationHandler) -> Result<SegmentReport> {
		let read_error = |source| Error::Read {
			path: path.to_path_buf(),
			source,
		};

		let reader = BufReader::new(File::open(path).map_err(read_error)?);
		let mut report = SegmentReport::default();

		for (index, line) in reader.lines().enumerate() {
			let line = line.map_err(read_error)?;
			if line.trim().is_empty() {
				continue;
			}

			let entry: SegmentEntry = match serde_json::from_str(&line) {
				Ok(entry) => entry,
				Err(err) => {
					report.invalid.push(InvalidMutation {
						line: index + 1,
						reason: err.to_string(),
					});
					continue;
				}
			};

			report.mutations += 1;
			match handler.handle(entry.table_id, &entry.partition) {
				Ok(()) => {}
				Err(err) if err.is_recoverable() => report.invalid.push(InvalidMutation {
					line: index + 1,
					reason: err.to_string(),
				}),
				Err(err) => return Err(err),
			}
		}

		Ok(report)
	}
}
