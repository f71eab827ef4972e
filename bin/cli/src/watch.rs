// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::BTreeSet,
	fs,
	io::Write,
	path::{Path, PathBuf},
	time::Duration,
};

use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::{
	config::Config,
	error::{Error, Result},
	handler::SegmentProcessor,
	segment::SegmentReader,
};

/// Configuration for a directory watcher
#[derive(Debug, Clone)]
pub struct WatchConfig {
	pub dir: PathBuf,
	/// How often to look for new segment files
	pub poll_interval: Duration,
	pub delete_processed: bool,
	pub skip_segment_on_error: bool,
}

impl WatchConfig {
	pub fn new(dir: impl Into<PathBuf>, config: &Config) -> Self {
		Self {
			dir: dir.into(),
			poll_interval: config.poll_interval(),
			delete_processed: config.delete_processed,
			skip_segment_on_error: config.skip_segment_on_error,
		}
	}
}

/// Processes segment files as they appear in a directory, one at a time, in file name order.
pub struct Watcher<R: SegmentReader, W: Write> {
	config: WatchConfig,
	processor: SegmentProcessor<R, W>,
	/// Files that stay in the directory after being handled; they are never read twice.
	done: BTreeSet<PathBuf>,
}

impl<R: SegmentReader, W: Write> Watcher<R, W> {
	pub fn new(config: WatchConfig, processor: SegmentProcessor<R, W>) -> Self {
		Self {
			config,
			processor,
			done: BTreeSet::new(),
		}
	}

	pub fn processor(&self) -> &SegmentProcessor<R, W> {
		&self.processor
	}

	fn pending(&self) -> Result<Vec<PathBuf>> {
		let read_error = |source| Error::Read {
			path: self.config.dir.clone(),
			source,
		};

		let mut pending = Vec::new();
		for entry in fs::read_dir(&self.config.dir).map_err(read_error)? {
			let entry = entry.map_err(read_error)?;
			let path = entry.path();
			if !path.is_file() || is_hidden(&path) || self.done.contains(&path) {
				continue;
			}
			pending.push(path);
		}
		pending.sort();
		Ok(pending)
	}

	/// Handles every segment that appeared since the last call. Returns how many were handled.
	pub fn poll_once(&mut self) -> Result<usize> {
		let pending = self.pending()?;

		for path in &pending {
			match self.processor.process(path) {
				Ok(_) => self.retire(path),
				Err(err) if self.config.skip_segment_on_error => {
					error!(segment = %path.display(), error = %err, "skipping segment");
					self.done.insert(path.clone());
				}
				Err(err) => {
					error!(segment = %path.display(), error = %err, "aborting on segment");
					return Err(err);
				}
			}
		}

		Ok(pending.len())
	}

	fn retire(&mut self, path: &Path) {
		if !self.config.delete_processed {
			self.done.insert(path.to_path_buf());
			return;
		}
		if let Err(err) = fs::remove_file(path) {
			warn!(segment = %path.display(), error = %err, "cannot delete processed segment");
			self.done.insert(path.to_path_buf());
		}
	}

	/// Polls until a segment fails and skipping is disabled. Dropping the future stops the watcher
	/// between two polls.
	pub async fn run(&mut self) -> Result<()> {
		debug!(dir = %self.config.dir.display(), interval = ?self.config.poll_interval, "started watching");

		loop {
			match self.poll_once() {
				// more segments likely arrived while processing, poll again immediately
				Ok(count) if count > 0 => {}
				Ok(_) => sleep(self.config.poll_interval).await,
				Err(err) => return Err(err),
			}
		}
	}
}

fn is_hidden(path: &Path) -> bool {
	path.file_name().and_then(|name| name.to_str()).is_some_and(|name| name.starts_with('.'))
}
