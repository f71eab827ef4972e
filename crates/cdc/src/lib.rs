// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Change data capture for CQL tables.
//!
//! A decoded [`PartitionMutation`] is walked by a [`PartitionWalker`], which drives an [`EventAssembler`]
//! and yields the partition's [`ChangeEvent`]s. Each event renders to one canonical JSON document through
//! [`encode::to_json`].
//!
//! Processing is synchronous and free of shared state; independent partitions can be handled in parallel.

pub mod assemble;
pub mod encode;
pub mod error;
pub mod event;
pub mod mutation;
pub mod schema;
pub mod walk;

pub use assemble::{EventAssembler, RowId};
pub use encode::{EncodeError, LineSink, to_json};
pub use error::{CdcError, CdcResult};
pub use event::{Change, ChangeEvent, ChangeKind, Condition, Criteria, Deletion, Row, TableRef};
pub use mutation::PartitionMutation;
pub use schema::{ColumnDef, TableLayout};
pub use walk::{PartitionWalker, to_change_events};
