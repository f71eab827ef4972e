// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! CDC error types.

use cqlcdc_type::TypeError;

/// Error type for assembling change events out of a partition mutation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CdcError {
	/// A row-scoped operation was called before any row was begun.
	#[error("{operation} called before any row was begun")]
	NoActiveRow {
		operation: &'static str,
	},

	/// The assembler was asked for partition-scoped output without partition key values.
	#[error("partition key of {keyspace}.{table} is empty")]
	MissingPartitionKey {
		keyspace: String,
		table: String,
	},

	/// Decoded partition key values do not line up with the declared partition key columns.
	#[error("partition key of {table} declares {expected} columns, mutation carries {actual} values")]
	PartitionKeyArity {
		table: String,
		expected: usize,
		actual: usize,
	},

	/// A row or bound carries more clustering values than the table declares.
	#[error("clustering key of {table} declares {expected} columns, found {actual} values")]
	ClusteringArity {
		table: String,
		expected: usize,
		actual: usize,
	},

	/// Raw composite partition key bytes could not be split into components.
	#[error("malformed composite partition key: {0}")]
	MalformedKey(String),

	/// A key component could not be deserialized with its declared type.
	#[error("cannot decode column {column}: {source}")]
	Decode {
		column: String,
		#[source]
		source: TypeError,
	},
}

/// Result type for CDC operations.
pub type CdcResult<T> = Result<T, CdcError>;
