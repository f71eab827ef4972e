// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::str::Utf8Error;

/// Faults raised while turning serialized column bytes into a [`Value`](crate::Value).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
	#[error("{ty} value truncated: expected {expected} bytes, found {actual}")]
	Truncated {
		ty: String,
		expected: usize,
		actual: usize,
	},

	#[error("{ty} value must be exactly {expected} bytes, found {actual}")]
	InvalidWidth {
		ty: String,
		expected: usize,
		actual: usize,
	},

	#[error("{ty} value has {remaining} trailing bytes")]
	TrailingBytes {
		ty: String,
		remaining: usize,
	},

	#[error("negative length {len} in serialized {ty}")]
	NegativeLength {
		ty: String,
		len: i32,
	},

	#[error("{0} value is NaN")]
	NotANumber(String),

	#[error("invalid utf-8 in text value: {0}")]
	InvalidUtf8(#[from] Utf8Error),

	#[error("unknown column type '{0}'")]
	UnknownType(String),

	#[error("udt field index {index} out of range for {fields} fields")]
	UnknownField {
		index: usize,
		fields: usize,
	},
}

pub type Result<T> = std::result::Result<T, TypeError>;
