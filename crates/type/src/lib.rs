// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

pub mod error;
pub mod value;

pub use error::{Result, TypeError};
pub use value::{
	OrderedF64, Timestamp, Value,
	r#type::{ColumnType, UdtField},
};
