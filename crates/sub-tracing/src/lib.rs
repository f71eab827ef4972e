// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Process wide tracing setup. Diagnostics go to stderr; stdout stays reserved for change events.

mod builder;

pub use builder::{LogFormat, TracingBuilder, TracingError, UnknownLogFormat};
