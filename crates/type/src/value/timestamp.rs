// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

const MICROS_PER_MILLI: i64 = 1_000;
const MICROS_PER_SECOND: i64 = 1_000_000;
const SECONDS_PER_DAY: i64 = 86_400;

/// A point in time, stored as microseconds since the Unix epoch (1970-01-01T00:00:00Z).
///
/// Write timestamps in a commit log carry microsecond resolution. Change events expose millisecond
/// resolution; [`Timestamp::truncate_to_millis`] drops the sub-millisecond part without rounding.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
	/// Marker for "no timestamp", used as the liveness of a static row.
	pub const NONE: Timestamp = Timestamp(i64::MIN);

	pub const fn from_micros(micros: i64) -> Self {
		Self(micros)
	}

	pub const fn from_millis(millis: i64) -> Self {
		Self(millis.saturating_mul(MICROS_PER_MILLI))
	}

	pub const fn micros(&self) -> i64 {
		self.0
	}

	/// Milliseconds since the epoch, truncated toward zero.
	pub const fn millis(&self) -> i64 {
		self.0 / MICROS_PER_MILLI
	}

	pub const fn truncate_to_millis(&self) -> Self {
		Self::from_millis(self.millis())
	}

	pub const fn is_none(&self) -> bool {
		self.0 == i64::MIN
	}
}

impl From<i64> for Timestamp {
	fn from(micros: i64) -> Self {
		Self::from_micros(micros)
	}
}

/// Convert days since Unix epoch to year/month/day (Howard Hinnant's civil-from-days).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
	let days_since_ce = days + 719_468;
	let era = if days_since_ce >= 0 {
		days_since_ce
	} else {
		days_since_ce - 146_096
	} / 146_097;
	let doe = days_since_ce - era * 146_097; // [0, 146096]
	let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365; // [0, 399]
	let y = yoe + era * 400;
	let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
	let mp = (5 * doy + 2) / 153; // [0, 11]
	let d = doy - (153 * mp + 2) / 5 + 1; // [1, 31]
	let m = if mp < 10 {
		mp + 3
	} else {
		mp - 9
	}; // [1, 12]
	let year = if m <= 2 {
		y + 1
	} else {
		y
	};

	(year, m as u32, d as u32)
}

/// ISO-8601 in UTC, e.g. `2021-03-04T05:06:07.123Z`. The fraction is omitted when zero and otherwise
/// printed with three or six digits.
impl Display for Timestamp {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let seconds = self.0.div_euclid(MICROS_PER_SECOND);
		let sub_micros = self.0.rem_euclid(MICROS_PER_SECOND);

		let days = seconds.div_euclid(SECONDS_PER_DAY);
		let secs_of_day = seconds.rem_euclid(SECONDS_PER_DAY);
		let (year, month, day) = civil_from_days(days);

		if year > 9999 {
			write!(f, "+{}", year)?;
		} else if year < 0 {
			write!(f, "-{:04}", -year)?;
		} else {
			write!(f, "{:04}", year)?;
		}

		write!(
			f,
			"-{:02}-{:02}T{:02}:{:02}:{:02}",
			month,
			day,
			secs_of_day / 3600,
			(secs_of_day % 3600) / 60,
			secs_of_day % 60
		)?;

		match sub_micros {
			0 => {}
			m if m % MICROS_PER_MILLI == 0 => write!(f, ".{:03}", m / MICROS_PER_MILLI)?,
			m => write!(f, ".{:06}", m)?,
		}

		f.write_str("Z")
	}
}
