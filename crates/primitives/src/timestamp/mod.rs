//! Tick-based time stamps.
//!
//! A [`TimeStamp`] is a tick count at a fixed tick rate. Comparisons are only
//! defined between stamps of the same rate; mixing rates is reported as an
//! error rather than silently rescaled.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};


/// Time stamp construction and comparison errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimeStampError {
	#[error("ticks per second must be positive")]
	ZeroTicksPerSecond,
	#[error("tick rate mismatch: {left} vs {right}")]
	RateMismatch { left: u32, right: u32 },
}

/// A point in time expressed as ticks at a fixed tick rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeStamp {
	tps: u32,
	ticks: u64,
}

impl TimeStamp {
	/// Builds a stamp, rejecting a zero tick rate.
	pub fn new(tps: u32, ticks: u64) -> Result<Self, TimeStampError> {
		if tps == 0 {
			return Err(TimeStampError::ZeroTicksPerSecond);
		}
		Ok(Self { tps, ticks })
	}

	/// Ticks per second.
	#[inline]
	pub fn tps(&self) -> u32 {
		self.tps
	}

	/// Total ticks since zero.
	#[inline]
	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// Whole hours.
	pub fn hours(&self) -> u64 {
		self.ticks / u64::from(self.tps) / 3600
	}

	/// Whole minutes past the hour.
	pub fn minutes(&self) -> u64 {
		(self.ticks / u64::from(self.tps) / 60) % 60
	}

	/// Whole seconds past the minute.
	pub fn seconds(&self) -> u64 {
		(self.ticks / u64::from(self.tps)) % 60
	}

	/// Ticks past the second.
	pub fn sub_second_ticks(&self) -> u64 {
		self.ticks % u64::from(self.tps)
	}

	/// `HH:MM:SS:FFF`.
	pub fn to_hmsf_string(&self) -> String {
		format!(
			"{:02}:{:02}:{:02}:{:03}",
			self.hours(),
			self.minutes(),
			self.seconds(),
			self.sub_second_ticks()
		)
	}

	/// `(tps,HH:MM:SS:FFF)`.
	pub fn to_db_string(&self) -> String {
		format!("({},{})", self.tps, self.to_hmsf_string())
	}

	/// Orders two stamps of the same tick rate.
	pub fn try_cmp(&self, other: &Self) -> Result<Ordering, TimeStampError> {
		if self.tps != other.tps {
			return Err(TimeStampError::RateMismatch {
				left: self.tps,
				right: other.tps,
			});
		}
		Ok(self.ticks.cmp(&other.ticks))
	}
}

impl fmt::Display for TimeStamp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hmsf_string())
	}
}
