use std::fmt;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Numeric identity of an entity registered in a database index.
///
/// IDs are handed out by the index in strictly increasing order and are
/// never reused, so a `DbId` stays a stable external reference for the
/// lifetime of its database. [`DbId::INVALID`] marks a detached entity.
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DbId(u64);

impl DbId {
	/// Sentinel for "not registered".
	pub const INVALID: Self = Self(0);

	/// The first ID an empty index hands out.
	pub const FIRST: Self = Self(1);

	/// Wraps a raw value.
	#[inline]
	pub const fn new(raw: u64) -> Self {
		Self(raw)
	}

	/// Returns the raw value.
	#[inline]
	pub const fn get(self) -> u64 {
		self.0
	}

	/// Returns true unless this is [`DbId::INVALID`].
	#[inline]
	pub const fn is_valid(self) -> bool {
		self.0 != Self::INVALID.0
	}

	/// Returns the ID that follows this one.
	#[inline]
	pub const fn successor(self) -> Self {
		Self(self.0 + 1)
	}
}

impl fmt::Display for DbId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<DbId> for u64 {
	fn from(id: DbId) -> Self {
		id.0
	}
}

/// Opaque identity of one database instance.
///
/// Every entity carries the tag of the database it was built for. Indexes
/// and vocabulary lists compare tags to reject entities that belong to a
/// different database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DbTag(NonZeroU64);

static NEXT_TAG: AtomicU64 = AtomicU64::new(1);

impl DbTag {
	/// Mints a tag distinct from every other tag minted in this process.
	pub fn fresh() -> Self {
		let raw = NEXT_TAG.fetch_add(1, Ordering::Relaxed);
		Self(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
	}

	/// Returns the raw value, for log fields.
	#[inline]
	pub fn get(self) -> u64 {
		self.0.get()
	}
}

impl fmt::Display for DbTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "db#{}", self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// INVALID is the default and the only invalid ID.
	#[test]
	fn test_invalid_id() {
		assert_eq!(DbId::default(), DbId::INVALID);
		assert!(!DbId::INVALID.is_valid());
		assert!(DbId::FIRST.is_valid());
		assert_eq!(DbId::INVALID.successor(), DbId::FIRST);
	}

	/// Fresh tags never compare equal.
	#[test]
	fn test_fresh_tags_are_distinct() {
		let a = DbTag::fresh();
		let b = DbTag::fresh();
		assert_ne!(a, b);
		assert!(b.get() > a.get());
	}

	/// IDs render as bare integers.
	#[test]
	fn test_id_display() {
		assert_eq!(DbId::new(42).to_string(), "42");
		assert_eq!(u64::from(DbId::new(7)), 7);
	}
}
