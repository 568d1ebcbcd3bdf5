#![cfg_attr(doc, allow(rustdoc::private_intra_doc_links))]
//! Identity index: the ID to entity map of one database.
//!
//! # Role
//!
//! Every addressable entity (vocab element, formal argument, column predicate
//! argument) receives its [`DbId`] here. The index stores an [`IndexEntry`]
//! descriptor per ID; the vocab list owns the values and the [`crate::Database`]
//! resolves descriptors back to them.
//!
//! # Invariants
//!
//! - IDs are assigned in strictly increasing order and never reused.
//!   - Enforced in: [`IdentityIndex::register`]
//!   - Tested by: [`crate::index::invariants::test_ids_never_reused`]
//!   - Failure symptom: A stale external reference resolves to an unrelated entity.
//!
//! - A registered ID keeps its entry class for life; replacement may update
//!   the descriptor but never turns a predicate into a matrix or changes a
//!   formal argument's type.
//!   - Enforced in: [`IdentityIndex::replace`]
//!   - Tested by: [`crate::index::invariants::test_replace_keeps_class`]
//!   - Failure symptom: Lookups return a descriptor of the wrong shape.
//!
//! - Entities from another database are rejected.
//!   - Enforced in: [`IdentityIndex::register`], [`IdentityIndex::replace`]
//!   - Tested by: [`crate::index::invariants::test_foreign_database_rejected`]
//!   - Failure symptom: IDs of two databases interleave in one index.

mod entry;
#[cfg(any(test, doc))]
mod invariants;

pub use entry::{ArgRole, IndexEntry};
use rustc_hash::FxHashMap;
use shapa_primitives::{DbId, DbTag};
use tracing::debug;

use crate::error::{Result, SystemError};

/// An entity that can be registered in an [`IdentityIndex`].
pub trait Indexed {
	fn id(&self) -> DbId;
	fn db(&self) -> DbTag;
	fn index_entry(&self) -> IndexEntry;
	#[doc(hidden)]
	fn assign_id(&mut self, id: DbId);
}

/// ID to descriptor map for one database.
///
/// Only the crate builds indexes, so the one a [`crate::Database`] owns is
/// the only index its list ever sees.
#[derive(Debug)]
pub struct IdentityIndex {
	db: DbTag,
	next_id: DbId,
	entries: FxHashMap<DbId, IndexEntry>,
}

impl IdentityIndex {
	pub(crate) fn new(db: DbTag) -> Self {
		Self {
			db,
			next_id: DbId::FIRST,
			entries: FxHashMap::default(),
		}
	}

	pub fn db(&self) -> DbTag {
		self.db
	}

	/// The ID the next registration will receive.
	pub fn next_id(&self) -> DbId {
		self.next_id
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Assigns the next ID to `item` and records its descriptor.
	pub(crate) fn register<T: Indexed + ?Sized>(&mut self, item: &mut T) -> Result<DbId> {
		if item.db() != self.db {
			return Err(SystemError::ForeignDatabase);
		}
		if item.id().is_valid() {
			return Err(SystemError::AlreadyRegistered(item.id()));
		}

		let id = self.next_id;
		if self.entries.contains_key(&id) {
			return Err(SystemError::IdInUse(id));
		}

		let entry = item.index_entry();
		self.entries.insert(id, entry);
		self.next_id = id.successor();
		item.assign_id(id);

		debug!(domain = "index", db = self.db.get(), %id, ?entry, "registered");
		Ok(id)
	}

	/// Returns the descriptor registered under `id`.
	pub fn lookup(&self, id: DbId) -> Result<&IndexEntry> {
		if !id.is_valid() {
			return Err(SystemError::InvalidId);
		}
		self.entries.get(&id).ok_or(SystemError::NotIndexed(id))
	}

	/// Membership test; an INVALID ID is a caller error, not `false`.
	pub fn contains(&self, id: DbId) -> Result<bool> {
		if !id.is_valid() {
			return Err(SystemError::InvalidId);
		}
		Ok(self.entries.contains_key(&id))
	}

	/// Removes `id`, returning its last descriptor.
	pub(crate) fn deregister(&mut self, id: DbId) -> Result<IndexEntry> {
		if !id.is_valid() {
			return Err(SystemError::InvalidId);
		}
		let entry = self.entries.remove(&id).ok_or(SystemError::NotIndexed(id))?;
		debug!(domain = "index", db = self.db.get(), %id, ?entry, "deregistered");
		Ok(entry)
	}

	/// Swaps the descriptor under `item`'s ID, keeping the ID.
	pub(crate) fn replace<T: Indexed + ?Sized>(&mut self, item: &T) -> Result<IndexEntry> {
		let id = item.id();
		if !id.is_valid() {
			return Err(SystemError::InvalidId);
		}
		if item.db() != self.db {
			return Err(SystemError::ForeignDatabase);
		}

		let new = item.index_entry();
		let slot = self
			.entries
			.get_mut(&id)
			.ok_or(SystemError::NotIndexed(id))?;
		if !slot.same_class(&new) {
			return Err(SystemError::EntryClassMismatch(id));
		}

		let old = std::mem::replace(slot, new);
		debug!(domain = "index", db = self.db.get(), %id, ?old, ?new, "replaced");
		Ok(old)
	}

	/// True when `item` is registered under its own ID with a matching descriptor.
	pub(crate) fn holds<T: Indexed + ?Sized>(&self, item: &T) -> bool {
		item.id().is_valid() && self.entries.get(&item.id()) == Some(&item.index_entry())
	}

	/// Registered IDs in ascending order.
	pub fn ids(&self) -> Vec<DbId> {
		let mut ids: Vec<DbId> = self.entries.keys().copied().collect();
		ids.sort_unstable();
		ids
	}
}
