#![allow(dead_code)]

use shapa_primitives::{DbId, DbTag};

use super::*;
use crate::element::VocabElement;
use crate::error::SystemError;
use crate::farg::FormalArg;

/// Invariant: IDs are strictly increasing and never reused, whatever mix of
/// registrations and removals precedes them.
pub(crate) fn inv_ids_never_reused() {
	let mut idx = IdentityIndex::new(DbTag::fresh());
	let mut live: Vec<DbId> = Vec::new();
	let mut last = DbId::INVALID;

	// Register three, drop the middle one, repeat.
	for round in 0..8 {
		for _ in 0..3 {
			let mut fa = FormalArg::untyped(idx.db(), "<x>").unwrap();
			let id = idx.register(&mut fa).unwrap();
			assert!(id > last, "round {round}: {id} not above {last}");
			last = id;
			live.push(id);
		}
		let gone = live.remove(live.len() / 2);
		idx.deregister(gone).unwrap();
		assert_eq!(idx.contains(gone), Ok(false));
		assert_eq!(idx.len(), live.len());
	}
	assert_eq!(idx.next_id(), DbId::new(25));
}

#[cfg_attr(test, test)]
pub(crate) fn test_ids_never_reused() {
	inv_ids_never_reused()
}

/// Invariant: Replacement never changes an entry's class.
pub(crate) fn inv_replace_keeps_class() {
	let mut idx = IdentityIndex::new(DbTag::fresh());
	let db = idx.db();

	let mut fa = FormalArg::integer(db, "<n>").unwrap();
	let id = idx.register(&mut fa).unwrap();
	let mut impostor = FormalArg::float(db, "<n>").unwrap();
	impostor.assign_id(id);
	assert_eq!(idx.replace(&impostor), Err(SystemError::EntryClassMismatch(id)));

	let mut pred = VocabElement::predicate(db, "p").unwrap();
	let pid = idx.register(&mut pred).unwrap();
	let mut matrix = VocabElement::matrix(db, "m").unwrap();
	matrix.assign_id(pid);
	assert_eq!(idx.replace(&matrix), Err(SystemError::EntryClassMismatch(pid)));

	// A formal argument can never stand in for an element either.
	impostor.assign_id(pid);
	assert_eq!(idx.replace(&impostor), Err(SystemError::EntryClassMismatch(pid)));
	assert!(idx.holds(&pred));
	assert!(idx.holds(&fa));
}

#[cfg_attr(test, test)]
pub(crate) fn test_replace_keeps_class() {
	inv_replace_keeps_class()
}

/// Invariant: Entities built for another database are rejected.
pub(crate) fn inv_foreign_database_rejected() {
	let mut idx = IdentityIndex::new(DbTag::fresh());
	let mut stranger = FormalArg::untyped(DbTag::fresh(), "<x>").unwrap();
	assert_eq!(idx.register(&mut stranger), Err(SystemError::ForeignDatabase));
	assert_eq!(stranger.id(), DbId::INVALID);
	assert!(idx.is_empty());

	stranger.assign_id(DbId::FIRST);
	assert_eq!(idx.replace(&stranger), Err(SystemError::ForeignDatabase));
}

#[cfg_attr(test, test)]
pub(crate) fn test_foreign_database_rejected() {
	inv_foreign_database_rejected()
}
