#![cfg_attr(doc, allow(rustdoc::private_intra_doc_links))]
//! Vocab list: every vocab element of a database, by ID and by name.
//!
//! # Role
//!
//! The list owns the vocab elements and keeps the [`IdentityIndex`] in step
//! with them. Elements enter through [`VocabList::add_element`], change
//! through [`VocabList::replace_vocab_element`] (usually via
//! [`VocabList::checkout`] or [`VocabList::modify`]) and leave through
//! [`VocabList::remove_vocab_element`].
//!
//! # Invariants
//!
//! - Every element, formal argument and column predicate argument held by the
//!   list is registered in the index under its own ID, and nothing else is.
//!   - Enforced in: [`VocabList::add_element`], [`VocabList::replace_vocab_element`],
//!     [`VocabList::remove_vocab_element`]
//!   - Tested by: [`crate::list::invariants::test_index_bijection`]
//!   - Failure symptom: IDs resolve to stale arguments or not at all.
//!
//! - Names are unique across predicates and matrices, and the name map agrees
//!   with the elements.
//!   - Enforced in: [`VocabList::add_element`], [`VocabList::replace_vocab_element`]
//!   - Tested by: [`crate::list::invariants::test_names_unique`]
//!   - Failure symptom: A name lookup returns the wrong element.
//!
//! - Approved predicate IDs held by any argument name predicates in the list.
//!   - Enforced in: [`VocabList::add_element`], [`VocabList::replace_vocab_element`],
//!     [`VocabList::remove_vocab_element`]
//!   - Tested by: [`crate::list::invariants::test_approvals_live`]
//!   - Failure symptom: Predicate arguments accept values for a deleted predicate.
//!
//! - Failed operations leave the list and index untouched.
//!   - Enforced in: validate-then-commit ordering in every mutating method
//!   - Tested by: [`crate::list::invariants::test_failed_ops_leave_no_trace`]
//!   - Failure symptom: Half-registered elements after an error.

#[cfg(any(test, doc))]
mod invariants;
mod replace;
#[cfg(test)]
mod tests;

use std::collections::BTreeSet;
use std::fmt;

use rustc_hash::FxHashMap;
use shapa_primitives::{DbId, DbTag, is_valid_pred_name, is_valid_svar_name};
use tracing::{debug, warn};

use crate::element::{VeKind, VocabElement};
use crate::error::{NameKind, Result, SystemError};
use crate::farg::FormalArg;
use crate::index::{IdentityIndex, IndexEntry};
use crate::listeners::{ListenerKey, VocabDependent, VocabListObserver};

type Dependents = Vec<(ListenerKey, Box<dyn VocabDependent>)>;

/// All vocab elements of one database.
pub struct VocabList {
	db: DbTag,
	elements: FxHashMap<DbId, VocabElement>,
	names: FxHashMap<String, DbId>,
	preds: BTreeSet<DbId>,
	matrices: BTreeSet<DbId>,
	dependents: FxHashMap<DbId, Dependents>,
	observers: Vec<(ListenerKey, Box<dyn VocabListObserver>)>,
	next_key: u64,
}

impl fmt::Debug for VocabList {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("VocabList")
			.field("db", &self.db)
			.field("len", &self.elements.len())
			.field("preds", &self.preds)
			.field("matrices", &self.matrices)
			.field("observers", &self.observers.len())
			.finish_non_exhaustive()
	}
}

impl VocabList {
	pub fn new(db: DbTag) -> Self {
		Self {
			db,
			elements: FxHashMap::default(),
			names: FxHashMap::default(),
			preds: BTreeSet::new(),
			matrices: BTreeSet::new(),
			dependents: FxHashMap::default(),
			observers: Vec::new(),
			next_key: 0,
		}
	}

	pub fn db(&self) -> DbTag {
		self.db
	}

	pub fn len(&self) -> usize {
		self.elements.len()
	}

	pub fn is_empty(&self) -> bool {
		self.elements.is_empty()
	}

	/// Element IDs in ascending order.
	pub fn ids(&self) -> Vec<DbId> {
		let mut ids: Vec<DbId> = self.elements.keys().copied().collect();
		ids.sort_unstable();
		ids
	}

	/// Registers a detached element and everything it holds.
	///
	/// IDs are assigned to the element first, then its formal arguments in
	/// order, then (for matrices) `<ord>`, `<onset>`, `<offset>` and the
	/// shadows.
	pub fn add_element(&mut self, idx: &mut IdentityIndex, mut ve: VocabElement) -> Result<DbId> {
		self.check_index(idx)?;
		if ve.db() != self.db {
			return Err(SystemError::ForeignDatabase);
		}
		if ve.id().is_valid() {
			return Err(SystemError::AlreadyRegistered(ve.id()));
		}
		if let Some(fa) = ve.all_args().find(|fa| fa.id().is_valid()) {
			return Err(SystemError::AlreadyRegistered(fa.id()));
		}
		if self.names.contains_key(ve.name()) {
			return Err(SystemError::NameInUse(ve.name().to_owned()));
		}
		ve.validate()?;
		self.check_approved(&ve)?;

		let id = idx.register(&mut ve)?;
		ve.propagate_id();
		for fa in ve.all_args_mut() {
			idx.register(fa)?;
		}

		self.names.insert(ve.name().to_owned(), id);
		self.partition_mut(ve.ve_kind()).insert(id);
		debug!(
			domain = "vocab",
			%id,
			name = ve.name(),
			kind = %ve.ve_kind(),
			args = ve.num_formal_args(),
			"added vocab element"
		);
		for (_, observer) in &mut self.observers {
			observer.element_inserted(&ve);
		}
		self.elements.insert(id, ve);
		Ok(id)
	}

	pub fn get_vocab_element(&self, id: DbId) -> Result<&VocabElement> {
		if !id.is_valid() {
			return Err(SystemError::InvalidId);
		}
		self.elements.get(&id).ok_or(SystemError::UnknownElement(id))
	}

	pub fn get_vocab_element_by_name(&self, name: &str) -> Result<&VocabElement> {
		check_lookup_name(name)?;
		let id = *self
			.names
			.get(name)
			.ok_or_else(|| SystemError::UnknownName(name.to_owned()))?;
		self.elements.get(&id).ok_or(SystemError::IndexInconsistent {
			id,
			detail: "name map points at a missing element",
		})
	}

	pub fn get_matrix_vocab_element(&self, id: DbId) -> Result<&VocabElement> {
		expect_kind(self.get_vocab_element(id)?, VeKind::Matrix)
	}

	pub fn get_matrix_vocab_element_by_name(&self, name: &str) -> Result<&VocabElement> {
		expect_kind(self.get_vocab_element_by_name(name)?, VeKind::Matrix)
	}

	pub fn get_predicate_vocab_element(&self, id: DbId) -> Result<&VocabElement> {
		expect_kind(self.get_vocab_element(id)?, VeKind::Predicate)
	}

	pub fn get_predicate_vocab_element_by_name(&self, name: &str) -> Result<&VocabElement> {
		expect_kind(self.get_vocab_element_by_name(name)?, VeKind::Predicate)
	}

	/// Membership by ID; INVALID is an error.
	pub fn in_vocab_list(&self, id: DbId) -> Result<bool> {
		Ok(self.kind_of(id)?.is_some())
	}

	/// Membership by name; malformed names are an error.
	pub fn in_vocab_list_by_name(&self, name: &str) -> Result<bool> {
		check_lookup_name(name)?;
		Ok(self.names.contains_key(name))
	}

	/// True only for a matrix registered under `id`.
	pub fn matrix_in_vocab_list(&self, id: DbId) -> Result<bool> {
		Ok(self.kind_of(id)? == Some(VeKind::Matrix))
	}

	pub fn matrix_in_vocab_list_by_name(&self, name: &str) -> Result<bool> {
		Ok(self.kind_of_name(name)? == Some(VeKind::Matrix))
	}

	/// True only for a predicate registered under `id`.
	pub fn pred_in_vocab_list(&self, id: DbId) -> Result<bool> {
		Ok(self.kind_of(id)? == Some(VeKind::Predicate))
	}

	pub fn pred_in_vocab_list_by_name(&self, name: &str) -> Result<bool> {
		Ok(self.kind_of_name(name)? == Some(VeKind::Predicate))
	}

	/// Editable clone of a registered element, keeping every ID so that
	/// [`Self::replace_vocab_element`] can match arguments.
	pub fn checkout(&self, id: DbId) -> Result<VocabElement> {
		self.get_vocab_element(id).cloned()
	}

	/// Checks out `id`, applies `edit` and replaces the element.
	pub fn modify<F>(&mut self, idx: &mut IdentityIndex, id: DbId, edit: F) -> Result<()>
	where
		F: FnOnce(&mut VocabElement) -> Result<()>,
	{
		let mut ve = self.checkout(id)?;
		edit(&mut ve)?;
		self.replace_vocab_element(idx, ve)
	}

	/// Removes an element and deregisters everything it holds.
	///
	/// Fails while a dependent still references the element or another
	/// element's predicate argument approves it, and when the index disagrees
	/// with the list about any of its entries.
	pub fn remove_vocab_element(&mut self, idx: &mut IdentityIndex, id: DbId) -> Result<VocabElement> {
		self.check_index(idx)?;
		let ve = self.get_vocab_element(id)?;

		if self
			.dependents
			.get(&id)
			.is_some_and(|deps| deps.iter().any(|(_, dep)| dep.holds_references()))
		{
			return Err(SystemError::StillReferenced(id));
		}
		if let Some(holder) = self.approvers_of(id).next() {
			debug!(domain = "vocab", %id, %holder, "predicate still approved elsewhere");
			return Err(SystemError::StillReferenced(id));
		}

		if !idx.holds(ve) {
			return Err(inconsistent(id, "vocab element entry missing or stale"));
		}
		if let Some(fa) = ve.all_args().find(|fa| !idx.holds(*fa) || fa.owner() != id) {
			return Err(inconsistent(fa.id(), "formal argument entry missing or stale"));
		}
		if self.names.get(ve.name()) != Some(&id) {
			return Err(inconsistent(id, "name map disagrees"));
		}

		let ve = self
			.elements
			.remove(&id)
			.ok_or(SystemError::UnknownElement(id))?;
		for fa in ve.all_args() {
			idx.deregister(fa.id())?;
		}
		idx.deregister(id)?;
		self.names.remove(ve.name());
		self.partition_mut(ve.ve_kind()).remove(&id);

		debug!(domain = "vocab", %id, name = ve.name(), "removed vocab element");
		if let Some(mut deps) = self.dependents.remove(&id) {
			for (_, dep) in &mut deps {
				dep.on_deleted(id);
			}
		}
		for (_, observer) in &mut self.observers {
			observer.element_deleted(id);
		}
		Ok(ve)
	}

	/// Snapshot copies of every predicate, ascending by ID.
	pub fn preds(&self) -> Vec<VocabElement> {
		self.snapshot(&self.preds)
	}

	/// Snapshot copies of every matrix, ascending by ID.
	pub fn matrices(&self) -> Vec<VocabElement> {
		self.snapshot(&self.matrices)
	}

	/// Attaches a dependent to element `id`.
	pub fn attach_dependent(
		&mut self,
		id: DbId,
		dependent: Box<dyn VocabDependent>,
	) -> Result<ListenerKey> {
		self.get_vocab_element(id)?;
		let key = self.mint_key();
		self.dependents.entry(id).or_default().push((key, dependent));
		Ok(key)
	}

	pub fn detach_dependent(&mut self, id: DbId, key: ListenerKey) -> Result<Box<dyn VocabDependent>> {
		self.get_vocab_element(id)?;
		let deps = self
			.dependents
			.get_mut(&id)
			.ok_or(SystemError::UnknownListener(key.0))?;
		let pos = deps
			.iter()
			.position(|(k, _)| *k == key)
			.ok_or(SystemError::UnknownListener(key.0))?;
		Ok(deps.remove(pos).1)
	}

	pub fn add_observer(&mut self, observer: Box<dyn VocabListObserver>) -> ListenerKey {
		let key = self.mint_key();
		self.observers.push((key, observer));
		key
	}

	pub fn remove_observer(&mut self, key: ListenerKey) -> Option<Box<dyn VocabListObserver>> {
		let pos = self.observers.iter().position(|(k, _)| *k == key)?;
		Some(self.observers.remove(pos).1)
	}

	/// Debug form, `((VocabList) (vl_size: N) (vl_contents: (...)))`.
	pub fn to_db_string(&self) -> String {
		let items: Vec<String> = self
			.ids()
			.into_iter()
			.filter_map(|id| self.elements.get(&id))
			.map(VocabElement::to_db_string)
			.collect();
		format!(
			"((VocabList) (vl_size: {}) (vl_contents: ({})))",
			self.elements.len(),
			items.join(", ")
		)
	}

	/// Finds the argument registered as `id` under element `owner`.
	pub(crate) fn find_arg(&self, owner: DbId, id: DbId) -> Option<&FormalArg> {
		self.elements
			.get(&owner)?
			.all_args()
			.find(|fa| fa.id() == id)
	}

	/// Cross-checks the list against `idx`, in both directions.
	pub fn verify(&self, idx: &IdentityIndex) -> Result<()> {
		self.check_index(idx)?;
		let mut expected = 0;
		for (&id, ve) in &self.elements {
			if ve.id() != id || !idx.holds(ve) {
				return Err(inconsistent(id, "vocab element entry missing or stale"));
			}
			if self.names.get(ve.name()) != Some(&id) {
				return Err(inconsistent(id, "name map disagrees"));
			}
			let in_partition = match ve.ve_kind() {
				VeKind::Predicate => self.preds.contains(&id),
				VeKind::Matrix => self.matrices.contains(&id),
			};
			if !in_partition {
				return Err(inconsistent(id, "kind partition disagrees"));
			}
			for fa in ve.all_args() {
				if fa.owner() != id || !idx.holds(fa) {
					return Err(inconsistent(fa.id(), "formal argument entry missing or stale"));
				}
				if approved_of(fa).any(|pred| !self.preds.contains(&pred)) {
					return Err(inconsistent(fa.id(), "approved predicate missing from the list"));
				}
			}
			expected += 1 + ve.all_args().count();
		}

		if self.names.len() != self.elements.len()
			|| self.preds.len() + self.matrices.len() != self.elements.len()
		{
			return Err(inconsistent(DbId::INVALID, "lookup maps out of step"));
		}

		for id in idx.ids() {
			let found = match idx.lookup(id)? {
				IndexEntry::VocabElement { .. } => self.elements.contains_key(&id),
				IndexEntry::FormalArg { owner, .. } => self.find_arg(*owner, id).is_some(),
			};
			if !found {
				return Err(inconsistent(id, "index entry has no owner in the list"));
			}
		}
		if idx.len() != expected {
			return Err(inconsistent(DbId::INVALID, "index size disagrees"));
		}
		Ok(())
	}

	/// Every approved predicate ID held by `ve` must name a predicate in the
	/// list.
	fn check_approved(&self, ve: &VocabElement) -> Result<()> {
		let stale = ve
			.all_args()
			.flat_map(approved_of)
			.find(|pred| !self.preds.contains(pred));
		match stale {
			Some(pred) => Err(SystemError::UnknownElement(pred)),
			None => Ok(()),
		}
	}

	/// IDs of the other elements whose predicate arguments approve `pred`.
	fn approvers_of(&self, pred: DbId) -> impl Iterator<Item = DbId> + '_ {
		self.elements
			.values()
			.filter(move |ve| {
				ve.id() != pred && ve.all_args().flat_map(approved_of).any(|p| p == pred)
			})
			.map(VocabElement::id)
	}

	fn check_index(&self, idx: &IdentityIndex) -> Result<()> {
		if idx.db() != self.db {
			return Err(SystemError::ForeignDatabase);
		}
		Ok(())
	}

	fn kind_of(&self, id: DbId) -> Result<Option<VeKind>> {
		if !id.is_valid() {
			return Err(SystemError::InvalidId);
		}
		Ok(self.elements.get(&id).map(VocabElement::ve_kind))
	}

	fn kind_of_name(&self, name: &str) -> Result<Option<VeKind>> {
		check_lookup_name(name)?;
		match self.names.get(name) {
			Some(&id) => self.kind_of(id),
			None => Ok(None),
		}
	}

	fn partition_mut(&mut self, kind: VeKind) -> &mut BTreeSet<DbId> {
		match kind {
			VeKind::Predicate => &mut self.preds,
			VeKind::Matrix => &mut self.matrices,
		}
	}

	fn snapshot(&self, ids: &BTreeSet<DbId>) -> Vec<VocabElement> {
		ids.iter()
			.filter_map(|id| self.elements.get(id))
			.cloned()
			.collect()
	}

	fn mint_key(&mut self) -> ListenerKey {
		self.next_key += 1;
		ListenerKey(self.next_key)
	}
}

impl fmt::Display for VocabList {
	/// `((VocabList) (vl_contents: (p0(<alpha>), ...)))`.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("((VocabList) (vl_contents: (")?;
		for (i, id) in self.ids().into_iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			if let Some(ve) = self.elements.get(&id) {
				write!(f, "{ve}")?;
			}
		}
		f.write_str(")))")
	}
}

fn check_lookup_name(name: &str) -> Result<()> {
	if is_valid_pred_name(name) || is_valid_svar_name(name) {
		Ok(())
	} else {
		Err(SystemError::InvalidName {
			kind: NameKind::Lookup,
			name: name.to_owned(),
		})
	}
}

fn approved_of(fa: &FormalArg) -> impl Iterator<Item = DbId> + '_ {
	fa.approved_preds().into_iter().flatten()
}

fn expect_kind(ve: &VocabElement, expected: VeKind) -> Result<&VocabElement> {
	if ve.ve_kind() != expected {
		return Err(SystemError::KindMismatch {
			expected,
			found: ve.ve_kind(),
		});
	}
	Ok(ve)
}

fn inconsistent(id: DbId, detail: &'static str) -> SystemError {
	warn!(domain = "vocab", %id, detail, "vocab list and index disagree");
	SystemError::IndexInconsistent { id, detail }
}
