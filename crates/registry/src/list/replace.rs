use rustc_hash::FxHashSet;
use shapa_primitives::DbId;
use tracing::debug;

use super::{VocabList, inconsistent};
use crate::change::VocabChange;
use crate::element::VocabElement;
use crate::error::{Result, SystemError};
use crate::farg::FormalArg;
use crate::index::IdentityIndex;

impl VocabList {
	/// Replaces the element registered under `ve.id()` with `ve`.
	///
	/// Arguments of `ve` that carry an ID must be arguments of the current
	/// element with the same type; they keep their IDs. Arguments without an
	/// ID are registered, and current arguments missing from `ve` are
	/// deregistered. Dependents may veto the change before anything is
	/// committed, and are told about it afterwards.
	pub fn replace_vocab_element(&mut self, idx: &mut IdentityIndex, mut ve: VocabElement) -> Result<()> {
		self.check_index(idx)?;
		if ve.db() != self.db {
			return Err(SystemError::ForeignDatabase);
		}
		let id = ve.id();
		let old = self.get_vocab_element(id)?;
		if old.ve_kind() != ve.ve_kind() {
			return Err(SystemError::KindMismatch {
				expected: old.ve_kind(),
				found: ve.ve_kind(),
			});
		}

		ve.validate()?;
		self.check_approved(&ve)?;
		check_carried(old.fargs(), ve.fargs())?;
		if let (Some(old_cp), Some(new_cp)) = (old.cp_args(), ve.cp_args()) {
			check_carried(old_cp, new_cp)?;
		}

		if self.names.get(old.name()) != Some(&id) {
			return Err(inconsistent(id, "name map disagrees"));
		}
		let old_name = old.name().to_owned();
		let renamed = old_name != ve.name();
		if renamed && self.names.contains_key(ve.name()) {
			return Err(SystemError::NameInUse(ve.name().to_owned()));
		}

		let pending = VocabChange::between(old, &ve);
		if let Some(deps) = self.dependents.get(&id) {
			for (_, dep) in deps {
				dep.check_change(&pending)
					.map_err(|reason| SystemError::DependentRejected { id, reason })?;
			}
		}

		let kept: FxHashSet<DbId> = ve
			.all_args()
			.map(FormalArg::id)
			.filter(|id| id.is_valid())
			.collect();
		let dropped: Vec<DbId> = old
			.all_args()
			.map(FormalArg::id)
			.filter(|id| !kept.contains(id))
			.collect();

		ve.propagate_id();
		let mut registered = 0usize;
		for fa in ve.all_args_mut() {
			if fa.id().is_valid() {
				idx.replace(fa)?;
			} else {
				idx.register(fa)?;
				registered += 1;
			}
		}
		for &gone in &dropped {
			idx.deregister(gone)?;
		}
		idx.replace(&ve)?;

		if renamed {
			self.names.remove(&old_name);
			self.names.insert(ve.name().to_owned(), id);
		}
		let prev = self
			.elements
			.insert(id, ve)
			.ok_or(SystemError::UnknownElement(id))?;
		let Some(current) = self.elements.get(&id) else {
			return Err(SystemError::UnknownElement(id));
		};
		let change = VocabChange::between(&prev, current);

		debug!(
			domain = "vocab",
			%id,
			name = current.name(),
			registered,
			dropped = dropped.len(),
			"replaced vocab element"
		);
		if let Some(deps) = self.dependents.get_mut(&id) {
			for (_, dep) in deps {
				dep.apply_change(&change);
			}
		}
		for (_, observer) in &mut self.observers {
			observer.element_changed(&change);
		}
		Ok(())
	}
}

/// Every ID-carrying argument of `new` is a distinct argument of `old` with
/// an unchanged type.
fn check_carried(old: &[FormalArg], new: &[FormalArg]) -> Result<()> {
	let mut seen = FxHashSet::default();
	for fa in new.iter().filter(|fa| fa.id().is_valid()) {
		if !seen.insert(fa.id()) {
			return Err(SystemError::DuplicateFargId(fa.id()));
		}
		let prev = old
			.iter()
			.find(|prev| prev.id() == fa.id())
			.ok_or(SystemError::ForeignFormalArg(fa.id()))?;
		if prev.ty() != fa.ty() {
			return Err(SystemError::FargTypeChanged { id: fa.id() });
		}
	}
	Ok(())
}
