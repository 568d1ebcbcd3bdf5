//! Change records describing how a vocab element moved between two versions.
//!
//! Arguments are matched by ID: a new argument whose ID appears in the old
//! list is the same argument, possibly moved or edited; a new argument
//! without a matching ID was inserted; an old argument left unmatched was
//! deleted.


use shapa_primitives::DbId;

use crate::element::{VeKind, VocabElement};
use crate::farg::FormalArg;

/// Per-argument flags for one argument of the new list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FargDelta {
	pub name_changed: bool,
	pub sub_range_changed: bool,
	pub range_changed: bool,
	pub inserted: bool,
}

impl FargDelta {
	fn any(&self) -> bool {
		self.name_changed || self.sub_range_changed || self.range_changed || self.inserted
	}
}

/// Diff of two argument lists.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgListDiff {
	pub old: Vec<FormalArg>,
	pub new: Vec<FormalArg>,
	/// Position in `old` of each argument of `new`.
	pub new_to_old: Vec<Option<usize>>,
	/// Position in `new` of each argument of `old`.
	pub old_to_new: Vec<Option<usize>>,
	pub deltas: Vec<FargDelta>,
	pub deleted: Vec<bool>,
	pub changed: bool,
}

impl ArgListDiff {
	pub fn between(old: &[FormalArg], new: &[FormalArg]) -> Self {
		let mut old_to_new = vec![None; old.len()];
		let mut new_to_old = Vec::with_capacity(new.len());
		let mut deltas = Vec::with_capacity(new.len());

		for (j, fa) in new.iter().enumerate() {
			let matched = fa
				.id()
				.is_valid()
				.then(|| old.iter().position(|prev| prev.id() == fa.id()))
				.flatten();
			let delta = match matched {
				Some(i) => {
					old_to_new[i] = Some(j);
					let prev = &old[i];
					FargDelta {
						name_changed: prev.name() != fa.name(),
						sub_range_changed: prev.sub_range() != fa.sub_range(),
						range_changed: prev.kind() != fa.kind(),
						inserted: false,
					}
				}
				None => FargDelta {
					inserted: true,
					..FargDelta::default()
				},
			};
			new_to_old.push(matched);
			deltas.push(delta);
		}

		let deleted: Vec<bool> = old_to_new.iter().map(Option::is_none).collect();
		let changed = old.len() != new.len()
			|| new_to_old.iter().enumerate().any(|(j, m)| *m != Some(j))
			|| deltas.iter().any(FargDelta::any)
			|| deleted.iter().any(|d| *d);

		Self {
			old: old.to_vec(),
			new: new.to_vec(),
			new_to_old,
			old_to_new,
			deltas,
			deleted,
			changed,
		}
	}

	/// Arguments of the old list with no counterpart in the new one.
	pub fn deleted_args(&self) -> impl Iterator<Item = &FormalArg> {
		self.old
			.iter()
			.zip(&self.deleted)
			.filter(|(_, deleted)| **deleted)
			.map(|(fa, _)| fa)
	}

	/// Arguments of the new list with no counterpart in the old one.
	pub fn inserted_args(&self) -> impl Iterator<Item = &FormalArg> {
		self.new
			.iter()
			.zip(&self.deltas)
			.filter(|(_, delta)| delta.inserted)
			.map(|(fa, _)| fa)
	}
}

/// What changed when a vocab element was replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabChange {
	pub id: DbId,
	pub kind: VeKind,
	pub old_name: String,
	pub new_name: String,
	pub old_var_len: bool,
	pub new_var_len: bool,
	pub fargs: ArgListDiff,
	/// Column predicate arguments; `None` for predicates.
	pub cp_args: Option<ArgListDiff>,
}

impl VocabChange {
	pub fn between(old: &VocabElement, new: &VocabElement) -> Self {
		let cp_args = match (old.cp_args(), new.cp_args()) {
			(Some(a), Some(b)) => Some(ArgListDiff::between(a, b)),
			_ => None,
		};
		Self {
			id: new.id(),
			kind: new.ve_kind(),
			old_name: old.name().to_owned(),
			new_name: new.name().to_owned(),
			old_var_len: old.is_var_len(),
			new_var_len: new.is_var_len(),
			fargs: ArgListDiff::between(old.fargs(), new.fargs()),
			cp_args,
		}
	}

	pub fn name_changed(&self) -> bool {
		self.old_name != self.new_name
	}

	pub fn var_len_changed(&self) -> bool {
		self.old_var_len != self.new_var_len
	}

	/// True when nothing a dependent could observe differs.
	pub fn is_noop(&self) -> bool {
		!self.name_changed()
			&& !self.var_len_changed()
			&& !self.fargs.changed
			&& !self.cp_args.as_ref().is_some_and(|cp| cp.changed)
	}
}
