#![cfg_attr(doc, allow(rustdoc::private_intra_doc_links))]
//! Vocab elements: predicate and matrix (column) type definitions.
//!
//! # Role
//!
//! A [`VocabElement`] is a named, ordered list of [`FormalArg`]s. Matrix
//! elements also carry a [`MatrixType`] and a column predicate argument list
//! used when a column's cells are referenced as predicates elsewhere.
//!
//! Registered elements are never edited in place. Callers check out a clone
//! from the [`crate::VocabList`], edit it with the methods here, and hand it
//! back to [`crate::VocabList::replace_vocab_element`].
//!
//! # Invariants
//!
//! - A matrix's column predicate list is `<ord>`, `<onset>`, `<offset>`
//!   followed by one shadow per formal argument, so `cp[i + 3]` mirrors
//!   `fargs[i]`.
//!   - Enforced in: [`VocabElement::append_formal_arg`], [`VocabElement::insert_formal_arg`],
//!     [`VocabElement::delete_formal_arg`], [`VocabElement::replace_formal_arg`],
//!     [`VocabElement::rename_formal_arg`]
//!   - Tested by: [`crate::element::tests::test_cp_list_tracks_edits`]
//!   - Failure symptom: Column predicate references bind to the wrong argument.
//!
//! - Formal argument names are unique within the element, and never reuse
//!   the reserved column predicate names.
//!   - Enforced in: `VocabElement::check_insertable`
//!   - Tested by: [`crate::element::tests::test_reserved_names_rejected`]
//!   - Failure symptom: Two arguments become indistinguishable by name.
//!
//! - System elements reject every edit.
//!   - Enforced in: `VocabElement::ensure_editable`
//!   - Tested by: [`crate::element::tests::test_system_element_read_only`]
//!   - Failure symptom: Built-in vocabulary changes under user edits.

mod matrix;
mod render;

use std::fmt;

pub use matrix::MatrixType;
use matrix::MatrixPart;
use shapa_primitives::{DbId, DbTag, is_valid_pred_name, is_valid_svar_name};

use crate::error::{NameKind, Result, SystemError};
use crate::farg::{FargType, FormalArg};
use crate::index::{ArgRole, IndexEntry, Indexed};

/// Variant tag of a vocab element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VeKind {
	Predicate,
	Matrix,
}

impl fmt::Display for VeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Predicate => "predicate",
			Self::Matrix => "matrix",
		})
	}
}

#[derive(Debug, Clone, PartialEq)]
enum ElementKind {
	Predicate,
	Matrix(MatrixPart),
}

/// A predicate or matrix type definition.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabElement {
	id: DbId,
	db: DbTag,
	name: String,
	system: bool,
	var_len: bool,
	fargs: Vec<FormalArg>,
	kind: ElementKind,
}

impl VocabElement {
	/// A detached, empty predicate.
	pub fn predicate(db: DbTag, name: &str) -> Result<Self> {
		check_name(VeKind::Predicate, name)?;
		Ok(Self::bare(db, name, ElementKind::Predicate))
	}

	/// A detached, empty matrix of undefined type.
	pub fn matrix(db: DbTag, name: &str) -> Result<Self> {
		check_name(VeKind::Matrix, name)?;
		Ok(Self::bare(db, name, ElementKind::Matrix(MatrixPart::new(db))))
	}

	/// A detached matrix of type `ty` holding `fargs`.
	pub fn matrix_with(
		db: DbTag,
		name: &str,
		ty: MatrixType,
		fargs: impl IntoIterator<Item = FormalArg>,
	) -> Result<Self> {
		let mut ve = Self::matrix(db, name)?;
		ve.set_type(ty)?;
		for fa in fargs {
			ve.append_formal_arg(fa)?;
		}
		Ok(ve)
	}

	/// A detached predicate holding `fargs`.
	pub fn predicate_with(
		db: DbTag,
		name: &str,
		fargs: impl IntoIterator<Item = FormalArg>,
	) -> Result<Self> {
		let mut ve = Self::predicate(db, name)?;
		for fa in fargs {
			ve.append_formal_arg(fa)?;
		}
		Ok(ve)
	}

	fn bare(db: DbTag, name: &str, kind: ElementKind) -> Self {
		Self {
			id: DbId::INVALID,
			db,
			name: name.to_owned(),
			system: false,
			var_len: false,
			fargs: Vec::new(),
			kind,
		}
	}

	pub fn id(&self) -> DbId {
		self.id
	}

	pub fn db(&self) -> DbTag {
		self.db
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn ve_kind(&self) -> VeKind {
		match self.kind {
			ElementKind::Predicate => VeKind::Predicate,
			ElementKind::Matrix(_) => VeKind::Matrix,
		}
	}

	pub fn is_system(&self) -> bool {
		self.system
	}

	pub fn is_var_len(&self) -> bool {
		self.var_len
	}

	pub fn fargs(&self) -> &[FormalArg] {
		&self.fargs
	}

	pub fn num_formal_args(&self) -> usize {
		self.fargs.len()
	}

	/// `None` for predicates.
	pub fn matrix_type(&self) -> Option<MatrixType> {
		self.matrix_part().map(MatrixPart::ty)
	}

	/// Column predicate arguments; `None` for predicates.
	pub fn cp_args(&self) -> Option<&[FormalArg]> {
		self.matrix_part().map(MatrixPart::cp_args)
	}

	pub fn formal_arg(&self, n: usize) -> Result<&FormalArg> {
		self.fargs.get(n).ok_or(SystemError::ArgIndexOutOfBounds {
			index: n,
			len: self.fargs.len(),
		})
	}

	/// Clone of argument `n` that keeps its ID but drops the owner link, for
	/// editing and handing back through [`Self::replace_formal_arg`].
	pub fn copy_formal_arg(&self, n: usize) -> Result<FormalArg> {
		let mut fa = self.formal_arg(n)?.clone();
		fa.set_owner(DbId::INVALID);
		Ok(fa)
	}

	pub fn set_name(&mut self, name: &str) -> Result<()> {
		self.ensure_editable()?;
		check_name(self.ve_kind(), name)?;
		self.name = name.to_owned();
		Ok(())
	}

	/// Marks the element as built-in. Requires a complete definition.
	pub fn set_system(&mut self) -> Result<()> {
		if self.fargs.is_empty() {
			return Err(SystemError::IllFormed(self.name.clone()));
		}
		if self.matrix_type() == Some(MatrixType::Undefined) {
			return Err(SystemError::UndefinedMatrixType);
		}
		self.system = true;
		Ok(())
	}

	pub fn set_var_len(&mut self, var_len: bool) -> Result<()> {
		self.ensure_editable()?;
		self.var_len = var_len;
		Ok(())
	}

	pub fn append_formal_arg(&mut self, fa: FormalArg) -> Result<()> {
		let at = self.fargs.len();
		self.insert_formal_arg(fa, at)
	}

	pub fn insert_formal_arg(&mut self, mut fa: FormalArg, n: usize) -> Result<()> {
		self.ensure_editable()?;
		if n > self.fargs.len() {
			return Err(SystemError::ArgIndexOutOfBounds {
				index: n,
				len: self.fargs.len(),
			});
		}
		self.check_insertable(&fa, None)?;
		if let Some(part) = self.matrix_part() {
			part.check_arg_count(self.fargs.len() + 1)?;
		}

		fa.set_owner(self.id);
		let shadow = fa.shadow();
		self.fargs.insert(n, fa);
		if let Some(part) = self.matrix_part_mut() {
			part.insert_shadow(n, shadow);
		}
		Ok(())
	}

	/// Removes argument `n` and its shadow. Single-argument matrices cannot
	/// shrink.
	pub fn delete_formal_arg(&mut self, n: usize) -> Result<FormalArg> {
		self.ensure_editable()?;
		self.formal_arg(n)?;
		if let Some(part) = self.matrix_part() {
			part.check_can_delete()?;
		}

		if let Some(part) = self.matrix_part_mut() {
			part.remove_shadow(n);
		}
		Ok(self.fargs.remove(n))
	}

	/// Swaps argument `n` for `fa`, returning the old argument.
	///
	/// The new argument must have the old argument's type unless the old slot
	/// is UNTYPED. Handing back the same argument ID keeps its shadow's ID.
	pub fn replace_formal_arg(&mut self, mut fa: FormalArg, n: usize) -> Result<FormalArg> {
		self.ensure_editable()?;
		let old = self.formal_arg(n)?;

		let carried = fa.id().is_valid() && fa.id() == old.id();
		if carried && fa.ty() != old.ty() {
			return Err(SystemError::FargTypeChanged { id: fa.id() });
		}
		if fa.ty() != old.ty() && old.ty() != FargType::Untyped {
			return Err(SystemError::FargTypeMismatch {
				expected: old.ty(),
				found: fa.ty(),
			});
		}
		self.check_insertable(&fa, Some(n))?;

		fa.set_owner(self.id);
		let shadow = fa.shadow();
		if let Some(part) = self.matrix_part_mut() {
			part.replace_shadow(n, shadow, carried);
		}
		Ok(std::mem::replace(&mut self.fargs[n], fa))
	}

	/// Renames argument `n` (and its shadow).
	pub fn rename_formal_arg(&mut self, n: usize, name: &str) -> Result<()> {
		let mut fa = self.formal_arg(n)?.clone();
		fa.set_name(name)?;
		self.replace_formal_arg(fa, n).map(drop)
	}

	/// Edits argument `n` through `edit`, then re-validates it and
	/// resynchronises its shadow.
	pub fn update_formal_arg<F>(&mut self, n: usize, edit: F) -> Result<()>
	where
		F: FnOnce(&mut FormalArg) -> Result<()>,
	{
		let mut fa = self.formal_arg(n)?.clone();
		edit(&mut fa)?;
		self.replace_formal_arg(fa, n).map(drop)
	}

	/// Sets a matrix's type.
	///
	/// Moving off UNDEFINED always succeeds. Switching between defined types
	/// requires the existing arguments to fit the new type; a lone UNTYPED
	/// argument is rebuilt as a fresh argument of the new type.
	pub fn set_type(&mut self, ty: MatrixType) -> Result<()> {
		self.ensure_editable()?;
		if ty == MatrixType::Undefined {
			return Err(SystemError::UndefinedMatrixType);
		}
		let Some(current) = self.matrix_type() else {
			return Err(SystemError::KindMismatch {
				expected: VeKind::Matrix,
				found: VeKind::Predicate,
			});
		};
		if current == ty {
			return Ok(());
		}

		let coerced = matrix::coerce_args(self.db, &self.fargs, ty)?;
		if let Some(mut fa) = coerced {
			fa.set_owner(self.id);
			let shadow = fa.shadow();
			self.fargs[0] = fa;
			if let Some(part) = self.matrix_part_mut() {
				part.replace_shadow(0, shadow, false);
			}
		}
		if let Some(part) = self.matrix_part_mut() {
			part.set_ty(ty);
		}
		Ok(())
	}

	/// Checks everything a registered element must satisfy.
	pub fn validate(&self) -> Result<()> {
		let ill_formed = || SystemError::IllFormed(self.name.clone());
		check_name(self.ve_kind(), &self.name)?;

		for (i, fa) in self.fargs.iter().enumerate() {
			if self.fargs[..i].iter().any(|prev| prev.name() == fa.name()) {
				return Err(SystemError::FargNameInUse(fa.name().to_owned()));
			}
			if fa.id().is_valid() && self.fargs[..i].iter().any(|prev| prev.id() == fa.id()) {
				return Err(SystemError::DuplicateFargId(fa.id()));
			}
			if fa.owner() != self.id || fa.role() != ArgRole::Formal || fa.db() != self.db {
				return Err(ill_formed());
			}
		}

		match &self.kind {
			ElementKind::Predicate => {
				if let Some(fa) = self.fargs.iter().find(|fa| fa.ty() == FargType::Text) {
					return Err(SystemError::FargNotAllowed {
						ty: fa.ty(),
						context: "predicate",
					});
				}
			}
			ElementKind::Matrix(part) => {
				for fa in &self.fargs {
					part.check_admits(fa.ty())?;
				}
				part.check_arg_count(self.fargs.len())?;
				if !part.cp_args_valid(self.id, &self.fargs) {
					return Err(SystemError::ColPredDesync);
				}
			}
		}
		Ok(())
	}

	pub fn is_well_formed(&self) -> bool {
		self.validate().is_ok()
	}

	/// Fully detached deep copy: every ID and owner link reset to INVALID.
	pub fn copy(&self) -> Self {
		let mut ve = self.clone();
		ve.id = DbId::INVALID;
		for fa in ve.all_args_mut() {
			fa.clear_id();
			fa.set_owner(DbId::INVALID);
		}
		ve
	}

	/// Formal arguments followed by column predicate arguments, in
	/// registration order.
	pub(crate) fn all_args(&self) -> impl Iterator<Item = &FormalArg> {
		self.fargs
			.iter()
			.chain(self.matrix_part().into_iter().flat_map(MatrixPart::cp_args))
	}

	pub(crate) fn all_args_mut(&mut self) -> impl Iterator<Item = &mut FormalArg> {
		let cps = match &mut self.kind {
			ElementKind::Matrix(part) => Some(part.cp_args_mut()),
			ElementKind::Predicate => None,
		};
		self.fargs.iter_mut().chain(cps.into_iter().flatten())
	}

	/// Points every argument's owner link at this element's ID.
	pub(crate) fn propagate_id(&mut self) {
		let id = self.id;
		for fa in self.all_args_mut() {
			fa.set_owner(id);
		}
	}

	fn matrix_part(&self) -> Option<&MatrixPart> {
		match &self.kind {
			ElementKind::Matrix(part) => Some(part),
			ElementKind::Predicate => None,
		}
	}

	fn matrix_part_mut(&mut self) -> Option<&mut MatrixPart> {
		match &mut self.kind {
			ElementKind::Matrix(part) => Some(part),
			ElementKind::Predicate => None,
		}
	}

	fn ensure_editable(&self) -> Result<()> {
		if self.system {
			return Err(SystemError::SystemElement(self.name.clone()));
		}
		Ok(())
	}

	/// Checks `fa` against the element's naming and typing rules, ignoring
	/// slot `replacing` when given.
	fn check_insertable(&self, fa: &FormalArg, replacing: Option<usize>) -> Result<()> {
		if fa.db() != self.db {
			return Err(SystemError::ForeignDatabase);
		}
		let others = self
			.fargs
			.iter()
			.enumerate()
			.filter(|(i, _)| Some(*i) != replacing)
			.map(|(_, other)| other);
		for other in others {
			if other.name() == fa.name() {
				return Err(SystemError::FargNameInUse(fa.name().to_owned()));
			}
			if fa.id().is_valid() && other.id() == fa.id() {
				return Err(SystemError::DuplicateFargId(fa.id()));
			}
		}

		match &self.kind {
			ElementKind::Predicate if fa.ty() == FargType::Text => Err(SystemError::FargNotAllowed {
				ty: fa.ty(),
				context: "predicate",
			}),
			ElementKind::Predicate => Ok(()),
			ElementKind::Matrix(part) => {
				if matrix::is_reserved_name(fa.name()) {
					return Err(SystemError::FargNameInUse(fa.name().to_owned()));
				}
				part.check_admits(fa.ty())
			}
		}
	}
}

fn check_name(kind: VeKind, name: &str) -> Result<()> {
	let (valid, name_kind) = match kind {
		VeKind::Predicate => (is_valid_pred_name(name), NameKind::Predicate),
		VeKind::Matrix => (is_valid_svar_name(name), NameKind::Column),
	};
	if valid {
		Ok(())
	} else {
		Err(SystemError::InvalidName {
			kind: name_kind,
			name: name.to_owned(),
		})
	}
}

impl Indexed for VocabElement {
	fn id(&self) -> DbId {
		self.id
	}

	fn db(&self) -> DbTag {
		self.db
	}

	fn index_entry(&self) -> IndexEntry {
		IndexEntry::VocabElement {
			kind: self.ve_kind(),
		}
	}

	fn assign_id(&mut self, id: DbId) {
		self.id = id;
	}
}
