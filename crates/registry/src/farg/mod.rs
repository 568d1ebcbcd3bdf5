//! Formal arguments: named, typed parameter slots of a vocab element.
//!
//! A formal argument is built detached (ID [`DbId::INVALID`], no owner) and
//! receives its ID when the vocab list registers the element that holds it.
//! Name uniqueness is a property of the owning element and is checked there.

mod kind;
mod render;

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

pub use kind::{ArgValue, FargKind, FargType};
use shapa_primitives::{DbId, DbTag, TimeStamp, is_valid_farg_name, is_valid_nominal};

use crate::error::{NameKind, Result, SystemError};
use crate::index::{ArgRole, IndexEntry, Indexed};
use crate::list::VocabList;

/// Name given to arguments built without one.
pub const DEFAULT_FARG_NAME: &str = "<val>";

/// A typed parameter slot of a vocab element.
#[derive(Debug, Clone, PartialEq)]
pub struct FormalArg {
	id: DbId,
	db: DbTag,
	name: String,
	owner: DbId,
	role: ArgRole,
	hidden: bool,
	kind: FargKind,
}

impl FormalArg {
	/// Builds a detached argument, validating the name.
	pub fn new(db: DbTag, name: &str, kind: FargKind) -> Result<Self> {
		check_name(name)?;
		Ok(Self {
			id: DbId::INVALID,
			db,
			name: name.to_owned(),
			owner: DbId::INVALID,
			role: ArgRole::Formal,
			hidden: false,
			kind,
		})
	}

	/// Builds an unconstrained argument of type `ty` named [`DEFAULT_FARG_NAME`].
	pub fn with_default_name(db: DbTag, ty: FargType) -> Self {
		Self {
			id: DbId::INVALID,
			db,
			name: DEFAULT_FARG_NAME.to_owned(),
			owner: DbId::INVALID,
			role: ArgRole::Formal,
			hidden: false,
			kind: FargKind::default_for(ty),
		}
	}

	/// Builds one of the fixed column predicate arguments (`<ord>`,
	/// `<onset>`, `<offset>`).
	pub(crate) fn column_predicate_slot(db: DbTag, name: &'static str, ty: FargType) -> Self {
		Self {
			role: ArgRole::ColumnPredicate,
			name: name.to_owned(),
			..Self::with_default_name(db, ty)
		}
	}

	/// Builds an unconstrained argument of type `ty`.
	pub fn of_type(db: DbTag, name: &str, ty: FargType) -> Result<Self> {
		Self::new(db, name, FargKind::default_for(ty))
	}

	pub fn untyped(db: DbTag, name: &str) -> Result<Self> {
		Self::of_type(db, name, FargType::Untyped)
	}

	pub fn integer(db: DbTag, name: &str) -> Result<Self> {
		Self::of_type(db, name, FargType::Integer)
	}

	pub fn float(db: DbTag, name: &str) -> Result<Self> {
		Self::of_type(db, name, FargType::Float)
	}

	pub fn time_stamp(db: DbTag, name: &str) -> Result<Self> {
		Self::of_type(db, name, FargType::TimeStamp)
	}

	pub fn nominal(db: DbTag, name: &str) -> Result<Self> {
		Self::of_type(db, name, FargType::Nominal)
	}

	pub fn predicate(db: DbTag, name: &str) -> Result<Self> {
		Self::of_type(db, name, FargType::Predicate)
	}

	pub fn quote_string(db: DbTag, name: &str) -> Result<Self> {
		Self::of_type(db, name, FargType::QuoteString)
	}

	pub fn text(db: DbTag, name: &str) -> Result<Self> {
		Self::of_type(db, name, FargType::Text)
	}

	pub fn col_predicate(db: DbTag, name: &str) -> Result<Self> {
		Self::of_type(db, name, FargType::ColPredicate)
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

	/// ID of the owning vocab element, INVALID while detached.
	pub fn owner(&self) -> DbId {
		self.owner
	}

	pub fn role(&self) -> ArgRole {
		self.role
	}

	pub fn ty(&self) -> FargType {
		self.kind.ty()
	}

	pub fn kind(&self) -> &FargKind {
		&self.kind
	}

	pub fn is_hidden(&self) -> bool {
		self.hidden
	}

	pub fn set_hidden(&mut self, hidden: bool) {
		self.hidden = hidden;
	}

	/// Renames the argument. Sibling uniqueness is the owner's concern; use
	/// [`crate::VocabElement::rename_formal_arg`] on attached arguments.
	pub fn set_name(&mut self, name: &str) -> Result<()> {
		check_name(name)?;
		self.name = name.to_owned();
		Ok(())
	}

	pub fn sub_range(&self) -> bool {
		self.kind.sub_range()
	}

	/// Bounds of an integer argument.
	pub fn int_range(&self) -> Result<(i64, i64)> {
		match self.kind {
			FargKind::Integer { min, max } => Ok((min, max)),
			_ => Err(self.type_mismatch(FargType::Integer)),
		}
	}

	/// Restricts an integer argument to `[min, max]`; the full `i64` range
	/// clears the subrange.
	pub fn set_int_range(&mut self, min: i64, max: i64) -> Result<()> {
		if !matches!(self.kind, FargKind::Integer { .. }) {
			return Err(self.type_mismatch(FargType::Integer));
		}
		if min >= max {
			return Err(SystemError::InvalidRange);
		}
		self.kind = FargKind::Integer { min, max };
		Ok(())
	}

	pub fn float_range(&self) -> Result<(f64, f64)> {
		match self.kind {
			FargKind::Float { min, max } => Ok((min, max)),
			_ => Err(self.type_mismatch(FargType::Float)),
		}
	}

	pub fn set_float_range(&mut self, min: f64, max: f64) -> Result<()> {
		if !matches!(self.kind, FargKind::Float { .. }) {
			return Err(self.type_mismatch(FargType::Float));
		}
		// NaN bounds compare as unordered.
		if min.partial_cmp(&max) != Some(Ordering::Less) {
			return Err(SystemError::InvalidRange);
		}
		self.kind = FargKind::Float { min, max };
		Ok(())
	}

	pub fn time_range(&self) -> Result<Option<(TimeStamp, TimeStamp)>> {
		match self.kind {
			FargKind::TimeStamp { range } => Ok(range),
			_ => Err(self.type_mismatch(FargType::TimeStamp)),
		}
	}

	/// Restricts a time stamp argument to `[min, max]`, or clears the
	/// restriction with `None`.
	pub fn set_time_range(&mut self, range: Option<(TimeStamp, TimeStamp)>) -> Result<()> {
		if !matches!(self.kind, FargKind::TimeStamp { .. }) {
			return Err(self.type_mismatch(FargType::TimeStamp));
		}
		if let Some((min, max)) = range
			&& min.try_cmp(&max)?.is_ge()
		{
			return Err(SystemError::InvalidRange);
		}
		self.kind = FargKind::TimeStamp { range };
		Ok(())
	}

	/// Turns subranging of a nominal or predicate argument on or off.
	///
	/// Enabling starts from an empty approved set; disabling discards it.
	pub fn set_sub_range(&mut self, enabled: bool) -> Result<()> {
		let found = self.ty();
		match &mut self.kind {
			FargKind::Nominal { approved } => toggle(approved, enabled),
			FargKind::Predicate { approved } => toggle(approved, enabled),
			_ => {
				return Err(SystemError::FargTypeMismatch {
					expected: FargType::Nominal,
					found,
				});
			}
		}
		Ok(())
	}

	/// Adds `value` to a nominal argument's approved set.
	pub fn add_approved(&mut self, value: &str) -> Result<()> {
		if !is_valid_nominal(value) {
			return Err(SystemError::InvalidName {
				kind: NameKind::Nominal,
				name: value.to_owned(),
			});
		}
		let set = self.nominal_set_mut()?;
		if !set.insert(value.to_owned()) {
			return Err(SystemError::AlreadyApproved(value.to_owned()));
		}
		Ok(())
	}

	pub fn remove_approved(&mut self, value: &str) -> Result<()> {
		let set = self.nominal_set_mut()?;
		if !set.remove(value) {
			return Err(SystemError::NotApproved(value.to_owned()));
		}
		Ok(())
	}

	pub fn approves(&self, value: &str) -> Result<bool> {
		match &self.kind {
			FargKind::Nominal { approved: Some(set) } => Ok(set.contains(value)),
			FargKind::Nominal { approved: None } => Err(SystemError::SubRangeDisabled),
			_ => Err(self.type_mismatch(FargType::Nominal)),
		}
	}

	/// Approved nominal values in sorted order, or `None` without a subrange.
	pub fn approved_values(&self) -> Option<impl Iterator<Item = &str>> {
		match &self.kind {
			FargKind::Nominal { approved: Some(set) } => Some(set.iter().map(String::as_str)),
			_ => None,
		}
	}

	/// Adds predicate `pred` to a predicate argument's approved set. The ID
	/// must name a predicate in `vocab`.
	pub fn add_approved_pred(&mut self, pred: DbId, vocab: &VocabList) -> Result<()> {
		if !vocab.pred_in_vocab_list(pred)? {
			return Err(SystemError::UnknownElement(pred));
		}
		let set = self.pred_set_mut()?;
		if !set.insert(pred) {
			return Err(SystemError::AlreadyApproved(pred.to_string()));
		}
		Ok(())
	}

	/// Removes `pred` from the approved set. The ID must still name a
	/// predicate in `vocab`.
	pub fn remove_approved_pred(&mut self, pred: DbId, vocab: &VocabList) -> Result<()> {
		if !vocab.pred_in_vocab_list(pred)? {
			return Err(SystemError::UnknownElement(pred));
		}
		let set = self.pred_set_mut()?;
		if !set.remove(&pred) {
			return Err(SystemError::NotApproved(pred.to_string()));
		}
		Ok(())
	}

	/// Whether `pred`, a predicate in `vocab`, is in the approved set.
	pub fn approves_pred(&self, pred: DbId, vocab: &VocabList) -> Result<bool> {
		if !vocab.pred_in_vocab_list(pred)? {
			return Err(SystemError::UnknownElement(pred));
		}
		match &self.kind {
			FargKind::Predicate { approved: Some(set) } => Ok(set.contains(&pred)),
			FargKind::Predicate { approved: None } => Err(SystemError::SubRangeDisabled),
			_ => Err(self.type_mismatch(FargType::Predicate)),
		}
	}

	pub fn approved_preds(&self) -> Option<impl Iterator<Item = DbId> + '_> {
		match &self.kind {
			FargKind::Predicate { approved: Some(set) } => Some(set.iter().copied()),
			_ => None,
		}
	}

	/// Whether `value` may be bound to this argument.
	pub fn is_valid_value(&self, value: &ArgValue<'_>) -> bool {
		match (&self.kind, value) {
			(FargKind::Untyped, ArgValue::Text(_)) => false,
			(FargKind::Untyped, _) => true,
			(FargKind::ColPredicate, ArgValue::ColPred(id)) => id.is_valid(),
			(FargKind::QuoteString, ArgValue::Quote(_)) => true,
			(FargKind::Text, ArgValue::Text(_)) => true,
			(FargKind::Integer { min, max }, ArgValue::Int(v)) => (*min..=*max).contains(v),
			(FargKind::Float { min, max }, ArgValue::Float(v)) => (*min..=*max).contains(v),
			(FargKind::TimeStamp { range }, ArgValue::Time(t)) => match range {
				None => true,
				Some((min, max)) => {
					matches!(min.try_cmp(t), Ok(o) if o.is_le())
						&& matches!(t.try_cmp(max), Ok(o) if o.is_le())
				}
			},
			(FargKind::Nominal { approved }, ArgValue::Nominal(s)) => {
				is_valid_nominal(s) && approved.as_ref().is_none_or(|set| set.contains(*s))
			}
			(FargKind::Predicate { approved }, ArgValue::Pred(id)) => {
				id.is_valid() && approved.as_ref().is_none_or(|set| set.contains(id))
			}
			_ => false,
		}
	}

	/// A detached copy: same name, type and constraints, no ID and no owner.
	pub fn copy(&self) -> Self {
		Self {
			id: DbId::INVALID,
			owner: DbId::INVALID,
			role: ArgRole::Formal,
			..self.clone()
		}
	}

	/// Column predicate shadow of this argument, owned by the same element.
	pub(crate) fn shadow(&self) -> Self {
		Self {
			id: DbId::INVALID,
			role: ArgRole::ColumnPredicate,
			hidden: false,
			..self.clone()
		}
	}

	/// Same type, name, constraints and owner as `other`; IDs are ignored.
	pub fn is_equivalent(&self, other: &Self) -> bool {
		self.db == other.db
			&& self.name == other.name
			&& self.owner == other.owner
			&& self.kind == other.kind
	}

	pub(crate) fn set_owner(&mut self, owner: DbId) {
		self.owner = owner;
	}

	pub(crate) fn clear_id(&mut self) {
		self.id = DbId::INVALID;
	}

	fn nominal_set_mut(&mut self) -> Result<&mut BTreeSet<String>> {
		let found = self.ty();
		match &mut self.kind {
			FargKind::Nominal { approved: Some(set) } => Ok(set),
			FargKind::Nominal { approved: None } => Err(SystemError::SubRangeDisabled),
			_ => Err(SystemError::FargTypeMismatch {
				expected: FargType::Nominal,
				found,
			}),
		}
	}

	pub(crate) fn pred_set_mut(&mut self) -> Result<&mut BTreeSet<DbId>> {
		let found = self.ty();
		match &mut self.kind {
			FargKind::Predicate { approved: Some(set) } => Ok(set),
			FargKind::Predicate { approved: None } => Err(SystemError::SubRangeDisabled),
			_ => Err(SystemError::FargTypeMismatch {
				expected: FargType::Predicate,
				found,
			}),
		}
	}

	fn type_mismatch(&self, expected: FargType) -> SystemError {
		SystemError::FargTypeMismatch {
			expected,
			found: self.ty(),
		}
	}
}

fn check_name(name: &str) -> Result<()> {
	if is_valid_farg_name(name) {
		Ok(())
	} else {
		Err(SystemError::InvalidName {
			kind: NameKind::FormalArg,
			name: name.to_owned(),
		})
	}
}

fn toggle<T: Ord>(approved: &mut Option<BTreeSet<T>>, enabled: bool) {
	match (enabled, approved.is_some()) {
		(true, false) => *approved = Some(BTreeSet::new()),
		(false, true) => *approved = None,
		_ => {}
	}
}

impl Indexed for FormalArg {
	fn id(&self) -> DbId {
		self.id
	}

	fn db(&self) -> DbTag {
		self.db
	}

	fn index_entry(&self) -> IndexEntry {
		IndexEntry::FormalArg {
			owner: self.owner,
			ty: self.ty(),
			role: self.role,
		}
	}

	fn assign_id(&mut self, id: DbId) {
		self.id = id;
	}
}

impl fmt::Display for FormalArg {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)
	}
}
