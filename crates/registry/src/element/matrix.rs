use std::fmt;

use shapa_primitives::{DbId, DbTag};

use crate::error::{Result, SystemError};
use crate::farg::{FargType, FormalArg};
use crate::index::{ArgRole, Indexed};

const ORD: &str = "<ord>";
const ONSET: &str = "<onset>";
const OFFSET: &str = "<offset>";

/// Number of fixed column predicate arguments ahead of the shadows.
const CP_PREFIX: usize = 3;

/// Value kind of a matrix (column).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MatrixType {
	#[default]
	Undefined,
	Text,
	Nominal,
	Integer,
	Float,
	Predicate,
	Matrix,
}

impl MatrixType {
	/// The argument type a single-argument matrix of this type holds.
	pub fn single_arg_type(self) -> Option<FargType> {
		match self {
			Self::Text => Some(FargType::Text),
			Self::Nominal => Some(FargType::Nominal),
			Self::Integer => Some(FargType::Integer),
			Self::Float => Some(FargType::Float),
			Self::Predicate => Some(FargType::Predicate),
			Self::Undefined | Self::Matrix => None,
		}
	}
}

impl fmt::Display for MatrixType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Undefined => "UNDEFINED",
			Self::Text => "TEXT",
			Self::Nominal => "NOMINAL",
			Self::Integer => "INTEGER",
			Self::Float => "FLOAT",
			Self::Predicate => "PREDICATE",
			Self::Matrix => "MATRIX",
		})
	}
}

pub(crate) fn is_reserved_name(name: &str) -> bool {
	matches!(name, ORD | ONSET | OFFSET)
}

/// Matrix-only state of a vocab element.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct MatrixPart {
	ty: MatrixType,
	cp_args: Vec<FormalArg>,
}

impl MatrixPart {
	pub(super) fn new(db: DbTag) -> Self {
		Self {
			ty: MatrixType::Undefined,
			cp_args: vec![
				FormalArg::column_predicate_slot(db, ORD, FargType::Integer),
				FormalArg::column_predicate_slot(db, ONSET, FargType::TimeStamp),
				FormalArg::column_predicate_slot(db, OFFSET, FargType::TimeStamp),
			],
		}
	}

	pub(super) fn ty(&self) -> MatrixType {
		self.ty
	}

	pub(super) fn set_ty(&mut self, ty: MatrixType) {
		self.ty = ty;
	}

	pub(super) fn cp_args(&self) -> &[FormalArg] {
		&self.cp_args
	}

	pub(super) fn cp_args_mut(&mut self) -> &mut [FormalArg] {
		&mut self.cp_args
	}

	/// Rejects argument types this matrix cannot hold.
	pub(super) fn check_admits(&self, ty: FargType) -> Result<()> {
		match self.ty {
			MatrixType::Undefined => Err(SystemError::UndefinedMatrixType),
			MatrixType::Matrix if ty == FargType::Text => Err(SystemError::FargNotAllowed {
				ty,
				context: "MATRIX matrix",
			}),
			MatrixType::Matrix => Ok(()),
			single => match single.single_arg_type() {
				Some(expected) if expected == ty => Ok(()),
				Some(expected) => Err(SystemError::FargTypeMismatch {
					expected,
					found: ty,
				}),
				None => Err(SystemError::UndefinedMatrixType),
			},
		}
	}

	/// Rejects a second argument in a single-argument matrix.
	pub(super) fn check_arg_count(&self, count: usize) -> Result<()> {
		if self.ty != MatrixType::Matrix && count > 1 {
			return Err(SystemError::SingleArgMatrix(self.ty));
		}
		Ok(())
	}

	pub(super) fn check_can_delete(&self) -> Result<()> {
		if self.ty != MatrixType::Matrix {
			return Err(SystemError::SingleArgMatrix(self.ty));
		}
		Ok(())
	}

	pub(super) fn insert_shadow(&mut self, n: usize, shadow: FormalArg) {
		self.cp_args.insert(n + CP_PREFIX, shadow);
	}

	pub(super) fn remove_shadow(&mut self, n: usize) -> FormalArg {
		self.cp_args.remove(n + CP_PREFIX)
	}

	/// Replaces the shadow of argument `n`. A `carried` argument keeps its
	/// shadow's ID.
	pub(super) fn replace_shadow(&mut self, n: usize, mut shadow: FormalArg, carried: bool) {
		let slot = &mut self.cp_args[n + CP_PREFIX];
		if carried {
			shadow.assign_id(slot.id());
		}
		*slot = shadow;
	}

	/// The column predicate list mirrors `fargs` and is owned by `owner`.
	pub(super) fn cp_args_valid(&self, owner: DbId, fargs: &[FormalArg]) -> bool {
		let fixed = [
			(ORD, FargType::Integer),
			(ONSET, FargType::TimeStamp),
			(OFFSET, FargType::TimeStamp),
		];
		self.cp_args.len() == fargs.len() + CP_PREFIX
			&& self
				.cp_args
				.iter()
				.all(|cp| cp.owner() == owner && cp.role() == ArgRole::ColumnPredicate)
			&& self
				.cp_args
				.iter()
				.zip(fixed)
				.all(|(cp, (name, ty))| cp.name() == name && cp.ty() == ty)
			&& self.cp_args[CP_PREFIX..]
				.iter()
				.zip(fargs)
				.all(|(cp, fa)| cp.is_equivalent(fa))
	}
}

/// Works out how `fargs` must change for their matrix to become `ty`.
///
/// Returns a replacement for the lone argument when it must be rebuilt.
pub(super) fn coerce_args(
	db: DbTag,
	fargs: &[FormalArg],
	ty: MatrixType,
) -> Result<Option<FormalArg>> {
	let Some(expected) = ty.single_arg_type() else {
		if let Some(fa) = fargs.iter().find(|fa| fa.ty() == FargType::Text) {
			return Err(SystemError::FargNotAllowed {
				ty: fa.ty(),
				context: "MATRIX matrix",
			});
		}
		return Ok(None);
	};

	match fargs {
		[] => Ok(None),
		[fa] if fa.ty() == expected => Ok(None),
		[fa] if fa.ty() == FargType::Untyped => FormalArg::of_type(db, fa.name(), expected).map(Some),
		[fa] => Err(SystemError::FargTypeMismatch {
			expected,
			found: fa.ty(),
		}),
		_ => Err(SystemError::SingleArgMatrix(ty)),
	}
}
