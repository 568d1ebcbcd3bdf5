use shapa_primitives::{DbId, TimeStampError};

use crate::element::{MatrixType, VeKind};
use crate::farg::FargType;

/// Which grammar a rejected name was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
	FormalArg,
	Predicate,
	Column,
	Lookup,
	Nominal,
}

impl std::fmt::Display for NameKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			Self::FormalArg => "formal argument",
			Self::Predicate => "predicate",
			Self::Column => "column",
			Self::Lookup => "vocab element",
			Self::Nominal => "nominal",
		})
	}
}

/// Structural errors raised by the index and vocabulary list.
///
/// Every variant reports a violated invariant or a caller defect. Operations
/// validate before mutating, so returning any of these leaves the index and
/// list exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SystemError {
	#[error("invalid ID")]
	InvalidId,
	#[error("ID {0} not in index")]
	NotIndexed(DbId),
	#[error("ID {0} already in use")]
	IdInUse(DbId),
	#[error("entity already registered with ID {0}")]
	AlreadyRegistered(DbId),
	#[error("entity belongs to a different database")]
	ForeignDatabase,
	#[error("invalid {kind} name: {name:?}")]
	InvalidName { kind: NameKind, name: String },
	#[error("name {0:?} already in use")]
	NameInUse(String),
	#[error("no vocab element named {0:?}")]
	UnknownName(String),
	#[error("no vocab element with ID {0}")]
	UnknownElement(DbId),
	#[error("expected {expected}, found {found}")]
	KindMismatch { expected: VeKind, found: VeKind },
	#[error("index entry class changed for ID {0}")]
	EntryClassMismatch(DbId),
	#[error("system vocab element {0:?} is read only")]
	SystemElement(String),
	#[error("formal argument index {index} out of bounds (len {len})")]
	ArgIndexOutOfBounds { index: usize, len: usize },
	#[error("formal argument type mismatch: expected {expected}, found {found}")]
	FargTypeMismatch { expected: FargType, found: FargType },
	#[error("type of formal argument {id} has changed")]
	FargTypeChanged { id: DbId },
	#[error("formal argument {0} does not belong to this vocab element")]
	ForeignFormalArg(DbId),
	#[error("formal argument ID {0} appears more than once")]
	DuplicateFargId(DbId),
	#[error("formal argument name {0:?} not unique")]
	FargNameInUse(String),
	#[error("matrix type is undefined")]
	UndefinedMatrixType,
	#[error("{0} matrix holds exactly one formal argument")]
	SingleArgMatrix(MatrixType),
	#[error("{ty} formal argument not allowed in {context}")]
	FargNotAllowed { ty: FargType, context: &'static str },
	#[error("vocab element {0:?} is not well formed")]
	IllFormed(String),
	#[error("column predicate argument list out of sync")]
	ColPredDesync,
	#[error("invalid range: minimum must be below maximum")]
	InvalidRange,
	#[error("time stamp: {0}")]
	TimeStamp(#[from] TimeStampError),
	#[error("subrange is not enabled")]
	SubRangeDisabled,
	#[error("value {0} already approved")]
	AlreadyApproved(String),
	#[error("value {0} not approved")]
	NotApproved(String),
	#[error("index and vocab list disagree on ID {id}: {detail}")]
	IndexInconsistent { id: DbId, detail: &'static str },
	#[error("vocab element {0} is still referenced")]
	StillReferenced(DbId),
	#[error("no listener {0} attached")]
	UnknownListener(u64),
	#[error("change to vocab element {id} rejected: {reason}")]
	DependentRejected { id: DbId, reason: String },
}

pub type Result<T, E = SystemError> = std::result::Result<T, E>;
