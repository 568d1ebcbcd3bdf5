use std::collections::BTreeSet;
use std::fmt;

use shapa_primitives::{DbId, TimeStamp};

/// Formal argument type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FargType {
	ColPredicate,
	Integer,
	Float,
	Nominal,
	Predicate,
	QuoteString,
	TimeStamp,
	Text,
	Untyped,
}

impl FargType {
	/// Label used as the head of the debug form.
	pub(crate) fn db_label(self) -> &'static str {
		match self {
			Self::ColPredicate => "ColPredFormalArg",
			Self::Integer => "IntFormalArg",
			Self::Float => "FloatFormalArg",
			Self::Nominal => "NominalFormalArg",
			Self::Predicate => "PredFormalArg",
			Self::QuoteString => "QuoteStringFormalArg",
			Self::TimeStamp => "TimeStampFormalArg",
			Self::Text => "TextStringFormalArg",
			Self::Untyped => "UnTypedFormalArg",
		}
	}
}

impl fmt::Display for FargType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::ColPredicate => "COL_PREDICATE",
			Self::Integer => "INTEGER",
			Self::Float => "FLOAT",
			Self::Nominal => "NOMINAL",
			Self::Predicate => "PREDICATE",
			Self::QuoteString => "QUOTE_STRING",
			Self::TimeStamp => "TIME_STAMP",
			Self::Text => "TEXT",
			Self::Untyped => "UNTYPED",
		})
	}
}

/// Type-specific payload of a formal argument.
///
/// Numeric kinds always carry bounds; the full domain means "no subrange".
/// Set-valued kinds carry `Some(set)` exactly while subranging is enabled.
#[derive(Debug, Clone, PartialEq)]
pub enum FargKind {
	Untyped,
	ColPredicate,
	QuoteString,
	Text,
	Integer { min: i64, max: i64 },
	Float { min: f64, max: f64 },
	TimeStamp { range: Option<(TimeStamp, TimeStamp)> },
	Nominal { approved: Option<BTreeSet<String>> },
	Predicate { approved: Option<BTreeSet<DbId>> },
}

impl FargKind {
	/// Unconstrained payload for `ty`.
	pub fn default_for(ty: FargType) -> Self {
		match ty {
			FargType::ColPredicate => Self::ColPredicate,
			FargType::Integer => Self::Integer {
				min: i64::MIN,
				max: i64::MAX,
			},
			FargType::Float => Self::Float {
				min: -f64::MAX,
				max: f64::MAX,
			},
			FargType::Nominal => Self::Nominal { approved: None },
			FargType::Predicate => Self::Predicate { approved: None },
			FargType::QuoteString => Self::QuoteString,
			FargType::TimeStamp => Self::TimeStamp { range: None },
			FargType::Text => Self::Text,
			FargType::Untyped => Self::Untyped,
		}
	}

	pub fn ty(&self) -> FargType {
		match self {
			Self::Untyped => FargType::Untyped,
			Self::ColPredicate => FargType::ColPredicate,
			Self::QuoteString => FargType::QuoteString,
			Self::Text => FargType::Text,
			Self::Integer { .. } => FargType::Integer,
			Self::Float { .. } => FargType::Float,
			Self::TimeStamp { .. } => FargType::TimeStamp,
			Self::Nominal { .. } => FargType::Nominal,
			Self::Predicate { .. } => FargType::Predicate,
		}
	}

	/// Whether values are restricted beyond the type's full domain.
	pub fn sub_range(&self) -> bool {
		match self {
			Self::Integer { min, max } => *min != i64::MIN || *max != i64::MAX,
			Self::Float { min, max } => *min != -f64::MAX || *max != f64::MAX,
			Self::TimeStamp { range } => range.is_some(),
			Self::Nominal { approved } => approved.is_some(),
			Self::Predicate { approved } => approved.is_some(),
			Self::Untyped | Self::ColPredicate | Self::QuoteString | Self::Text => false,
		}
	}
}

/// A candidate value checked against a formal argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArgValue<'a> {
	Int(i64),
	Float(f64),
	Time(TimeStamp),
	Nominal(&'a str),
	Pred(DbId),
	ColPred(DbId),
	Quote(&'a str),
	Text(&'a str),
}
