use shapa_primitives::DbId;

use crate::element::VeKind;
use crate::farg::FargType;

/// Which list of its owner a formal argument lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgRole {
	/// A user-visible argument in the element's formal argument list.
	Formal,
	/// A column predicate argument (`<ord>`, `<onset>`, `<offset>` or a shadow).
	ColumnPredicate,
}

/// Descriptor stored in the index for one registered entity.
///
/// Entries describe where the live entity is found rather than holding it;
/// the owning [`crate::VocabList`] stores the values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexEntry {
	VocabElement {
		kind: VeKind,
	},
	FormalArg {
		owner: DbId,
		ty: FargType,
		role: ArgRole,
	},
}

impl IndexEntry {
	/// True when `other` may replace `self` under the same ID.
	///
	/// Vocab elements keep their kind and formal arguments keep their type.
	pub fn same_class(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::VocabElement { kind: a }, Self::VocabElement { kind: b }) => a == b,
			(Self::FormalArg { ty: a, .. }, Self::FormalArg { ty: b, .. }) => a == b,
			_ => false,
		}
	}

	/// Owning vocab element of a formal argument entry.
	pub fn owner(&self) -> Option<DbId> {
		match self {
			Self::VocabElement { .. } => None,
			Self::FormalArg { owner, .. } => Some(*owner),
		}
	}
}
