use std::fmt;

use super::{ElementKind, VocabElement};
use crate::farg::FormalArg;

fn write_names(f: &mut fmt::Formatter<'_>, name: &str, args: &[FormalArg]) -> fmt::Result {
	write!(f, "{name}(")?;
	for (i, fa) in args.iter().enumerate() {
		if i > 0 {
			f.write_str(", ")?;
		}
		f.write_str(fa.name())?;
	}
	f.write_str(")")
}

fn db_list(args: &[FormalArg]) -> String {
	let items: Vec<String> = args.iter().map(FormalArg::to_db_string).collect();
	format!("({})", items.join(", "))
}

impl fmt::Display for VocabElement {
	/// `name(<a>, <b>)`.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write_names(f, self.name(), self.fargs())
	}
}

struct CpForm<'a>(&'a VocabElement);

impl fmt::Display for CpForm<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write_names(f, self.0.name(), self.0.cp_args().unwrap_or_default())
	}
}

impl VocabElement {
	/// Debug form with every ID, e.g.
	/// `((PredicateVocabElement: 9 p1) (system: false) (varLen: false) (fArgList: (...)))`.
	///
	/// The leading `((` is only closed once; recorded expectations depend on
	/// that shape.
	pub fn to_db_string(&self) -> String {
		match &self.kind {
			ElementKind::Predicate => format!(
				"((PredicateVocabElement: {} {}) (system: {}) (varLen: {}) (fArgList: {})",
				self.id,
				self.name,
				self.system,
				self.var_len,
				db_list(&self.fargs)
			),
			ElementKind::Matrix(part) => format!(
				"((MatrixVocabElement: {} {}) (system: {}) (type: {}) (varLen: {}) (fArgList: {})",
				self.id,
				self.name,
				self.system,
				part.ty(),
				self.var_len,
				db_list(&self.fargs)
			),
		}
	}

	/// Column predicate form, `name(<ord>, <onset>, <offset>, ...)`. Predicates
	/// render with an empty list.
	pub fn to_cp_string(&self) -> String {
		CpForm(self).to_string()
	}

	/// Column predicate debug form.
	pub fn to_cp_db_string(&self) -> String {
		format!(
			"((ColumnPredicate: {} {}) (system: {}) (type: {}) (varLen: {}) (fArgList: {})",
			self.id,
			self.name,
			self.system,
			self.matrix_type().unwrap_or_default(),
			self.var_len,
			db_list(self.cp_args().unwrap_or_default())
		)
	}
}
