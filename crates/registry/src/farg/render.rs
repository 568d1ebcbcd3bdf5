use std::fmt;

use super::{FargKind, FormalArg};

impl FormalArg {
	/// Debug form exposing the ID and every constraint, e.g.
	/// `(IntFormalArg 5 <ord> false -9223372036854775808 9223372036854775807)`.
	pub fn to_db_string(&self) -> String {
		DbForm(self).to_string()
	}
}

struct DbForm<'a>(&'a FormalArg);

impl fmt::Display for DbForm<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let fa = self.0;
		write!(f, "({} {} {}", fa.ty().db_label(), fa.id(), fa.name())?;
		let sub_range = fa.sub_range();
		match fa.kind() {
			FargKind::Untyped | FargKind::ColPredicate | FargKind::QuoteString | FargKind::Text => {}
			FargKind::Integer { min, max } => write!(f, " {sub_range} {min} {max}")?,
			FargKind::Float { min, max } => {
				write!(f, " {sub_range} {} {}", render_double(*min), render_double(*max))?;
			}
			FargKind::TimeStamp { range: Some((min, max)) } => {
				write!(f, " {sub_range} {} {}", min.to_db_string(), max.to_db_string())?;
			}
			FargKind::TimeStamp { range: None } => write!(f, " {sub_range} null null")?,
			FargKind::Nominal { approved } => {
				write!(f, " {sub_range} ")?;
				write_list(f, approved.iter().flatten())?;
			}
			FargKind::Predicate { approved } => {
				write!(f, " {sub_range} ")?;
				write_list(f, approved.iter().flatten())?;
			}
		}
		f.write_str(")")
	}
}

/// Writes `(a, b, c)`.
fn write_list<I>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
	I: IntoIterator,
	I::Item: fmt::Display,
{
	f.write_str("(")?;
	for (i, item) in items.into_iter().enumerate() {
		if i > 0 {
			f.write_str(", ")?;
		}
		write!(f, "{item}")?;
	}
	f.write_str(")")
}

/// Renders a double the way the recorded debug forms print it.
///
/// Magnitudes in `[1e-3, 1e7)` (and zero) use plain decimal notation, the
/// rest use an upper-case exponent. The mantissa always carries at least one
/// fractional digit.
pub(super) fn render_double(value: f64) -> String {
	if value.is_nan() {
		return "NaN".to_owned();
	}
	if value.is_infinite() {
		return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
	}
	let magnitude = value.abs();
	if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
		return format!("{value:?}");
	}
	let sci = format!("{value:e}");
	match sci.split_once('e') {
		Some((mantissa, exp)) if mantissa.contains('.') => format!("{mantissa}E{exp}"),
		Some((mantissa, exp)) => format!("{mantissa}.0E{exp}"),
		None => sci,
	}
}
