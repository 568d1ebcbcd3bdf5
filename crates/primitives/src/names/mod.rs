//! Name grammars.
//!
//! All names are built from printable ASCII ([`is_graphic`]) minus the
//! characters the textual forms use as delimiters: `(`, `)`, `<`, `>`, `,`
//! and `"`.
//!
//! | Grammar | Shape |
//! |---------|-------|
//! | formal argument | `<` + one or more name chars + `>` |
//! | predicate | one or more name chars |
//! | column (spreadsheet variable) | name chars and inner spaces |
//! | nominal | same as column |

#[cfg(test)]
mod tests;

/// Printable ASCII excluding space (`0x21..=0x7E`).
#[inline]
pub fn is_graphic(ch: char) -> bool {
	('\u{21}'..='\u{7E}').contains(&ch)
}

#[inline]
fn is_name_char(ch: char) -> bool {
	is_graphic(ch) && !matches!(ch, '(' | ')' | '<' | '>' | ',' | '"')
}

/// Formal argument names: `<name>` with a non-empty body of name chars.
pub fn is_valid_farg_name(name: &str) -> bool {
	name.len() > 2
		&& name
			.strip_prefix('<')
			.and_then(|rest| rest.strip_suffix('>'))
			.is_some_and(|body| body.chars().all(is_name_char))
}

/// Predicate names: one or more name chars.
pub fn is_valid_pred_name(name: &str) -> bool {
	!name.is_empty() && name.chars().all(is_name_char)
}

/// Column names: name chars and spaces, no leading or trailing space.
pub fn is_valid_svar_name(name: &str) -> bool {
	!name.is_empty()
		&& !name.starts_with(' ')
		&& !name.ends_with(' ')
		&& name.chars().all(|ch| ch == ' ' || is_name_char(ch))
}

/// Nominal values share the column name grammar.
pub fn is_valid_nominal(value: &str) -> bool {
	is_valid_svar_name(value)
}
