use proptest::prelude::*;
use rstest::rstest;

use super::*;

#[rstest]
#[case("<val>", true)]
#[case("<a>", true)]
#[case("<ord>", true)]
#[case("<>", false)]
#[case("<a b>", false)]
#[case("<a,b>", false)]
#[case("<<a>", false)]
#[case("val", false)]
#[case("<val", false)]
#[case("", false)]
fn test_farg_names(#[case] name: &str, #[case] valid: bool) {
	assert_eq!(is_valid_farg_name(name), valid, "{name:?}");
}

#[rstest]
#[case("p0", true)]
#[case("foo-bar_baz", true)]
#[case("p 0", false)]
#[case("p(0)", false)]
#[case("<p>", false)]
#[case("\"q\"", false)]
#[case("", false)]
fn test_pred_names(#[case] name: &str, #[case] valid: bool) {
	assert_eq!(is_valid_pred_name(name), valid, "{name:?}");
}

#[rstest]
#[case("m0", true)]
#[case("my column", true)]
#[case(" m0", false)]
#[case("m0 ", false)]
#[case("m\t0", false)]
#[case("m<0>", false)]
#[case("", false)]
fn test_svar_names(#[case] name: &str, #[case] valid: bool) {
	assert_eq!(is_valid_svar_name(name), valid, "{name:?}");
	assert_eq!(is_valid_nominal(name), valid, "{name:?}");
}

/// Non-ASCII characters are never graphic.
#[test]
fn test_non_ascii_rejected() {
	assert!(!is_graphic('é'));
	assert!(!is_valid_pred_name("café"));
	assert!(!is_valid_farg_name("<é>"));
}

proptest! {
	/// Every valid predicate name is a valid column name.
	#[test]
	fn prop_pred_names_are_svar_names(name in "[!-~]{1,12}") {
		if is_valid_pred_name(&name) {
			prop_assert!(is_valid_svar_name(&name));
		}
	}

	/// Wrapping a predicate name in angle brackets yields a formal argument name.
	#[test]
	fn prop_bracketed_pred_name_is_farg(name in "[a-zA-Z0-9_\\-]{1,12}") {
		prop_assert!(is_valid_pred_name(&name));
		let bracketed = format!("<{name}>");
		prop_assert!(is_valid_farg_name(&bracketed));
	}
}
