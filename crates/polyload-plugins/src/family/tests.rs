//! Unit tests for the language classifier.

use rstest::rstest;

use super::*;

#[rstest]
#[case::rust("rust", Family::Native)]
#[case::native_upper("NATIVE", Family::Native)]
#[case::cdylib("cdylib", Family::Native)]
#[case::python("python", Family::Interpreted)]
#[case::python_mixed("PyThOn", Family::Interpreted)]
#[case::executable("Executable", Family::Executable)]
#[case::padded("  python ", Family::Interpreted)]
#[case::unknown("typescript", Family::Unrecognized)]
#[case::empty("", Family::Unrecognized)]
fn classifies_tags(#[case] tag: &str, #[case] expected: Family) {
    assert_eq!(classify(tag), expected);
}

#[test]
fn classification_is_independent_of_call_order() {
    let tags = ["python", "rust", "executable", "lua", "python"];
    let forward: Vec<Family> = tags.iter().map(|tag| classify(tag)).collect();
    let backward: Vec<Family> = tags.iter().rev().map(|tag| classify(tag)).collect();
    let reversed: Vec<Family> = backward.into_iter().rev().collect();
    assert_eq!(forward, reversed);
}

#[rstest]
#[case(Family::Native, "native")]
#[case(Family::Interpreted, "interpreted")]
#[case(Family::Executable, "executable")]
#[case(Family::Unrecognized, "unrecognized")]
fn display_matches_as_str(#[case] family: Family, #[case] expected: &str) {
    assert_eq!(family.to_string(), expected);
}

#[test]
fn only_unrecognized_is_unrecognized() {
    assert!(Family::Native.is_recognized());
    assert!(!Family::Unrecognized.is_recognized());
}
