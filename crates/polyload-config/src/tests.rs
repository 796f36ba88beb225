//! Unit tests for configuration accessors.

use rstest::rstest;

use super::*;

#[test]
fn default_has_no_interpreter_directory() {
    let config = Config::default();
    assert!(config.interpreter_directory().is_none());
    assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
    assert_eq!(config.log_format(), LogFormat::Json);
}

#[rstest]
#[case::empty("")]
#[case::blank("   ")]
fn blank_interpreter_directory_is_unset(#[case] value: &str) {
    let config = Config {
        interpreter_directory: Some(Utf8PathBuf::from(value)),
        ..Config::default()
    };
    assert!(config.interpreter_directory().is_none());
}

#[test]
fn interpreter_directory_passes_through() {
    let config = Config {
        interpreter_directory: Some(Utf8PathBuf::from("/opt/python")),
        ..Config::default()
    };
    assert_eq!(
        config.interpreter_directory(),
        Some(Utf8Path::new("/opt/python"))
    );
}
