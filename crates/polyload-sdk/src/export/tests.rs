//! Tests for the registration protocol.

use rstest::rstest;

use super::*;

struct Fixed;

impl QueryPlugin for Fixed {
    fn query(&mut self, _query: &Query) -> Result<Vec<QueryResult>, QueryError> {
        Ok(vec![QueryResult::new("fixed")])
    }
}

struct Exploding;

impl QueryPlugin for Exploding {
    fn query(&mut self, query: &Query) -> Result<Vec<QueryResult>, QueryError> {
        panic!("cannot answer {}", query.text());
    }
}

#[test]
fn closure_factories_create_instances() {
    let export = PluginExport::new(|| Box::new(Fixed) as Box<dyn QueryPlugin>);
    assert!(export.is_instantiated());

    let mut plugin = export.into_instance().expect("instance");
    let results = plugin.query(&Query::new("anything")).expect("query");
    assert_eq!(results, vec![QueryResult::new("fixed")]);
}

#[rstest]
#[case::static_str(PluginExport::capture(|| panic!("constructor exploded")), "constructor exploded")]
#[case::formatted(
    PluginExport::capture(|| panic!("missing {}", "config.toml")),
    "missing config.toml"
)]
#[case::other_payload(
    PluginExport::capture(|| std::panic::panic_any(7_u8)),
    "plugin panicked with a non-string payload"
)]
fn constructor_panics_become_messages(#[case] export: PluginExport, #[case] expected: &str) {
    assert!(!export.is_instantiated());
    let message = export.into_instance().err().expect("constructor failed");
    assert_eq!(message, expected);
}

#[test]
fn query_panics_are_reported_as_errors() {
    let mut plugin = PluginExport::capture(|| Box::new(Exploding))
        .into_instance()
        .expect("instance");

    let err = plugin.query(&Query::new("2+2")).expect_err("query panicked");
    assert!(
        matches!(err, QueryError::Panicked { ref message } if message == "cannot answer 2+2"),
        "unexpected error: {err}"
    );
}

#[test]
fn entry_symbol_is_stable() {
    assert_eq!(ENTRY_SYMBOL, "polyload_plugin_entrypoint");
}
