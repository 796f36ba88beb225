//! Checks the entry point generated by `export_plugin!`.

use polyload_sdk::{
    ENTRY_SYMBOL, PluginEntry, Query, QueryError, QueryPlugin, QueryResult, export_plugin,
};

struct Counter {
    calls: i32,
}

impl QueryPlugin for Counter {
    fn query(&mut self, query: &Query) -> Result<Vec<QueryResult>, QueryError> {
        if query.search().is_empty() {
            return Err(QueryError::rejected("empty query"));
        }
        self.calls += 1;
        Ok(vec![QueryResult::new(query.search()).with_score(self.calls)])
    }
}

export_plugin!(|| Box::new(Counter { calls: 0 }) as Box<dyn QueryPlugin>);

#[test]
fn generated_entry_point_matches_the_published_signature() {
    let entry: PluginEntry = polyload_plugin_entrypoint;
    // SAFETY: the function was generated in this crate with the declared
    // signature.
    let export = unsafe { entry() };

    let mut plugin = export.into_instance().expect("constructor succeeds");
    let results = plugin
        .query(&Query::new("calc 1+1").with_action_keyword("calc"))
        .expect("non-empty query");

    assert_eq!(results.first().map(QueryResult::title), Some("1+1"));
    assert_eq!(results.first().map(QueryResult::score), Some(1));
}

#[test]
fn every_entry_call_yields_a_fresh_instance() {
    let mut first = polyload_plugin_entrypoint().into_instance().expect("first");
    let mut second = polyload_plugin_entrypoint().into_instance().expect("second");
    first.query(&Query::new("a")).expect("first query");
    first.query(&Query::new("b")).expect("second query");
    let results = second.query(&Query::new("c")).expect("fresh instance");

    assert_eq!(results.first().map(QueryResult::score), Some(1));
}

#[test]
fn entry_symbol_names_the_generated_function() {
    assert_eq!(ENTRY_SYMBOL, "polyload_plugin_entrypoint");
}

#[test]
fn plugins_can_reject_queries() {
    let mut plugin = polyload_plugin_entrypoint()
        .into_instance()
        .expect("constructor succeeds");
    let err = plugin.query(&Query::new("")).expect_err("empty query is rejected");
    assert!(matches!(err, QueryError::Rejected { .. }));
}
