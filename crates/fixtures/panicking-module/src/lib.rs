//! Native module whose constructor always panics.

use polyload_sdk::{Query, QueryError, QueryPlugin, QueryResult, export_plugin};

struct Fragile;

impl Fragile {
    fn new() -> Self {
        panic!("constructor exploded in module");
    }
}

impl QueryPlugin for Fragile {
    fn query(&mut self, _query: &Query) -> Result<Vec<QueryResult>, QueryError> {
        Ok(Vec::new())
    }
}

export_plugin!(|| Box::new(Fragile::new()) as Box<dyn QueryPlugin>);
