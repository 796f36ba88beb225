//! Native module that echoes each query back as a single result.
//!
//! The query text `panic` makes the instance panic instead of answering.

use polyload_sdk::{Query, QueryError, QueryPlugin, QueryResult, export_plugin};

struct Echo {
    answered: i32,
}

impl QueryPlugin for Echo {
    fn query(&mut self, query: &Query) -> Result<Vec<QueryResult>, QueryError> {
        if query.search() == "panic" {
            explode();
        }
        self.answered += 1;
        Ok(vec![
            QueryResult::new(query.search())
                .with_subtitle("echo module")
                .with_score(self.answered),
        ])
    }
}

fn explode() -> ! {
    panic!("echo module asked to panic");
}

export_plugin!(|| Box::new(Echo { answered: 0 }) as Box<dyn QueryPlugin>);
