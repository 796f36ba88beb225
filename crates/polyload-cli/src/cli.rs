//! Command-line definition for the `polyload` binary.

use std::path::PathBuf;

use clap::Parser;

/// Loads a plugin catalog and reports which plugins came up.
#[derive(Parser, Debug)]
#[command(name = "polyload", version)]
pub(crate) struct Cli {
    /// JSON catalog of plugin descriptors.
    #[arg(long, value_name = "FILE")]
    pub(crate) catalog: PathBuf,
    /// Sends a query to the named plugin once loading completes.
    #[arg(long, num_args = 2, value_names = ["PLUGIN", "TEXT"])]
    pub(crate) query: Option<Vec<String>>,
    /// Action keyword attached to the query.
    #[arg(long, requires = "query", value_name = "KEYWORD")]
    pub(crate) action_keyword: Option<String>,
}

impl Cli {
    /// Returns the target plugin and query text, when a query was requested.
    pub(crate) fn query_target(&self) -> Option<(&str, &str)> {
        match self.query.as_deref() {
            Some([plugin, text]) => Some((plugin.as_str(), text.as_str())),
            _ => None,
        }
    }
}
