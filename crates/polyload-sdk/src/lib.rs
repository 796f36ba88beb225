//! Capability contract shared by the polyload host and its plugins.
//!
//! Every plugin, whatever its execution family, is driven through the single
//! [`QueryPlugin`] entry point. Native modules compiled against this crate
//! publish a [`PluginFactory`] through the [`export_plugin!`] macro; the host
//! resolves the exported [`ENTRY_SYMBOL`] at load time and receives one
//! instance, or the message of the panic that prevented its construction.
//!
//! # Example
//!
//! ```
//! use polyload_sdk::{Query, QueryError, QueryPlugin, QueryResult};
//!
//! struct Echo;
//!
//! impl QueryPlugin for Echo {
//!     fn query(&mut self, query: &Query) -> Result<Vec<QueryResult>, QueryError> {
//!         Ok(vec![QueryResult::new(query.text())])
//!     }
//! }
//!
//! let mut plugin = Echo;
//! let results = plugin.query(&Query::new("hello")).expect("echo never fails");
//! assert_eq!(results.first().map(QueryResult::title), Some("hello"));
//! ```

pub mod error;
pub mod export;
pub mod query;

pub use self::error::QueryError;
pub use self::export::{ENTRY_SYMBOL, PluginEntry, PluginExport, PluginFactory};
pub use self::query::{Query, QueryResult};

/// The capability every loaded plugin exposes to the host.
///
/// Native plugins implement it directly inside the host process. Script and
/// executable plugins are represented by host-side proxies that forward each
/// call to a child process.
pub trait QueryPlugin: Send {
    /// Answers a single query.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Rejected`] when the plugin declines the query and
    /// [`QueryError::Unavailable`] when the plugin cannot be reached.
    /// Implementations should not panic; native instances report a panic as
    /// [`QueryError::Panicked`].
    fn query(&mut self, query: &Query) -> Result<Vec<QueryResult>, QueryError>;
}

impl<T: QueryPlugin + ?Sized> QueryPlugin for Box<T> {
    fn query(&mut self, query: &Query) -> Result<Vec<QueryResult>, QueryError> {
        (**self).query(query)
    }
}

/// Declares the entry point of a native plugin module.
///
/// The macro takes one expression evaluating to a [`PluginFactory`] and
/// exports an entry point under [`ENTRY_SYMBOL`] that builds one instance.
/// The factory runs under the module's own panic handler, so a panicking
/// constructor reaches the host as an error string. Modules must be built as
/// `cdylib` with the same toolchain as the host because the exported value
/// crosses the boundary with the Rust ABI.
///
/// # Example
///
/// ```ignore
/// use polyload_sdk::{export_plugin, QueryPlugin};
///
/// struct Calculator;
/// # impl QueryPlugin for Calculator {
/// #     fn query(&mut self, _: &polyload_sdk::Query)
/// #         -> Result<Vec<polyload_sdk::QueryResult>, polyload_sdk::QueryError> { Ok(vec![]) }
/// # }
///
/// export_plugin!(|| Box::new(Calculator) as Box<dyn QueryPlugin>);
/// ```
#[macro_export]
macro_rules! export_plugin {
    ($factory:expr $(,)?) => {
        /// Entry point resolved by the polyload host when the module is opened.
        #[unsafe(no_mangle)]
        pub extern "Rust" fn polyload_plugin_entrypoint() -> $crate::PluginExport {
            $crate::PluginExport::capture(|| $crate::PluginFactory::create(&$factory))
        }
    };
}
