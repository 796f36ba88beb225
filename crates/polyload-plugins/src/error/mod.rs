//! Domain errors raised while loading and driving plugins.
//!
//! All errors use `thiserror`-derived enums with structured context so callers
//! can inspect the failure programmatically. I/O errors are wrapped in `Arc`
//! to satisfy the `result_large_err` Clippy lint. None of these errors escape
//! [`PluginLoader::load_all`](crate::PluginLoader::load_all); they end up in
//! the log and, for native modules, in the aggregated failure report.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors arising from plugin loading and process proxying.
#[derive(Debug, Error)]
pub enum PluginError {
    /// A descriptor or catalog failed validation.
    #[error("descriptor error: {message}")]
    Descriptor {
        /// Description of the validation failure.
        message: String,
    },

    /// The plugin catalog could not be read or parsed.
    #[error("failed to read plugin catalog {path}: {message}")]
    Catalog {
        /// Catalog location, or `<inline>` for in-memory catalogs.
        path: String,
        /// Human-readable failure description.
        message: String,
    },

    /// The native module could not be opened.
    #[error("failed to load native module '{}': {message}", path.display())]
    ModuleLoad {
        /// Module path that was opened.
        path: PathBuf,
        /// Loader diagnostic.
        message: String,
    },

    /// The native module does not export the plugin entry point.
    #[error("native module '{}' does not export '{symbol}': {message}", path.display())]
    MissingEntryPoint {
        /// Module path that was inspected.
        path: PathBuf,
        /// Symbol that was looked up.
        symbol: &'static str,
        /// Loader diagnostic.
        message: String,
    },

    /// The native module panicked while producing its plugin instance.
    #[error("plugin '{name}' failed to instantiate: {message}")]
    Instantiation {
        /// Plugin name.
        name: String,
        /// Panic payload rendered as text.
        message: String,
    },

    /// The interpreter is missing from the configured directory.
    #[error("interpreter not found at configured location '{}'", path.display())]
    InterpreterNotFound {
        /// Candidate interpreter path that was checked.
        path: PathBuf,
    },

    /// The search path environment variable is not set.
    #[error("search path variable '{variable}' is not available")]
    SearchPathUnset {
        /// Name of the variable that was read.
        variable: &'static str,
    },

    /// No search path segment looks like an interpreter installation.
    #[error("no '{family}' interpreter found on the search path")]
    InterpreterNotOnSearchPath {
        /// Interpreter family name that was searched for.
        family: &'static str,
    },

    /// The plugin process could not be spawned.
    #[error("plugin '{name}' failed to start: {message}")]
    SpawnFailed {
        /// Plugin name.
        name: String,
        /// Human-readable failure description.
        message: String,
        /// Optional underlying I/O error.
        #[source]
        source: Option<Arc<std::io::Error>>,
    },

    /// The plugin did not complete within the configured timeout.
    #[error("plugin '{name}' timed out after {timeout_secs}s")]
    Timeout {
        /// Plugin name.
        name: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },

    /// The plugin exited with a non-zero status code.
    #[error("plugin '{name}' exited with non-zero status {status}")]
    NonZeroExit {
        /// Plugin name.
        name: String,
        /// Process exit status.
        status: i32,
    },

    /// The proxy request could not be serialised to JSON.
    #[error("failed to serialise plugin request: {0}")]
    SerializeRequest(#[source] serde_json::Error),

    /// The plugin response could not be deserialised from JSON.
    #[error("failed to deserialise plugin response: {message}")]
    DeserializeResponse {
        /// Human-readable description of the parse failure.
        message: String,
        /// Optional underlying JSON error.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The plugin produced output that does not conform to the protocol.
    #[error("plugin '{name}' wrote invalid output: {message}")]
    InvalidOutput {
        /// Plugin name.
        name: String,
        /// Description of the protocol violation.
        message: String,
    },

    /// An I/O error occurred while communicating with the plugin process.
    #[error("I/O error communicating with plugin '{name}': {source}")]
    Io {
        /// Plugin name.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
}
