//! Native module registration protocol.
//!
//! A native module exports exactly one function named [`ENTRY_SYMBOL`] with
//! the [`PluginEntry`] signature. The host calls it once per load and takes
//! the single [`QueryPlugin`] instance it carries.
//!
//! A cdylib links its own copy of the standard library, so the host cannot
//! catch a panic raised inside the module. [`PluginExport::capture`] runs the
//! constructor under the module's own `catch_unwind` and hands the host a
//! plain `Result` instead. The returned instance is wrapped the same way, so
//! a panic inside [`QueryPlugin::query`] surfaces as
//! [`QueryError::Panicked`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::{Query, QueryError, QueryPlugin, QueryResult};

/// Name of the symbol every native module must export.
pub const ENTRY_SYMBOL: &str = "polyload_plugin_entrypoint";

/// Signature of the exported entry point.
pub type PluginEntry = unsafe extern "Rust" fn() -> PluginExport;

/// Produces capability instances for a native module.
pub trait PluginFactory: Send + Sync {
    /// Instantiates the plugin.
    fn create(&self) -> Box<dyn QueryPlugin>;
}

impl<F> PluginFactory for F
where
    F: Fn() -> Box<dyn QueryPlugin> + Send + Sync,
{
    fn create(&self) -> Box<dyn QueryPlugin> {
        self()
    }
}

/// Value returned by a module's entry point.
///
/// Holds either the constructed instance or the text of the panic raised
/// while constructing it.
pub struct PluginExport {
    instance: Result<Box<dyn QueryPlugin>, String>,
}

impl PluginExport {
    /// Asks `factory` for one instance, capturing a panic as text.
    #[must_use]
    pub fn new(factory: impl PluginFactory) -> Self {
        Self::capture(|| factory.create())
    }

    /// Runs `build` in the calling module, capturing a panic as text.
    ///
    /// Must be called from code compiled into the module itself; the
    /// [`export_plugin!`](crate::export_plugin) macro does this.
    #[must_use]
    pub fn capture(build: impl FnOnce() -> Box<dyn QueryPlugin>) -> Self {
        let instance = panic::catch_unwind(AssertUnwindSafe(build))
            .map(|inner| Box::new(Guarded { inner }) as Box<dyn QueryPlugin>)
            .map_err(|payload| panic_message(payload.as_ref()));
        Self { instance }
    }

    /// Returns `true` when construction succeeded.
    #[must_use]
    pub const fn is_instantiated(&self) -> bool {
        self.instance.is_ok()
    }

    /// Consumes the export and yields the instance.
    ///
    /// # Errors
    ///
    /// Returns the panic message when the constructor panicked.
    pub fn into_instance(self) -> Result<Box<dyn QueryPlugin>, String> {
        self.instance
    }
}

impl std::fmt::Debug for PluginExport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginExport")
            .field("instantiated", &self.is_instantiated())
            .finish_non_exhaustive()
    }
}

/// Keeps panics raised by a plugin instance on the module's side.
struct Guarded {
    inner: Box<dyn QueryPlugin>,
}

impl QueryPlugin for Guarded {
    fn query(&mut self, query: &Query) -> Result<Vec<QueryResult>, QueryError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.inner.query(query))).unwrap_or_else(
            |payload| {
                Err(QueryError::Panicked {
                    message: panic_message(payload.as_ref()),
                })
            },
        )
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| String::from("plugin panicked with a non-string payload"))
}

#[cfg(test)]
mod tests;
