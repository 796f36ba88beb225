//! In-process loading of native plugin modules.
//!
//! Each native descriptor is loaded independently: the module is opened, its
//! exported entry point is resolved and called, and the instance it built is
//! taken. A constructor panic never unwinds into the host; the entry point
//! generated by `export_plugin!` catches it inside the module and hands back
//! the message. A failure at any step is logged, recorded by name, and the
//! batch moves on. Once the batch is done a single aggregated
//! notification lists every failed plugin.
//!
//! Loading is sequential. Opening a library mutates process-wide loader state
//! and runs third-party initialisers; there is no timeout on a module that
//! stalls during instantiation.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use libloading::Library;
use polyload_sdk::{
    ENTRY_SYMBOL, PluginEntry, PluginExport, Query, QueryError, QueryPlugin, QueryResult,
};
use tracing::{debug, error, info};

use crate::descriptor::PluginDescriptor;
use crate::error::PluginError;
use crate::family::Family;
use crate::notify::{LoadNotification, Notifier};
use crate::pair::{PluginHandle, PluginPair};

/// Tracing target for native module loading.
const NATIVE_TARGET: &str = "polyload_plugins::native";

/// Opens native modules and resolves their entry point.
///
/// The production implementation is [`LibraryModuleLoader`]. Tests inject
/// in-process entry points through [`LoadedModule::from_entry`].
pub trait ModuleLoader {
    /// Opens the module at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::ModuleLoad`] when the module cannot be opened
    /// and [`PluginError::MissingEntryPoint`] when it does not export
    /// [`ENTRY_SYMBOL`].
    fn open(&self, path: &Path) -> Result<LoadedModule, PluginError>;
}

impl<T: ModuleLoader + ?Sized> ModuleLoader for &T {
    fn open(&self, path: &Path) -> Result<LoadedModule, PluginError> {
        (**self).open(path)
    }
}

/// An opened module whose entry point has not been called yet.
pub struct LoadedModule {
    entry: Box<dyn Fn() -> PluginExport>,
    library: Option<Arc<Library>>,
}

impl LoadedModule {
    /// Wraps an entry point that lives in the host binary.
    #[must_use]
    pub fn from_entry(entry: impl Fn() -> PluginExport + 'static) -> Self {
        Self {
            entry: Box::new(entry),
            library: None,
        }
    }

    fn from_library(library: Library, entry: PluginEntry) -> Self {
        Self {
            // SAFETY: `entry` points into `library`, which this value owns
            // and keeps alive for as long as the closure can be called.
            entry: Box::new(move || unsafe { entry() }),
            library: Some(Arc::new(library)),
        }
    }

    /// Calls the entry point and takes the instance it built.
    ///
    /// A constructor panic is caught inside the module and arrives here as
    /// the panic message.
    fn instantiate(self) -> Result<NativePlugin, String> {
        let Self { entry, library } = self;
        entry()
            .into_instance()
            .map(|instance| NativePlugin { instance, library })
    }
}

impl std::fmt::Debug for LoadedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModule")
            .field("dynamic", &self.library.is_some())
            .finish_non_exhaustive()
    }
}

/// Opens modules from disk with `libloading`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibraryModuleLoader;

impl ModuleLoader for LibraryModuleLoader {
    fn open(&self, path: &Path) -> Result<LoadedModule, PluginError> {
        // SAFETY: opening a library runs its initialisers. Descriptors come
        // from the host's trusted plugin catalog.
        let library = unsafe { Library::new(path) }.map_err(|err| PluginError::ModuleLoad {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

        // SAFETY: `export_plugin!` declares the symbol with exactly the
        // `PluginEntry` signature. The function pointer is copied out and kept
        // alongside the library that owns it.
        let entry: PluginEntry = unsafe { library.get::<PluginEntry>(ENTRY_SYMBOL.as_bytes()) }
            .map(|symbol| *symbol)
            .map_err(|err| PluginError::MissingEntryPoint {
                path: path.to_path_buf(),
                symbol: ENTRY_SYMBOL,
                message: err.to_string(),
            })?;

        Ok(LoadedModule::from_library(library, entry))
    }
}

/// A plugin instance living inside the host process.
///
/// The instance is dropped before the library that contains its code.
pub struct NativePlugin {
    instance: Box<dyn QueryPlugin>,
    library: Option<Arc<Library>>,
}

impl NativePlugin {
    /// Returns `true` when the instance came from a dynamically opened module.
    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        self.library.is_some()
    }
}

impl QueryPlugin for NativePlugin {
    fn query(&mut self, query: &Query) -> Result<Vec<QueryResult>, QueryError> {
        self.instance.query(query)
    }
}

impl std::fmt::Debug for NativePlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativePlugin")
            .field("dynamic", &self.is_dynamic())
            .finish_non_exhaustive()
    }
}

/// Result of loading every native descriptor in a catalog.
#[derive(Debug, Default)]
pub struct NativeBatch {
    /// Successfully loaded plugins, in catalog order.
    pub pairs: Vec<PluginPair>,
    /// Names of descriptors that failed, in catalog order.
    pub failures: Vec<String>,
}

/// Loads the native family of a catalog.
#[derive(Debug, Default, Clone)]
pub struct NativeModuleLoader<M = LibraryModuleLoader> {
    modules: M,
}

impl<M> NativeModuleLoader<M> {
    /// Creates a loader that opens modules through `modules`.
    #[must_use]
    pub const fn new(modules: M) -> Self {
        Self { modules }
    }
}

impl<M: ModuleLoader> NativeModuleLoader<M> {
    /// Loads every native descriptor, isolating failures per descriptor.
    ///
    /// Successful loads add their elapsed time to the descriptor's timing
    /// field. When any descriptor fails, exactly one
    /// [`LoadNotification::NativePluginsFailed`] is sent to `notifier` after
    /// the batch completes.
    #[must_use]
    pub fn load(
        &self,
        descriptors: &mut [PluginDescriptor],
        notifier: &dyn Notifier,
    ) -> NativeBatch {
        let mut batch = NativeBatch::default();

        for descriptor in descriptors
            .iter_mut()
            .filter(|descriptor| descriptor.family() == Family::Native)
        {
            let started = Instant::now();
            match self.load_one(descriptor) {
                Ok(plugin) => {
                    let elapsed = started.elapsed();
                    descriptor.record_init_time(elapsed);
                    debug!(
                        target: NATIVE_TARGET,
                        plugin = descriptor.name(),
                        elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                        "native plugin loaded"
                    );
                    batch.pairs.push(PluginPair::new(
                        descriptor.clone(),
                        PluginHandle::Native(plugin),
                    ));
                }
                Err(err) => {
                    error!(
                        target: NATIVE_TARGET,
                        plugin = descriptor.name(),
                        path = %descriptor.entry_path().display(),
                        error = %err,
                        "failed to load native plugin"
                    );
                    batch.failures.push(descriptor.name().to_owned());
                }
            }
        }

        if !batch.failures.is_empty() {
            info!(
                target: NATIVE_TARGET,
                failed = batch.failures.len(),
                "notifying user about failed native plugins"
            );
            notifier.notify(LoadNotification::NativePluginsFailed {
                names: batch.failures.clone(),
            });
        }

        batch
    }

    fn load_one(&self, descriptor: &PluginDescriptor) -> Result<NativePlugin, PluginError> {
        let path = descriptor.entry_path();
        debug!(
            target: NATIVE_TARGET,
            plugin = descriptor.name(),
            path = %path.display(),
            "opening native module"
        );
        let module = self.modules.open(&path)?;
        module
            .instantiate()
            .map_err(|message| PluginError::Instantiation {
                name: descriptor.name().to_owned(),
                message,
            })
    }
}
