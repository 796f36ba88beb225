//! Orchestration of a complete loading pass.
//!
//! A pass resolves the interpreter, then loads the native, interpreted, and
//! executable families in that order. The merged output keeps that family
//! order and, within each family, the catalog order. Nothing in a pass
//! returns an error: every failure degrades to fewer plugins.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::builder::{build_executable, build_interpreted};
use crate::descriptor::PluginDescriptor;
use crate::interpreter::{Environment, InterpreterResolver, SystemEnvironment};
use crate::native::{LibraryModuleLoader, ModuleLoader, NativeModuleLoader};
use crate::notify::{ChannelNotifier, Notifier};
use crate::pair::PluginPair;

/// Tracing target for loading passes.
const LOADER_TARGET: &str = "polyload_plugins::loader";

/// Host settings consulted by a loading pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderSettings {
    interpreter_directory: Option<PathBuf>,
}

impl LoaderSettings {
    /// Creates settings with no configured interpreter directory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            interpreter_directory: None,
        }
    }

    /// Sets the directory expected to contain the interpreter executable.
    #[must_use]
    pub fn with_interpreter_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.interpreter_directory = Some(directory.into());
        self
    }

    /// Returns the configured interpreter directory.
    #[must_use]
    pub fn interpreter_directory(&self) -> Option<&Path> {
        self.interpreter_directory.as_deref()
    }
}

/// Everything a loading pass produced.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Loaded plugins: native first, then interpreted, then executable.
    pub plugins: Vec<PluginPair>,
    /// Names of native plugins that failed to load.
    pub failures: Vec<String>,
    /// Interpreter every script plugin in this pass is bound to.
    pub interpreter: Option<PathBuf>,
}

/// Loads a plugin catalog across all three families.
///
/// # Example
///
/// ```
/// use polyload_plugins::{
///     ChannelNotifier, LoaderSettings, PluginDescriptor, PluginLoader,
/// };
///
/// let (notifier, _notifications) = ChannelNotifier::unbounded();
/// let loader = PluginLoader::with_notifier(notifier);
/// let mut catalog = vec![PluginDescriptor::new("ping", "executable", "/bin/ping-plugin")];
///
/// let outcome = loader.load_all(&mut catalog, &LoaderSettings::new());
///
/// assert_eq!(outcome.plugins.len(), 1);
/// assert!(outcome.failures.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct PluginLoader<M = LibraryModuleLoader, E = SystemEnvironment, N = ChannelNotifier> {
    native: NativeModuleLoader<M>,
    resolver: InterpreterResolver<E>,
    notifier: N,
}

impl<N> PluginLoader<LibraryModuleLoader, SystemEnvironment, N> {
    /// Creates a loader backed by the real filesystem and environment.
    #[must_use]
    pub const fn with_notifier(notifier: N) -> Self {
        Self::new(LibraryModuleLoader, SystemEnvironment, notifier)
    }
}

impl<M, E, N> PluginLoader<M, E, N> {
    /// Creates a loader from explicit collaborators.
    #[must_use]
    pub const fn new(modules: M, environment: E, notifier: N) -> Self {
        Self {
            native: NativeModuleLoader::new(modules),
            resolver: InterpreterResolver::new(environment),
            notifier,
        }
    }
}

impl<M, E, N> PluginLoader<M, E, N>
where
    M: ModuleLoader,
    E: Environment,
    N: Notifier,
{
    /// Runs one loading pass over `descriptors`.
    ///
    /// Native descriptors that load successfully have their initialisation
    /// time updated in place. Descriptors with an unrecognised language tag
    /// are skipped without a log entry.
    #[must_use]
    pub fn load_all(
        &self,
        descriptors: &mut [PluginDescriptor],
        settings: &LoaderSettings,
    ) -> LoadOutcome {
        let interpreter = self.resolver.resolve(settings.interpreter_directory());

        let native = self.native.load(descriptors, &self.notifier);
        let interpreted = build_interpreted(descriptors, interpreter.as_deref());
        let executable = build_executable(descriptors);

        info!(
            target: LOADER_TARGET,
            native = native.pairs.len(),
            native_failed = native.failures.len(),
            interpreted = interpreted.len(),
            executable = executable.len(),
            "plugin loading pass complete"
        );

        let mut plugins = native.pairs;
        plugins.extend(interpreted);
        plugins.extend(executable);

        LoadOutcome {
            plugins,
            failures: native.failures,
            interpreter,
        }
    }
}
