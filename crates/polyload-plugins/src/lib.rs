//! Heterogeneous plugin loading for `polyload` hosts.
//!
//! The `polyload-plugins` crate turns a catalog of [`PluginDescriptor`]s into
//! a uniform collection of [`PluginPair`]s, whatever execution model each
//! plugin uses:
//!
//! - **native** plugins are dynamic libraries opened in-process. Each module
//!   exports the `polyload_plugin_entrypoint` symbol declared by
//!   [`polyload_sdk::export_plugin!`].
//! - **interpreted** plugins are scripts run by an external interpreter,
//!   located once per pass by the [`InterpreterResolver`].
//! - **executable** plugins are standalone programs.
//!
//! Interpreted and executable plugins are both driven through a
//! [`ProcessPlugin`], which speaks a single-line JSONL protocol over the
//! child's standard I/O.
//!
//! A loading pass never fails as a whole. Native failures are isolated per
//! descriptor and reported once through a [`Notifier`]; a missing interpreter
//! only removes the script plugins; unknown language tags are skipped.
//!
//! # Example
//!
//! ```rust,no_run
//! use polyload_plugins::{ChannelNotifier, LoaderSettings, PluginCatalog, PluginLoader};
//! use std::path::Path;
//!
//! let catalog = PluginCatalog::from_path(Path::new("plugins.json")).expect("catalog");
//! let mut descriptors = catalog.into_descriptors();
//!
//! let (notifier, notifications) = ChannelNotifier::unbounded();
//! let loader = PluginLoader::with_notifier(notifier);
//! let outcome = loader.load_all(&mut descriptors, &LoaderSettings::new());
//!
//! for notification in notifications.try_iter() {
//!     // Hand the message to the UI layer.
//!     let _ = notification.to_string();
//! }
//! assert!(outcome.plugins.len() <= descriptors.len());
//! ```

pub mod builder;
pub mod descriptor;
pub mod error;
pub mod family;
pub mod interpreter;
pub mod loader;
pub mod native;
pub mod notify;
pub mod pair;
pub mod proxy;

#[cfg(test)]
mod tests;

pub use self::descriptor::{PluginCatalog, PluginDescriptor};
pub use self::error::PluginError;
pub use self::family::{Family, classify};
pub use self::interpreter::{Environment, InterpreterResolver, SystemEnvironment};
pub use self::loader::{LoadOutcome, LoaderSettings, PluginLoader};
pub use self::native::{LibraryModuleLoader, LoadedModule, ModuleLoader, NativePlugin};
pub use self::notify::{ChannelNotifier, LoadNotification, Notifier};
pub use self::pair::{PluginHandle, PluginPair};
pub use self::proxy::ProcessPlugin;
pub use self::proxy::protocol::{ProxyRequest, ProxyResponse};
