//! Plugin descriptors and the catalog they arrive in.
//!
//! A [`PluginDescriptor`] identifies one plugin: its name, declared language,
//! the path to its code, and a diagnostic timing field that the native loader
//! accumulates into. Descriptors are produced by the host's manifest layer;
//! [`PluginCatalog`] accepts them as a JSON document for hosts (and the CLI)
//! that keep the catalog on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PluginError;
use crate::family::{Family, classify};

/// Default timeout in seconds for process-backed plugin calls.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Metadata identifying one plugin to load.
///
/// # Example
///
/// ```
/// use polyload_plugins::{Family, PluginDescriptor};
///
/// let descriptor = PluginDescriptor::new("calc", "rust", "libcalc.so")
///     .with_plugin_directory("/plugins/calc");
///
/// assert_eq!(descriptor.family(), Family::Native);
/// assert_eq!(
///     descriptor.entry_path(),
///     std::path::PathBuf::from("/plugins/calc/libcalc.so")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    name: String,
    #[serde(default)]
    version: String,
    language: String,
    entry_point: PathBuf,
    #[serde(default)]
    plugin_directory: Option<PathBuf>,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    #[serde(skip)]
    init_time: Duration,
}

impl PluginDescriptor {
    /// Creates a descriptor with default timeout and no extra arguments.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        language: impl Into<String>,
        entry_point: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            language: language.into(),
            entry_point: entry_point.into(),
            plugin_directory: None,
            args: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            init_time: Duration::ZERO,
        }
    }

    /// Sets the plugin version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the directory relative entry points are resolved against.
    #[must_use]
    pub fn with_plugin_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.plugin_directory = Some(directory.into());
        self
    }

    /// Sets extra arguments passed to process-backed plugins.
    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Overrides the default timeout.
    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Validates the descriptor, returning an error if it is malformed.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Descriptor`] if the name or entry point is
    /// empty.
    pub fn validate(&self) -> Result<(), PluginError> {
        if self.name.trim().is_empty() {
            return Err(PluginError::Descriptor {
                message: String::from("plugin name must not be empty"),
            });
        }
        if self.entry_point.as_os_str().is_empty() {
            return Err(PluginError::Descriptor {
                message: format!("plugin '{}' has an empty entry point", self.name),
            });
        }
        Ok(())
    }

    /// Returns the plugin name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the plugin version.
    #[must_use]
    pub const fn version(&self) -> &str {
        self.version.as_str()
    }

    /// Returns the declared language tag.
    #[must_use]
    pub const fn language(&self) -> &str {
        self.language.as_str()
    }

    /// Returns the execution family derived from the language tag.
    #[must_use]
    pub fn family(&self) -> Family {
        classify(&self.language)
    }

    /// Returns the entry point as declared.
    #[must_use]
    pub fn entry_point(&self) -> &Path {
        &self.entry_point
    }

    /// Returns the plugin directory, if declared.
    #[must_use]
    pub fn plugin_directory(&self) -> Option<&Path> {
        self.plugin_directory.as_deref()
    }

    /// Returns the entry point, resolved against the plugin directory when it
    /// is relative.
    #[must_use]
    pub fn entry_path(&self) -> PathBuf {
        match &self.plugin_directory {
            Some(directory) if self.entry_point.is_relative() => {
                directory.join(&self.entry_point)
            }
            _ => self.entry_point.clone(),
        }
    }

    /// Returns the extra process arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the timeout in seconds.
    #[must_use]
    pub const fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Returns the accumulated initialisation time.
    #[must_use]
    pub const fn init_time(&self) -> Duration {
        self.init_time
    }

    /// Adds `elapsed` to the accumulated initialisation time.
    pub fn record_init_time(&mut self, elapsed: Duration) {
        self.init_time = self.init_time.saturating_add(elapsed);
    }
}

/// An ordered collection of descriptors read from JSON.
///
/// The document is either a bare array of descriptors or an object with a
/// `plugins` array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginCatalog {
    plugins: Vec<PluginDescriptor>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<PluginDescriptor>),
    Wrapped { plugins: Vec<PluginDescriptor> },
}

impl PluginCatalog {
    /// Parses and validates a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Catalog`] when the JSON is malformed and
    /// [`PluginError::Descriptor`] when an entry fails validation.
    pub fn from_json(json: &str) -> Result<Self, PluginError> {
        Self::parse(json, "<inline>")
    }

    /// Reads, parses and validates a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Catalog`] when the file cannot be read or
    /// parsed and [`PluginError::Descriptor`] when an entry fails validation.
    pub fn from_path(path: &Path) -> Result<Self, PluginError> {
        let label = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|err| PluginError::Catalog {
            path: label.clone(),
            message: err.to_string(),
        })?;
        Self::parse(&text, &label)
    }

    fn parse(json: &str, label: &str) -> Result<Self, PluginError> {
        let document: CatalogDocument =
            serde_json::from_str(json).map_err(|err| PluginError::Catalog {
                path: label.to_owned(),
                message: err.to_string(),
            })?;
        let plugins = match document {
            CatalogDocument::List(plugins) | CatalogDocument::Wrapped { plugins } => plugins,
        };
        for descriptor in &plugins {
            descriptor.validate()?;
        }
        Ok(Self { plugins })
    }

    /// Consumes the catalog and yields its descriptors.
    #[must_use]
    pub fn into_descriptors(self) -> Vec<PluginDescriptor> {
        self.plugins
    }

    /// Returns the number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` when the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl From<Vec<PluginDescriptor>> for PluginCatalog {
    fn from(plugins: Vec<PluginDescriptor>) -> Self {
        Self { plugins }
    }
}
