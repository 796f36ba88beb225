//! Descriptor and capability handle pairs produced by a loading pass.

use polyload_sdk::{Query, QueryError, QueryPlugin, QueryResult};

use crate::descriptor::PluginDescriptor;
use crate::family::Family;
use crate::native::NativePlugin;
use crate::proxy::ProcessPlugin;

/// The capability behind a loaded plugin.
#[derive(Debug)]
pub enum PluginHandle {
    /// An instance living inside the host process.
    Native(NativePlugin),
    /// A child process spawned on demand.
    Process(ProcessPlugin),
}

impl PluginHandle {
    /// Returns the process proxy when the plugin runs out of process.
    #[must_use]
    pub const fn as_process(&self) -> Option<&ProcessPlugin> {
        match self {
            Self::Process(process) => Some(process),
            Self::Native(_) => None,
        }
    }

    /// Returns the in-process instance when the plugin is native.
    #[must_use]
    pub const fn as_native(&self) -> Option<&NativePlugin> {
        match self {
            Self::Native(native) => Some(native),
            Self::Process(_) => None,
        }
    }
}

impl QueryPlugin for PluginHandle {
    fn query(&mut self, query: &Query) -> Result<Vec<QueryResult>, QueryError> {
        match self {
            Self::Native(native) => native.query(query),
            Self::Process(process) => process.query(query),
        }
    }
}

/// A loaded plugin: its metadata plus the handle used to query it.
#[derive(Debug)]
pub struct PluginPair {
    descriptor: PluginDescriptor,
    handle: PluginHandle,
}

impl PluginPair {
    /// Pairs a descriptor with its handle.
    #[must_use]
    pub const fn new(descriptor: PluginDescriptor, handle: PluginHandle) -> Self {
        Self { descriptor, handle }
    }

    /// Returns the descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    /// Returns the family the plugin was loaded as.
    #[must_use]
    pub fn family(&self) -> Family {
        self.descriptor.family()
    }

    /// Returns the capability handle.
    #[must_use]
    pub const fn handle(&self) -> &PluginHandle {
        &self.handle
    }

    /// Returns the capability handle for querying.
    pub const fn handle_mut(&mut self) -> &mut PluginHandle {
        &mut self.handle
    }
}
