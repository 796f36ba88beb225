//! Proxy builders for the interpreted and executable families.
//!
//! Neither builder can fail per descriptor. Spawn and communication problems
//! surface on the first query through the proxy.

use std::path::Path;

use tracing::debug;

use crate::descriptor::PluginDescriptor;
use crate::family::Family;
use crate::pair::{PluginHandle, PluginPair};
use crate::proxy::ProcessPlugin;

/// Tracing target for proxy construction.
const BUILDER_TARGET: &str = "polyload_plugins::builder";

/// Binds every interpreted descriptor to `interpreter`.
///
/// Returns an empty collection when no interpreter was resolved. That
/// condition was already logged by the resolver.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use polyload_plugins::{PluginDescriptor, builder::build_interpreted};
///
/// let descriptors = [PluginDescriptor::new("notes", "python", "main.py")];
///
/// assert!(build_interpreted(&descriptors, None).is_empty());
/// assert_eq!(build_interpreted(&descriptors, Some(Path::new("python3"))).len(), 1);
/// ```
#[must_use]
pub fn build_interpreted(
    descriptors: &[PluginDescriptor],
    interpreter: Option<&Path>,
) -> Vec<PluginPair> {
    let Some(interpreter) = interpreter else {
        return Vec::new();
    };

    of_family(descriptors, Family::Interpreted)
        .map(|descriptor| {
            debug!(
                target: BUILDER_TARGET,
                plugin = descriptor.name(),
                interpreter = %interpreter.display(),
                "binding script plugin to interpreter"
            );
            PluginPair::new(
                descriptor.clone(),
                PluginHandle::Process(ProcessPlugin::interpreted(descriptor, interpreter)),
            )
        })
        .collect()
}

/// Binds every executable descriptor to its own entry point.
#[must_use]
pub fn build_executable(descriptors: &[PluginDescriptor]) -> Vec<PluginPair> {
    of_family(descriptors, Family::Executable)
        .map(|descriptor| {
            debug!(
                target: BUILDER_TARGET,
                plugin = descriptor.name(),
                program = %descriptor.entry_path().display(),
                "binding executable plugin"
            );
            PluginPair::new(
                descriptor.clone(),
                PluginHandle::Process(ProcessPlugin::executable(descriptor)),
            )
        })
        .collect()
}

fn of_family(
    descriptors: &[PluginDescriptor],
    family: Family,
) -> impl Iterator<Item = &PluginDescriptor> {
    descriptors
        .iter()
        .filter(move |descriptor| descriptor.family() == family)
}
