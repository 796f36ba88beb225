//! Script interpreter discovery.
//!
//! The interpreter is looked up once per loading pass. A configured directory
//! takes precedence and must contain the interpreter executable. Without one,
//! the search path is scanned for a segment whose lower-cased text mentions the
//! interpreter family; a hit resolves to the bare executable name and leaves
//! the final lookup to the OS at spawn time.
//!
//! The search-path check does not confirm that the executable exists in the
//! matching segment. A directory such as `/home/me/python-notes` therefore
//! counts as a match. This is a known weak heuristic and is kept as is.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::error::PluginError;

/// Tracing target for interpreter resolution.
const INTERPRETER_TARGET: &str = "polyload_plugins::interpreter";

/// Interpreter family name searched for on the search path.
pub const INTERPRETER_FAMILY: &str = "python";

/// File name of the interpreter executable.
#[cfg(windows)]
pub const INTERPRETER_EXECUTABLE: &str = "python.exe";

/// File name of the interpreter executable.
#[cfg(not(windows))]
pub const INTERPRETER_EXECUTABLE: &str = "python3";

/// Environment variable holding the OS search path.
pub const SEARCH_PATH_VARIABLE: &str = "PATH";

/// Ambient process state consulted during resolution.
///
/// The production implementation is [`SystemEnvironment`]. Tests supply a
/// fixed map so they never mutate the real process environment.
pub trait Environment {
    /// Reads an environment variable.
    fn var_os(&self, key: &str) -> Option<OsString>;

    /// Reports whether a filesystem path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Reads the real process environment and filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var_os(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

impl<T: Environment + ?Sized> Environment for &T {
    fn var_os(&self, key: &str) -> Option<OsString> {
        (**self).var_os(key)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}

/// Resolves the interpreter location from settings and environment.
///
/// # Example
///
/// ```
/// use std::ffi::OsString;
/// use std::path::{Path, PathBuf};
/// use polyload_plugins::interpreter::{
///     Environment, InterpreterResolver, INTERPRETER_EXECUTABLE,
/// };
///
/// struct FakeEnv;
///
/// impl Environment for FakeEnv {
///     fn var_os(&self, _key: &str) -> Option<OsString> {
///         Some(OsString::from("/opt/Python311/bin"))
///     }
///     fn exists(&self, _path: &Path) -> bool {
///         false
///     }
/// }
///
/// let resolver = InterpreterResolver::new(FakeEnv);
/// assert_eq!(
///     resolver.resolve(None),
///     Some(PathBuf::from(INTERPRETER_EXECUTABLE))
/// );
/// ```
#[derive(Debug, Default, Clone)]
pub struct InterpreterResolver<E = SystemEnvironment> {
    environment: E,
}

impl<E> InterpreterResolver<E> {
    /// Creates a resolver reading from the given environment.
    #[must_use]
    pub const fn new(environment: E) -> Self {
        Self { environment }
    }
}

impl<E: Environment> InterpreterResolver<E> {
    /// Resolves the interpreter, logging any failure and yielding `None`.
    ///
    /// An empty `configured_dir` is treated as unset.
    #[must_use]
    pub fn resolve(&self, configured_dir: Option<&Path>) -> Option<PathBuf> {
        match self.try_resolve(configured_dir) {
            Ok(path) => {
                info!(
                    target: INTERPRETER_TARGET,
                    interpreter = %path.display(),
                    "resolved script interpreter"
                );
                Some(path)
            }
            Err(err) => {
                error!(
                    target: INTERPRETER_TARGET,
                    error = %err,
                    "script interpreter unavailable; interpreted plugins will not load"
                );
                None
            }
        }
    }

    /// Resolves the interpreter, returning the reason on failure.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InterpreterNotFound`] when the configured
    /// directory lacks the executable, [`PluginError::SearchPathUnset`] when
    /// the search path variable is missing, and
    /// [`PluginError::InterpreterNotOnSearchPath`] when no segment matches.
    pub fn try_resolve(&self, configured_dir: Option<&Path>) -> Result<PathBuf, PluginError> {
        match configured_dir.filter(|dir| !dir.as_os_str().is_empty()) {
            Some(dir) => self.resolve_configured(dir),
            None => self.resolve_from_search_path(),
        }
    }

    fn resolve_configured(&self, dir: &Path) -> Result<PathBuf, PluginError> {
        let candidate = dir.join(INTERPRETER_EXECUTABLE);
        debug!(
            target: INTERPRETER_TARGET,
            candidate = %candidate.display(),
            "checking configured interpreter directory"
        );
        if self.environment.exists(&candidate) {
            Ok(candidate)
        } else {
            Err(PluginError::InterpreterNotFound { path: candidate })
        }
    }

    fn resolve_from_search_path(&self) -> Result<PathBuf, PluginError> {
        let search_path =
            self.environment
                .var_os(SEARCH_PATH_VARIABLE)
                .ok_or(PluginError::SearchPathUnset {
                    variable: SEARCH_PATH_VARIABLE,
                })?;

        let matched = std::env::split_paths(&search_path).find(|segment| {
            segment
                .to_string_lossy()
                .to_lowercase()
                .contains(INTERPRETER_FAMILY)
        });

        match matched {
            Some(segment) => {
                debug!(
                    target: INTERPRETER_TARGET,
                    segment = %segment.display(),
                    "search path segment names the interpreter"
                );
                Ok(PathBuf::from(INTERPRETER_EXECUTABLE))
            }
            None => Err(PluginError::InterpreterNotOnSearchPath {
                family: INTERPRETER_FAMILY,
            }),
        }
    }
}
