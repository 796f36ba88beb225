//! Shared configuration for the polyload host.
//!
//! Values are layered by `ortho_config` in increasing precedence: built-in
//! defaults, a TOML configuration file (`--config-path` or
//! `POLYLOAD_CONFIG_PATH`), `POLYLOAD_*` environment variables, and CLI flags.
//! The plugin loader only consumes [`Config::interpreter_directory`]; the
//! remaining fields drive telemetry.

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod logging;

pub use defaults::{
    DEFAULT_LOG_FILTER, default_log_filter, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "POLYLOAD")]
pub struct Config {
    /// Directory expected to contain the script interpreter executable.
    ///
    /// When unset (or blank) the interpreter is looked up on the search path.
    #[serde(default)]
    pub interpreter_directory: Option<Utf8PathBuf>,
    /// Tracing filter expression, in `EnvFilter` syntax.
    #[ortho_config(default = crate::defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log records.
    #[ortho_config(default = crate::defaults::default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interpreter_directory: None,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Returns the configured interpreter directory, treating blank values as
    /// unset.
    #[must_use]
    pub fn interpreter_directory(&self) -> Option<&Utf8Path> {
        self.interpreter_directory
            .as_deref()
            .filter(|dir| !dir.as_str().trim().is_empty())
    }

    /// Returns the tracing filter expression.
    #[must_use]
    pub const fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

#[cfg(test)]
mod tests;
