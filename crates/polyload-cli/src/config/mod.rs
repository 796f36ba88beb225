//! Configuration loading helpers for the CLI.
//!
//! Configuration flags are routed to `ortho_config`; everything else is parsed
//! by the command-line definition in [`crate::cli`]. Flags may appear in any
//! order. Arguments after a bare `--` are never treated as configuration.

use std::ffi::{OsStr, OsString};

use ortho_config::OrthoConfig;
use polyload_config::Config;

use crate::AppError;

/// CLI flags recognised by the configuration loader.
///
/// Keep in sync with the fields of [`polyload_config::Config`].
pub(crate) const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--interpreter-directory",
    "--log-filter",
    "--log-format",
];

pub(crate) trait ConfigLoader {
    /// Loads configuration from defaults, files, environment and `args`.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgumentRole {
    Config { needs_value: bool },
    Command,
    Terminator,
}

fn classify_argument(argument: &OsStr) -> ArgumentRole {
    let text = argument.to_string_lossy();
    if text == "--" {
        return ArgumentRole::Terminator;
    }
    if !text.starts_with("--") {
        return ArgumentRole::Command;
    }

    let (flag, has_inline_value) = text
        .split_once('=')
        .map_or((&*text, false), |(flag, _)| (flag, true));

    if CONFIG_CLI_FLAGS.contains(&flag) {
        ArgumentRole::Config {
            needs_value: !has_inline_value,
        }
    } else {
        ArgumentRole::Command
    }
}

/// Arguments split between the configuration loader and the command parser.
///
/// Both lists start with the program name.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ArgumentPartition {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) cli_arguments: Vec<OsString>,
}

pub(crate) fn partition_arguments(args: &[OsString]) -> ArgumentPartition {
    let mut partition = ArgumentPartition::default();
    let mut remaining = args.iter();

    if let Some(program) = remaining.next() {
        partition.config_arguments.push(program.clone());
        partition.cli_arguments.push(program.clone());
    }

    while let Some(argument) = remaining.next() {
        match classify_argument(argument) {
            ArgumentRole::Config { needs_value } => {
                partition.config_arguments.push(argument.clone());
                if needs_value {
                    partition
                        .config_arguments
                        .extend(remaining.next().cloned());
                }
            }
            ArgumentRole::Command => partition.cli_arguments.push(argument.clone()),
            ArgumentRole::Terminator => {
                partition.cli_arguments.push(argument.clone());
                partition.cli_arguments.extend(remaining.by_ref().cloned());
            }
        }
    }

    partition
}

#[cfg(test)]
mod tests;
