//! Error types for the CLI runtime.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use polyload_plugins::PluginError;
use polyload_sdk::QueryError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to read plugin catalog {}: {source}", path.display())]
    Catalog {
        path: PathBuf,
        #[source]
        source: PluginError,
    },
    #[error("no loaded plugin is named '{name}'")]
    UnknownPlugin { name: String },
    #[error("plugin '{name}' could not answer the query: {source}")]
    Query {
        name: String,
        #[source]
        source: QueryError,
    },
    #[error("failed to write output: {0}")]
    WriteOutput(#[from] io::Error),
}
