//! Command-line runtime for the `polyload` plugin host.
//!
//! The runtime splits configuration flags from command flags, loads
//! configuration through `ortho_config`, installs telemetry, reads the plugin
//! catalog and runs one loading pass. Loaded plugins are written to stdout as
//! `<family>\t<name>\t<version>\t<init ms>` lines, with `-` standing in for
//! an undeclared version; the aggregated native failure
//! notification, if any, goes to stderr. An optional query is forwarded to a
//! single plugin and its results are printed as `<score>\t<title>\t<subtitle>`.
//!
//! The entry point accepts arbitrary writers so tests can capture output.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use polyload_config::Config;
use polyload_plugins::{ChannelNotifier, LoaderSettings, PluginCatalog, PluginLoader, PluginPair};
use polyload_sdk::{Query, QueryPlugin};
use tracing::{debug, warn};

mod cli;
mod config;
mod errors;
pub mod telemetry;

use cli::Cli;
use config::{ConfigLoader, OrthoConfigLoader, partition_arguments};
pub(crate) use errors::AppError;

/// Tracing target for the CLI runtime.
const CLI_TARGET: &str = "polyload_cli";

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdout, stderr, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    stdout: &mut W,
    stderr: &mut E,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let partition = partition_arguments(&args);

    let result = Cli::try_parse_from(&partition.cli_arguments)
        .map_err(AppError::CliUsage)
        .and_then(|cli| {
            loader
                .load(&partition.config_arguments)
                .map(|config| (cli, config))
        })
        .and_then(|(cli, config)| execute(&cli, &config, &mut *stdout, &mut *stderr));

    match result {
        Ok(exit_code) => exit_code,
        Err(AppError::CliUsage(error)) if !error.use_stderr() => {
            let _ = write!(stdout, "{error}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn execute<W, E>(
    cli: &Cli,
    config: &Config,
    stdout: &mut W,
    stderr: &mut E,
) -> Result<ExitCode, AppError>
where
    W: Write,
    E: Write,
{
    telemetry::initialise(config)?;

    debug!(
        target: CLI_TARGET,
        catalog = %cli.catalog.display(),
        "reading plugin catalog"
    );
    let catalog = PluginCatalog::from_path(&cli.catalog).map_err(|source| AppError::Catalog {
        path: cli.catalog.clone(),
        source,
    })?;
    if catalog.is_empty() {
        warn!(
            target: CLI_TARGET,
            catalog = %cli.catalog.display(),
            "plugin catalog lists no plugins"
        );
    }
    debug!(target: CLI_TARGET, plugins = catalog.len(), "plugin catalog read");
    let mut descriptors = catalog.into_descriptors();

    let (notifier, notifications) = ChannelNotifier::unbounded();
    let loader = PluginLoader::with_notifier(notifier);
    let mut outcome = loader.load_all(&mut descriptors, &loader_settings(config));

    render_plugins(stdout, &outcome.plugins)?;
    for notification in notifications.try_iter() {
        writeln!(stderr, "{notification}")?;
    }

    if let Some((name, text)) = cli.query_target() {
        let mut query = Query::new(text);
        if let Some(keyword) = &cli.action_keyword {
            query = query.with_action_keyword(keyword.as_str());
        }
        run_query(stdout, &mut outcome.plugins, name, &query)?;
    }

    stdout.flush()?;
    Ok(ExitCode::SUCCESS)
}

fn loader_settings(config: &Config) -> LoaderSettings {
    config
        .interpreter_directory()
        .map_or_else(LoaderSettings::new, |directory| {
            LoaderSettings::new().with_interpreter_directory(directory.as_std_path())
        })
}

fn render_plugins<W: Write>(stdout: &mut W, plugins: &[PluginPair]) -> Result<(), AppError> {
    for pair in plugins {
        let descriptor = pair.descriptor();
        let init_ms = u64::try_from(descriptor.init_time().as_millis()).unwrap_or(u64::MAX);
        let version = match descriptor.version() {
            "" => "-",
            declared => declared,
        };
        writeln!(
            stdout,
            "{}\t{}\t{version}\t{init_ms}",
            pair.family(),
            descriptor.name()
        )?;
    }
    Ok(())
}

fn run_query<W: Write>(
    stdout: &mut W,
    plugins: &mut [PluginPair],
    name: &str,
    query: &Query,
) -> Result<(), AppError> {
    let pair = plugins
        .iter_mut()
        .find(|pair| pair.descriptor().name() == name)
        .ok_or_else(|| AppError::UnknownPlugin {
            name: name.to_owned(),
        })?;

    let results = pair
        .handle_mut()
        .query(query)
        .map_err(|source| AppError::Query {
            name: name.to_owned(),
            source,
        })?;

    for result in results {
        writeln!(
            stdout,
            "{}\t{}\t{}",
            result.score(),
            result.title(),
            result.subtitle().unwrap_or_default()
        )?;
    }
    Ok(())
}
