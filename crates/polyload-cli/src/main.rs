//! CLI entrypoint for the `polyload` plugin host.
//!
//! The binary delegates to [`polyload_cli::run`], which loads configuration,
//! installs telemetry, runs one loading pass over the given catalog, and
//! optionally forwards a query to one of the loaded plugins.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    polyload_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
