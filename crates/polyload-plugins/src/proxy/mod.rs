//! Process-backed capability handles.
//!
//! [`ProcessPlugin`] implements [`QueryPlugin`] by spawning a child process
//! per query, writing the request to stdin as a single JSONL line and reading
//! one response line from stdout. Stdout and stderr are read on their own
//! threads so a chatty plugin never blocks on a full pipe, and a single
//! deadline bounds both the response and the exit. Both the interpreted
//! and the executable family use it: the former runs the interpreter with the
//! script path as first argument, the latter runs the plugin executable
//! directly. Nothing is spawned until the first query.

pub mod protocol;

use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use polyload_sdk::{Query, QueryError, QueryPlugin, QueryResult};
use tracing::{debug, warn};

use crate::descriptor::PluginDescriptor;
use crate::error::PluginError;

use self::protocol::{ProxyRequest, ProxyResponse};

/// Tracing target for plugin process operations.
const PROXY_TARGET: &str = "polyload_plugins::proxy";

/// How often a finished exchange checks whether the child has exited.
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A capability handle that forwards queries to a child process.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use polyload_plugins::{PluginDescriptor, ProcessPlugin};
///
/// let descriptor = PluginDescriptor::new("notes", "python", "main.py")
///     .with_plugin_directory("/plugins/notes");
/// let proxy = ProcessPlugin::interpreted(&descriptor, Path::new("python3"));
///
/// assert_eq!(proxy.program(), Path::new("python3"));
/// assert_eq!(proxy.args().first().map(String::as_str), Some("/plugins/notes/main.py"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessPlugin {
    name: String,
    program: PathBuf,
    args: Vec<String>,
    working_directory: Option<PathBuf>,
    timeout_secs: u64,
}

impl ProcessPlugin {
    /// Binds a script plugin to the given interpreter.
    #[must_use]
    pub fn interpreted(descriptor: &PluginDescriptor, interpreter: &Path) -> Self {
        let mut args = vec![descriptor.entry_path().to_string_lossy().into_owned()];
        args.extend(descriptor.args().iter().cloned());
        Self {
            name: descriptor.name().to_owned(),
            program: interpreter.to_path_buf(),
            args,
            working_directory: descriptor.plugin_directory().map(Path::to_path_buf),
            timeout_secs: descriptor.timeout_secs(),
        }
    }

    /// Binds an executable plugin to its own entry point.
    #[must_use]
    pub fn executable(descriptor: &PluginDescriptor) -> Self {
        Self {
            name: descriptor.name().to_owned(),
            program: descriptor.entry_path(),
            args: descriptor.args().to_vec(),
            working_directory: descriptor.plugin_directory().map(Path::to_path_buf),
            timeout_secs: descriptor.timeout_secs(),
        }
    }

    /// Returns the plugin name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the program spawned for each query.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Returns the arguments passed to the program.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the timeout in seconds.
    #[must_use]
    pub const fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Runs one request/response exchange with a fresh plugin process.
    ///
    /// The process is killed if the exchange fails or the deadline passes.
    ///
    /// # Errors
    ///
    /// Returns a [`PluginError`] if the process cannot be spawned, times out,
    /// exits with a non-zero status, or produces invalid output.
    pub fn call(&self, request: &ProxyRequest) -> Result<ProxyResponse, PluginError> {
        let name = self.name();
        let deadline = Instant::now().checked_add(Duration::from_secs(self.timeout_secs));
        let mut session = Session::new(self.spawn()?);

        let stdin = take_pipe(name, session.child.stdin.take(), "stdin")?;
        let stdout = take_pipe(name, session.child.stdout.take(), "stdout")?;
        let stderr = take_pipe(name, session.child.stderr.take(), "stderr")?;

        drain_stderr(name, stderr)?;
        let lines = read_first_line(name, stdout)?;
        write_request(name, stdin, request)?;

        let line = receive_response(name, &lines, deadline, self.timeout_secs)?;
        session.wait_for_exit(name, deadline, self.timeout_secs)?;
        parse_response(name, &line)
    }

    fn spawn(&self) -> Result<Child, PluginError> {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.working_directory {
            command.current_dir(dir);
        }
        command.stdin(Stdio::piped());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        debug!(
            target: PROXY_TARGET,
            plugin = self.name.as_str(),
            program = %self.program.display(),
            "spawning plugin process"
        );

        command.spawn().map_err(|err| PluginError::SpawnFailed {
            name: self.name.clone(),
            message: err.to_string(),
            source: Some(Arc::new(err)),
        })
    }
}

impl QueryPlugin for ProcessPlugin {
    fn query(&mut self, query: &Query) -> Result<Vec<QueryResult>, QueryError> {
        let response = self
            .call(&ProxyRequest::query(query.clone()))
            .map_err(QueryError::unavailable)?;
        response.into_result().map_err(QueryError::rejected)
    }
}

/// Writes the serialised request to the plugin's stdin and closes it.
fn write_request(
    name: &str,
    mut stdin: impl Write,
    request: &ProxyRequest,
) -> Result<(), PluginError> {
    let json = serde_json::to_string(request).map_err(PluginError::SerializeRequest)?;

    debug!(
        target: PROXY_TARGET,
        plugin = name,
        request_bytes = json.len(),
        "writing request to plugin stdin"
    );

    let io_error = |err: std::io::Error| PluginError::Io {
        name: name.to_owned(),
        source: Arc::new(err),
    };
    stdin.write_all(json.as_bytes()).map_err(io_error)?;
    stdin.write_all(b"\n").map_err(io_error)?;
    stdin.flush().map_err(io_error)?;

    // Dropping stdin closes the pipe and signals end of input.
    Ok(())
}

/// A spawned plugin process that is killed unless it exits on its own.
struct Session {
    child: Child,
    exited: bool,
}

impl Session {
    const fn new(child: Child) -> Self {
        Self {
            child,
            exited: false,
        }
    }

    fn wait_for_exit(
        &mut self,
        name: &str,
        deadline: Option<Instant>,
        timeout_secs: u64,
    ) -> Result<(), PluginError> {
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => {
                    self.exited = true;
                    debug!(
                        target: PROXY_TARGET,
                        plugin = name,
                        ?status,
                        "plugin process exited"
                    );
                    return if status.success() {
                        Ok(())
                    } else {
                        Err(PluginError::NonZeroExit {
                            name: name.to_owned(),
                            status: status.code().unwrap_or(-1),
                        })
                    };
                }
                Ok(None) if deadline.is_some_and(|limit| Instant::now() >= limit) => {
                    return Err(timed_out(name, timeout_secs));
                }
                Ok(None) => thread::sleep(EXIT_POLL_INTERVAL),
                Err(err) => {
                    return Err(PluginError::Io {
                        name: name.to_owned(),
                        source: Arc::new(err),
                    });
                }
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.exited {
            drop(self.child.kill());
            drop(self.child.wait());
        }
    }
}

fn take_pipe<T>(name: &str, pipe: Option<T>, stream: &str) -> Result<T, PluginError> {
    pipe.ok_or_else(|| PluginError::SpawnFailed {
        name: name.to_owned(),
        message: format!("failed to capture {stream}"),
        source: None,
    })
}

/// Runs `body` on a detached thread.
///
/// Readers are never joined: a grandchild may keep a pipe open after the
/// plugin itself has been killed.
fn spawn_reader(
    name: &str,
    stream: &str,
    body: impl FnOnce() + Send + 'static,
) -> Result<(), PluginError> {
    thread::Builder::new()
        .name(format!("polyload-{stream}"))
        .spawn(body)
        .map(drop)
        .map_err(|err| PluginError::Io {
            name: name.to_owned(),
            source: Arc::new(err),
        })
}

/// Consumes stderr until the plugin closes it and logs what was written.
fn drain_stderr(name: &str, stderr: ChildStderr) -> Result<(), PluginError> {
    let plugin = name.to_owned();
    spawn_reader(name, "stderr", move || {
        let mut output = Vec::new();
        if BufReader::new(stderr).read_to_end(&mut output).is_ok() && !output.is_empty() {
            debug!(
                target: PROXY_TARGET,
                plugin = plugin.as_str(),
                stderr_bytes = output.len(),
                stderr = %String::from_utf8_lossy(&output).trim(),
                "plugin stderr output"
            );
        }
    })
}

/// Reads the first stdout line on a separate thread.
fn read_first_line(
    name: &str,
    stdout: ChildStdout,
) -> Result<Receiver<io::Result<String>>, PluginError> {
    let (sender, receiver) = crossbeam_channel::bounded(1);
    spawn_reader(name, "stdout", move || {
        let mut line = String::new();
        let read = BufReader::new(stdout).read_line(&mut line).map(|_| line);
        drop(sender.send(read));
    })?;
    Ok(receiver)
}

/// Waits for the response line until `deadline`.
fn receive_response(
    name: &str,
    lines: &Receiver<io::Result<String>>,
    deadline: Option<Instant>,
    timeout_secs: u64,
) -> Result<String, PluginError> {
    let received = deadline
        .map_or_else(
            || lines.recv().map_err(|_| RecvTimeoutError::Disconnected),
            |limit| lines.recv_deadline(limit),
        )
        .map_err(|err| match err {
            RecvTimeoutError::Timeout => timed_out(name, timeout_secs),
            RecvTimeoutError::Disconnected => PluginError::InvalidOutput {
                name: name.to_owned(),
                message: String::from("stdout reader stopped before a response arrived"),
            },
        })?;

    let line = received.map_err(|err| PluginError::Io {
        name: name.to_owned(),
        source: Arc::new(err),
    })?;

    debug!(
        target: PROXY_TARGET,
        plugin = name,
        bytes_read = line.len(),
        "read response from plugin stdout"
    );

    if line.is_empty() {
        return Err(PluginError::InvalidOutput {
            name: name.to_owned(),
            message: String::from("plugin produced no output on stdout"),
        });
    }
    Ok(line)
}

fn timed_out(name: &str, timeout_secs: u64) -> PluginError {
    warn!(
        target: PROXY_TARGET,
        plugin = name,
        timeout_secs,
        "plugin timed out, killing process"
    );
    PluginError::Timeout {
        name: name.to_owned(),
        timeout_secs,
    }
}

/// Parses a JSONL response line into a [`ProxyResponse`].
fn parse_response(name: &str, line: &str) -> Result<ProxyResponse, PluginError> {
    serde_json::from_str(line.trim()).map_err(|err| PluginError::DeserializeResponse {
        message: format!("plugin '{name}' produced invalid JSON: {err}"),
        source: Some(err),
    })
}
