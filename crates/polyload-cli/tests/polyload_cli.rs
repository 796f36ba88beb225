//! End-to-end tests for the `polyload` binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[fixture]
fn workspace() -> TempDir {
    TempDir::new().expect("tempdir")
}

fn polyload() -> Command {
    let mut command = Command::cargo_bin("polyload").expect("binary is built");
    command
        .env("POLYLOAD_LOG_FILTER", "off")
        .env_remove("POLYLOAD_INTERPRETER_DIRECTORY");
    command
}

fn write_catalog(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("catalog.json");
    std::fs::write(&path, json).expect("write catalog");
    path
}

#[cfg(unix)]
fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    let mut permissions = std::fs::metadata(path).expect("metadata").permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(path, permissions).expect("chmod");
}

#[rstest]
fn reports_loaded_and_failed_plugins(workspace: TempDir) {
    let catalog = write_catalog(
        workspace.path(),
        r#"[
            {"name": "broken", "language": "rust", "entry_point": "libbroken.so"},
            {"name": "ping", "language": "executable", "entry_point": "/opt/ping"},
            {"name": "mystery", "language": "brainfuck", "entry_point": "x.bf"}
        ]"#,
    );

    polyload()
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stdout("executable\tping\t-\t0\n")
        .stderr(predicate::str::contains(
            "failed to load native plugins: broken",
        ));
}

#[rstest]
fn invalid_catalog_exits_with_failure(workspace: TempDir) {
    let catalog = write_catalog(workspace.path(), r#"[{"name": "", "language": "rust"}]"#);

    polyload()
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read plugin catalog"));
}

#[rstest]
fn invalid_log_filter_is_reported(workspace: TempDir) {
    let catalog = write_catalog(workspace.path(), "[]");

    polyload()
        .arg("--log-filter=polyload_cli=loud")
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid log filter"));
}

#[cfg(unix)]
#[rstest]
fn queries_reach_executable_plugins(workspace: TempDir) {
    let plugin = workspace.path().join("ping-plugin");
    write_script(
        &plugin,
        r#"read request
printf '%s\n' '{"results":[{"title":"pong","subtitle":"from shell","score":5}]}'"#,
    );
    let catalog = write_catalog(
        workspace.path(),
        &format!(
            r#"[{{"name": "ping", "language": "executable", "entry_point": "{}"}}]"#,
            plugin.display()
        ),
    );

    polyload()
        .arg("--catalog")
        .arg(&catalog)
        .args(["--query", "ping", "hello"])
        .assert()
        .success()
        .stdout("executable\tping\t-\t0\n5\tpong\tfrom shell\n");
}

#[cfg(unix)]
#[rstest]
fn rejected_queries_exit_with_failure(workspace: TempDir) {
    let plugin = workspace.path().join("grumpy");
    write_script(
        &plugin,
        r#"read request
printf '%s\n' '{"error":"not today"}'"#,
    );
    let catalog = write_catalog(
        workspace.path(),
        &format!(
            r#"[{{"name": "grumpy", "language": "executable", "entry_point": "{}"}}]"#,
            plugin.display()
        ),
    );

    polyload()
        .arg("--catalog")
        .arg(&catalog)
        .args(["--query", "grumpy", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not today"));
}

#[cfg(unix)]
#[rstest]
fn configured_interpreter_runs_script_plugins(workspace: TempDir) {
    let interpreter_dir = workspace.path().join("interpreter");
    std::fs::create_dir(&interpreter_dir).expect("create interpreter dir");
    write_script(
        &interpreter_dir.join("python3"),
        r#"read request
printf '{"results":[{"title":"%s","score":1}]}\n' "$(basename "$1")""#,
    );
    let catalog = write_catalog(
        workspace.path(),
        r#"[{"name": "notes", "language": "Python", "entry_point": "notes.py"}]"#,
    );

    polyload()
        .arg("--interpreter-directory")
        .arg(&interpreter_dir)
        .arg("--catalog")
        .arg(&catalog)
        .args(["--query", "notes", "todo"])
        .assert()
        .success()
        .stdout("interpreted\tnotes\t-\t0\n1\tnotes.py\t\n");
}

#[cfg(unix)]
#[rstest]
fn empty_interpreter_directory_without_interpreter_skips_scripts(workspace: TempDir) {
    let catalog = write_catalog(
        workspace.path(),
        r#"[{"name": "notes", "language": "python", "entry_point": "notes.py"}]"#,
    );

    polyload()
        .env("POLYLOAD_INTERPRETER_DIRECTORY", workspace.path())
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stdout("");
}
