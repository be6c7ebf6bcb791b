//! Subprocess execution of assembled R command lines.
//!
//! The command string is handed to the platform shell verbatim. Quoting is the
//! caller's job; there is no timeout, retry, or output cap.

use std::process::{Command, Output, Stdio};

use tracing::{debug, warn};

/// Outcome of one subprocess run. Exactly one side is ever populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// The process exited successfully.
    Output { stdout: String, stderr: String },
    /// Non-zero exit or spawn failure, with the best diagnostic available.
    Failure(String),
}

impl ExecutionResult {
    fn from_output(out: Output) -> Self {
        let stdout = String::from_utf8_lossy(&out.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&out.stderr).into_owned();
        if out.status.success() {
            debug!(stdout_len = stdout.len(), stderr_len = stderr.len(), "process exited");
            return Self::Output { stdout, stderr };
        }
        let diagnostic = if stderr.trim().is_empty() {
            format!("process exited with {}", out.status)
        } else {
            stderr.trim_end().to_string()
        };
        warn!(status = %out.status, "process failed");
        Self::Failure(diagnostic)
    }

    fn spawn_failed(err: std::io::Error) -> Self {
        warn!(error = %err, "failed to spawn shell");
        Self::Failure(format!("failed to spawn shell: {err}"))
    }
}

/// Runs a command line either blocking the thread or suspending the task.
/// Both variants share one contract.
#[allow(async_fn_in_trait)]
pub trait Executor {
    fn run_sync(&self, command: &str) -> ExecutionResult;

    async fn run_async(&self, command: &str) -> ExecutionResult;
}

/// Executes through `sh -c` on Unix-like hosts and `cmd /d /s /c` on Windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl Executor for ShellExecutor {
    fn run_sync(&self, command: &str) -> ExecutionResult {
        debug!(command, "running (sync)");
        match shell_command(command).output() {
            Ok(out) => ExecutionResult::from_output(out),
            Err(e) => ExecutionResult::spawn_failed(e),
        }
    }

    async fn run_async(&self, command: &str) -> ExecutionResult {
        debug!(command, "running (async)");
        let mut cmd = tokio::process::Command::from(shell_command(command));
        match cmd.output().await {
            Ok(out) => ExecutionResult::from_output(out),
            Err(e) => ExecutionResult::spawn_failed(e),
        }
    }
}

fn shell_command(command: &str) -> Command {
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd.exe");
        c.args(CMD_FLAGS);
        push_raw(&mut c, &cmd_line(command));
        c
    } else {
        let mut c = Command::new("/bin/sh");
        c.arg("-c").arg(command);
        c
    };
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

/// `/s` makes cmd.exe strip exactly the outer quote pair added by
/// [`cmd_line`], leaving a quoted runner path with spaces intact.
const CMD_FLAGS: [&str; 3] = ["/d", "/s", "/c"];

fn cmd_line(command: &str) -> String {
    format!("\"{command}\"")
}

// cmd.exe does its own parsing, so the line must reach it unquoted.
#[cfg(windows)]
fn push_raw(cmd: &mut Command, command: &str) {
    use std::os::windows::process::CommandExt;
    cmd.raw_arg(command);
}

#[cfg(not(windows))]
fn push_raw(cmd: &mut Command, command: &str) {
    cmd.arg(command);
}
