//! Helpers for running child processes and turning their exit status into
//! errors that carry the exit code.

use std::fmt;
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

use crate::exit_codes;

/// An external tool that exited unsuccessfully.
///
/// Carried inside `anyhow` error chains so `main` can reuse the tool's exit
/// code as its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFailure {
    /// Command line as displayed to the user.
    pub command: String,
    /// Exit code, `None` when killed by a signal or timeout.
    pub code: Option<i32>,
    pub timed_out: bool,
    /// Captured output (empty when output went to the terminal).
    pub output: String,
}

impl ToolFailure {
    pub fn exit_code(&self) -> i32 {
        match self.code {
            Some(code) if code != exit_codes::OK => code,
            _ => exit_codes::FAILED,
        }
    }
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.timed_out {
            write!(f, "`{}` timed out", self.command)?;
        } else {
            match self.code {
                Some(code) => write!(f, "`{}` exited with code {code}", self.command)?,
                None => write!(f, "`{}` was terminated by a signal", self.command)?,
            }
        }
        let output = self.output.trim_end();
        if !output.is_empty() {
            write!(f, "\n{output}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolFailure {}

/// Find the exit code of the first [`ToolFailure`] in an error chain.
pub fn tool_exit_code(err: &anyhow::Error) -> Option<i32> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ToolFailure>())
        .map(ToolFailure::exit_code)
}

/// Captured child process output.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_truncated: usize,
    pub stderr_truncated: usize,
    pub timed_out: bool,
}

impl CommandOutput {
    /// Stdout followed by stderr, with truncation notices.
    pub fn combined(&self) -> String {
        let mut text = String::from_utf8_lossy(&self.stdout).into_owned();
        if self.stdout_truncated > 0 {
            text.push_str(&format!("\n[stdout truncated {} bytes]\n", self.stdout_truncated));
        }
        text.push_str(&String::from_utf8_lossy(&self.stderr));
        if self.stderr_truncated > 0 {
            text.push_str(&format!("\n[stderr truncated {} bytes]\n", self.stderr_truncated));
        }
        text
    }

    /// `Ok` on success, otherwise a [`ToolFailure`] with the captured output.
    pub fn check(&self, command: &str) -> Result<()> {
        if self.status.success() && !self.timed_out {
            return Ok(());
        }
        Err(ToolFailure {
            command: command.to_string(),
            code: self.status.code(),
            timed_out: self.timed_out,
            output: self.combined(),
        }
        .into())
    }
}

/// Run a command with the terminal attached (stdio inherited).
///
/// `timeout` of `None` waits indefinitely. A non-zero exit becomes a
/// [`ToolFailure`] named after `command_line`.
#[instrument(skip_all, fields(command = command_line))]
pub fn run_inherited(
    mut cmd: Command,
    command_line: &str,
    timeout: Option<Duration>,
) -> Result<()> {
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    debug!("spawning child process");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(e).with_context(|| format!("spawn `{command_line}`"));
        }
    };

    let (status, timed_out) = wait(&mut child, timeout)?;
    debug!(exit_code = ?status.code(), timed_out, "command finished");
    if status.success() && !timed_out {
        return Ok(());
    }
    Err(ToolFailure {
        command: command_line.to_string(),
        code: status.code(),
        timed_out,
        output: String::new(),
    }
    .into())
}

/// Run a command and capture stdout/stderr without risking pipe deadlocks.
///
/// Output is read concurrently while the child runs. `output_limit_bytes` bounds the amount of
/// stdout/stderr stored in memory (bytes beyond this are discarded while still draining the pipe).
#[instrument(skip_all, fields(output_limit_bytes))]
pub fn run_captured(
    mut cmd: Command,
    timeout: Option<Duration>,
    output_limit_bytes: usize,
) -> Result<CommandOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("spawning child process");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(e).context("spawn command");
        }
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let stdout_handle = thread::spawn(move || read_stream_limited(stdout, output_limit_bytes));
    let stderr_handle = thread::spawn(move || read_stream_limited(stderr, output_limit_bytes));

    let (status, timed_out) = wait(&mut child, timeout)?;

    let (stdout, stdout_truncated) = join_output(stdout_handle).context("join stdout")?;
    let (stderr, stderr_truncated) = join_output(stderr_handle).context("join stderr")?;

    if stdout_truncated > 0 || stderr_truncated > 0 {
        warn!(stdout_truncated, stderr_truncated, "output truncated");
    }

    debug!(exit_code = ?status.code(), timed_out, "command finished");
    Ok(CommandOutput {
        status,
        stdout,
        stderr,
        stdout_truncated,
        stderr_truncated,
        timed_out,
    })
}

fn wait(child: &mut Child, timeout: Option<Duration>) -> Result<(ExitStatus, bool)> {
    let Some(timeout) = timeout else {
        let status = child.wait().context("wait for command")?;
        return Ok((status, false));
    };
    match child.wait_timeout(timeout).context("wait for command")? {
        Some(status) => Ok((status, false)),
        None => {
            warn!(
                timeout_secs = timeout.as_secs(),
                "command timed out, killing"
            );
            child.kill().context("kill command")?;
            let status = child.wait().context("wait command after kill")?;
            Ok((status, true))
        }
    }
}

fn join_output(handle: thread::JoinHandle<Result<(Vec<u8>, usize)>>) -> Result<(Vec<u8>, usize)> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

fn read_stream_limited<R: Read>(mut reader: R, limit: usize) -> Result<(Vec<u8>, usize)> {
    let mut buf = Vec::new();
    let mut truncated = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk).context("read output")?;
        if n == 0 {
            break;
        }
        let remaining = limit.saturating_sub(buf.len());
        if remaining > 0 {
            let keep = n.min(remaining);
            buf.extend_from_slice(&chunk[..keep]);
            truncated += n.saturating_sub(keep);
        } else {
            truncated += n;
        }
    }

    Ok((buf, truncated))
}
