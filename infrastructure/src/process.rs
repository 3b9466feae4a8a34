//! Shell command execution shared by the command-backed adapters.

use std::io::ErrorKind;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error talking to `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` timed out after {secs} seconds")]
    Timeout { command: String, secs: u64 },
}

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn exit_code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }

    /// Stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !combined.is_empty() {
                combined.push_str("\n--- stderr ---\n");
            }
            combined.push_str(&self.stderr);
        }
        combined
    }
}

/// Quote `value` for interpolation into a POSIX shell command line.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

fn shell(command_line: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", command_line]);
        c
    } else {
        let mut c = Command::new("sh");
        c.args(["-c", command_line]);
        c
    }
}

/// Run `command_line` through the shell, feeding `input` on stdin.
///
/// The child is killed when the timeout elapses.
pub async fn run_shell(
    command_line: &str,
    input: Option<&str>,
    timeout: Option<Duration>,
) -> Result<CommandOutput, ProcessError> {
    let mut cmd = shell(command_line);
    cmd.stdin(if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    })
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| ProcessError::Spawn {
        command: command_line.to_string(),
        source,
    })?;

    let stdin = child.stdin.take();
    let feed = async move {
        if let (Some(mut pipe), Some(input)) = (stdin, input) {
            match pipe.write_all(input.as_bytes()).await {
                // The child may exit without reading its input
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
                other => other?,
            }
            pipe.shutdown().await.or_else(|e| {
                if e.kind() == ErrorKind::BrokenPipe {
                    Ok(())
                } else {
                    Err(e)
                }
            })?;
        }
        Ok::<(), std::io::Error>(())
    };
    let run = async move { tokio::try_join!(feed, child.wait_with_output()) };

    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, run)
            .await
            .map_err(|_| ProcessError::Timeout {
                command: command_line.to_string(),
                secs: limit.as_secs(),
            })?,
        None => run.await,
    };
    let ((), output) = result.map_err(|source| ProcessError::Io {
        command: command_line.to_string(),
        source,
    })?;

    Ok(CommandOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
