//! Command execution for acquiring host state.
//!
//! This module spawns external programs (the `docker` CLI), captures their
//! output and enforces an optional timeout. The program is executed directly,
//! never through a shell.

use crate::core::error::{Error, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::timeout;

/// Output from a command execution.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code of the command.
    pub exit_code: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
    /// Whether the command was killed due to timeout.
    pub timed_out: bool,
    /// Duration the command took to run. For a timed-out command, the limit
    /// it exceeded.
    pub duration: Duration,
}

impl CommandOutput {
    /// Creates a successful output with the given stdout, for fakes and tests.
    #[must_use]
    pub fn success_with(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
            timed_out: false,
            duration: Duration::ZERO,
        }
    }

    /// Creates a failed output with the given exit code and stderr.
    #[must_use]
    pub fn failure_with(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
            timed_out: false,
            duration: Duration::ZERO,
        }
    }

    /// Returns true if the command succeeded (exit code 0).
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }

    /// Returns combined stdout and stderr output.
    #[must_use]
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Timeout for the command.
    pub timeout: Option<Duration>,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ExecuteOptions {
    /// Sets the timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Disables the timeout; the command may block indefinitely.
    #[must_use]
    pub const fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }
}

/// Executor for running external programs.
#[derive(Debug, Default)]
pub struct Executor;

impl Executor {
    /// Creates a new executor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Executes `program` with `args` and captures its output.
    ///
    /// A non-zero exit is reported in the returned [`CommandOutput`], not as
    /// an error; only failing to spawn or wait is an `Err`.
    pub async fn execute(
        &self,
        program: &str,
        args: &[&str],
        options: &ExecuteOptions,
    ) -> Result<CommandOutput> {
        let start = std::time::Instant::now();

        let mut cmd = Command::new(program);
        cmd.args(args);

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::CommandNotFound {
                    command: program.to_string(),
                }
            } else {
                Error::io(format!("spawn {program}"), e)
            }
        })?;

        let result = if let Some(timeout_duration) = options.timeout {
            match timeout(timeout_duration, self.wait_for_output(&mut child)).await {
                Ok(result) => result,
                Err(_) => {
                    // Kill the process on timeout - ignore result since we're returning anyway
                    drop(child.kill().await);
                    return Ok(CommandOutput {
                        exit_code: 124,
                        stdout: String::new(),
                        stderr: "Command timed out".to_string(),
                        timed_out: true,
                        duration: timeout_duration,
                    });
                },
            }
        } else {
            self.wait_for_output(&mut child).await
        };

        let (exit_code, stdout, stderr) = result?;

        Ok(CommandOutput {
            exit_code,
            stdout,
            stderr,
            timed_out: false,
            duration: start.elapsed(),
        })
    }

    /// Waits for the command to complete and captures output.
    async fn wait_for_output(
        &self,
        child: &mut tokio::process::Child,
    ) -> Result<(i32, String, String)> {
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let stdout_handle = tokio::spawn(async move {
            let mut output = String::new();
            if let Some(stdout) = stdout {
                let mut reader = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = reader.next_line().await {
                    output.push_str(&line);
                    output.push('\n');
                }
            }
            output
        });

        let stderr_handle = tokio::spawn(async move {
            let mut output = String::new();
            if let Some(stderr) = stderr {
                let mut reader = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = reader.next_line().await {
                    output.push_str(&line);
                    output.push('\n');
                }
            }
            output
        });

        let status = child
            .wait()
            .await
            .map_err(|e| Error::io("wait for command", e))?;

        let stdout = stdout_handle.await.map_err(|e| Error::Internal {
            message: format!("stdout task failed: {e}"),
        })?;
        let stderr = stderr_handle.await.map_err(|e| Error::Internal {
            message: format!("stderr task failed: {e}"),
        })?;

        Ok((status.code().unwrap_or(1), stdout, stderr))
    }

    /// Checks if a command exists in PATH.
    #[must_use]
    pub fn command_exists(command: &str) -> bool {
        which::which(command).is_ok()
    }
}
