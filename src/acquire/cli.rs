//! Text-scrape acquisition through the `docker` command line tool.

use super::{is_running, DockerSettings, ResourceSource};
use crate::core::error::{Error, Result};
use crate::core::executor::{CommandOutput, ExecuteOptions, Executor};
use crate::tabular::Table;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Marker the Docker CLI prints when the daemon socket is not accessible.
const PERMISSION_DENIED: &str = "permission denied";

/// Runs an external program and captures its output.
///
/// Runners are shared between threads through [`super::Host`].
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` to completion.
    ///
    /// A non-zero exit is reported in the output; `Err` means the program
    /// could not be run at all.
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// [`CommandRunner`] spawning real processes through the [`Executor`].
#[derive(Debug)]
pub struct ProcessRunner {
    runtime: Arc<Runtime>,
    executor: Executor,
    options: ExecuteOptions,
}

impl ProcessRunner {
    /// Creates a runner blocking on `runtime`, with an optional timeout.
    #[must_use]
    pub fn new(runtime: Arc<Runtime>, timeout: Option<Duration>) -> Self {
        let options = match timeout {
            Some(duration) => ExecuteOptions::default().timeout(duration),
            None => ExecuteOptions::default().no_timeout(),
        };
        Self {
            runtime,
            executor: Executor::new(),
            options,
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.runtime
            .block_on(self.executor.execute(program, &args, &self.options))
    }
}

/// Runs a command and returns its combined output, classifying failures.
///
/// Output mentioning `permission denied` on a non-zero exit becomes
/// [`Error::PermissionDenied`]; any other non-zero exit becomes
/// [`Error::CommandFailed`]. Both are fatal.
pub fn capture(runner: &dyn CommandRunner, program: &str, args: &[String]) -> Result<String> {
    let operation = std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");

    tracing::debug!(%operation, "Running command");
    let output = runner.run(program, args)?;

    if output.timed_out {
        return Err(Error::CommandTimeout {
            operation,
            timeout: humantime::format_duration(output.duration).to_string(),
        });
    }

    let combined = output.combined_output();
    if !output.success() {
        if combined.to_lowercase().contains(PERMISSION_DENIED) {
            return Err(Error::PermissionDenied { operation });
        }
        return Err(Error::command_failed(
            operation,
            output.exit_code,
            combined.trim(),
        ));
    }

    Ok(combined)
}

/// Locally available images, scraped from `docker images`.
///
/// Yields the first column (the repository) of every data row.
#[derive(Debug)]
pub struct DockerImages<'a> {
    runner: &'a dyn CommandRunner,
    settings: &'a DockerSettings,
}

impl<'a> DockerImages<'a> {
    /// Creates the source.
    #[must_use]
    pub fn new(runner: &'a dyn CommandRunner, settings: &'a DockerSettings) -> Self {
        Self { runner, settings }
    }
}

impl ResourceSource for DockerImages<'_> {
    fn identifiers(&self) -> Result<Vec<String>> {
        let output = capture(self.runner, &self.settings.command, &["images".to_string()])?;
        Ok(Table::parse_with(&output, self.settings.table).column(0))
    }
}

/// Images of running containers, scraped from `docker ps -a`.
///
/// Rows are kept when their `STATUS` cell carries the running marker; their
/// `IMAGE` cells are returned in output order.
#[derive(Debug)]
pub struct RunningContainers<'a> {
    runner: &'a dyn CommandRunner,
    settings: &'a DockerSettings,
}

impl<'a> RunningContainers<'a> {
    /// Creates the source.
    #[must_use]
    pub fn new(runner: &'a dyn CommandRunner, settings: &'a DockerSettings) -> Self {
        Self { runner, settings }
    }
}

impl ResourceSource for RunningContainers<'_> {
    fn identifiers(&self) -> Result<Vec<String>> {
        let args = ["ps".to_string(), "-a".to_string()];
        let output = capture(self.runner, &self.settings.command, &args)?;
        let table = Table::parse_with(&output, self.settings.table);

        let images = table.column_by_header("image");
        let statuses = table.column_by_header("status");

        Ok(statuses
            .iter()
            .zip(images)
            .filter(|(status, _)| is_running(status))
            .map(|(_, image)| image)
            .collect())
    }
}

impl std::fmt::Debug for dyn CommandRunner + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CommandRunner")
    }
}
