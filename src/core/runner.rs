//! Checklist runner.
//!
//! Invokes every entry of a [`Checklist`] in order through the [`Registry`].
//! Configuration mistakes in one entry are recorded as failures and the run
//! continues; an error that leaves host state unknown stops the run.

use crate::acquire::Host;
use crate::config::{CheckEntry, Checklist};
use crate::core::error::Result;
use crate::core::registry::Registry;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

/// Result of running a single check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// Parameters it was invoked with.
    pub parameters: Vec<String>,
    /// Whether the check passed.
    pub passed: bool,
    /// Exit code of the verdict, or of the configuration error.
    pub exit_code: i32,
    /// Diagnostic message; empty when passed.
    pub message: String,
    /// Time spent on the check.
    pub duration: Duration,
}

impl CheckResult {
    /// Renders `name param1 param2`.
    #[must_use]
    pub fn invocation(&self) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.parameters.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of running a checklist.
#[derive(Debug)]
pub struct RunResult {
    /// Name of the checklist.
    pub name: String,
    /// Individual check results, in checklist order.
    pub checks: Vec<CheckResult>,
    /// Total duration.
    pub duration: Duration,
}

impl RunResult {
    /// Returns true if all checks passed.
    #[must_use]
    pub fn success(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Returns the number of passed checks.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Returns the number of failed checks.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    /// Returns failed check results.
    #[must_use]
    pub fn failed_checks(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

/// Runs checklists against a host.
#[derive(Debug)]
pub struct Runner<'a> {
    registry: &'a Registry,
    host: &'a Host,
    show_progress: bool,
}

impl<'a> Runner<'a> {
    /// Creates a runner.
    #[must_use]
    pub fn new(registry: &'a Registry, host: &'a Host) -> Self {
        Self {
            registry,
            host,
            show_progress: true,
        }
    }

    /// Enables or disables the spinner and per-check lines on stderr.
    #[must_use]
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Runs every entry of `checklist` in order.
    ///
    /// Returns `Err` on the first fatal error; entries after it are not run.
    pub fn run(&self, checklist: &Checklist) -> Result<RunResult> {
        let start = Instant::now();
        let mut checks = Vec::with_capacity(checklist.checks.len());

        tracing::debug!(
            checklist = %checklist.name,
            count = checklist.checks.len(),
            "Running checklist"
        );

        for entry in &checklist.checks {
            checks.push(self.run_entry(entry)?);
        }

        Ok(RunResult {
            name: checklist.name.clone(),
            checks,
            duration: start.elapsed(),
        })
    }

    /// Runs a single entry.
    pub fn run_entry(&self, entry: &CheckEntry) -> Result<CheckResult> {
        let start = Instant::now();
        let pb = self.spinner(&entry.id);

        let outcome = self.registry.invoke(self.host, &entry.id, &entry.parameters);

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        let (passed, exit_code, message) = match outcome {
            Ok(verdict) => (verdict.passed(), verdict.exit_code(), verdict.message().to_string()),
            Err(e) if e.is_configuration() => {
                tracing::warn!(check = %entry.id, error = %e, "Check is misconfigured");
                (false, e.exit_code(), e.to_string())
            },
            Err(e) => return Err(e),
        };

        let result = CheckResult {
            name: entry.id.clone(),
            parameters: entry.parameters.clone(),
            passed,
            exit_code,
            message,
            duration: start.elapsed(),
        };

        if self.show_progress {
            if result.passed {
                eprintln!("{} {}", style("✓").green(), result.invocation());
            } else {
                eprintln!("{} {}", style("✗").red(), result.invocation());
            }
        }

        Ok(result)
    }

    fn spinner(&self, name: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .ok()
                .unwrap_or_else(ProgressStyle::default_spinner),
        );
        pb.set_message(format!("Running {name}..."));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}
