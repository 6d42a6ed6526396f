//! CLI command implementations.

use crate::acquire::Host;
use crate::checks::builtin;
use crate::config::{CheckEntry, Checklist, Config, CONFIG_FILE_NAME};
use crate::core::error::{Error, Result};
use crate::core::executor::Executor;
use crate::core::registry::Registry;
use crate::core::runner::Runner;
use console::style;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Loads the configuration named on the command line, or discovers one.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => Config::load_from(p),
        None => Config::load_or_default(),
    }
}

/// Picks the checklist: an explicit file, or the checks in the config.
fn load_checklist(config: &Config, path: Option<&Path>) -> Result<Checklist> {
    match path {
        Some(p) => Checklist::load(p),
        None => Ok(config.checklist()),
    }
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}

/// Run a single check.
pub fn check(config_path: Option<&Path>, name: &str, params: &[String]) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let registry = Registry::with_builtin_checks();
    let host = Host::system(config.docker_settings(), config.timeout())?;

    let verdict = registry.invoke(&host, name, params)?;

    if verdict.passed() {
        eprintln!("{} {name}", style("✓").green());
    } else {
        eprintln!("{} {name}", style("✗").red());
        println!("{}", verdict.message());
    }

    Ok(exit_code(verdict.exit_code()))
}

/// Run a checklist.
pub fn run(config_path: Option<&Path>, checklist: Option<&Path>, quiet: bool) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let checklist = load_checklist(&config, checklist)?;

    if checklist.checks.is_empty() {
        eprintln!(
            "{} No checks to run. Add [[checks]] to {CONFIG_FILE_NAME} or pass --checklist.",
            style("!").yellow()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let registry = Registry::with_builtin_checks();
    let host = Host::system(config.docker_settings(), config.timeout())?;

    eprintln!(
        "{} Checklist: {} ({} checks)",
        style("•").cyan(),
        style(&checklist.name).bold(),
        checklist.checks.len()
    );

    let result = Runner::new(&registry, &host)
        .show_progress(!quiet)
        .run(&checklist)?;

    // Print summary
    eprintln!();
    if result.success() {
        eprintln!(
            "{} All checks passed ({} passed) in {:?}",
            style("✓").green().bold(),
            result.passed_count(),
            result.duration
        );
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!(
            "{} {} of {} check(s) failed",
            style("✗").red().bold(),
            result.failed_count(),
            result.checks.len()
        );

        // Show failed check details
        for check in result.failed_checks() {
            eprintln!();
            eprintln!("  {} {}", style("Failed:").red(), check.invocation());
            for line in check.message.lines().take(20) {
                eprintln!("    {line}");
            }
        }

        Ok(ExitCode::FAILURE)
    }
}

/// List registered checks.
pub fn list() -> Result<ExitCode> {
    let registry = Registry::with_builtin_checks();

    eprintln!("{}", style("Registered checks:").bold());
    for name in registry.names() {
        let parameter_count = registry.get(name).map_or(0, |d| d.parameter_count);
        println!(
            "  {} ({parameter_count}) - {}",
            style(name).cyan(),
            builtin::description(name)
        );
    }

    Ok(ExitCode::SUCCESS)
}

/// Validate configuration and checklist.
pub fn validate(config_path: Option<&Path>, checklist: Option<&Path>) -> Result<ExitCode> {
    let config = match config_path {
        Some(p) => Config::load_from(p),
        None => Config::load(),
    };

    let config = match config {
        Ok(config) => config,
        Err(Error::ConfigNotFound { path }) => {
            eprintln!(
                "{} Configuration not found: {}",
                style("!").yellow(),
                path.display()
            );
            eprintln!("  Run: probe init");
            return Ok(ExitCode::FAILURE);
        },
        Err(e) => {
            eprintln!("{} Failed to load configuration: {e}", style("✗").red());
            return Ok(ExitCode::FAILURE);
        },
    };

    let checklist = match load_checklist(&config, checklist) {
        Ok(checklist) => checklist,
        Err(e) => {
            eprintln!("{} Failed to load checklist: {e}", style("✗").red());
            return Ok(ExitCode::FAILURE);
        },
    };

    if !Executor::command_exists(&config.docker.command) {
        eprintln!(
            "{} `{}` was not found; text-scrape checks will fail",
            style("!").yellow(),
            config.docker.command
        );
    }

    let registry = Registry::with_builtin_checks();
    let problems: Vec<Error> = checklist
        .checks
        .iter()
        .filter_map(|entry| registry.validate(&entry.id, entry.parameters.len()).err())
        .collect();

    if problems.is_empty() {
        eprintln!(
            "{} Configuration is valid ({} checks)",
            style("✓").green(),
            checklist.checks.len()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{} Checklist validation failed:", style("✗").red());
        for problem in &problems {
            eprintln!("  {problem}");
        }
        Ok(ExitCode::FAILURE)
    }
}

/// Write a starter configuration.
pub fn init(force: bool) -> Result<ExitCode> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    // Check if config already exists
    if config_path.exists() && !force {
        eprintln!(
            "{} Configuration already exists: {}",
            style("!").yellow(),
            config_path.display()
        );
        eprintln!("  Use --force to overwrite.");
        return Ok(ExitCode::FAILURE);
    }

    let config = Config {
        checks: vec![CheckEntry {
            id: builtin::names::DOCKER_IMAGE.to_string(),
            parameters: vec!["ubuntu".to_string()],
        }],
        ..Config::default()
    };

    let toml = toml::to_string_pretty(&config).map_err(|e| Error::Internal {
        message: format!("Failed to serialize config: {e}"),
    })?;

    std::fs::write(&config_path, toml).map_err(|e| Error::io("write config", e))?;

    eprintln!("{} Created {}", style("✓").green(), config_path.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit the [[checks]] in {CONFIG_FILE_NAME}");
    eprintln!("  2. Run: probe run");

    Ok(ExitCode::SUCCESS)
}

/// Show configuration.
pub fn config(config_path: Option<&Path>, raw: bool) -> Result<ExitCode> {
    let path = match config_path {
        Some(p) => Ok(p.to_path_buf()),
        None => Config::find_config_file(),
    };

    match path {
        Ok(path) => {
            eprintln!("Configuration file: {}", path.display());

            let content = std::fs::read_to_string(&path).map_err(|e| Error::io("read config", e))?;
            eprintln!();
            if raw {
                std::io::stdout()
                    .write_all(content.as_bytes())
                    .map_err(|e| Error::io("write output", e))?;
            } else {
                let config = Config::load_from(&path)?;
                eprintln!("  docker.command: {}", config.docker.command);
                eprintln!("  docker.timeout: {}", config.docker.timeout);
                eprintln!(
                    "  tabular.case_sensitive_headers: {}",
                    config.tabular.case_sensitive_headers
                );
                eprintln!("  checks: {}", config.checks.len());
            }

            Ok(ExitCode::SUCCESS)
        },
        Err(Error::ConfigNotFound { .. }) => {
            eprintln!("{} No configuration file found", style("!").yellow());
            eprintln!("  Run: probe init");
            Ok(ExitCode::FAILURE)
        },
        Err(e) => Err(e),
    }
}

/// Generate shell completions.
pub fn completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    clap_complete::generate(
        shell,
        &mut super::Cli::command(),
        "probe",
        &mut std::io::stdout(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(exit_code(0), ExitCode::SUCCESS);
        assert_eq!(exit_code(1), ExitCode::from(1));
        assert_eq!(exit_code(78), ExitCode::from(78));
        assert_eq!(exit_code(-1), ExitCode::FAILURE);
        assert_eq!(exit_code(300), ExitCode::FAILURE);
    }

    #[test]
    fn test_load_checklist_defaults_to_config() {
        let mut config = Config::default();
        config.checks.push(CheckEntry {
            id: "dockerimage".to_string(),
            parameters: vec!["ubuntu".to_string()],
        });

        let checklist = load_checklist(&config, None).expect("checklist");
        assert_eq!(checklist.name, "default");
        assert_eq!(checklist.checks.len(), 1);
    }

    #[test]
    fn test_load_checklist_from_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("other.toml");
        std::fs::write(&path, "[[checks]]\nid = \"dockerrunning\"\nparameters = [\"redis\"]\n")
            .expect("write");

        let checklist = load_checklist(&Config::default(), Some(&path)).expect("checklist");
        assert_eq!(checklist.name, "other");
        assert_eq!(checklist.checks[0].id, "dockerrunning");
    }

    #[test]
    fn test_load_config_explicit_missing() {
        let dir = TempDir::new().expect("tempdir");
        let err = load_config(Some(&dir.path().join(CONFIG_FILE_NAME))).expect_err("missing");
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }
}
