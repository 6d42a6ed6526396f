//! Command-line interface for host-probe.
//!
//! This module provides the `probe` CLI with subcommands for:
//! - `check`: Run a single check
//! - `run`: Run a checklist
//! - `list`: List registered checks
//! - `validate`: Validate configuration and checklist
//! - `init`: Write a starter configuration
//! - `config`: Show the configuration in effect

mod commands;

use crate::core::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Host compliance checks for Docker images and containers.
#[derive(Debug, Parser)]
#[command(
    name = "probe",
    author,
    version,
    about = "Host compliance checks for Docker images and containers",
    long_about = r#"
host-probe runs named, parameterized checks against the local host and
reports whether each one passes. Checks look at pulled Docker images and
running containers, through the docker CLI or the Docker Engine API.

Quick start:
  probe list                          # Show available checks
  probe check dockerimage ubuntu      # Run one check
  probe init && probe run             # Run the checklist in probe.toml

Exit codes:
  0    all checks passed
  1    a check failed
  69   Docker could not be queried
  77   permission denied while querying Docker
  78   configuration error (unknown check, wrong parameters, bad pattern)
  124  a Docker command timed out
"#,
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use color output.
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Configuration file (default: probe.toml in this or a parent directory).
    #[arg(short, long, global = true, env = "PROBE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Always use color.
    Always,
    /// Auto-detect color support.
    #[default]
    Auto,
    /// Never use color.
    Never,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a single check.
    #[command(visible_alias = "c")]
    Check {
        /// Check name, as shown by `probe list`.
        name: String,

        /// Check parameters.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        params: Vec<String>,
    },

    /// Run a checklist.
    #[command(visible_alias = "r")]
    Run {
        /// Checklist file (.toml or .json). Defaults to the checks in the config.
        #[arg(short = 'l', long)]
        checklist: Option<PathBuf>,
    },

    /// List registered checks.
    #[command(visible_alias = "l")]
    List,

    /// Validate the configuration and checklist without running anything.
    #[command(visible_alias = "v")]
    Validate {
        /// Checklist file to validate instead of the config's checks.
        #[arg(short = 'l', long)]
        checklist: Option<PathBuf>,
    },

    /// Write a starter probe.toml.
    Init {
        /// Overwrite existing configuration.
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file location and contents.
    Config {
        /// Output raw TOML.
        #[arg(long)]
        raw: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Runs the CLI.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Set up logging
    setup_logging(cli.verbose, cli.quiet);

    // Set up color
    setup_color(cli.color);

    let config = cli.config.as_deref();

    // If no subcommand, run the configured checklist
    match cli.command {
        Some(Commands::Check { name, params }) => commands::check(config, &name, &params),
        Some(Commands::Run { checklist }) => commands::run(config, checklist.as_deref(), cli.quiet),
        Some(Commands::List) => commands::list(),
        Some(Commands::Validate { checklist }) => commands::validate(config, checklist.as_deref()),
        Some(Commands::Init { force }) => commands::init(force),
        Some(Commands::Config { raw }) => commands::config(config, raw),
        Some(Commands::Completions { shell }) => {
            commands::completions(shell);
            Ok(ExitCode::SUCCESS)
        },
        None => commands::run(config, None, cli.quiet),
    }
}

/// Sets up logging based on verbosity flags.
fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Sets up color output.
fn setup_color(choice: ColorChoice) {
    match choice {
        ColorChoice::Always => {
            console::set_colors_enabled(true);
            console::set_colors_enabled_stderr(true);
        },
        ColorChoice::Never => {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        },
        ColorChoice::Auto => {
            // Let console crate auto-detect
        },
    }
}
