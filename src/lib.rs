//! # host-probe
//!
//! Host compliance checks for Docker images and containers.
//!
//! A check is a named, parameterized probe of host state that yields a
//! [`Verdict`]: pass, or fail with a message naming what was searched for and
//! what was actually there.
//!
//! ## Features
//!
//! - **Check registry**: checks are registered by name with a fixed parameter
//!   count, enforced before the check runs
//! - **Two acquisition strategies**: scrape `docker` CLI tables, or ask the
//!   Docker Engine API; both report the same running containers
//! - **Lenient table parsing**: whitespace-aligned output is split on runs of
//!   two or more spaces, ragged rows are dropped
//! - **Checklists**: run many checks from `probe.toml` or a JSON/TOML file
//!
//! ## Example
//!
//! ```rust,no_run
//! use host_probe::{Config, Host, Registry};
//!
//! fn main() -> host_probe::Result<()> {
//!     let config = Config::load_or_default()?;
//!     let host = Host::system(config.docker_settings(), config.timeout())?;
//!     let registry = Registry::with_builtin_checks();
//!
//!     let verdict = registry.invoke(&host, "dockerimage", &["ubuntu".to_string()])?;
//!     if !verdict.passed() {
//!         eprintln!("{}", verdict.message());
//!         std::process::exit(verdict.exit_code());
//!     }
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/host-probe/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod acquire;
pub mod checks;
pub mod cli;
pub mod config;
pub mod core;
pub mod tabular;

// Re-export main types for convenience
pub use acquire::{Host, ResourceSource};
pub use config::{Checklist, Config};
pub use core::error::{Error, Result};
pub use core::registry::{CheckDefinition, Registry};
pub use core::runner::{CheckResult, RunResult, Runner};
pub use core::verdict::Verdict;
