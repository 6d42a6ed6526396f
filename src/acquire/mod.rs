//! Acquisition of host state.
//!
//! Checks never talk to Docker directly. They ask a [`ResourceSource`] for an
//! ordered list of identifiers and compare against that. Two families of
//! sources exist:
//!
//! - [`cli`]: scrape the text output of the `docker` command line tool;
//! - [`api`]: query the Docker Engine API.
//!
//! For the same host state both container sources return the same set of
//! running images. The text path relies on column heuristics while the API
//! path reads structured fields, so the two are tested against each other.
//!
//! A [`Host`] bundles the external collaborators (command runner, API
//! connector, settings) and hands out sources on demand. Nothing is cached:
//! every call re-acquires.

pub mod api;
pub mod cli;

use crate::core::error::{Error, Result};
use crate::tabular::TableOptions;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub use api::{ApiConnector, ApiRunningContainers, BollardConnector, ContainerApi, ContainerRecord};
pub use cli::{CommandRunner, DockerImages, ProcessRunner, RunningContainers};

/// Status substring marking a container as running (`Up 2 hours`, `Up 5 seconds (Paused)`).
pub const RUNNING_MARKER: &str = "Up";

/// Returns true if a status string denotes a running container.
#[must_use]
pub fn is_running(status: &str) -> bool {
    status.contains(RUNNING_MARKER)
}

/// A provider of resource state.
pub trait ResourceSource {
    /// Acquires the current identifiers, in the order the backend reports them.
    ///
    /// Any error means the state is unknown and is fatal to the run.
    fn identifiers(&self) -> Result<Vec<String>>;
}

/// Settings shared by the Docker sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerSettings {
    /// Program invoked for the text-scrape strategy.
    pub command: String,
    /// How scraped tables are interpreted.
    pub table: TableOptions,
}

impl Default for DockerSettings {
    fn default() -> Self {
        Self {
            command: "docker".to_string(),
            table: TableOptions::default(),
        }
    }
}

/// The external collaborators checks observe the host through.
///
/// A `Host` is `Send + Sync`; checks may be invoked against one host from
/// several threads at once.
#[derive(Clone)]
pub struct Host {
    runner: Arc<dyn CommandRunner>,
    connector: Arc<dyn ApiConnector>,
    settings: DockerSettings,
}

impl Host {
    /// Creates a host from explicit collaborators.
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        connector: Arc<dyn ApiConnector>,
        settings: DockerSettings,
    ) -> Self {
        Self {
            runner,
            connector,
            settings,
        }
    }

    /// Creates a host backed by real processes and the Docker Engine API.
    ///
    /// Both share one current-thread runtime; each acquisition blocks on it.
    /// `timeout` bounds every external command and API call, `None` lets them
    /// block indefinitely.
    pub fn system(settings: DockerSettings, timeout: Option<Duration>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::io("create async runtime", e))?;
        let runtime = Arc::new(runtime);

        let runner = ProcessRunner::new(Arc::clone(&runtime), timeout);
        let connector = BollardConnector::new(runtime, timeout);

        Ok(Self::new(Arc::new(runner), Arc::new(connector), settings))
    }

    /// Locally pulled images, via `docker images`.
    #[must_use]
    pub fn docker_images(&self) -> DockerImages<'_> {
        DockerImages::new(self.runner.as_ref(), &self.settings)
    }

    /// Images of running containers, via `docker ps -a`.
    #[must_use]
    pub fn running_containers(&self) -> RunningContainers<'_> {
        RunningContainers::new(self.runner.as_ref(), &self.settings)
    }

    /// Images of running containers, via the Docker Engine API at `endpoint`.
    #[must_use]
    pub fn api_running_containers<'a>(&'a self, endpoint: &'a str) -> ApiRunningContainers<'a> {
        ApiRunningContainers::new(self.connector.as_ref(), endpoint)
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
