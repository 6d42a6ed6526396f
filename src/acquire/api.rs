//! Structured acquisition through the Docker Engine API.

use super::{is_running, ResourceSource};
use crate::core::error::{Error, Result};
use bollard::container::ListContainersOptions;
use bollard::Docker;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Endpoint locator resolved from `DOCKER_HOST`, falling back to the local socket.
pub const DEFAULT_ENDPOINT: &str = "default";

/// Socket used by [`DEFAULT_ENDPOINT`] when `DOCKER_HOST` is unset.
pub const LOCAL_SOCKET: &str = "unix:///var/run/docker.sock";

/// Client timeout standing in for "no timeout". Tokio treats a deadline past
/// the end of `Instant` as never firing.
const UNBOUNDED_TIMEOUT: Duration = Duration::from_secs(u64::MAX);

/// Resolves [`DEFAULT_ENDPOINT`] against the value of `DOCKER_HOST`.
/// Explicit endpoints are returned unchanged.
#[must_use]
pub fn resolve_endpoint(endpoint: &str, docker_host: Option<&str>) -> String {
    if endpoint != DEFAULT_ENDPOINT {
        return endpoint.to_string();
    }
    match docker_host.map(str::trim) {
        Some(host) if !host.is_empty() => host.to_string(),
        _ => LOCAL_SOCKET.to_string(),
    }
}

/// One container as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    /// Image the container was started from.
    pub identifier: String,
    /// Human-readable status (`Up 2 hours`, `Exited (0) ...`).
    pub status: String,
}

impl ContainerRecord {
    /// Creates a record.
    pub fn new(identifier: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            status: status.into(),
        }
    }
}

/// A connected Docker API client.
#[cfg_attr(test, mockall::automock)]
pub trait ContainerApi {
    /// Lists containers, restricted server-side to running ones when asked.
    fn list_containers(&self, running_only: bool) -> Result<Vec<ContainerRecord>>;
}

/// Builds API clients from endpoint locators.
///
/// Connectors are shared between threads through [`super::Host`].
#[cfg_attr(test, mockall::automock)]
pub trait ApiConnector: Send + Sync {
    /// Connects to `endpoint`.
    ///
    /// Accepted forms: `unix:///path/to/docker.sock`, `tcp://host:port`,
    /// `http://host:port`, or [`DEFAULT_ENDPOINT`].
    fn connect(&self, endpoint: &str) -> Result<Box<dyn ContainerApi>>;
}

impl fmt::Debug for dyn ApiConnector + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiConnector")
    }
}

/// [`ApiConnector`] backed by bollard.
#[derive(Debug)]
pub struct BollardConnector {
    runtime: Arc<Runtime>,
    timeout: Duration,
}

impl BollardConnector {
    /// Creates a connector whose clients block on `runtime`.
    ///
    /// bollard counts whole seconds, so a sub-second `timeout` is rounded up
    /// to one second. `None` leaves requests unbounded.
    #[must_use]
    pub fn new(runtime: Arc<Runtime>, timeout: Option<Duration>) -> Self {
        let timeout = timeout.map_or(UNBOUNDED_TIMEOUT, |d| {
            Duration::from_secs(d.as_secs().max(1))
        });
        Self { runtime, timeout }
    }

    fn docker_for(&self, endpoint: &str) -> std::result::Result<Docker, String> {
        let docker_host = std::env::var("DOCKER_HOST").ok();
        let resolved = resolve_endpoint(endpoint, docker_host.as_deref());
        let secs = self.timeout.as_secs();

        let docker = if resolved.starts_with("unix://") {
            connect_unix(&resolved, secs)?
        } else if resolved.starts_with("tcp://") || resolved.starts_with("http://") {
            Docker::connect_with_http(&resolved, secs, bollard::API_DEFAULT_VERSION)
                .map_err(|e| e.to_string())?
        } else {
            return Err("unsupported endpoint scheme".to_string());
        };

        Ok(docker.with_timeout(self.timeout))
    }
}

#[cfg(unix)]
fn connect_unix(endpoint: &str, timeout_secs: u64) -> std::result::Result<Docker, String> {
    Docker::connect_with_unix(endpoint, timeout_secs, bollard::API_DEFAULT_VERSION)
        .map_err(|e| e.to_string())
}

#[cfg(not(unix))]
fn connect_unix(_endpoint: &str, _timeout_secs: u64) -> std::result::Result<Docker, String> {
    Err("unix sockets are not supported on this platform".to_string())
}

impl ApiConnector for BollardConnector {
    fn connect(&self, endpoint: &str) -> Result<Box<dyn ContainerApi>> {
        // Client construction may register with the reactor.
        let _guard = self.runtime.enter();

        let docker = self.docker_for(endpoint).map_err(|message| Error::ApiConnect {
            endpoint: endpoint.to_string(),
            message,
        })?;

        tracing::debug!(endpoint, timeout = ?docker.timeout(), "Connected Docker API client");
        Ok(Box::new(BollardApi {
            docker,
            runtime: Arc::clone(&self.runtime),
        }))
    }
}

struct BollardApi {
    docker: Docker,
    runtime: Arc<Runtime>,
}

impl ContainerApi for BollardApi {
    fn list_containers(&self, running_only: bool) -> Result<Vec<ContainerRecord>> {
        let mut filters = HashMap::new();
        if running_only {
            filters.insert("status".to_string(), vec!["running".to_string()]);
        }
        let options = ListContainersOptions::<String> {
            all: !running_only,
            filters,
            ..Default::default()
        };

        let summaries = self
            .runtime
            .block_on(self.docker.list_containers(Some(options)))
            .map_err(|e| Error::api_request("list containers", e))?;

        Ok(summaries
            .into_iter()
            .map(|summary| ContainerRecord {
                identifier: summary.image.unwrap_or_default(),
                status: summary.status.unwrap_or_default(),
            })
            .collect())
    }
}

/// Images of running containers, from the Docker Engine API.
///
/// Listing is filtered to running containers by the API itself, then again
/// on the status text, so a daemon ignoring the filter still yields the same
/// result as the text-scrape path.
#[derive(Debug)]
pub struct ApiRunningContainers<'a> {
    connector: &'a dyn ApiConnector,
    endpoint: &'a str,
}

impl<'a> ApiRunningContainers<'a> {
    /// Creates the source for `endpoint`.
    #[must_use]
    pub fn new(connector: &'a dyn ApiConnector, endpoint: &'a str) -> Self {
        Self {
            connector,
            endpoint,
        }
    }
}

impl ResourceSource for ApiRunningContainers<'_> {
    fn identifiers(&self) -> Result<Vec<String>> {
        let client = self.connector.connect(self.endpoint)?;
        let records = client.list_containers(true)?;

        Ok(records
            .into_iter()
            .filter(|record| is_running(&record.status))
            .map(|record| record.identifier)
            .collect())
    }
}
