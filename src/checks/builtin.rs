//! Built-in check definitions.
//!
//! These checks are registered by [`register_all`] in every registry the CLI
//! builds.

use crate::core::registry::Registry;

/// Names of built-in checks.
pub mod names {
    /// An image is pulled (exact repository name).
    pub const DOCKER_IMAGE: &str = "dockerimage";
    /// An image is pulled (regular expression).
    pub const DOCKER_IMAGE_REGEXP: &str = "dockerimageregexp";
    /// A container is running (image name substring).
    pub const DOCKER_RUNNING: &str = "dockerrunning";
    /// A container is running (regular expression).
    pub const DOCKER_RUNNING_REGEXP: &str = "dockerrunningregexp";
    /// A container is running, asked through the Docker Engine API.
    pub const DOCKER_RUNNING_API: &str = "dockerrunningapi";
}

/// Registers every built-in check.
pub fn register_all(registry: &mut Registry) {
    super::docker::register(registry);
}

/// Returns a description of a check's parameters and intent.
#[must_use]
pub fn description(name: &str) -> &'static str {
    match name {
        names::DOCKER_IMAGE => "<image>: image has been pulled (exact name)",
        names::DOCKER_IMAGE_REGEXP => "<regexp>: some pulled image matches",
        names::DOCKER_RUNNING => "<image>: a running container's image contains the name",
        names::DOCKER_RUNNING_REGEXP => "<regexp>: a running container's image matches",
        names::DOCKER_RUNNING_API => {
            "<endpoint> <image>: like dockerrunning, via the Docker Engine API"
        },
        _ => "(no description)",
    }
}
