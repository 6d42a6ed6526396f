//! Docker image and container checks.

use super::builtin::names;
use super::{parse_user_regex, re_in, str_contained_in, str_in};
use crate::acquire::{Host, ResourceSource};
use crate::core::error::Result;
use crate::core::registry::Registry;
use crate::core::verdict::Verdict;

const IMAGE_NOT_FOUND: &str = "Docker image was not found";
const CONTAINER_NOT_RUNNING: &str = "Docker container not running";

/// Registers every Docker check.
pub fn register(registry: &mut Registry) {
    registry.register(names::DOCKER_IMAGE, docker_image, 1);
    registry.register(names::DOCKER_IMAGE_REGEXP, docker_image_regexp, 1);
    registry.register(names::DOCKER_RUNNING, docker_running, 1);
    registry.register(names::DOCKER_RUNNING_REGEXP, docker_running_regexp, 1);
    registry.register(names::DOCKER_RUNNING_API, docker_running_api, 2);
}

/// Passes if an image named exactly `parameters[0]` has been pulled.
pub fn docker_image(host: &Host, parameters: &[String]) -> Result<Verdict> {
    let name = &parameters[0];
    let images = host.docker_images().identifiers()?;
    Ok(exact(IMAGE_NOT_FOUND, name, &images))
}

/// Passes if some pulled image matches the pattern `parameters[0]`.
pub fn docker_image_regexp(host: &Host, parameters: &[String]) -> Result<Verdict> {
    let re = parse_user_regex(&parameters[0])?;
    let images = host.docker_images().identifiers()?;
    Ok(pattern(IMAGE_NOT_FOUND, &re, &images))
}

/// Passes if a running container's image contains `parameters[0]`.
pub fn docker_running(host: &Host, parameters: &[String]) -> Result<Verdict> {
    let name = &parameters[0];
    let running = host.running_containers().identifiers()?;
    Ok(containment(CONTAINER_NOT_RUNNING, name, &running))
}

/// Passes if a running container's image matches the pattern `parameters[0]`.
pub fn docker_running_regexp(host: &Host, parameters: &[String]) -> Result<Verdict> {
    let re = parse_user_regex(&parameters[0])?;
    let running = host.running_containers().identifiers()?;
    Ok(pattern(CONTAINER_NOT_RUNNING, &re, &running))
}

/// Like [`docker_running`], asking the API at `parameters[0]` for
/// `parameters[1]`.
pub fn docker_running_api(host: &Host, parameters: &[String]) -> Result<Verdict> {
    let endpoint = &parameters[0];
    let name = &parameters[1];
    let running = host.api_running_containers(endpoint).identifiers()?;
    Ok(containment(CONTAINER_NOT_RUNNING, name, &running))
}

fn exact(intent: &str, target: &str, candidates: &[String]) -> Verdict {
    if str_in(target, candidates) {
        Verdict::pass()
    } else {
        Verdict::fail(intent, target, candidates)
    }
}

fn containment(intent: &str, target: &str, candidates: &[String]) -> Verdict {
    if str_contained_in(target, candidates) {
        Verdict::pass()
    } else {
        Verdict::fail(intent, target, candidates)
    }
}

fn pattern(intent: &str, re: &regex::Regex, candidates: &[String]) -> Verdict {
    if re_in(re, candidates) {
        Verdict::pass()
    } else {
        Verdict::fail(intent, re.as_str(), candidates)
    }
}
