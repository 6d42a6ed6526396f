//! Integration tests for the probe CLI.
//!
//! Docker is replaced by `tests/fixtures/fake-docker`, a shell script that
//! prints canned `docker images` / `docker ps -a` tables. `FAKE_DOCKER_MODE`
//! switches it into failure modes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn probe() -> Command {
    let mut cmd = Command::cargo_bin("probe").expect("probe binary");
    cmd.env_remove("PROBE_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn fake_docker() -> PathBuf {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("fake-docker");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("make fake docker executable");
    }

    path
}

/// Creates a directory holding a probe.toml that points at the fake docker.
fn workspace(checks: &str) -> TempDir {
    let temp = TempDir::new().expect("create temp dir");
    let config = format!(
        "name = \"integration\"\n\n[docker]\ncommand = \"{}\"\ntimeout = \"10s\"\n\n{checks}",
        fake_docker().display()
    );
    std::fs::write(temp.path().join("probe.toml"), config).expect("write config");
    temp
}

#[test]
fn test_help() {
    probe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Host compliance checks"));
}

#[test]
fn test_version() {
    probe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_list_shows_builtin_checks() {
    probe()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("dockerimage (1)"))
        .stdout(predicate::str::contains("dockerrunningregexp (1)"))
        .stdout(predicate::str::contains("dockerrunningapi (2)"));
}

#[test]
fn test_completions_bash() {
    probe()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("probe"));
}

// =============================================================================
// probe check
// =============================================================================

#[cfg(unix)]
#[test]
fn test_check_image_present() {
    let temp = workspace("");

    probe()
        .args(["check", "dockerimage", "ubuntu"])
        .current_dir(temp.path())
        .assert()
        .success();
}

#[cfg(unix)]
#[test]
fn test_check_image_missing_reports_candidates() {
    let temp = workspace("");

    probe()
        .args(["check", "dockerimage", "ubuntu1"])
        .current_dir(temp.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Docker image was not found"))
        .stdout(predicate::str::contains("Specified: ubuntu1"))
        .stdout(predicate::str::contains("[ubuntu, alpine]"));
}

#[cfg(unix)]
#[test]
fn test_check_image_regexp() {
    let temp = workspace("");

    probe()
        .args(["check", "dockerimageregexp", "^ubu.*"])
        .current_dir(temp.path())
        .assert()
        .success();

    probe()
        .args(["check", "dockerimageregexp", "^zzz"])
        .current_dir(temp.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("^zzz"));
}

#[cfg(unix)]
#[test]
fn test_check_running_container() {
    let temp = workspace("");

    probe()
        .args(["check", "dockerrunning", "redis"])
        .current_dir(temp.path())
        .assert()
        .success();

    probe()
        .args(["check", "dockerrunning", "mysql"])
        .current_dir(temp.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Docker container not running"))
        .stdout(predicate::str::contains("Actual: [redis]"));
}

#[cfg(unix)]
#[test]
fn test_check_with_explicit_config_flag() {
    let temp = workspace("");
    let elsewhere = TempDir::new().expect("create temp dir");

    probe()
        .arg("--config")
        .arg(temp.path().join("probe.toml"))
        .args(["check", "dockerrunningregexp", "^red"])
        .current_dir(elsewhere.path())
        .assert()
        .success();
}

#[test]
fn test_check_without_parameters_is_configuration_error() {
    let temp = TempDir::new().expect("create temp dir");

    probe()
        .args(["check", "dockerimage"])
        .current_dir(temp.path())
        .assert()
        .code(78)
        .stderr(predicate::str::contains("expects 1 parameter(s), got 0"));
}

#[test]
fn test_check_unknown_name() {
    let temp = TempDir::new().expect("create temp dir");

    probe()
        .args(["check", "dockervolume", "data"])
        .current_dir(temp.path())
        .assert()
        .code(78)
        .stderr(predicate::str::contains("Unknown check: dockervolume"));
}

#[test]
fn test_check_invalid_pattern() {
    let temp = TempDir::new().expect("create temp dir");

    probe()
        .args(["check", "dockerimageregexp", "(unclosed"])
        .current_dir(temp.path())
        .assert()
        .code(78)
        .stderr(predicate::str::contains("Invalid pattern '(unclosed'"));
}

#[cfg(unix)]
#[test]
fn test_check_permission_denied_is_fatal() {
    let temp = workspace("");

    probe()
        .args(["check", "dockerrunning", "redis"])
        .env("FAKE_DOCKER_MODE", "denied")
        .current_dir(temp.path())
        .assert()
        .code(77)
        .stderr(predicate::str::contains("Permission denied when running"))
        .stderr(predicate::str::contains("ps -a"));
}

#[cfg(unix)]
#[test]
fn test_check_daemon_down_is_fatal() {
    let temp = workspace("");

    probe()
        .args(["check", "dockerimage", "ubuntu"])
        .env("FAKE_DOCKER_MODE", "down")
        .current_dir(temp.path())
        .assert()
        .code(69)
        .stderr(predicate::str::contains("Cannot connect to the Docker daemon"));
}

#[test]
fn test_check_missing_docker_binary() {
    let temp = TempDir::new().expect("create temp dir");
    std::fs::write(
        temp.path().join("probe.toml"),
        "[docker]\ncommand = \"definitely-not-docker-12345\"\n",
    )
    .expect("write config");

    probe()
        .args(["check", "dockerimage", "ubuntu"])
        .current_dir(temp.path())
        .assert()
        .code(69)
        .stderr(predicate::str::contains("Command not found: definitely-not-docker-12345"));
}

// =============================================================================
// probe run
// =============================================================================

#[cfg(unix)]
#[test]
fn test_run_config_checklist_passes() {
    let temp = workspace(
        r#"
[[checks]]
id = "dockerimage"
parameters = ["alpine"]

[[checks]]
id = "dockerrunning"
parameters = ["redis"]
"#,
    );

    probe()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("All checks passed (2 passed)"));
}

#[cfg(unix)]
#[test]
fn test_run_json_checklist_with_failures() {
    let temp = workspace("");
    let checklist = temp.path().join("host.json");
    std::fs::write(
        &checklist,
        r#"{
  "Name": "docker host",
  "Checklist": [
    {"ID": "dockerimage", "Parameters": ["ubuntu"]},
    {"ID": "dockerrunning", "Parameters": ["mysql"]},
    {"ID": "dockerimage", "Parameters": []}
  ]
}"#,
    )
    .expect("write checklist");

    probe()
        .args(["run", "--checklist"])
        .arg(&checklist)
        .current_dir(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("docker host"))
        .stderr(predicate::str::contains("2 of 3 check(s) failed"))
        .stderr(predicate::str::contains("Failed: dockerrunning mysql"))
        .stderr(predicate::str::contains("expects 1 parameter(s), got 0"));
}

#[cfg(unix)]
#[test]
fn test_run_stops_on_permission_denied() {
    let temp = workspace(
        r#"
[[checks]]
id = "dockerimage"
parameters = ["ubuntu"]
"#,
    );

    probe()
        .arg("run")
        .env("FAKE_DOCKER_MODE", "denied")
        .current_dir(temp.path())
        .assert()
        .code(77)
        .stderr(predicate::str::contains("Permission denied"));
}

#[test]
fn test_run_without_checks() {
    let temp = TempDir::new().expect("create temp dir");

    probe()
        .arg("run")
        .current_dir(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("No checks to run"));
}

// =============================================================================
// probe validate / init / config
// =============================================================================

#[cfg(unix)]
#[test]
fn test_validate_good_config() {
    let temp = workspace(
        r#"
[[checks]]
id = "dockerrunningapi"
parameters = ["default", "redis"]
"#,
    );

    probe()
        .arg("validate")
        .current_dir(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Configuration is valid (1 checks)"));
}

#[cfg(unix)]
#[test]
fn test_validate_reports_bad_entries() {
    let temp = workspace(
        r#"
[[checks]]
id = "dockerrunningapi"
parameters = ["redis"]

[[checks]]
id = "nosuchcheck"
"#,
    );

    probe()
        .arg("validate")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("expects 2 parameter(s), got 1"))
        .stderr(predicate::str::contains("Unknown check: nosuchcheck"));
}

#[test]
fn test_validate_missing_config() {
    let temp = TempDir::new().expect("create temp dir");

    probe()
        .arg("validate")
        .arg("--config")
        .arg(temp.path().join("probe.toml"))
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration not found"));
}

#[test]
fn test_validate_invalid_timeout() {
    let temp = TempDir::new().expect("create temp dir");
    std::fs::write(temp.path().join("probe.toml"), "[docker]\ntimeout = \"soon\"\n")
        .expect("write config");

    probe()
        .arg("validate")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("docker.timeout"));
}

#[test]
fn test_init_creates_config() {
    let temp = TempDir::new().expect("create temp dir");

    probe()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Created probe.toml"));

    let config = std::fs::read_to_string(temp.path().join("probe.toml")).expect("read config");
    assert!(config.contains("[docker]"));
    assert!(config.contains("dockerimage"));
}

#[test]
fn test_init_already_exists() {
    let temp = TempDir::new().expect("create temp dir");
    std::fs::write(temp.path().join("probe.toml"), "").expect("create config");

    probe()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_raw() {
    let temp = TempDir::new().expect("create temp dir");
    std::fs::write(temp.path().join("probe.toml"), "name = \"raw-check\"\n").expect("write");

    probe()
        .args(["config", "--raw"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("name = \"raw-check\""));
}
