//! The text-scrape and API strategies must agree on which containers run.

use host_probe::acquire::{
    ApiConnector, CommandRunner, ContainerApi, ContainerRecord, DockerSettings, Host,
};
use host_probe::core::executor::CommandOutput;
use host_probe::{Registry, ResourceSource, Result};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::collections::BTreeSet;
use std::sync::Arc;

/// One simulated container: image, `docker ps` status text.
type Container = (&'static str, &'static str);

/// Renders `docker ps -a` output for the given containers.
fn render_ps(containers: &[Container]) -> String {
    let mut out = format!(
        "{:<15}{:<18}{:<26}{:<16}{:<26}{:<12}{}\n",
        "CONTAINER ID", "IMAGE", "COMMAND", "CREATED", "STATUS", "PORTS", "NAMES"
    );
    for (index, (image, status)) in containers.iter().enumerate() {
        out.push_str(&format!(
            "{:<15}{:<18}{:<26}{:<16}{:<26}{:<12}{}\n",
            format!("{index:012x}"),
            image,
            "\"entrypoint.sh\"",
            "2 hours ago",
            status,
            "80/tcp",
            format!("ctr{index}")
        ));
    }
    out
}

struct ScriptedRunner {
    ps: String,
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, _program: &str, args: &[String]) -> Result<CommandOutput> {
        match args.first().map(String::as_str) {
            Some("ps") => Ok(CommandOutput::success_with(self.ps.clone())),
            _ => Ok(CommandOutput::failure_with(2, "unexpected command")),
        }
    }
}

struct ScriptedApi {
    records: Vec<ContainerRecord>,
}

impl ContainerApi for ScriptedApi {
    fn list_containers(&self, running_only: bool) -> Result<Vec<ContainerRecord>> {
        // Honour the server-side filter the way the daemon does.
        Ok(self
            .records
            .iter()
            .filter(|r| !running_only || r.status.starts_with("Up"))
            .cloned()
            .collect())
    }
}

struct ScriptedConnector {
    records: Vec<ContainerRecord>,
}

impl ApiConnector for ScriptedConnector {
    fn connect(&self, _endpoint: &str) -> Result<Box<dyn ContainerApi>> {
        Ok(Box::new(ScriptedApi {
            records: self.records.clone(),
        }))
    }
}

fn host_for(containers: &[Container]) -> Host {
    let runner = ScriptedRunner {
        ps: render_ps(containers),
    };
    let connector = ScriptedConnector {
        records: containers
            .iter()
            .map(|(image, status)| ContainerRecord::new(*image, *status))
            .collect(),
    };
    Host::new(Arc::new(runner), Arc::new(connector), DockerSettings::default())
}

fn as_set(values: Vec<String>) -> BTreeSet<String> {
    values.into_iter().collect()
}

#[test]
fn test_redis_up_mysql_exited() {
    let host = host_for(&[("redis", "Up 2 hours"), ("mysql", "Exited (0) 3 hours ago")]);

    let scraped = host.running_containers().identifiers().expect("scrape");
    let api = host
        .api_running_containers("default")
        .identifiers()
        .expect("api");

    assert_eq!(scraped, vec!["redis"]);
    assert_eq!(api, vec!["redis"]);
}

#[rstest]
#[case::none(&[])]
#[case::all_stopped(&[("mysql", "Exited (1) 2 minutes ago"), ("redis", "Created")])]
#[case::all_running(&[("redis:7-alpine", "Up 5 seconds"), ("nginx:1.25", "Up 3 days (healthy)")])]
#[case::paused(&[("postgres:16", "Up 10 minutes (Paused)"), ("busybox", "Exited (137) 1 hour ago")])]
#[case::duplicates(&[("redis", "Up 1 hour"), ("redis", "Up 2 hours"), ("redis", "Exited (0) 1 day ago")])]
fn test_strategies_agree(#[case] containers: &[Container]) {
    let host = host_for(containers);

    let scraped = host.running_containers().identifiers().expect("scrape");
    let api = host
        .api_running_containers("default")
        .identifiers()
        .expect("api");

    assert_eq!(as_set(scraped.clone()), as_set(api.clone()));
    assert_eq!(scraped.len(), api.len());
}

#[rstest]
#[case("redis", true)]
#[case("red", true)]
#[case("mysql", false)]
fn test_running_checks_agree(#[case] target: &str, #[case] expected: bool) {
    let host = host_for(&[("redis", "Up 2 hours"), ("mysql", "Exited (0) 3 hours ago")]);
    let registry = Registry::with_builtin_checks();

    let scraped = registry
        .invoke(&host, "dockerrunning", &[target.to_string()])
        .expect("dockerrunning");
    let api = registry
        .invoke(
            &host,
            "dockerrunningapi",
            &["default".to_string(), target.to_string()],
        )
        .expect("dockerrunningapi");

    assert_eq!(scraped.passed(), expected);
    assert_eq!(scraped, api);
}

#[test]
fn test_empty_ports_cell_drops_running_container() {
    // An empty cell collapses into the surrounding padding, so the row comes
    // up one field short and is dropped. The API still sees the container.
    let ps = "\
CONTAINER ID   IMAGE     COMMAND       CREATED       STATUS       PORTS      NAMES
4c01db0b339c   redis     \"redis\"       2 hours ago   Up 2 hours   6379/tcp   cache
9a1b2c3d4e5f   worker    \"run\"         1 hour ago    Up 1 hour               jobs
";
    let host = Host::new(
        Arc::new(ScriptedRunner { ps: ps.to_string() }),
        Arc::new(ScriptedConnector {
            records: vec![
                ContainerRecord::new("redis", "Up 2 hours"),
                ContainerRecord::new("worker", "Up 1 hour"),
            ],
        }),
        DockerSettings::default(),
    );

    let scraped = host.running_containers().identifiers().expect("scrape");
    let api = host
        .api_running_containers("default")
        .identifiers()
        .expect("api");

    assert_eq!(scraped, vec!["redis"]);
    assert_eq!(api, vec!["redis", "worker"]);
}

#[test]
fn test_checks_run_concurrently_on_shared_host() {
    let host = host_for(&[("redis", "Up 2 hours"), ("mysql", "Exited (0) 3 hours ago")]);
    let registry = Registry::with_builtin_checks();

    let verdicts: Vec<bool> = std::thread::scope(|scope| {
        let handles: Vec<_> = ["redis", "mysql", "redis", "mysql"]
            .into_iter()
            .map(|target| {
                let (host, registry) = (&host, &registry);
                scope.spawn(move || {
                    registry
                        .invoke(host, "dockerrunning", &[target.to_string()])
                        .expect("dockerrunning")
                        .passed()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread"))
            .collect()
    });

    assert_eq!(verdicts, vec![true, false, true, false]);
}
