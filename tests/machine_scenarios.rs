//! End-to-end health machine scenarios: real probes, real commands.
#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use netguard::action::CommandRunner;
use netguard::config::loader::parse_config;
use netguard::health::{Cadence, Endpoint, HealthMachine, HttpProbe, Status, TargetGroup};
use netguard::lifecycle::{Shutdown, Supervisor};

mod common;

/// Backend whose health can be switched at runtime; unhealthy drops connections.
async fn switchable_backend(healthy: bool) -> (std::net::SocketAddr, Arc<AtomicBool>) {
    let flag = Arc::new(AtomicBool::new(healthy));
    let state = flag.clone();
    let addr = common::start_programmable_backend(move |_| {
        let up = state.load(Ordering::SeqCst);
        async move { up.then_some(200) }
    })
    .await;
    (addr, flag)
}

/// Write a script that appends its first argument to `log`.
fn recorder(dir: &Path) -> (PathBuf, PathBuf) {
    let script = dir.join("record.sh");
    let log = dir.join("actions.log");
    std::fs::write(&script, format!("echo \"$1\" >> {}\n", log.display())).unwrap();
    (script, log)
}

fn actions(log: &Path) -> Vec<String> {
    std::fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn group(endpoints: Vec<Endpoint>, script: &Path) -> TargetGroup {
    TargetGroup {
        name: "uplink".to_string(),
        endpoints,
        failure_threshold: 3,
        on_down: Some(format!("sh {} down", script.display())),
        on_up: Some(format!("sh {} up", script.display())),
        probe_timeout_up: Duration::from_millis(500),
        probe_timeout_down: Duration::from_millis(300),
        cadence: Cadence::fixed(Duration::from_millis(10)),
        proxy: None,
    }
}

#[tokio::test]
async fn test_outage_and_recovery_run_each_action_once() {
    let dir = tempfile::tempdir().unwrap();
    let (script, log) = recorder(dir.path());

    let (primary, primary_up) = switchable_backend(true).await;
    let backup = common::refused_addr().await;
    let endpoints = vec![
        Endpoint::new(primary.to_string(), "primary.example.com"),
        Endpoint::new(backup.to_string(), "backup.example.com"),
    ];
    let mut machine = HealthMachine::new(group(endpoints, &script), HttpProbe::new(), CommandRunner::new());

    // One live endpoint is enough.
    machine.step().await;
    assert_eq!(machine.state().status(), Status::Up);

    primary_up.store(false, Ordering::SeqCst);
    machine.step().await;
    machine.step().await;
    assert_eq!(machine.state().status(), Status::Up);
    assert!(actions(&log).is_empty());

    machine.step().await;
    assert_eq!(machine.state().status(), Status::Down);
    assert_eq!(actions(&log), ["down"]);

    machine.step().await;
    assert_eq!(actions(&log), ["down"]);

    primary_up.store(true, Ordering::SeqCst);
    machine.step().await;
    machine.step().await;
    assert_eq!(machine.state().status(), Status::Down);
    machine.step().await;
    assert_eq!(machine.state().status(), Status::Up);
    assert_eq!(actions(&log), ["down", "up"]);

    machine.step().await;
    assert_eq!(actions(&log), ["down", "up"]);
}

#[tokio::test]
async fn test_failing_action_does_not_stop_machine() {
    let refused = common::refused_addr().await;
    let mut group = group(vec![Endpoint::new(refused.to_string(), "x")], Path::new("/nonexistent"));
    group.failure_threshold = 1;
    group.on_down = Some("/nonexistent/netguard-action".to_string());
    let mut machine = HealthMachine::new(group, HttpProbe::new(), CommandRunner::new());

    machine.step().await;
    assert_eq!(machine.state().status(), Status::Down);
    machine.step().await;
    assert_eq!(machine.state().status(), Status::Down);
    assert_eq!(machine.status_handle().snapshot().cycles, 2);
}

#[tokio::test]
async fn test_configured_supervisor_tracks_backends_and_stops() {
    let dir = tempfile::tempdir().unwrap();
    let (script, log) = recorder(dir.path());
    let (live, _) = switchable_backend(true).await;
    let dead = common::refused_addr().await;

    let toml = format!(
        r#"
[[checkers]]
name = "live"
timeout_ms = 500
targets = [{{ address = "{live}", host = "live.example.com" }}]

[checkers.cadence]
interval_ms = 10
short_backoff_ms = 10
medium_backoff_ms = 10
long_backoff_ms = 10

[[checkers]]
name = "dead"
threshold = 2
timeout_ms = 300
post_down = "sh {script} dead-down"
targets = [{{ ip = "{dead}" }}]

[checkers.cadence]
interval_ms = 10
short_backoff_ms = 10
medium_backoff_ms = 10
long_backoff_ms = 10
"#,
        live = live,
        dead = dead,
        script = script.display(),
    );
    let config = parse_config(&toml).unwrap();

    let shutdown = Shutdown::new();
    let supervisor = Supervisor::launch(config.target_groups(), &shutdown);
    let statuses = supervisor.statuses();
    assert_eq!(statuses.len(), 2);

    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let dead_down = statuses
                .get("dead")
                .map(|s| s.status() == Status::Down)
                .unwrap_or(false);
            if dead_down && !actions(&log).is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("dead checker should go down");

    assert_eq!(statuses.get("live").unwrap().status(), Status::Up);
    assert_eq!(actions(&log), ["dead-down"]);

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(2), supervisor.wait())
        .await
        .expect("machines should stop promptly");
}
