//! Contract Tests for Worker Lifecycle Management
//!
//! Start, stop, restart and command delivery of the supervised worker, using
//! small `/bin/sh` scripts as workers.

#![cfg(unix)]

#[path = "../test_utils/mod.rs"]
mod test_utils;

use companion_host::error::Error;
use companion_host::models::{Channel, WorkerState};
use companion_host::window::{WindowRegistry, WindowSurface};
use companion_host::worker::{Supervisor, WorkerSpec};
use nix::sys::signal::kill;
use nix::unistd::Pid;
use std::time::Duration;
use test_utils::{shell_spec, RecordingSurface};

fn supervisor(spec: WorkerSpec) -> (Supervisor, WindowRegistry) {
    let registry = WindowRegistry::new();
    (Supervisor::new(spec, registry.clone()), registry)
}

fn pid_alive(pid: u32) -> bool {
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

#[tokio::test]
async fn test_start_broadcasts_both_channels() {
    let (supervisor, registry) = supervisor(shell_spec("echo hello; echo; echo '   '; echo oops >&2"));
    let window = RecordingSurface::primary();

    let process = supervisor.start(window.as_window()).await.unwrap();
    assert!(process.pid.is_some());
    assert!(registry.contains(window.id()));

    assert!(window.wait_for_lines(2).await);
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(window.texts(Channel::Stdout), vec!["hello"]);
    assert_eq!(window.texts(Channel::Stderr), vec!["oops"]);
}

#[tokio::test]
async fn test_spawn_failure_then_retry() {
    let registry = WindowRegistry::new();
    let window = RecordingSurface::primary();

    let broken = Supervisor::new(WorkerSpec::new("/nonexistent/worker", Vec::new()), registry.clone());
    let result = broken.start(window.as_window()).await;
    assert!(matches!(result, Err(Error::SpawnFailed { .. })));
    assert!(!broken.is_running().await);

    let working = Supervisor::new(shell_spec("echo recovered"), registry);
    working.start(window.as_window()).await.unwrap();
    assert!(window.wait_for_lines(1).await);
    assert_eq!(window.texts(Channel::Stdout), vec!["recovered"]);
}

#[tokio::test]
async fn test_stop_without_worker_is_noop() {
    let (supervisor, registry) = supervisor(shell_spec("exit 0"));
    let bystander = RecordingSurface::overlay();
    let window = RecordingSurface::primary();
    registry.attach(bystander.as_window());
    registry.attach(window.as_window());

    supervisor.stop(window.id()).await.unwrap();

    assert!(!registry.contains(window.id()));
    assert!(registry.contains(bystander.id()));
    assert!(!bystander.is_closed());
}

#[tokio::test]
async fn test_stop_interrupts_worker() {
    let (supervisor, registry) = supervisor(shell_spec(
        "trap 'echo interrupted; exit 0' INT; echo ready; while :; do sleep 0.05; done",
    ));
    let window = RecordingSurface::primary();
    let bystander = RecordingSurface::overlay();
    registry.attach(bystander.as_window());

    supervisor.start(window.as_window()).await.unwrap();
    assert!(bystander.wait_for_lines(1).await);
    assert!(supervisor.is_running().await);

    supervisor.stop(window.id()).await.unwrap();

    assert!(!registry.contains(window.id()));
    assert!(!supervisor.is_running().await);
    let current = supervisor.current().await.unwrap();
    assert!(matches!(current.state, WorkerState::Signalled | WorkerState::Exited));

    // Only the window that stayed attached sees the worker react
    assert!(bystander.wait_for_lines(2).await);
    assert_eq!(bystander.texts(Channel::Stdout), vec!["ready", "interrupted"]);
    assert_eq!(window.texts(Channel::Stdout), vec!["ready"]);
}

#[tokio::test]
async fn test_stop_after_worker_exit_detaches() {
    let (supervisor, registry) = supervisor(shell_spec("echo done"));
    let window = RecordingSurface::primary();

    supervisor.start(window.as_window()).await.unwrap();
    assert!(window.wait_for_lines(1).await);
    let exited = tokio::time::timeout(Duration::from_secs(5), async {
        while supervisor.is_running().await {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(exited.is_ok());

    // Nothing is left to signal, so stop succeeds with only the detach
    supervisor.stop(window.id()).await.unwrap();

    assert!(!registry.contains(window.id()));
    let current = supervisor.current().await.unwrap();
    assert_eq!(current.state, WorkerState::Exited);
}

#[tokio::test]
async fn test_restart_isolates_instances() {
    let (supervisor, _registry) = supervisor(shell_spec("echo \"instance $$\"; exec sleep 30"));
    let window = RecordingSurface::primary();

    let first = supervisor.start(window.as_window()).await.unwrap();
    assert!(window.wait_for_lines(1).await);

    let second = supervisor.start(window.as_window()).await.unwrap();
    assert!(window.wait_for_lines(2).await);

    let first_pid = first.pid.unwrap();
    let second_pid = second.pid.unwrap();
    assert_ne!(first_pid, second_pid);

    // The old worker was killed and reaped before the new one started
    assert!(!pid_alive(first_pid));
    assert!(pid_alive(second_pid));

    assert_eq!(
        window.texts(Channel::Stdout),
        vec![format!("instance {}", first_pid), format!("instance {}", second_pid)]
    );

    supervisor.shutdown().await;
    assert!(!pid_alive(second_pid));
}

#[tokio::test]
async fn test_command_sink_round_trip() {
    let (supervisor, _registry) =
        supervisor(shell_spec("while read line; do echo \"got:$line\"; done"));
    let window = RecordingSurface::primary();
    let sink = supervisor.command_sink();

    supervisor.start(window.as_window()).await.unwrap();
    sink.send(r#"{"type": "ping"}"#).await.unwrap();
    sink.send(r#"{"type": "status"}"#).await.unwrap();

    assert!(window.wait_for_lines(2).await);
    assert_eq!(
        window.texts(Channel::Stdout),
        vec![r#"got:{"type": "ping"}"#, r#"got:{"type": "status"}"#]
    );

    supervisor.shutdown().await;
}

#[tokio::test]
async fn test_command_sink_without_worker() {
    let (supervisor, _registry) = supervisor(shell_spec("exec sleep 30"));
    let sink = supervisor.command_sink();

    assert!(matches!(sink.send("{}").await, Err(Error::WorkerUnavailable)));

    let window = RecordingSurface::primary();
    supervisor.start(window.as_window()).await.unwrap();
    supervisor.stop(window.id()).await.unwrap();

    assert!(matches!(sink.send("{}").await, Err(Error::WorkerUnavailable)));
}

#[tokio::test]
async fn test_command_sink_after_exit() {
    let (supervisor, _registry) = supervisor(shell_spec("exit 3"));
    let sink = supervisor.command_sink();
    let window = RecordingSurface::primary();

    supervisor.start(window.as_window()).await.unwrap();
    for _ in 0..250 {
        if !supervisor.is_running().await {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert!(matches!(sink.send("{}").await, Err(Error::WorkerUnavailable)));
    let current = supervisor.current().await.unwrap();
    assert_eq!(current.exit_code, Some(3));
}

#[tokio::test]
async fn test_environment_overlay() {
    let spec = shell_spec("echo \"$PYTHONUNBUFFERED:$COMPANION_TEST_VAR\"")
        .with_env("COMPANION_TEST_VAR", "overlaid");
    let (supervisor, _registry) = supervisor(spec);
    let window = RecordingSurface::primary();

    supervisor.start(window.as_window()).await.unwrap();
    assert!(window.wait_for_lines(1).await);
    assert_eq!(window.texts(Channel::Stdout), vec!["1:overlaid"]);
}

#[tokio::test]
async fn test_unterminated_output_is_dropped() {
    let (supervisor, _registry) = supervisor(shell_spec("printf 'done\\npartial'"));
    let window = RecordingSurface::primary();

    supervisor.start(window.as_window()).await.unwrap();
    assert!(window.wait_for_lines(1).await);
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(window.texts(Channel::Stdout), vec!["done"]);
}
