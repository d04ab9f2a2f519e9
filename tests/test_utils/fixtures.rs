//! Test fixtures

use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};

use companion_host::config::Config;
use companion_host::worker::WorkerSpec;

static HOST_LOCK: Mutex<()> = Mutex::const_new(());

/// Only one host may exist per process; tests building one hold this
pub async fn host_guard() -> MutexGuard<'static, ()> {
    HOST_LOCK.lock().await
}

/// Worker running `script` under `/bin/sh -c`
pub fn shell_spec(script: &str) -> WorkerSpec {
    WorkerSpec::new("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

/// Default configuration with the worker replaced by a shell script
pub fn shell_config(script: &str) -> Config {
    let mut config = Config::default();
    config.worker.program = "/bin/sh".to_string();
    config.worker.args = vec!["-c".to_string(), script.to_string()];
    config
}

/// Poll `condition` until it holds or `timeout` passes
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
