//! Worker Process Spawning
//!
//! Launches the worker with all three standard streams piped. The child
//! inherits the host environment plus a small overlay, one variable of which
//! forces the worker's own output to be unbuffered so lines arrive as soon
//! as they are written.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};

use crate::config::WorkerConfig;
use crate::error::{Error, Result};
use crate::models::WorkerProcess;

/// How to launch the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSpec {
    /// Executable path
    pub program: String,
    /// Argument list
    pub args: Vec<String>,
    /// Working directory; the host's own when `None`
    pub working_directory: Option<PathBuf>,
    /// Variables set on top of the inherited environment
    pub environment: HashMap<String, String>,
    /// Variable forced to `1` to disable output buffering in the worker
    pub unbuffered_env: Option<String>,
}

impl WorkerSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            working_directory: None,
            environment: HashMap::new(),
            unbuffered_env: Some(DEFAULT_UNBUFFERED_ENV.to_string()),
        }
    }

    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    /// Variables applied over the inherited host environment
    pub fn environment_overlay(&self) -> HashMap<String, String> {
        let mut env = self.environment.clone();
        if let Some(var) = &self.unbuffered_env {
            env.insert(var.clone(), "1".to_string());
        }
        env
    }
}

impl From<&WorkerConfig> for WorkerSpec {
    fn from(config: &WorkerConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            working_directory: config.working_directory.clone(),
            environment: config.environment.clone(),
            unbuffered_env: config.unbuffered_env.clone(),
        }
    }
}

/// Python honours this one; other runtimes can be configured
pub const DEFAULT_UNBUFFERED_ENV: &str = "PYTHONUNBUFFERED";

/// A freshly spawned worker with its pipes taken
pub struct SpawnedWorker {
    pub child: Child,
    pub process: WorkerProcess,
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
}

/// Spawn the worker described by `spec`
pub fn spawn_worker(spec: &WorkerSpec) -> Result<SpawnedWorker> {
    let overlay = spec.environment_overlay();

    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .envs(&overlay)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = &spec.working_directory {
        command.current_dir(dir);
    }

    #[cfg(windows)]
    {
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        command.creation_flags(CREATE_NO_WINDOW);
    }

    let mut child = command.spawn().map_err(|e| Error::SpawnFailed {
        command: spec.program.clone(),
        reason: match &spec.working_directory {
            Some(dir) => format!("{} (in {})", e, dir.display()),
            None => e.to_string(),
        },
    })?;

    let stdin = child.stdin.take().ok_or_else(|| Error::StreamTakeFailed {
        stream: "stdin".to_string(),
    })?;
    let stdout = child.stdout.take().ok_or_else(|| Error::StreamTakeFailed {
        stream: "stdout".to_string(),
    })?;
    let stderr = child.stderr.take().ok_or_else(|| Error::StreamTakeFailed {
        stream: "stderr".to_string(),
    })?;

    let mut process = WorkerProcess::new(spec.program.clone(), spec.args.clone())
        .with_environment(overlay);
    if let Some(dir) = &spec.working_directory {
        process = process.with_working_directory(dir.clone());
    }
    process.mark_started(child.id());

    Ok(SpawnedWorker {
        child,
        process,
        stdin,
        stdout,
        stderr,
    })
}
