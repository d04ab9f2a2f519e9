//! Worker Process Model
//!
//! Bookkeeping for the one supervised worker: what was launched, where, and
//! how far along its lifecycle it is. The OS handle itself lives with the
//! supervisor; this is the part that can be cloned and inspected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

/// Lifecycle state of a worker process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WorkerState {
    /// Process has been described but not started
    #[default]
    Created,
    /// Process is running
    Running,
    /// A termination signal was sent; the process may still be exiting
    Signalled,
    /// Process has exited
    Exited,
}

/// Metadata of one worker instance
#[derive(Debug, Clone)]
pub struct WorkerProcess {
    /// Unique identifier for this instance
    pub id: Uuid,

    /// OS process identifier
    pub pid: Option<u32>,

    /// Current state of the process
    pub state: WorkerState,

    /// When the process was started
    pub start_time: Option<DateTime<Utc>>,

    /// When the process was seen to exit
    pub end_time: Option<DateTime<Utc>>,

    /// Exit code (if the process exited normally)
    pub exit_code: Option<i32>,

    /// Executable that was launched
    pub program: String,

    /// Arguments passed to the executable
    pub args: Vec<String>,

    /// Working directory of the process
    pub working_directory: Option<PathBuf>,

    /// Variables set on top of the inherited host environment
    pub environment: HashMap<String, String>,
}

impl WorkerProcess {
    /// Describe a new worker in the Created state
    pub fn new(program: String, args: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            pid: None,
            state: WorkerState::Created,
            start_time: None,
            end_time: None,
            exit_code: None,
            program,
            args,
            working_directory: None,
            environment: HashMap::new(),
        }
    }

    pub fn with_working_directory(mut self, dir: PathBuf) -> Self {
        self.working_directory = Some(dir);
        self
    }

    pub fn with_environment(mut self, environment: HashMap<String, String>) -> Self {
        self.environment = environment;
        self
    }

    /// Mark the process as started with the given PID
    pub fn mark_started(&mut self, pid: Option<u32>) {
        self.pid = pid;
        self.state = WorkerState::Running;
        self.start_time = Some(Utc::now());
    }

    /// Mark that a termination signal was delivered
    pub fn mark_signalled(&mut self) {
        if self.state == WorkerState::Running {
            self.state = WorkerState::Signalled;
        }
    }

    /// Mark the process as exited
    pub fn mark_exited(&mut self, exit_code: Option<i32>) {
        self.state = WorkerState::Exited;
        self.end_time = Some(Utc::now());
        self.exit_code = exit_code;
    }

    /// Running and not yet asked to terminate
    pub fn is_running(&self) -> bool {
        matches!(self.state, WorkerState::Running)
    }

    pub fn has_exited(&self) -> bool {
        matches!(self.state, WorkerState::Exited)
    }

    /// Get the run duration if the process has exited
    pub fn run_duration(&self) -> Option<std::time::Duration> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.signed_duration_since(start).to_std().ok(),
            _ => None,
        }
    }

    /// Get a display string for the process
    pub fn display_string(&self) -> String {
        let pid_str = self.pid.map_or("N/A".to_string(), |pid| pid.to_string());
        format!(
            "{} {} [{}] - {:?}",
            self.program,
            self.args.join(" "),
            pid_str,
            self.state
        )
    }
}

impl std::fmt::Display for WorkerProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_string())
    }
}
