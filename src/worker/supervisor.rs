//! Process Supervisor
//!
//! Owns the lifecycle of the single worker process. At most one worker is
//! live at a time: starting while one is running first terminates the old
//! instance and retires its stream pumps, so no line of the new instance is
//! ever mixed with output of the old one.
//!
//! Start and stop are serialized behind one lock that also covers the
//! registry attach/detach they perform. Broadcasts only take a brief
//! snapshot of the registry and never wait on that lock.
//!
//! A worker that exits or crashes is not restarted; its streams simply stop
//! producing lines.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::process::{Child, ChildStdin};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::log::{LineLog, TracingLineLog};
use super::process::{spawn_worker, WorkerSpec};
use super::signals;
use super::sink::CommandSink;
use super::streams::{spawn_pump, StreamRoute};
use crate::error::Result;
use crate::models::{Channel, WorkerProcess};
use crate::window::{BroadcastBus, WindowId, WindowRegistry, WindowSurface};

/// The live worker and the tasks reading its output
pub(crate) struct ActiveWorker {
    child: Child,
    process: WorkerProcess,
    stdin: Arc<Mutex<ChildStdin>>,
    pumps: Vec<JoinHandle<()>>,
}

impl ActiveWorker {
    /// Running and not yet asked to terminate
    pub(crate) fn is_alive(&mut self) -> bool {
        if !self.process.is_running() {
            return false;
        }
        match self.child.try_wait() {
            Ok(Some(status)) => {
                debug!("Worker {} exited with {}", self.process, status);
                self.process.mark_exited(status.code());
                false
            }
            Ok(None) => true,
            Err(e) => {
                warn!("Failed to poll worker status: {}", e);
                false
            }
        }
    }

    pub(crate) fn stdin(&self) -> Arc<Mutex<ChildStdin>> {
        Arc::clone(&self.stdin)
    }

    /// Send the interrupt signal without waiting for the process to exit
    fn interrupt(&mut self) -> Result<()> {
        if signals::signals_supported() {
            if let Some(pid) = self.child.id() {
                signals::send_interrupt(pid)?;
            }
        } else {
            self.child.start_kill()?;
        }
        self.process.mark_signalled();
        Ok(())
    }

    /// Kill the process, wait for it to exit, and stop its pumps
    async fn terminate(mut self) -> WorkerProcess {
        for pump in &self.pumps {
            pump.abort();
        }
        match self.child.try_wait() {
            Ok(Some(status)) => self.process.mark_exited(status.code()),
            _ => match self.child.kill().await {
                Ok(()) => {
                    let code = self.child.try_wait().ok().flatten().and_then(|s| s.code());
                    self.process.mark_exited(code);
                }
                Err(e) => warn!("Failed to kill worker {}: {}", self.process, e),
            },
        }
        self.process
    }
}

/// Slot holding the one live worker, shared with the command sink
pub(crate) type WorkerSlot = Arc<Mutex<Option<ActiveWorker>>>;

/// Supervises the worker process and wires its output to the windows
pub struct Supervisor {
    spec: WorkerSpec,
    registry: WindowRegistry,
    route: StreamRoute,
    worker: WorkerSlot,
}

impl Supervisor {
    /// Create a supervisor that logs worker lines through `tracing`
    pub fn new(spec: WorkerSpec, registry: WindowRegistry) -> Self {
        Self::with_line_log(spec, registry, Arc::new(TracingLineLog))
    }

    /// Create a supervisor with a custom logging collaborator
    pub fn with_line_log(spec: WorkerSpec, registry: WindowRegistry, log: Arc<dyn LineLog>) -> Self {
        let route = StreamRoute {
            bus: BroadcastBus::new(registry.clone()),
            log,
            live_generation: Arc::new(AtomicU64::new(0)),
        };
        Self {
            spec,
            registry,
            route,
            worker: Arc::new(Mutex::new(None)),
        }
    }

    pub fn spec(&self) -> &WorkerSpec {
        &self.spec
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    /// Sink writing command lines into whichever worker is live
    pub fn command_sink(&self) -> CommandSink {
        CommandSink::new(Arc::clone(&self.worker))
    }

    /// Start a worker for `window`, replacing any live one.
    ///
    /// The window is attached before the new worker's streams are read, so
    /// it sees the very first line. On spawn failure the error is returned
    /// to the caller, who may simply call `start` again.
    pub async fn start(&self, window: Arc<dyn WindowSurface>) -> Result<WorkerProcess> {
        let mut slot = self.worker.lock().await;

        self.registry.attach(window);

        // Retire the old pumps before anything of the new process is read
        let generation = self.route.live_generation.fetch_add(1, Ordering::AcqRel) + 1;

        if let Some(mut old) = slot.take() {
            if old.is_alive() {
                warn!("Worker {} is already running, stopping it first", old.process);
            }
            let old = old.terminate().await;
            debug!("Previous worker finished: {}", old);
        }

        let spawned = spawn_worker(&self.spec)?;
        info!(
            "Started worker {} (generation {})",
            spawned.process, generation
        );

        let pumps = vec![
            spawn_pump(spawned.stdout, Channel::Stdout, generation, self.route.clone()),
            spawn_pump(spawned.stderr, Channel::Stderr, generation, self.route.clone()),
        ];

        let process = spawned.process.clone();
        *slot = Some(ActiveWorker {
            child: spawned.child,
            process: spawned.process,
            stdin: Arc::new(Mutex::new(spawned.stdin)),
            pumps,
        });

        Ok(process)
    }

    /// Detach `window` and interrupt the live worker, if any.
    ///
    /// Does not wait for the worker to exit. With no live worker this only
    /// detaches the window. If the interrupt cannot be delivered the worker
    /// is killed instead; an error means the window is detached but the
    /// worker may still be running.
    pub async fn stop(&self, window: WindowId) -> Result<()> {
        let mut slot = self.worker.lock().await;

        self.registry.detach(window);

        if let Some(active) = slot.as_mut() {
            if active.is_alive() {
                info!("Stopping worker {}", active.process);
                if let Err(e) = active.interrupt() {
                    warn!("Failed to interrupt worker {}: {}, killing it", active.process, e);
                    active.child.start_kill()?;
                    active.process.mark_signalled();
                }
            }
        }

        Ok(())
    }

    /// Whether a worker is running and has not been signalled
    pub async fn is_running(&self) -> bool {
        let mut slot = self.worker.lock().await;
        slot.as_mut().is_some_and(|active| active.is_alive())
    }

    /// Snapshot of the current worker's metadata
    pub async fn current(&self) -> Option<WorkerProcess> {
        let mut slot = self.worker.lock().await;
        slot.as_mut().map(|active| {
            active.is_alive();
            active.process.clone()
        })
    }

    /// Kill the worker and wait for it; used at application exit
    pub async fn shutdown(&self) {
        let mut slot = self.worker.lock().await;
        self.route.live_generation.fetch_add(1, Ordering::AcqRel);
        if let Some(active) = slot.take() {
            let process = active.terminate().await;
            info!("Worker shut down: {}", process);
        }
    }
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("spec", &self.spec)
            .field("registry", &self.registry)
            .finish()
    }
}
