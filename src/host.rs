//! Host
//!
//! The one object that owns the supervisor, the window registry, the
//! overlay and the close handshake. Only one host may exist per process;
//! constructing a second fails until the first is dropped.

use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::commands::HostRequest;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{OverlayRequest, ScreenInfo, WorkerProcess};
use crate::overlay::{Desktop, OverlayManager};
use crate::shutdown::{CloseDecision, CloseState, ShutdownCoordinator};
use crate::window::{WindowId, WindowRegistry, WindowSurface};
use crate::worker::{CommandSink, LineLog, Supervisor, TracingLineLog, WorkerSpec};

static HOST_LIVE: AtomicBool = AtomicBool::new(false);

/// Supervisor-and-registry owner for one application run
pub struct Host {
    primary: Arc<dyn WindowSurface>,
    desktop: Arc<dyn Desktop>,
    registry: WindowRegistry,
    supervisor: Arc<Supervisor>,
    sink: CommandSink,
    overlays: Arc<OverlayManager>,
    shutdown: Arc<ShutdownCoordinator>,
    overlay_on_top: bool,
}

impl Host {
    /// Create the host with `primary` attached for the whole run
    pub fn new(config: &Config, primary: Arc<dyn WindowSurface>, desktop: Arc<dyn Desktop>) -> Result<Self> {
        Self::with_line_log(config, primary, desktop, Arc::new(TracingLineLog))
    }

    /// Create the host with a custom logging collaborator for worker lines
    pub fn with_line_log(
        config: &Config,
        primary: Arc<dyn WindowSurface>,
        desktop: Arc<dyn Desktop>,
        log: Arc<dyn LineLog>,
    ) -> Result<Self> {
        if HOST_LIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::HostAlreadyExists);
        }

        let registry = WindowRegistry::new();
        registry.attach(Arc::clone(&primary));

        let supervisor = Arc::new(Supervisor::with_line_log(
            WorkerSpec::from(&config.worker),
            registry.clone(),
            log,
        ));
        let sink = supervisor.command_sink();
        let overlays = Arc::new(OverlayManager::new(
            Arc::clone(&desktop),
            registry.clone(),
            config.overlay.footprint(),
        ));
        let shutdown = Arc::new(ShutdownCoordinator::new(
            Arc::clone(&primary),
            Arc::clone(&supervisor),
            Arc::clone(&overlays),
        ));

        info!("Host created with primary window {}", primary.id());
        Ok(Self {
            primary,
            desktop,
            registry,
            supervisor,
            sink,
            overlays,
            shutdown,
            overlay_on_top: config.overlay.always_on_top,
        })
    }

    pub fn primary_id(&self) -> WindowId {
        self.primary.id()
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    /// Write one command line to the worker
    pub async fn send_json_line(&self, line: &str) -> Result<()> {
        self.sink.send(line).await
    }

    /// Start or restart the worker for the primary window
    pub async fn start_process(&self) -> Result<WorkerProcess> {
        self.supervisor.start(Arc::clone(&self.primary)).await
    }

    /// Stop the worker for the primary window
    pub async fn stop_process(&self) -> Result<()> {
        self.supervisor.stop(self.primary.id()).await
    }

    pub async fn create_floating_overlay(&self, request: OverlayRequest) -> Result<WindowId> {
        self.overlays.create(request).await
    }

    /// Returns whether an overlay existed
    pub async fn destroy_floating_overlay(&self) -> bool {
        self.overlays.destroy().await
    }

    pub fn overlay_id(&self) -> Option<WindowId> {
        self.overlays.current_id()
    }

    pub async fn get_screens(&self) -> Result<Vec<ScreenInfo>> {
        let displays = self.desktop.displays().await?;
        Ok(displays.iter().map(|d| d.screen_info()).collect())
    }

    pub fn commit_hash(&self) -> &'static str {
        crate::commit_hash()
    }

    /// Forward an environment close request for `window`
    pub fn on_close_requested(&self, window: WindowId) -> Result<CloseDecision> {
        self.shutdown.on_close_requested(window)
    }

    /// The primary window's content is ready to close
    pub fn window_close_ready(&self) -> bool {
        self.shutdown.acknowledge()
    }

    pub async fn force_close(&self) {
        self.shutdown.force().await
    }

    pub fn close_state(&self) -> CloseState {
        self.shutdown.state()
    }

    /// Resolves once the primary window has closed
    pub async fn closed(&self) {
        self.shutdown.closed().await
    }

    /// Run one window request and produce its reply value
    pub async fn dispatch(&self, request: HostRequest) -> Result<Value> {
        debug!("Dispatching {}", request.name());
        match &request {
            HostRequest::SendJsonLine { json_line } => {
                self.send_json_line(json_line).await?;
                Ok(Value::Null)
            }
            HostRequest::StartProcess => {
                let process = self.start_process().await?;
                Ok(json!({ "pid": process.pid }))
            }
            HostRequest::StopProcess => {
                self.stop_process().await?;
                Ok(Value::Null)
            }
            HostRequest::CreateFloatingOverlay { .. } => {
                let overlay = request
                    .overlay_request(self.overlay_on_top)
                    .unwrap_or_else(|| OverlayRequest::primary(self.overlay_on_top));
                let id = self.create_floating_overlay(overlay).await?;
                Ok(json!({ "id": id }))
            }
            HostRequest::DestroyFloatingOverlay => {
                let destroyed = self.destroy_floating_overlay().await;
                Ok(json!({ "destroyed": destroyed }))
            }
            HostRequest::GetScreens => Ok(serde_json::to_value(self.get_screens().await?)?),
            HostRequest::GetCommitHash => Ok(Value::String(self.commit_hash().to_string())),
            HostRequest::WindowCloseReady => Ok(json!({ "acknowledged": self.window_close_ready() })),
        }
    }

    /// Kill the worker, detach every window and close the primary; used at
    /// application exit
    pub async fn teardown(&self) {
        self.overlays.destroy().await;
        self.supervisor.shutdown().await;
        for window in self.registry.snapshot() {
            self.registry.detach(window.id());
        }
        self.primary.force_close();
        info!("Host torn down");
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        HOST_LIVE.store(false, Ordering::Release);
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("primary", &self.primary.id())
            .field("registry", &self.registry)
            .field("overlays", &self.overlays)
            .finish()
    }
}
