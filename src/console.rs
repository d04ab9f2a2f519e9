//! Console windows
//!
//! Headless stand-ins for real windows, used by the binary. Every surface
//! writes its events as JSON lines to a shared writer (stdout by default),
//! tagged with the window's role.

use async_trait::async_trait;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::commands::HostEvent;
use crate::error::Result;
use crate::models::{DisplayInfo, MessageLine};
use crate::overlay::{Desktop, OverlaySpec};
use crate::window::{OverlaySurface, SurfaceError, WindowId, WindowRole, WindowSurface};

/// Writer shared by every console surface
pub type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Shared writer over the process stdout
pub fn stdout_writer() -> SharedWriter {
    Arc::new(Mutex::new(Box::new(io::stdout())))
}

#[derive(Serialize)]
struct Envelope<'a> {
    window: WindowRole,
    #[serde(flatten)]
    event: &'a HostEvent,
}

/// A window whose content is a JSON-lines stream
pub struct ConsoleSurface {
    id: WindowId,
    role: WindowRole,
    writer: SharedWriter,
    open: AtomicBool,
    visible: AtomicBool,
    maximized: AtomicBool,
    click_through: AtomicBool,
}

impl ConsoleSurface {
    pub fn new(role: WindowRole, writer: SharedWriter) -> Self {
        Self {
            id: WindowId::new(),
            role,
            writer,
            open: AtomicBool::new(true),
            // The primary window is shown from the start
            visible: AtomicBool::new(role == WindowRole::Primary),
            maximized: AtomicBool::new(false),
            click_through: AtomicBool::new(false),
        }
    }

    /// Primary console window on stdout
    pub fn primary() -> Self {
        Self::new(WindowRole::Primary, stdout_writer())
    }

    /// Write one event to the window's content
    pub fn emit(&self, event: &HostEvent) -> std::result::Result<(), SurfaceError> {
        if !self.is_open() {
            return Err(SurfaceError::Closed);
        }
        let envelope = Envelope {
            window: self.role,
            event,
        };
        let line = serde_json::to_string(&envelope).map_err(|e| SurfaceError::Transport(e.to_string()))?;

        let mut writer = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(writer, "{}", line)
            .and_then(|_| writer.flush())
            .map_err(|e| SurfaceError::Transport(e.to_string()))
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized.load(Ordering::Acquire)
    }

    pub fn is_click_through(&self) -> bool {
        self.click_through.load(Ordering::Acquire)
    }
}

impl WindowSurface for ConsoleSurface {
    fn id(&self) -> WindowId {
        self.id
    }

    fn role(&self) -> WindowRole {
        self.role
    }

    fn deliver(&self, line: &MessageLine) -> std::result::Result<(), SurfaceError> {
        self.emit(&HostEvent::line(line))
    }

    fn request_close(&self) -> std::result::Result<(), SurfaceError> {
        self.emit(&HostEvent::WindowClose)
    }

    fn force_close(&self) {
        if self.open.swap(false, Ordering::AcqRel) {
            self.visible.store(false, Ordering::Release);
            debug!("Console {} window {} closed", self.role, self.id);
        }
    }
}

impl OverlaySurface for ConsoleSurface {
    fn set_click_through(&self, enabled: bool) -> std::result::Result<(), SurfaceError> {
        self.click_through.store(enabled, Ordering::Release);
        Ok(())
    }

    fn maximize(&self) -> std::result::Result<(), SurfaceError> {
        if !self.is_open() {
            return Err(SurfaceError::Closed);
        }
        self.maximized.store(true, Ordering::Release);
        Ok(())
    }

    fn show(&self) -> std::result::Result<(), SurfaceError> {
        if !self.is_open() {
            return Err(SurfaceError::Closed);
        }
        self.visible.store(true, Ordering::Release);
        Ok(())
    }

    fn into_window(self: Arc<Self>) -> Arc<dyn WindowSurface> {
        self
    }
}

/// Desktop with a fixed display list whose overlays are console surfaces
pub struct HeadlessDesktop {
    displays: Vec<DisplayInfo>,
    writer: SharedWriter,
}

impl HeadlessDesktop {
    pub fn new(displays: Vec<DisplayInfo>, writer: SharedWriter) -> Self {
        Self { displays, writer }
    }
}

#[async_trait]
impl Desktop for HeadlessDesktop {
    async fn displays(&self) -> Result<Vec<DisplayInfo>> {
        Ok(self.displays.clone())
    }

    async fn build_overlay(&self, spec: &OverlaySpec) -> Result<Arc<dyn OverlaySurface>> {
        let overlay = ConsoleSurface::new(WindowRole::Overlay, Arc::clone(&self.writer));
        debug!(
            "Console overlay {} '{}' at {:?} size {:?} on display {}",
            overlay.id(),
            spec.title,
            spec.position,
            spec.size,
            spec.display_id
        );
        Ok(Arc::new(overlay))
    }
}
