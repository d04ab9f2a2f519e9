//! Overlay lifecycle
//!
//! At most one overlay exists. A new request fully destroys the current
//! overlay before building its replacement; overlays are never changed in
//! place.

use async_trait::async_trait;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use tokio::sync::Mutex;

use super::placement::{overlay_spec, resolve_display, OverlaySpec};
use crate::error::{Error, Result};
use crate::models::{DisplayInfo, OverlayRequest};
use crate::window::{OverlaySurface, SurfaceError, WindowId, WindowRegistry};

/// The desktop environment windows are created in
#[async_trait]
pub trait Desktop: Send + Sync {
    /// Currently connected displays
    async fn displays(&self) -> Result<Vec<DisplayInfo>>;

    /// Construct a hidden overlay window with the given settings
    async fn build_overlay(&self, spec: &OverlaySpec) -> Result<Arc<dyn OverlaySurface>>;
}

/// Owns the single overlay window
pub struct OverlayManager {
    desktop: Arc<dyn Desktop>,
    registry: WindowRegistry,
    footprint: (u32, u32),
    /// Serializes create and destroy
    lifecycle: Mutex<()>,
    current: StdMutex<Option<Arc<dyn OverlaySurface>>>,
}

fn build_failed(e: SurfaceError) -> Error {
    Error::OverlayBuildFailed {
        reason: e.to_string(),
    }
}

impl OverlayManager {
    pub fn new(desktop: Arc<dyn Desktop>, registry: WindowRegistry, footprint: (u32, u32)) -> Self {
        Self {
            desktop,
            registry,
            footprint,
            lifecycle: Mutex::new(()),
            current: StdMutex::new(None),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Arc<dyn OverlaySurface>>> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace any existing overlay with a new one built for `request`
    pub async fn create(&self, request: OverlayRequest) -> Result<WindowId> {
        let _lifecycle = self.lifecycle.lock().await;

        if self.close_current() {
            debug!("Replaced the existing overlay");
        }

        let displays = self.desktop.displays().await?;
        let display = resolve_display(&displays, request.target())?;
        let display_id = display.id;
        let spec = overlay_spec(display, &request, self.footprint);
        debug!("Building overlay on display {} at {:?}", spec.display_id, spec.position);

        let overlay = self.desktop.build_overlay(&spec).await?;
        if let Err(e) = Self::prepare(overlay.as_ref()) {
            overlay.force_close();
            return Err(e);
        }

        let id = overlay.id();
        self.registry.attach(Arc::clone(&overlay).into_window());
        *self.slot() = Some(overlay);
        info!("Floating overlay {} created on display {}", id, display_id);
        Ok(id)
    }

    // Positioned already; maximize must come before show so the window
    // expands within its own display
    fn prepare(overlay: &dyn OverlaySurface) -> Result<()> {
        overlay.set_click_through(true).map_err(build_failed)?;
        overlay.maximize().map_err(build_failed)?;
        overlay.show().map_err(build_failed)?;
        Ok(())
    }

    /// Detach and close the overlay. Returns whether one existed.
    pub async fn destroy(&self) -> bool {
        let _lifecycle = self.lifecycle.lock().await;
        self.close_current()
    }

    fn close_current(&self) -> bool {
        let Some(overlay) = self.slot().take() else {
            return false;
        };
        self.registry.detach(overlay.id());
        overlay.force_close();
        info!("Floating overlay {} destroyed", overlay.id());
        true
    }

    /// Drop the overlay `id` after the environment closed it on its own
    pub fn forget(&self, id: WindowId) -> bool {
        let mut slot = self.slot();
        if slot.as_ref().is_some_and(|o| o.id() == id) {
            *slot = None;
            drop(slot);
            self.registry.detach(id);
            debug!("Overlay {} closed by the environment", id);
            return true;
        }
        false
    }

    pub fn current_id(&self) -> Option<WindowId> {
        self.slot().as_ref().map(|o| o.id())
    }

    pub fn exists(&self) -> bool {
        self.slot().is_some()
    }
}

impl std::fmt::Debug for OverlayManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayManager")
            .field("footprint", &self.footprint)
            .field("current", &self.current_id())
            .finish()
    }
}
