//! Shutdown Coordinator
//!
//! Two-phase close of the primary window. When the environment asks the
//! primary window to close, the close is cancelled and the window's content
//! is told to prepare (`window-close`). Only when the content acknowledges
//! does the real close run: the overlay is destroyed, the worker is stopped
//! for the primary window, and the window is detached and closed.
//!
//! There is no timeout. Content that never acknowledges keeps the window
//! open until `force` is called.
//!
//! Overlays skip the handshake: their close is allowed at once and they are
//! only detached. A close for a window the host does not own is an error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{oneshot, watch};

use crate::error::{Error, Result};
use crate::overlay::OverlayManager;
use crate::window::{WindowId, WindowSurface};
use crate::worker::Supervisor;

/// Close progress of the primary window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseState {
    Open,
    CloseRequested,
    AwaitingAck,
    Closed,
}

/// What the environment should do with a close it asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    /// Cancel the default close
    Prevent,
    /// Let the window close
    Allow,
}

pub struct ShutdownCoordinator {
    primary: Arc<dyn WindowSurface>,
    supervisor: Arc<Supervisor>,
    overlays: Arc<OverlayManager>,
    state: watch::Sender<CloseState>,
    ack: Mutex<Option<oneshot::Sender<()>>>,
    finishing: AtomicBool,
}

impl ShutdownCoordinator {
    pub fn new(
        primary: Arc<dyn WindowSurface>,
        supervisor: Arc<Supervisor>,
        overlays: Arc<OverlayManager>,
    ) -> Self {
        let (state, _) = watch::channel(CloseState::Open);
        Self {
            primary,
            supervisor,
            overlays,
            state,
            ack: Mutex::new(None),
            finishing: AtomicBool::new(false),
        }
    }

    fn ack_slot(&self) -> MutexGuard<'_, Option<oneshot::Sender<()>>> {
        self.ack.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> CloseState {
        *self.state.borrow()
    }

    /// Handle a close the environment requested for `window`.
    ///
    /// Must be called from within a tokio runtime: the wait for the
    /// acknowledgement runs as a spawned task.
    pub fn on_close_requested(self: &Arc<Self>, window: WindowId) -> Result<CloseDecision> {
        if window != self.primary.id() {
            if !self.overlays.forget(window) {
                debug!("Close requested for unknown window {}", window);
                return Err(Error::UnknownWindow {
                    window: window.to_string(),
                });
            }
            return Ok(CloseDecision::Allow);
        }

        match self.state() {
            CloseState::Closed => return Ok(CloseDecision::Allow),
            CloseState::CloseRequested | CloseState::AwaitingAck => {
                debug!("Close already pending, asking the window again");
                self.notify_content();
                return Ok(CloseDecision::Prevent);
            }
            CloseState::Open => {}
        }

        self.state.send_replace(CloseState::CloseRequested);

        // Registered before the content is told, so an immediate
        // acknowledgement cannot be missed
        let (tx, rx) = oneshot::channel();
        *self.ack_slot() = Some(tx);
        self.state.send_replace(CloseState::AwaitingAck);
        info!("Close requested for primary window, awaiting acknowledgement");

        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            if rx.await.is_ok() {
                coordinator.finish_close().await;
            }
        });

        self.notify_content();
        Ok(CloseDecision::Prevent)
    }

    fn notify_content(&self) {
        if let Err(e) = self.primary.request_close() {
            warn!("Failed to send window-close to primary window: {}", e);
        }
    }

    /// The content is ready to close. Returns false when no close was pending.
    pub fn acknowledge(&self) -> bool {
        match self.ack_slot().take() {
            Some(tx) => {
                debug!("Primary window acknowledged close");
                tx.send(()).is_ok()
            }
            None => {
                debug!("Close acknowledgement with no close pending");
                false
            }
        }
    }

    /// Close the primary window without waiting for its content
    pub async fn force(&self) {
        // Dropping the sender releases the waiting task without closing twice
        self.ack_slot().take();
        warn!("Forcing primary window close");
        self.finish_close().await;
    }

    async fn finish_close(&self) {
        if self.finishing.swap(true, Ordering::AcqRel) {
            return;
        }

        self.overlays.destroy().await;
        if let Err(e) = self.supervisor.stop(self.primary.id()).await {
            warn!("Failed to stop worker during close: {}", e);
        }
        self.supervisor.registry().detach(self.primary.id());
        self.primary.force_close();

        self.state.send_replace(CloseState::Closed);
        info!("Primary window closed");
    }

    /// Wait until the primary window has closed
    pub async fn closed(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so this only errors if it was dropped
        let _ = rx.wait_for(|state| *state == CloseState::Closed).await;
    }
}

impl std::fmt::Debug for ShutdownCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownCoordinator")
            .field("primary", &self.primary.id())
            .field("state", &self.state())
            .finish()
    }
}
