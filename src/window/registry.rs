//! Window Registry
//!
//! The set of windows currently interested in worker output. Attach and
//! detach are idempotent and the registry never holds the same window twice.
//! Clones share the same underlying set.

use std::sync::{Arc, Mutex, MutexGuard};

use super::surface::{WindowId, WindowSurface};

/// Shared, unordered set of attached windows
#[derive(Clone, Default)]
pub struct WindowRegistry {
    windows: Arc<Mutex<Vec<Arc<dyn WindowSurface>>>>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<dyn WindowSurface>>> {
        // A panicking recipient must not wedge the registry
        self.windows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a window if it is not already present. Returns whether it was added.
    pub fn attach(&self, window: Arc<dyn WindowSurface>) -> bool {
        let mut windows = self.lock();
        let id = window.id();
        if windows.iter().any(|w| w.id() == id) {
            return false;
        }
        debug!("Attaching {} window {}", window.role(), id);
        windows.push(window);
        true
    }

    /// Remove a window if present. Returns whether it was removed.
    pub fn detach(&self, id: WindowId) -> bool {
        let mut windows = self.lock();
        let before = windows.len();
        windows.retain(|w| w.id() != id);
        let removed = windows.len() != before;
        if removed {
            debug!("Detached window {}", id);
        }
        removed
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.lock().iter().any(|w| w.id() == id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Current members, copied out so delivery runs without the lock held
    pub fn snapshot(&self) -> Vec<Arc<dyn WindowSurface>> {
        self.lock().clone()
    }
}

impl std::fmt::Debug for WindowRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<WindowId> = self.lock().iter().map(|w| w.id()).collect();
        f.debug_struct("WindowRegistry").field("windows", &ids).finish()
    }
}
