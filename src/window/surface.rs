//! Window surface interface
//!
//! The broadcast core never talks to a windowing toolkit directly. Each kind
//! of window implements this narrow interface and is shared as
//! `Arc<dyn WindowSurface>`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::MessageLine;

/// Stable identity of an attached window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(Uuid);

impl WindowId {
    /// Allocate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What part a window plays in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowRole {
    /// The control window; lives for the whole run
    Primary,
    /// The optional transparent overlay
    Overlay,
}

impl fmt::Display for WindowRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowRole::Primary => f.write_str("primary"),
            WindowRole::Overlay => f.write_str("overlay"),
        }
    }
}

/// Failure talking to a window's content
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("window is closed")]
    Closed,

    #[error("transport error: {0}")]
    Transport(String),
}

/// A display surface that can receive worker output
pub trait WindowSurface: Send + Sync {
    fn id(&self) -> WindowId;

    fn role(&self) -> WindowRole;

    /// Deliver one line on the signal named after its channel
    fn deliver(&self, line: &MessageLine) -> Result<(), SurfaceError>;

    /// Ask the window's content to prepare for close (`window-close`)
    fn request_close(&self) -> Result<(), SurfaceError>;

    /// Close the window for real, without asking its content
    fn force_close(&self);
}

/// Extra controls the overlay needs during construction
pub trait OverlaySurface: WindowSurface {
    /// Make the window ignore pointer input
    fn set_click_through(&self, enabled: bool) -> Result<(), SurfaceError>;

    /// Maximize onto the display the window currently sits on
    fn maximize(&self) -> Result<(), SurfaceError>;

    /// Make the window visible
    fn show(&self) -> Result<(), SurfaceError>;

    /// View this overlay as a plain broadcast recipient
    fn into_window(self: Arc<Self>) -> Arc<dyn WindowSurface>;
}
