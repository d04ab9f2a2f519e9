//! Overlay Placement
//!
//! Pure geometry: which display an overlay request lands on and the window
//! settings it is built with. Nothing here touches a real window.

use crate::error::{Error, Result};
use crate::models::{DisplayInfo, OverlayRequest, ScreenTarget};

/// Title given to overlay windows
pub const OVERLAY_TITLE: &str = "Overlay";

/// Construction settings for an overlay window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySpec {
    pub title: String,
    /// Initial top-left corner, the target display's work-area origin
    pub position: (i32, i32),
    /// Footprint before the window is maximized
    pub size: (u32, u32),
    pub decorations: bool,
    pub transparent: bool,
    pub always_on_top: bool,
    /// Display the overlay must be maximized onto
    pub display_id: u32,
}

/// Pick the display for `target`.
///
/// An id that matches no connected display falls back to the primary
/// display, and to the first display if none is flagged primary.
pub fn resolve_display(displays: &[DisplayInfo], target: ScreenTarget) -> Result<&DisplayInfo> {
    if let ScreenTarget::Display(id) = target {
        if let Some(display) = displays.iter().find(|d| d.id == id) {
            return Ok(display);
        }
        debug!("No display with id {}, falling back to primary", id);
    }

    displays
        .iter()
        .find(|d| d.primary)
        .or_else(|| displays.first())
        .ok_or(Error::NoDisplays)
}

/// Settings for an overlay on `display`
pub fn overlay_spec(display: &DisplayInfo, request: &OverlayRequest, footprint: (u32, u32)) -> OverlaySpec {
    OverlaySpec {
        title: OVERLAY_TITLE.to_string(),
        position: display.work_area().origin(),
        size: footprint,
        decorations: false,
        transparent: true,
        always_on_top: request.always_on_top,
        display_id: display.id,
    }
}
