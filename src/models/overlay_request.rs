//! Overlay Request Model

use serde::{Deserialize, Serialize};

/// Screen id windows send to mean "the primary display"
pub const PRIMARY_SCREEN_ID: i64 = -1;

/// Settings for one overlay construction; consumed once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayRequest {
    /// Keep the overlay above other applications
    pub always_on_top: bool,
    /// Target display id, or any negative value for the primary display
    pub screen_id: i64,
}

/// Resolved form of `OverlayRequest::screen_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenTarget {
    Primary,
    Display(u32),
}

impl OverlayRequest {
    pub fn new(always_on_top: bool, screen_id: i64) -> Self {
        Self {
            always_on_top,
            screen_id,
        }
    }

    /// Overlay on the primary display
    pub fn primary(always_on_top: bool) -> Self {
        Self::new(always_on_top, PRIMARY_SCREEN_ID)
    }

    pub fn target(&self) -> ScreenTarget {
        if self.screen_id < 0 {
            return ScreenTarget::Primary;
        }
        match u32::try_from(self.screen_id) {
            Ok(id) => ScreenTarget::Display(id),
            // Out of range ids cannot match any display
            Err(_) => ScreenTarget::Primary,
        }
    }
}
