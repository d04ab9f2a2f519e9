//! Display Model
//!
//! Geometry of the connected displays as reported by the desktop
//! environment, and the view of them handed to windows.

use serde::{Deserialize, Serialize};

/// Rectangle in desktop coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner
    pub fn origin(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Whether the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A connected display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayInfo {
    /// Environment-assigned display identifier
    pub id: u32,
    /// Human-readable label
    #[serde(default)]
    pub label: String,
    /// Full display bounds
    pub bounds: Rect,
    /// Bounds minus taskbars and docks; defaults to `bounds`
    #[serde(default)]
    pub work_area: Option<Rect>,
    /// Whether this is the primary display
    #[serde(default)]
    pub primary: bool,
}

impl DisplayInfo {
    pub fn new(id: u32, label: impl Into<String>, bounds: Rect, primary: bool) -> Self {
        Self {
            id,
            label: label.into(),
            bounds,
            work_area: None,
            primary,
        }
    }

    pub fn with_work_area(mut self, work_area: Rect) -> Self {
        self.work_area = Some(work_area);
        self
    }

    /// Usable area of the display
    pub fn work_area(&self) -> Rect {
        self.work_area.unwrap_or(self.bounds)
    }

    /// View of this display handed to windows by `get_screens`
    pub fn screen_info(&self) -> ScreenInfo {
        ScreenInfo {
            id: self.id,
            label: self.label.clone(),
            bounds: self.bounds,
            primary: self.primary,
        }
    }
}

/// `{ id, label, bounds, primary }` entry returned to windows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenInfo {
    pub id: u32,
    pub label: String,
    pub bounds: Rect,
    pub primary: bool,
}
