//! Floating overlay window
//!
//! Choosing the display an overlay lands on, and the create/destroy
//! lifecycle of the single overlay instance.

pub mod manager;
pub mod placement;

pub use manager::{Desktop, OverlayManager};
pub use placement::{overlay_spec, resolve_display, OverlaySpec, OVERLAY_TITLE};
