//! Core data models for the companion host
//!
//! Plain data shared by the worker, window, and overlay modules.

pub mod channel;
pub mod display;
pub mod message_line;
pub mod overlay_request;
pub mod worker_process;

// Re-exports for convenience
pub use channel::Channel;
pub use display::{DisplayInfo, Rect, ScreenInfo};
pub use message_line::MessageLine;
pub use overlay_request::{OverlayRequest, ScreenTarget, PRIMARY_SCREEN_ID};
pub use worker_process::{WorkerProcess, WorkerState};
