//! Test Utilities and Mocks
//!
//! Recording windows, a scripted desktop, and helpers for spawning small
//! shell workers.

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_window;

// Re-exports for convenience
pub use fixtures::{host_guard, shell_config, shell_spec, wait_until};
pub use mock_desktop::FakeDesktop;
pub use mock_window::{FailingSurface, RecordingLog, RecordingSurface};
