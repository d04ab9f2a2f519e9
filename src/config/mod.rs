//! Configuration management for the companion host
//!
//! Which worker to launch and how, the overlay's default footprint, the log
//! filter, and the display list used when no desktop environment reports
//! one.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::models::{DisplayInfo, Rect};
use crate::worker::DEFAULT_UNBUFFERED_ENV;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Worker process configuration
    pub worker: WorkerConfig,

    /// Overlay window configuration
    pub overlay: OverlayConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Displays for the headless desktop
    pub displays: Vec<DisplayInfo>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker: WorkerConfig::default(),
            overlay: OverlayConfig::default(),
            logging: LoggingConfig::default(),
            displays: vec![DisplayInfo::new(
                0,
                "Primary",
                Rect::new(0, 0, 1920, 1080),
                true,
            )],
        }
    }
}

/// How the worker process is launched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Executable path
    pub program: String,

    /// Arguments passed to the executable
    pub args: Vec<String>,

    /// Working directory; the host's own when unset
    pub working_directory: Option<PathBuf>,

    /// Variables set on top of the inherited environment
    pub environment: HashMap<String, String>,

    /// Variable forced to `1` so the worker does not buffer its output
    pub unbuffered_env: Option<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            args: vec!["-u".to_string(), "./src/Chat.py".to_string()],
            working_directory: None,
            environment: HashMap::new(),
            unbuffered_env: Some(DEFAULT_UNBUFFERED_ENV.to_string()),
        }
    }
}

/// Overlay window defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Width before maximize
    pub width: u32,

    /// Height before maximize
    pub height: u32,

    /// Used when a request does not say
    pub always_on_top: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            always_on_top: true,
        }
    }
}

impl OverlayConfig {
    /// Default footprint `(width, height)`
    pub fn footprint(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
