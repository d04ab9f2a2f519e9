//! Companion Host - supervises a line-oriented worker process for desktop windows
//!
//! The host spawns one external worker, frames its two output streams into
//! lines, and broadcasts every line to the windows currently attached. Windows
//! talk back through a command sink that writes into the worker's input.
//!
//! ## Module Organization
//!
//! ### Core
//!
//! - [`worker`] - spawning, stream framing, signals, the supervisor and command sink
//! - [`window`] - the window interface, registry and broadcast bus
//! - [`shutdown`] - the two-phase close handshake of the primary window
//! - [`overlay`] - display resolution and the floating overlay's lifecycle
//! - [`host`] - the single owner tying the above together
//!
//! ### Surfaces and protocol
//!
//! - [`commands`] - window-to-host requests and host-to-window events
//! - [`console`] - headless JSON-lines windows used by the binary
//!
//! ### Support
//!
//! - [`config`] - configuration file loading
//! - [`models`] - plain data (worker metadata, lines, displays)
//! - [`mod@error`] - error types and Result aliases
//!
//! ## Concurrency
//!
//! Each worker output stream is read by its own task with a private line
//! framer, so the two streams never share buffer state. Start and stop are
//! serialized behind one lock on the worker slot. Broadcasts copy the
//! registry and deliver without holding any lock; a failing window is logged
//! and skipped.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use companion_host::console::{stdout_writer, ConsoleSurface, HeadlessDesktop};
//! use companion_host::Host;
//!
//! # async fn run() -> companion_host::Result<()> {
//! let config = companion_host::init()?;
//! let writer = stdout_writer();
//! let desktop = Arc::new(HeadlessDesktop::new(config.displays.clone(), writer.clone()));
//! let primary = Arc::new(ConsoleSurface::new(companion_host::WindowRole::Primary, writer));
//!
//! let host = Host::new(&config, primary, desktop)?;
//! host.start_process().await?;
//! host.send_json_line(r#"{"type": "ping"}"#).await?;
//! # Ok(())
//! # }
//! ```

#![allow(unexpected_cfgs)]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod error;
pub mod models;

// Core modules
pub mod host;
pub mod overlay;
pub mod shutdown;
pub mod window;
pub mod worker;

// Surfaces and protocol
pub mod commands;
pub mod console;

// Re-exports for core functionality
pub use config::Config;
pub use error::{Error, Result};
pub use host::Host;

// Convenience re-exports for common types
pub use commands::{HostEvent, HostRequest};
pub use config::loader::ConfigLoader;
pub use models::{Channel, MessageLine, OverlayRequest};
pub use shutdown::{CloseDecision, CloseState};
pub use window::{WindowId, WindowRole, WindowSurface};

// Version information
/// The current version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// The application description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build commit, or `"development"` for local builds
pub fn commit_hash() -> &'static str {
    option_env!("COMMIT_HASH").unwrap_or("development")
}

/// Load configuration from the default locations
///
/// Falls back to defaults when no file is found. A file that exists but
/// fails to parse or validate is an error.
pub fn init() -> Result<Config> {
    info!("Initializing {} v{}", NAME, VERSION);
    let mut loader = ConfigLoader::new();
    let config = loader.load()?;
    log_config_summary(&config);
    Ok(config)
}

/// Load configuration from an explicit file
pub fn init_with_config(path: &std::path::Path) -> Result<Config> {
    info!("Initializing {} v{} with {}", NAME, VERSION, path.display());
    let mut loader = ConfigLoader::new();
    let config = loader.load_from_path(path)?;
    log_config_summary(&config);
    Ok(config)
}

fn log_config_summary(config: &Config) {
    debug!(
        "Worker: {} {:?}, {} display(s) configured",
        config.worker.program,
        config.worker.args,
        config.displays.len()
    );
}
