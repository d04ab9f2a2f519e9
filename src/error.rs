//! Error types and Result aliases for the companion host

use std::fmt;
use std::path::PathBuf;

/// Result type alias for companion host operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the companion host
#[derive(Debug)]
pub enum Error {
    // === Worker errors ===
    /// A command was sent while no worker is alive
    WorkerUnavailable,

    /// The worker executable failed to launch
    SpawnFailed {
        command: String,
        reason: String,
    },

    /// A piped stdio handle was missing after spawn
    StreamTakeFailed {
        stream: String,
    },

    /// Writing a command line to the worker's stdin failed
    StdinWriteFailed {
        reason: String,
    },

    /// Failed to send signal to the worker
    SignalSendFailed {
        signal: String,
        reason: String,
    },

    // === Window errors ===
    /// A window failed to accept a broadcast line
    DeliveryFailed {
        window: String,
        reason: String,
    },

    /// Close requested for a window this host does not own
    UnknownWindow {
        window: String,
    },

    /// A second host was constructed while one is live
    HostAlreadyExists,

    // === Overlay errors ===
    /// The overlay surface could not be constructed
    OverlayBuildFailed {
        reason: String,
    },

    /// The environment reported no displays
    NoDisplays,

    // === Configuration errors ===
    /// Failed to load configuration file
    ConfigLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Failed to parse configuration
    ConfigParseFailed {
        format: String,
        reason: String,
    },

    /// Failed to serialize configuration
    ConfigSerializationFailed {
        format: String,
        reason: String,
    },

    /// Configuration validation failed
    ConfigValidationFailed {
        field: String,
        reason: String,
    },

    // === I/O and serialization errors ===
    /// I/O errors
    Io(std::io::Error),

    /// Serialization errors
    Serde(serde_json::Error),

    /// TOML parsing errors
    Toml(toml::de::Error),

    /// Generic errors
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Worker errors
            Error::WorkerUnavailable => {
                write!(f, "No active worker process to send the line to")
            }
            Error::SpawnFailed { command, reason } => {
                write!(f, "Failed to spawn worker '{}': {}", command, reason)
            }
            Error::StreamTakeFailed { stream } => {
                write!(f, "Failed to take worker {} handle", stream)
            }
            Error::StdinWriteFailed { reason } => {
                write!(f, "Failed to write to worker stdin: {}", reason)
            }
            Error::SignalSendFailed { signal, reason } => {
                write!(f, "Failed to send signal '{}': {}", signal, reason)
            }

            // Window errors
            Error::DeliveryFailed { window, reason } => {
                write!(f, "Failed to deliver line to window '{}': {}", window, reason)
            }
            Error::UnknownWindow { window } => {
                write!(f, "Window '{}' is not owned by this host", window)
            }
            Error::HostAlreadyExists => {
                write!(f, "A host instance is already running in this process")
            }

            // Overlay errors
            Error::OverlayBuildFailed { reason } => {
                write!(f, "Failed to create floating overlay window: {}", reason)
            }
            Error::NoDisplays => {
                write!(f, "No displays are connected")
            }

            // Configuration errors
            Error::ConfigLoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path.display(), reason)
            }
            Error::ConfigParseFailed { format, reason } => {
                write!(f, "Failed to parse {} config: {}", format, reason)
            }
            Error::ConfigSerializationFailed { format, reason } => {
                write!(f, "Failed to serialize config as {}: {}", format, reason)
            }
            Error::ConfigValidationFailed { field, reason } => {
                write!(f, "Configuration validation failed for '{}': {}", field, reason)
            }

            // I/O and serialization errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Serde(err) => write!(f, "Serialization error: {}", err),
            Error::Toml(err) => write!(f, "TOML parsing error: {}", err),

            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Serde(err) => Some(err),
            Error::Toml(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serde(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml(err)
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}
