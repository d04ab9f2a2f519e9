//! Logging collaborator for worker output
//!
//! The supervisor hands every framed line to a `LineLog` after redaction.
//! The default implementation writes through `tracing`.

use crate::models::Channel;

/// Receives the (already redacted) text of every broadcast line
pub trait LineLog: Send + Sync {
    fn record(&self, channel: Channel, text: &str);
}

/// Writes worker lines to the `worker` tracing target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLineLog;

impl LineLog for TracingLineLog {
    fn record(&self, channel: Channel, text: &str) {
        match channel {
            Channel::Stdout => debug!(target: "worker", "[stdout] {}", text),
            Channel::Stderr => warn!(target: "worker", "[stderr] {}", text),
        }
    }
}
