//! Broadcast Bus
//!
//! Fans each framed worker line out to every attached window. Delivery is
//! best effort and isolated: a window that fails is logged and skipped, and
//! the remaining windows still receive the line.

use super::registry::WindowRegistry;
use crate::error::Error;
use crate::models::MessageLine;

/// Outcome of one broadcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Windows that accepted the line
    pub delivered: usize,
    /// Windows that failed
    pub failed: usize,
}

/// Forwards lines to every window in a registry
#[derive(Debug, Clone)]
pub struct BroadcastBus {
    registry: WindowRegistry,
}

impl BroadcastBus {
    pub fn new(registry: WindowRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    /// Deliver `line` to every currently attached window.
    ///
    /// Runs to completion without suspending; per-window order across
    /// consecutive calls from one stream is preserved.
    pub fn broadcast(&self, line: &MessageLine) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for window in self.registry.snapshot() {
            match window.deliver(line) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    let err = Error::DeliveryFailed {
                        window: window.id().to_string(),
                        reason: e.to_string(),
                    };
                    warn!("{} ({} signal)", err, line.channel());
                }
            }
        }

        report
    }
}
