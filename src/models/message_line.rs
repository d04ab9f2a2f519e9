//! Message Line Model
//!
//! A single complete, non-blank line read from one of the worker's output
//! streams. Lines are forwarded to windows and then dropped; nothing in the
//! host keeps them around.

use chrono::{DateTime, Utc};

use super::Channel;

/// Immutable worker output line tagged with its channel and receipt time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLine {
    channel: Channel,
    text: String,
    received_at: DateTime<Utc>,
}

impl MessageLine {
    /// Create a line received now
    pub fn new(channel: Channel, text: impl Into<String>) -> Self {
        Self::received(channel, text, Utc::now())
    }

    /// Create a line with an explicit receipt time
    pub fn received(channel: Channel, text: impl Into<String>, received_at: DateTime<Utc>) -> Self {
        Self {
            channel,
            text: text.into(),
            received_at,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// The verbatim line text, without the trailing newline
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Consume the line and return its text
    pub fn into_text(self) -> String {
        self.text
    }
}
