//! Output channel tags
//!
//! The worker writes on two independent output streams. Every framed line
//! carries the channel it came from so windows can tell them apart.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which worker output stream a line was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
}

impl Channel {
    /// Name of the host-to-window signal carrying lines of this channel
    pub fn signal_name(&self) -> &'static str {
        match self {
            Channel::Stdout => "stdout",
            Channel::Stderr => "stderr",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signal_name())
    }
}
