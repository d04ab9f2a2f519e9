//! Worker Signal Delivery
//!
//! Interrupts the worker by PID. On platforms without POSIX signals the
//! supervisor falls back to killing the child handle.

use crate::error::{Error, Result};

const INTERRUPT: &str = "SIGINT";

/// Send SIGINT to the process with the given PID
#[cfg(unix)]
pub fn send_interrupt(pid: u32) -> Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let raw = i32::try_from(pid).map_err(|_| Error::SignalSendFailed {
        signal: INTERRUPT.to_string(),
        reason: format!("pid {} out of range", pid),
    })?;

    kill(Pid::from_raw(raw), Signal::SIGINT).map_err(|e| Error::SignalSendFailed {
        signal: INTERRUPT.to_string(),
        reason: e.to_string(),
    })
}

/// Send SIGINT to the process with the given PID
#[cfg(not(unix))]
pub fn send_interrupt(_pid: u32) -> Result<()> {
    Err(Error::SignalSendFailed {
        signal: INTERRUPT.to_string(),
        reason: format!("signals are not supported on {}", std::env::consts::OS),
    })
}

/// Whether signals can be delivered on this platform
pub fn signals_supported() -> bool {
    cfg!(unix)
}
