//! Command Sink
//!
//! One-way path from any window into the live worker's stdin. Each call
//! writes exactly one line. There is no queue and no backpressure: a worker
//! that stops reading its input will eventually block the caller.

use tokio::io::AsyncWriteExt;

use super::redact;
use super::supervisor::WorkerSlot;
use crate::error::{Error, Result};

/// Writes command lines into the current worker
#[derive(Clone)]
pub struct CommandSink {
    worker: WorkerSlot,
}

impl CommandSink {
    pub(crate) fn new(worker: WorkerSlot) -> Self {
        Self { worker }
    }

    /// Write `line` plus a newline to the worker's stdin.
    ///
    /// Fails with `WorkerUnavailable` when no worker is alive, including one
    /// that was already asked to stop or has exited.
    pub async fn send(&self, line: &str) -> Result<()> {
        let stdin = {
            let mut slot = self.worker.lock().await;
            match slot.as_mut() {
                Some(active) => {
                    if !active.is_alive() {
                        return Err(Error::WorkerUnavailable);
                    }
                    active.stdin()
                }
                None => return Err(Error::WorkerUnavailable),
            }
        };

        let mut data = String::with_capacity(line.len() + 1);
        data.push_str(line);
        data.push('\n');

        let mut stdin = stdin.lock().await;
        stdin
            .write_all(data.as_bytes())
            .await
            .map_err(|e| Error::StdinWriteFailed {
                reason: e.to_string(),
            })?;
        stdin.flush().await.map_err(|e| Error::StdinWriteFailed {
            reason: e.to_string(),
        })?;

        debug!("Wrote to stdin: {}", redact::for_log(line));
        Ok(())
    }
}

impl std::fmt::Debug for CommandSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSink").finish_non_exhaustive()
    }
}
