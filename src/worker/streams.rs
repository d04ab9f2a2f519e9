//! Worker Stream Pumps
//!
//! One task per worker output stream: read chunks, frame them into lines,
//! hand each non-blank line to the logging collaborator (redacted) and to the
//! broadcast bus (verbatim). The two streams of a worker run independently
//! and each owns a private `LineFramer`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;

use super::framer::{is_blank, LineFramer};
use super::log::LineLog;
use super::redact;
use crate::models::{Channel, MessageLine};
use crate::window::BroadcastBus;

/// Read buffer size per stream
const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Everything a stream task needs to route its lines
#[derive(Clone)]
pub struct StreamRoute {
    pub bus: BroadcastBus,
    pub log: Arc<dyn LineLog>,
    /// Generation of the live worker; pumps of a replaced worker stop
    /// forwarding as soon as this moves past their own generation
    pub live_generation: Arc<AtomicU64>,
}

/// Spawn a pump task for one stream of the worker with `generation`
pub fn spawn_pump<R>(
    reader: R,
    channel: Channel,
    generation: u64,
    route: StreamRoute,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let pump = StreamPump {
            channel,
            generation,
            route,
        };
        pump.run(reader).await;
    })
}

struct StreamPump {
    channel: Channel,
    generation: u64,
    route: StreamRoute,
}

impl StreamPump {
    async fn run<R>(self, mut reader: R)
    where
        R: AsyncRead + Unpin,
    {
        let mut framer = LineFramer::new();
        let mut buf = vec![0u8; READ_BUFFER_SIZE];

        loop {
            match reader.read(&mut buf).await {
                Ok(0) => {
                    debug!("Worker {} reached EOF (generation {})", self.channel, self.generation);
                    break;
                }
                Ok(n) => {
                    for text in framer.push(&buf[..n]) {
                        if is_blank(&text) {
                            continue;
                        }
                        if !self.is_current() {
                            debug!(
                                "Worker {} pump for generation {} retired",
                                self.channel, self.generation
                            );
                            return;
                        }
                        self.forward(MessageLine::new(self.channel, text));
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    error!("Error reading worker {}: {}", self.channel, e);
                    break;
                }
            }
        }

        let discarded = framer.finish();
        if discarded > 0 {
            debug!(
                "Discarded {} unterminated bytes from worker {}",
                discarded, self.channel
            );
        }
    }

    fn is_current(&self) -> bool {
        self.route.live_generation.load(Ordering::Acquire) == self.generation
    }

    fn forward(&self, line: MessageLine) {
        self.route
            .log
            .record(line.channel(), redact::for_log(line.text()));
        self.route.bus.broadcast(&line);
    }
}
