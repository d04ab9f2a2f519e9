//! Worker process supervision
//!
//! Spawning, monitoring and terminating the external worker, framing its
//! output streams into lines, and writing commands to its input.

pub mod framer;
pub mod log;
pub mod process;
pub mod redact;
pub mod signals;
pub mod sink;
pub mod streams;
pub mod supervisor;

// Re-exports for convenience
pub use framer::{is_blank, LineFramer};
pub use log::{LineLog, TracingLineLog};
pub use process::{spawn_worker, SpawnedWorker, WorkerSpec, DEFAULT_UNBUFFERED_ENV};
pub use signals::send_interrupt;
pub use sink::CommandSink;
pub use supervisor::Supervisor;
