//! Mock window surfaces

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use companion_host::models::{Channel, MessageLine};
use companion_host::window::{OverlaySurface, SurfaceError, WindowId, WindowRole, WindowSurface};
use companion_host::worker::LineLog;

/// Window that records everything the host does to it
pub struct RecordingSurface {
    id: WindowId,
    role: WindowRole,
    lines: Mutex<Vec<MessageLine>>,
    operations: Mutex<Vec<String>>,
    close_requests: AtomicUsize,
    closed: AtomicBool,
}

impl RecordingSurface {
    pub fn new(role: WindowRole) -> Arc<Self> {
        Arc::new(Self {
            id: WindowId::new(),
            role,
            lines: Mutex::new(Vec::new()),
            operations: Mutex::new(Vec::new()),
            close_requests: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        })
    }

    pub fn primary() -> Arc<Self> {
        Self::new(WindowRole::Primary)
    }

    pub fn overlay() -> Arc<Self> {
        Self::new(WindowRole::Overlay)
    }

    pub fn as_window(self: &Arc<Self>) -> Arc<dyn WindowSurface> {
        Arc::clone(self) as Arc<dyn WindowSurface>
    }

    pub fn lines(&self) -> Vec<MessageLine> {
        self.lines.lock().unwrap().clone()
    }

    /// Texts received on `channel`, in order
    pub fn texts(&self, channel: Channel) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|l| l.channel() == channel)
            .map(|l| l.into_text())
            .collect()
    }

    pub fn operations(&self) -> Vec<String> {
        self.operations.lock().unwrap().clone()
    }

    pub fn record(&self, operation: &str) {
        self.operations.lock().unwrap().push(operation.to_string());
    }

    pub fn close_requests(&self) -> usize {
        self.close_requests.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Wait until at least `count` lines arrived; returns whether they did
    pub async fn wait_for_lines(&self, count: usize) -> bool {
        super::wait_until(Duration::from_secs(5), || self.lines.lock().unwrap().len() >= count).await
    }
}

impl WindowSurface for RecordingSurface {
    fn id(&self) -> WindowId {
        self.id
    }

    fn role(&self) -> WindowRole {
        self.role
    }

    fn deliver(&self, line: &MessageLine) -> Result<(), SurfaceError> {
        if self.is_closed() {
            return Err(SurfaceError::Closed);
        }
        self.lines.lock().unwrap().push(line.clone());
        Ok(())
    }

    fn request_close(&self) -> Result<(), SurfaceError> {
        self.close_requests.fetch_add(1, Ordering::SeqCst);
        self.record("request_close");
        Ok(())
    }

    fn force_close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.record("force_close");
    }
}

impl OverlaySurface for RecordingSurface {
    fn set_click_through(&self, enabled: bool) -> Result<(), SurfaceError> {
        self.record(&format!("click_through:{}", enabled));
        Ok(())
    }

    fn maximize(&self) -> Result<(), SurfaceError> {
        self.record("maximize");
        Ok(())
    }

    fn show(&self) -> Result<(), SurfaceError> {
        self.record("show");
        Ok(())
    }

    fn into_window(self: Arc<Self>) -> Arc<dyn WindowSurface> {
        self
    }
}

/// Window whose delivery always fails
pub struct FailingSurface {
    id: WindowId,
    attempts: AtomicUsize,
}

impl FailingSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: WindowId::new(),
            attempts: AtomicUsize::new(0),
        })
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl WindowSurface for FailingSurface {
    fn id(&self) -> WindowId {
        self.id
    }

    fn role(&self) -> WindowRole {
        WindowRole::Overlay
    }

    fn deliver(&self, _line: &MessageLine) -> Result<(), SurfaceError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SurfaceError::Transport("renderer gone".to_string()))
    }

    fn request_close(&self) -> Result<(), SurfaceError> {
        Err(SurfaceError::Closed)
    }

    fn force_close(&self) {}
}

/// Logging collaborator that keeps what it was given
#[derive(Default)]
pub struct RecordingLog {
    records: Mutex<Vec<(Channel, String)>>,
}

impl RecordingLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn records(&self) -> Vec<(Channel, String)> {
        self.records.lock().unwrap().clone()
    }
}

impl LineLog for RecordingLog {
    fn record(&self, channel: Channel, text: &str) {
        self.records.lock().unwrap().push((channel, text.to_string()));
    }
}
