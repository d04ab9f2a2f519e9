//! Window-to-host protocol
//!
//! Requests a window sends to the host and the events the host sends back,
//! in their JSON wire form.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::models::{Channel, MessageLine, OverlayRequest, PRIMARY_SCREEN_ID};

/// A request from a window's content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HostRequest {
    /// Write one pre-serialized line to the worker
    SendJsonLine { json_line: String },
    /// Start (or restart) the worker for the requesting window
    StartProcess,
    /// Stop the worker for the requesting window
    StopProcess,
    /// Replace the overlay; omitted fields take the configured defaults
    CreateFloatingOverlay {
        #[serde(rename = "alwaysOnTop", default)]
        always_on_top: Option<bool>,
        #[serde(rename = "screenId", default = "primary_screen")]
        screen_id: i64,
    },
    DestroyFloatingOverlay,
    /// List connected displays
    GetScreens,
    GetCommitHash,
    /// Acknowledge a `window-close` event
    WindowCloseReady,
}

fn primary_screen() -> i64 {
    PRIMARY_SCREEN_ID
}

impl HostRequest {
    /// Overlay settings of a create request, filling in `default_on_top`
    pub fn overlay_request(&self, default_on_top: bool) -> Option<OverlayRequest> {
        match self {
            HostRequest::CreateFloatingOverlay {
                always_on_top,
                screen_id,
            } => Some(OverlayRequest::new(
                always_on_top.unwrap_or(default_on_top),
                *screen_id,
            )),
            _ => None,
        }
    }

    /// Wire name of the request
    pub fn name(&self) -> &'static str {
        match self {
            HostRequest::SendJsonLine { .. } => "send_json_line",
            HostRequest::StartProcess => "start_process",
            HostRequest::StopProcess => "stop_process",
            HostRequest::CreateFloatingOverlay { .. } => "create_floating_overlay",
            HostRequest::DestroyFloatingOverlay => "destroy_floating_overlay",
            HostRequest::GetScreens => "get_screens",
            HostRequest::GetCommitHash => "get_commit_hash",
            HostRequest::WindowCloseReady => "window_close_ready",
        }
    }
}

/// An event the host sends to a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum HostEvent {
    #[serde(rename = "stdout")]
    Stdout { payload: String },

    #[serde(rename = "stderr")]
    Stderr { payload: String },

    /// The content should prepare for close and acknowledge
    #[serde(rename = "window-close")]
    WindowClose,

    /// Outcome of a request
    #[serde(rename = "reply")]
    Reply {
        command: String,
        ok: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl HostEvent {
    /// The signal carrying a worker line
    pub fn line(line: &MessageLine) -> Self {
        let payload = line.text().to_string();
        match line.channel() {
            Channel::Stdout => HostEvent::Stdout { payload },
            Channel::Stderr => HostEvent::Stderr { payload },
        }
    }

    pub fn reply(command: &str, outcome: &Result<Value>) -> Self {
        match outcome {
            Ok(value) => HostEvent::Reply {
                command: command.to_string(),
                ok: true,
                result: Some(value.clone()),
                error: None,
            },
            Err(e) => HostEvent::Reply {
                command: command.to_string(),
                ok: false,
                result: None,
                error: Some(e.to_string()),
            },
        }
    }
}
