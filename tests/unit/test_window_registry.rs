//! Unit Tests for the Window Registry and Broadcast Bus

#[path = "../test_utils/mod.rs"]
mod test_utils;

use companion_host::models::{Channel, MessageLine};
use companion_host::window::{BroadcastBus, WindowId, WindowRegistry, WindowSurface};
use std::sync::Arc;
use test_utils::{FailingSurface, RecordingSurface};

#[test]
fn test_attach_is_idempotent() {
    let registry = WindowRegistry::new();
    let window = RecordingSurface::primary();

    assert!(registry.attach(window.as_window()));
    assert!(!registry.attach(window.as_window()));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_detach_non_member_is_noop() {
    let registry = WindowRegistry::new();
    let window = RecordingSurface::primary();
    registry.attach(window.as_window());

    assert!(!registry.detach(WindowId::new()));
    assert_eq!(registry.len(), 1);
    assert!(registry.detach(window.id()));
    assert!(!registry.detach(window.id()));
    assert!(registry.is_empty());
}

#[test]
fn test_clones_share_members() {
    let registry = WindowRegistry::new();
    let other = registry.clone();
    let window = RecordingSurface::overlay();
    other.attach(window.as_window());
    assert!(registry.contains(window.id()));
}

#[test]
fn test_broadcast_without_windows() {
    let bus = BroadcastBus::new(WindowRegistry::new());
    let report = bus.broadcast(&MessageLine::new(Channel::Stdout, "nobody"));
    assert_eq!(report.delivered, 0);
    assert_eq!(report.failed, 0);
}

#[test]
fn test_broadcast_reaches_every_window_in_order() {
    let registry = WindowRegistry::new();
    let primary = RecordingSurface::primary();
    let overlay = RecordingSurface::overlay();
    registry.attach(primary.as_window());
    registry.attach(overlay.as_window());
    let bus = BroadcastBus::new(registry);

    bus.broadcast(&MessageLine::new(Channel::Stdout, "first"));
    bus.broadcast(&MessageLine::new(Channel::Stderr, "warning"));
    bus.broadcast(&MessageLine::new(Channel::Stdout, "second"));

    for window in [&primary, &overlay] {
        assert_eq!(window.texts(Channel::Stdout), vec!["first", "second"]);
        assert_eq!(window.texts(Channel::Stderr), vec!["warning"]);
    }
}

#[test]
fn test_failing_window_is_isolated() {
    let registry = WindowRegistry::new();
    let broken = FailingSurface::new();
    let healthy = RecordingSurface::primary();
    registry.attach(Arc::clone(&broken) as Arc<dyn WindowSurface>);
    registry.attach(healthy.as_window());
    let bus = BroadcastBus::new(registry.clone());

    let report = bus.broadcast(&MessageLine::new(Channel::Stdout, "still here"));

    assert_eq!(report.delivered, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(broken.attempts(), 1);
    assert_eq!(healthy.texts(Channel::Stdout), vec!["still here"]);
    // Failure does not detach the window
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_detached_window_receives_nothing() {
    let registry = WindowRegistry::new();
    let window = RecordingSurface::overlay();
    registry.attach(window.as_window());
    let bus = BroadcastBus::new(registry.clone());

    bus.broadcast(&MessageLine::new(Channel::Stdout, "before"));
    registry.detach(window.id());
    bus.broadcast(&MessageLine::new(Channel::Stdout, "after"));

    assert_eq!(window.texts(Channel::Stdout), vec!["before"]);
}
