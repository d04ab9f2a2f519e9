//! Attached windows
//!
//! The registry of display surfaces subscribed to worker output and the bus
//! that fans lines out to them.

pub mod bus;
pub mod registry;
pub mod surface;

pub use bus::{BroadcastBus, DeliveryReport};
pub use registry::WindowRegistry;
pub use surface::{OverlaySurface, SurfaceError, WindowId, WindowRole, WindowSurface};
