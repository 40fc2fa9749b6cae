//! Core engine modules - reel state, events, loading, workers.
//!
//! Everything here is UI-free; the state machine and pipeline run headless.

pub mod event_bus;
pub mod loader;
pub mod reel;
pub mod reel_events;
pub mod workers;

// Re-exports for convenience
pub use event_bus::{BoxedEvent, EventBus, EventEmitter, downcast_event};
pub use loader::{ClipError, ClipMeta};
pub use reel::{DEFAULT_CLIP_COUNT, Reel};
pub use workers::Workers;
