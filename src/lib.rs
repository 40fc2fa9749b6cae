//! SHOWREEL - click-driven looping clip player library
//!
//! Re-exports all modules for use by the binary target.

// Core engine (reel state, events, loading, workers)
pub mod core;

// Animation layer (pure interpolation, no UI types)
pub mod anim;

// App modules
pub mod app;
pub mod cli;
pub mod config;
pub mod entities;
pub mod widgets;

// Re-export commonly used types
pub use crate::anim::{FrameShape, SwapTransition};
pub use crate::core::event_bus::{BoxedEvent, EventBus, EventEmitter, downcast_event};
pub use crate::core::reel::{DEFAULT_CLIP_COUNT, Reel};
pub use crate::core::workers::Workers;
pub use crate::entities::{ClipStore, Playback, clip_source, discover_clip_count};
