//! Domain entities - clip addressing, decoded media, playback clocks.

pub mod clip;
pub mod playback;

pub use clip::{ClipFrame, ClipMedia, ClipStore, clip_source, discover_clip_count};
pub use playback::Playback;
