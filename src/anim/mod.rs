//! Progress-driven animation layer.
//!
//! Pure interpolation: time- or scroll-based progress in, geometry out.
//! Nothing here touches egui or the reel state, so all of it runs (and
//! tests) without a rendering surface.

pub mod frame_shape;
pub mod transition;
pub mod tween;

pub use frame_shape::{FULL_RECT, FrameShape, STYLIZED, scroll_progress};
pub use transition::SwapTransition;
pub use tween::{Ease, Tween, lerp};
