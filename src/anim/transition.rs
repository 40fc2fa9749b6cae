//! Clip swap transition.
//!
//! When the reel rotates, the upcoming surface grows from the miniature
//! inset to fill the frame over 1.0 s while the previous backdrop shrinks
//! from full size to zero over 1.5 s, both on the power1-in-out curve.
//! Playback of the upcoming clip starts at the beginning of the grow tween.
//!
//! The transition is fire-and-forget: nothing here feeds back into the
//! reel, and a new click simply replaces the visuals mid-flight.

use std::time::Instant;

use crate::anim::tween::{Ease, Tween, lerp};

/// Grow duration of the upcoming surface, seconds.
pub const GROW_SECS: f32 = 1.0;
/// Shrink duration of the outgoing backdrop, seconds.
pub const SHRINK_SECS: f32 = 1.5;
/// Scale of the miniature inset relative to the frame.
pub const PREVIEW_INSET_SCALE: f32 = 0.25;

/// One in-flight swap: `from` shrinking away, `to` growing in.
#[derive(Clone, Debug)]
pub struct SwapTransition {
    pub from: u32,
    pub to: u32,
    started: Instant,
    grow: Tween,
    shrink: Tween,
}

impl SwapTransition {
    pub fn start(from: u32, to: u32, now: Instant) -> Self {
        Self {
            from,
            to,
            started: now,
            grow: Tween::new(GROW_SECS, Ease::PowerInOut),
            shrink: Tween::new(SHRINK_SECS, Ease::PowerInOut),
        }
    }

    fn elapsed(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.started).as_secs_f32()
    }

    /// Scale of the growing upcoming surface: inset -> 1.
    pub fn upcoming_scale(&self, now: Instant) -> f32 {
        lerp(PREVIEW_INSET_SCALE, 1.0, self.grow.progress(self.elapsed(now)))
    }

    /// Scale of the shrinking outgoing backdrop: 1 -> 0.
    pub fn outgoing_scale(&self, now: Instant) -> f32 {
        lerp(1.0, 0.0, self.shrink.progress(self.elapsed(now)))
    }

    /// True once both tweens have run their course.
    pub fn finished(&self, now: Instant) -> bool {
        let elapsed = self.elapsed(now);
        self.grow.finished(elapsed) && self.shrink.finished(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_scales_at_start() {
        let t0 = Instant::now();
        let swap = SwapTransition::start(1, 2, t0);
        assert_eq!(swap.upcoming_scale(t0), PREVIEW_INSET_SCALE);
        assert_eq!(swap.outgoing_scale(t0), 1.0);
        assert!(!swap.finished(t0));
    }

    #[test]
    fn test_scales_at_end() {
        let t0 = Instant::now();
        let swap = SwapTransition::start(3, 4, t0);
        let end = t0 + Duration::from_secs_f32(SHRINK_SECS);
        assert_eq!(swap.upcoming_scale(end), 1.0);
        assert_eq!(swap.outgoing_scale(end), 0.0);
        assert!(swap.finished(end));
    }

    #[test]
    fn test_grow_finishes_before_shrink() {
        let t0 = Instant::now();
        let swap = SwapTransition::start(1, 2, t0);
        let mid = t0 + Duration::from_secs_f32(GROW_SECS + 0.1);
        assert_eq!(swap.upcoming_scale(mid), 1.0);
        assert!(swap.outgoing_scale(mid) > 0.0);
        assert!(!swap.finished(mid));
    }

    #[test]
    fn test_clock_going_backwards_is_clamped() {
        let t0 = Instant::now();
        let swap = SwapTransition::start(1, 2, t0 + Duration::from_secs(1));
        // now < started: saturates to zero elapsed
        assert_eq!(swap.upcoming_scale(t0), PREVIEW_INSET_SCALE);
        assert_eq!(swap.outgoing_scale(t0), 1.0);
    }
}
