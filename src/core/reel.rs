//! Rotation state for the clip showreel.
//!
//! **Architecture**: `Reel` is the single source of truth for which clip is
//! on the backdrop, whether the user has ever rotated the reel, and how many
//! clips have reported their data ready. It owns no media and knows nothing
//! about rendering or decoding; the app mutates it from the main-loop event
//! handler and the UI re-reads it on the same frame.
//!
//! # Rotation Model
//!
//! Clips are indexed 1..=N. The only mutation is `advance()`:
//! `current = (current % N) + 1` - cyclic increment, N wraps back to 1.
//! The upcoming clip (shown in the miniature preview) is always
//! `(current % N) + 1`.
//!
//! # Loading Gate
//!
//! `report_loaded()` counts clips whose first frame has been decoded.
//! The gate opens (`is_loading()` turns false) once N-1 clips have
//! reported: the backdrop is revealed when all but one clip are ready,
//! trading a possibly unbuffered clip for faster perceived startup.
//! The count saturates, so extra reports past N are harmless.

use log::trace;

/// Default clip count when the media dir yields no better answer.
pub const DEFAULT_CLIP_COUNT: u32 = 4;

/// Showreel rotation state: current clip, click latch, loading gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reel {
    total: u32,
    current: u32,
    has_clicked: bool,
    loaded: u32,
}

impl Reel {
    /// Create a reel over `total` clips, starting on clip 1.
    pub fn new(total: u32) -> Self {
        Self {
            total: total.max(1),
            current: 1,
            has_clicked: false,
            loaded: 0,
        }
    }

    /// Number of clips in the rotation.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Clip currently on the backdrop, in 1..=total.
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Clip shown in the miniature preview; becomes current on the next click.
    pub fn upcoming(&self) -> u32 {
        self.current % self.total + 1
    }

    /// True once the user has rotated the reel at least once. Never resets.
    pub fn has_clicked(&self) -> bool {
        self.has_clicked
    }

    /// Rotate to the next clip. Returns the new current index.
    ///
    /// Latches `has_clicked`. Safe to call at any time, including while a
    /// swap transition is still on screen - repeated clicks advance
    /// deterministically and only the visuals may overlap.
    pub fn advance(&mut self) -> u32 {
        self.has_clicked = true;
        self.current = self.current % self.total + 1;
        trace!("Reel advanced to clip {}/{}", self.current, self.total);
        self.current
    }

    /// Record that one more clip has its first frame available.
    pub fn report_loaded(&mut self) {
        self.loaded = self.loaded.saturating_add(1);
    }

    /// Clips that have reported so far.
    pub fn loaded(&self) -> u32 {
        self.loaded
    }

    /// Loading gate: true until all but one clip have reported.
    pub fn is_loading(&self) -> bool {
        self.loaded < self.total.saturating_sub(1)
    }
}

impl Default for Reel {
    fn default() -> Self {
        Self::new(DEFAULT_CLIP_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_cycles_through_four_clips() {
        let mut reel = Reel::new(4);
        assert_eq!(reel.current(), 1);
        assert_eq!(reel.advance(), 2);
        assert_eq!(reel.advance(), 3);
        assert_eq!(reel.advance(), 4);
        // Wraps back to 1
        assert_eq!(reel.advance(), 1);
    }

    #[test]
    fn test_advance_formula_holds_for_any_total() {
        // k advances from index 1 must land on ((1 - 1 + k) mod N) + 1
        for total in 2..=8u32 {
            let mut reel = Reel::new(total);
            for k in 1..=(3 * total) {
                let expected = k % total + 1;
                assert_eq!(reel.advance(), expected, "total={} k={}", total, k);
            }
        }
    }

    #[test]
    fn test_upcoming_is_cyclic_successor() {
        let mut reel = Reel::new(4);
        assert_eq!(reel.upcoming(), 2);
        reel.advance(); // current = 2
        assert_eq!(reel.upcoming(), 3);
        reel.advance(); // 3
        reel.advance(); // 4
        assert_eq!(reel.upcoming(), 1);
    }

    #[test]
    fn test_has_clicked_latches_on_first_advance() {
        let mut reel = Reel::new(4);
        assert!(!reel.has_clicked());
        reel.advance();
        assert!(reel.has_clicked());
        reel.advance();
        reel.advance();
        assert!(reel.has_clicked());
    }

    #[test]
    fn test_gate_opens_at_total_minus_one() {
        let mut reel = Reel::new(4);
        assert!(reel.is_loading());
        reel.report_loaded();
        assert!(reel.is_loading());
        reel.report_loaded();
        assert!(reel.is_loading());
        reel.report_loaded(); // third report = N - 1
        assert!(!reel.is_loading());
        // A fourth report leaves the gate open
        reel.report_loaded();
        assert!(!reel.is_loading());
    }

    #[test]
    fn test_gate_never_reverts() {
        let mut reel = Reel::new(3);
        let mut transitions = 0;
        let mut was_loading = reel.is_loading();
        for _ in 0..10 {
            reel.report_loaded();
            if was_loading && !reel.is_loading() {
                transitions += 1;
            }
            was_loading = reel.is_loading();
        }
        assert_eq!(transitions, 1);
        assert!(!reel.is_loading());
    }

    #[test]
    fn test_loaded_count_saturates() {
        let mut reel = Reel::new(2);
        for _ in 0..5 {
            reel.report_loaded();
        }
        assert_eq!(reel.loaded(), 5);
        assert!(!reel.is_loading());
    }

    #[test]
    fn test_single_clip_reel_never_loads_gate() {
        // total=1: threshold is 0, gate is open from the start
        let reel = Reel::new(1);
        assert!(!reel.is_loading());
        assert_eq!(reel.upcoming(), 1);
    }
}
