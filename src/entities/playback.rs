//! Looping playback clock for one clip surface.
//!
//! FPS-based timing: each frame has a fixed duration (1/fps seconds) and
//! the clock advances by whole frames of elapsed wall time, wrapping over
//! however many frames have been decoded so far. Clips always loop; there
//! is no stop-at-end state.

use log::trace;
use std::time::Instant;

/// Fallback fps when the container reports none.
pub const FALLBACK_FPS: f64 = 24.0;

#[derive(Clone, Debug)]
pub struct Playback {
    fps: f64,
    frame: usize,
    playing: bool,
    last_tick: Option<Instant>,
}

impl Playback {
    pub fn new(fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 {
            fps
        } else {
            FALLBACK_FPS
        };
        Self {
            fps,
            frame: 0,
            playing: false,
            last_tick: None,
        }
    }

    /// Imperative play. Restarting an already-playing clip is a no-op.
    pub fn play(&mut self) {
        if !self.playing {
            self.playing = true;
            self.last_tick = None;
            trace!("Playback started ({} fps)", self.fps);
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Current frame index into the decoded frames.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Advance the clock. `available` is the number of decoded frames;
    /// the position wraps modulo that count. Returns the new frame index
    /// when it changed.
    pub fn update(&mut self, now: Instant, available: usize) -> Option<usize> {
        if !self.playing || available == 0 {
            return None;
        }

        // Keep the position valid while frames are still streaming in.
        if self.frame >= available {
            self.frame %= available;
        }

        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return None;
        };

        let elapsed = now.duration_since(last).as_secs_f64();
        let frame_duration = 1.0 / self.fps;
        let steps = (elapsed / frame_duration) as usize;
        if steps == 0 {
            return None;
        }

        self.frame = (self.frame + steps) % available;
        self.last_tick = Some(now);
        Some(self.frame)
    }
}
