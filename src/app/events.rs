//! Event handling for ShowreelApp.
//!
//! All reel mutations happen here, on the UI thread, one event at a time.
//! The stage re-reads the reel later in the same frame, so the animation
//! layer always observes a fully applied state change.

use std::time::Instant;

use eframe::egui;
use log::{debug, trace, warn};

use super::ShowreelApp;
use crate::anim::SwapTransition;
use crate::core::event_bus::downcast_event;
use crate::core::reel_events::{
    AdvanceReelEvent, ClipFailedEvent, ClipLoadedEvent, PlayClipEvent, ToggleFullscreenEvent,
};
use crate::entities::playback::{FALLBACK_FPS, Playback};

impl ShowreelApp {
    /// Drain the event bus. Cascaded events (a click emits `PlayClipEvent`)
    /// are processed in the same pass; no handler re-emits its own type, so
    /// the loop terminates.
    pub(crate) fn handle_events(&mut self) {
        loop {
            let events = self.event_bus.poll();
            if events.is_empty() {
                break;
            }
            for event in events {
                if let Some(e) = downcast_event::<ClipLoadedEvent>(&event) {
                    self.on_clip_loaded(e.0);
                    continue;
                }
                if let Some(e) = downcast_event::<ClipFailedEvent>(&event) {
                    self.on_clip_failed(e.clip, &e.reason);
                    continue;
                }
                if downcast_event::<AdvanceReelEvent>(&event).is_some() {
                    self.on_advance();
                    continue;
                }
                if let Some(e) = downcast_event::<PlayClipEvent>(&event) {
                    self.play_clip(e.0);
                    continue;
                }
                if downcast_event::<ToggleFullscreenEvent>(&event).is_some() {
                    self.is_fullscreen = !self.is_fullscreen;
                    self.fullscreen_dirty = true;
                    continue;
                }
            }
        }
    }

    fn on_clip_loaded(&mut self, clip: u32) {
        debug!("Clip {} loaded ({}/{})", clip, self.reel.loaded() + 1, self.reel.total());
        self.reel.report_loaded();
        // Every mounted clip surface loops from the moment it has data
        self.play_clip(clip);
    }

    fn on_clip_failed(&mut self, clip: u32, reason: &str) {
        warn!("Clip {} failed to load: {}", clip, reason);
        self.error_msg = Some(format!("clip {}: {}", clip, reason));
        // A broken clip must not hold the loading gate shut
        self.reel.report_loaded();
    }

    fn on_advance(&mut self) {
        let from = self.reel.current();
        let to = self.reel.advance();
        if self.animations_enabled {
            // A click mid-transition replaces the visuals; the reel state
            // has already moved on either way
            self.transition = Some(SwapTransition::start(from, to, Instant::now()));
        }
        self.event_bus.emit(PlayClipEvent(to));
        trace!("Advance: {} -> {} (next up {})", from, to, self.reel.upcoming());
    }

    fn play_clip(&mut self, clip: u32) {
        let fps = self.store.fps(clip).unwrap_or(FALLBACK_FPS);
        self.playbacks
            .entry(clip)
            .or_insert_with(|| Playback::new(fps))
            .play();
    }

    /// Bounded wait for stalled clips: once the deadline passes, force the
    /// remaining reports so the overlay cannot hang forever.
    pub(crate) fn enforce_load_deadline(&mut self, now: Instant) {
        if self.gate_forced || !self.reel.is_loading() {
            return;
        }
        if now.saturating_duration_since(self.loading_started) >= self.load_timeout {
            warn!(
                "Loading gate still closed after {:?} ({}/{} clips); forcing reveal",
                self.load_timeout,
                self.reel.loaded(),
                self.reel.total()
            );
            while self.reel.is_loading() {
                self.reel.report_loaded();
            }
            self.gate_forced = true;
        }
    }

    pub(crate) fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::Z)) {
            self.event_bus.emit(ToggleFullscreenEvent);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            if self.is_fullscreen {
                self.event_bus.emit(ToggleFullscreenEvent);
            } else {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppOptions;
    use crate::config::AppSettings;
    use std::path::PathBuf;
    use std::time::Duration;

    fn test_app(total: u32, animations: bool) -> ShowreelApp {
        // No start_loading(): the state machine runs without media or a
        // rendering surface
        ShowreelApp::new(AppOptions {
            media_dir: PathBuf::from("clips"),
            total,
            fullscreen: false,
            animations_enabled: animations,
            load_timeout: Duration::from_secs(20),
            settings: AppSettings::default(),
        })
    }

    #[test]
    fn test_click_advances_and_starts_transition() {
        let mut app = test_app(4, true);
        app.event_bus.emit(AdvanceReelEvent);
        app.handle_events();

        assert_eq!(app.reel.current(), 2);
        assert!(app.reel.has_clicked());
        let swap = app.transition.as_ref().expect("transition started");
        assert_eq!((swap.from, swap.to), (1, 2));
        // Playback of the revealed clip started with the transition
        assert!(app.playbacks.get(&2).is_some_and(|p| p.is_playing()));
    }

    #[test]
    fn test_rapid_clicks_advance_deterministically() {
        let mut app = test_app(4, true);
        for _ in 0..5 {
            app.event_bus.emit(AdvanceReelEvent);
        }
        app.handle_events();
        // 5 advances from 1 over 4 clips: 1 -> 2
        assert_eq!(app.reel.current(), 2);
        let swap = app.transition.as_ref().unwrap();
        assert_eq!((swap.from, swap.to), (1, 2));
    }

    #[test]
    fn test_no_animation_still_mutates_state() {
        let mut app = test_app(4, false);
        app.event_bus.emit(AdvanceReelEvent);
        app.handle_events();

        assert_eq!(app.reel.current(), 2);
        assert!(app.transition.is_none());
        assert!(app.playbacks.get(&2).is_some_and(|p| p.is_playing()));
    }

    #[test]
    fn test_no_clicks_never_invokes_animation() {
        let mut app = test_app(4, true);
        for i in 1..=4 {
            app.event_bus.emit(ClipLoadedEvent(i));
        }
        app.handle_events();

        assert!(!app.reel.has_clicked());
        assert!(app.transition.is_none());
        assert!(!app.reel.is_loading());
    }

    #[test]
    fn test_loaded_events_open_gate_at_n_minus_one() {
        let mut app = test_app(4, true);
        for i in 1..=3 {
            app.event_bus.emit(ClipLoadedEvent(i));
            app.handle_events();
        }
        assert!(!app.reel.is_loading());
        // Loaded clips loop on their own
        assert!(app.playbacks.get(&1).is_some_and(|p| p.is_playing()));
    }

    #[test]
    fn test_failed_clip_reports_to_gate() {
        let mut app = test_app(2, true);
        app.event_bus.emit(ClipFailedEvent {
            clip: 1,
            reason: "no such file".into(),
        });
        app.handle_events();

        assert!(!app.reel.is_loading()); // threshold N-1 = 1
        assert!(app.error_msg.is_some());
        assert!(app.playbacks.get(&1).is_none());
    }

    #[test]
    fn test_load_deadline_forces_gate_open() {
        let mut app = test_app(4, true);
        app.load_timeout = Duration::from_secs(0);
        assert!(app.reel.is_loading());

        app.enforce_load_deadline(Instant::now());
        assert!(!app.reel.is_loading());
        assert!(app.gate_forced);

        // Late reports after the force stay harmless
        app.event_bus.emit(ClipLoadedEvent(1));
        app.handle_events();
        assert!(!app.reel.is_loading());
    }

    #[test]
    fn test_deadline_noop_before_timeout() {
        let mut app = test_app(4, true);
        app.enforce_load_deadline(Instant::now());
        assert!(app.reel.is_loading());
        assert!(!app.gate_forced);
    }
}
