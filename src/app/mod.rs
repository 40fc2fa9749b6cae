//! Application module - ShowreelApp and its runtime wiring.
//!
//! Submodules:
//! - `events` - event bus handling and keyboard input
//! - `run` - the eframe::App frame loop

mod events;
mod run;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::info;

use crate::anim::SwapTransition;
use crate::config::AppSettings;
use crate::core::event_bus::EventBus;
use crate::core::loader::spawn_clip_loads;
use crate::core::reel::Reel;
use crate::core::workers::Workers;
use crate::entities::clip::ClipStore;
use crate::entities::playback::Playback;
use crate::widgets::StageState;

/// Startup knobs resolved from CLI + settings.
#[derive(Clone, Debug)]
pub struct AppOptions {
    pub media_dir: PathBuf,
    pub total: u32,
    pub fullscreen: bool,
    /// Animation capability: false renders state-driven markup only.
    pub animations_enabled: bool,
    pub load_timeout: Duration,
    pub settings: AppSettings,
}

/// Main application state.
pub struct ShowreelApp {
    pub(crate) reel: Reel,
    pub(crate) store: ClipStore,
    pub(crate) playbacks: HashMap<u32, Playback>,
    pub(crate) transition: Option<SwapTransition>,
    pub(crate) stage: StageState,
    pub(crate) event_bus: EventBus,
    pub(crate) workers: Arc<Workers>,
    pub(crate) settings: AppSettings,
    pub(crate) media_dir: PathBuf,
    pub(crate) animations_enabled: bool,
    pub(crate) is_fullscreen: bool,
    pub(crate) fullscreen_dirty: bool,
    pub(crate) loading_started: Instant,
    pub(crate) load_timeout: Duration,
    pub(crate) gate_forced: bool,
    pub(crate) error_msg: Option<String>,
}

impl ShowreelApp {
    pub fn new(opts: AppOptions) -> Self {
        // One worker per clip, capped to leave room for the UI thread
        let num_workers = (num_cpus::get() * 3 / 4)
            .max(1)
            .min(opts.total.max(1) as usize);
        let workers = Arc::new(Workers::new(num_workers));

        info!(
            "Showreel: {} clips from {} ({} workers)",
            opts.total,
            opts.media_dir.display(),
            num_workers
        );

        Self {
            reel: Reel::new(opts.total),
            store: ClipStore::new(),
            playbacks: HashMap::new(),
            transition: None,
            stage: StageState::new(),
            event_bus: EventBus::new(),
            workers,
            settings: opts.settings,
            media_dir: opts.media_dir,
            animations_enabled: opts.animations_enabled,
            is_fullscreen: opts.fullscreen,
            fullscreen_dirty: opts.fullscreen,
            loading_started: Instant::now(),
            load_timeout: opts.load_timeout,
            gate_forced: false,
            error_msg: None,
        }
    }

    /// Queue the decode jobs. Separate from construction so tests can run
    /// the state machine without touching the filesystem.
    pub fn start_loading(&mut self) {
        let emitter = self.event_bus.emitter();
        spawn_clip_loads(
            &self.workers,
            &self.store,
            &emitter,
            &self.media_dir,
            self.reel.total(),
        );
        self.loading_started = Instant::now();
    }
}
