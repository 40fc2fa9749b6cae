//! Main application loop - eframe::App implementation.
//!
//! Per-frame flow:
//! 1. Drain the event bus (reel mutations happen here)
//! 2. Loading watchdog
//! 3. Advance playback clocks, retire finished swap visuals
//! 4. Apply pending fullscreen change
//! 5. Render the scrollable page: stage + tail section
//! 6. Loading overlay while the gate is closed
//! 7. Keyboard input

use std::time::{Duration, Instant};

use eframe::egui;

use super::ShowreelApp;
use crate::anim::frame_shape::{FrameShape, scroll_progress};
use crate::widgets::{StageInputs, render_loading_overlay};

/// Playback tick target; clips themselves advance on their own fps.
const REPAINT_INTERVAL: Duration = Duration::from_millis(16);

const TAIL_FILL: egui::Color32 = egui::Color32::from_rgb(223, 223, 240);

impl eframe::App for ShowreelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_events();

        let now = Instant::now();
        self.enforce_load_deadline(now);

        // Advance every looping clip clock
        for (clip, playback) in self.playbacks.iter_mut() {
            let available = self.store.frame_count(*clip);
            playback.update(now, available);
        }

        // Finished swap visuals are dropped; nothing feeds back into the reel
        if self.transition.as_ref().is_some_and(|t| t.finished(now)) {
            self.transition = None;
        }

        if self.fullscreen_dirty {
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(self.is_fullscreen));
            self.fullscreen_dirty = false;
        }

        let stage_height = ctx.screen_rect().height();

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let viewport_top = ui.clip_rect().top();
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let width = ui.available_width();
                        let (stage_rect, _) = ui.allocate_exact_size(
                            egui::vec2(width, stage_height),
                            egui::Sense::hover(),
                        );

                        // Scroll anchors: offset 0 = stage center at viewport
                        // center; stage bottom reaches viewport center at half
                        // the stage height. The outline relaxes across that
                        // range; scrubbing back restores it.
                        let offset = viewport_top - stage_rect.top();
                        let progress = if self.animations_enabled {
                            scroll_progress(offset, 0.0, stage_height / 2.0)
                        } else {
                            1.0
                        };
                        let shape = FrameShape::at(progress);

                        let inputs = StageInputs {
                            reel: &self.reel,
                            store: &self.store,
                            playbacks: &self.playbacks,
                            transition: if self.animations_enabled {
                                self.transition.as_ref()
                            } else {
                                None
                            },
                            shape,
                            animations_enabled: self.animations_enabled,
                            show_clip_numbers: self.settings.show_clip_numbers,
                        };
                        let emitter = self.event_bus.emitter();
                        self.stage.render(ui, stage_rect, &inputs, &emitter, now);

                        // Tail section below the stage so there is a
                        // scroll range to drive the outline
                        let tail_height = stage_height * self.settings.page_tail_factor;
                        if tail_height > 0.0 {
                            let (tail_rect, _) = ui.allocate_exact_size(
                                egui::vec2(width, tail_height),
                                egui::Sense::hover(),
                            );
                            ui.painter().rect_filled(tail_rect, 0.0, TAIL_FILL);
                        }
                    });
            });

        if self.reel.is_loading() {
            render_loading_overlay(ctx);
        }

        if let Some(msg) = &self.error_msg {
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Foreground,
                egui::Id::new("error-readout"),
            ));
            painter.text(
                ctx.screen_rect().left_bottom() + egui::vec2(10.0, -10.0),
                egui::Align2::LEFT_BOTTOM,
                msg,
                egui::FontId::proportional(13.0),
                egui::Color32::from_rgb(220, 80, 80),
            );
        }

        self.handle_keyboard(ctx);

        // Clips loop continuously; keep frames coming
        ctx.request_repaint_after(REPAINT_INTERVAL);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match serde_json::to_string(&self.settings) {
            Ok(json) => storage.set_string(eframe::APP_KEY, json),
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}
