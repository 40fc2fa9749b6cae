//! Full-screen loading overlay.
//!
//! Covers the whole window while the loading gate is closed, with three
//! dots pulsing in a staggered rhythm. Drawn on the foreground layer so it
//! sits above the stage regardless of panel order.

use eframe::egui;

const OVERLAY_BG: egui::Color32 = egui::Color32::from_rgb(245, 243, 255);
const DOT_COLOR: egui::Color32 = egui::Color32::from_rgb(90, 80, 160);
const DOT_RADIUS: f32 = 9.0;
const DOT_SPACING: f32 = 34.0;
/// Full pulse cycle, seconds.
const PULSE_PERIOD: f64 = 0.8;

pub fn render_loading_overlay(ctx: &egui::Context) {
    let rect = ctx.screen_rect();
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("loading-overlay"),
    ));
    painter.rect_filled(rect, 0.0, OVERLAY_BG);

    let time = ctx.input(|i| i.time);
    let center = rect.center();
    for k in 0..3 {
        let phase = time / PULSE_PERIOD * std::f64::consts::TAU - k as f64 * 0.7;
        let pulse = 0.5 + 0.5 * phase.sin() as f32;
        let pos = center + egui::vec2((k as f32 - 1.0) * DOT_SPACING, 0.0);
        painter.circle_filled(
            pos,
            DOT_RADIUS * (0.6 + 0.4 * pulse),
            DOT_COLOR.gamma_multiply(0.4 + 0.6 * pulse),
        );
    }

    // Keep the dots pulsing while nothing else animates
    ctx.request_repaint();
}
