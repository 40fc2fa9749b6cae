//! The showreel stage: frame container, backdrop, swap surfaces, miniature
//! preview.
//!
//! Surfaces, back to front:
//! - backdrop: the current clip, clipped to the frame outline polygon
//! - upcoming: the freshly revealed clip growing from the inset (visible
//!   only while a swap transition is in flight)
//! - outgoing: the previous backdrop shrinking to zero on top
//! - miniature preview: the upcoming clip, fading in on hover; clicking it
//!   emits [`AdvanceReelEvent`]
//!
//! Decoded frames are uploaded as egui textures on demand and kept in an
//! LRU so looping clips stop re-uploading once warm.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::time::Instant;

use eframe::egui;
use log::trace;
use lru::LruCache;

use crate::anim::frame_shape::FrameShape;
use crate::anim::transition::{PREVIEW_INSET_SCALE, SwapTransition};
use crate::anim::tween::lerp;
use crate::core::event_bus::EventEmitter;
use crate::core::reel::Reel;
use crate::core::reel_events::AdvanceReelEvent;
use crate::entities::clip::ClipStore;
use crate::entities::playback::Playback;

/// Uploaded textures kept warm; a looping 10s/24fps clip is ~240 frames.
const TEXTURE_CACHE_CAP: usize = 1024;
/// Arc fan resolution for rounded frame corners.
const CORNER_ARC_STEPS: usize = 8;

const BACKDROP_FILL: egui::Color32 = egui::Color32::from_rgb(18, 18, 26);

/// Everything the stage reads for one frame of rendering.
pub struct StageInputs<'a> {
    pub reel: &'a Reel,
    pub store: &'a ClipStore,
    pub playbacks: &'a HashMap<u32, Playback>,
    pub transition: Option<&'a SwapTransition>,
    pub shape: FrameShape,
    /// False renders state-driven visibility with no tweens.
    pub animations_enabled: bool,
    pub show_clip_numbers: bool,
}

/// Render-side state owned by the stage widget.
pub struct StageState {
    textures: LruCache<(u32, usize), egui::TextureHandle>,
}

impl Default for StageState {
    fn default() -> Self {
        Self::new()
    }
}

impl StageState {
    pub fn new() -> Self {
        Self {
            textures: LruCache::new(
                NonZeroUsize::new(TEXTURE_CACHE_CAP).expect("texture cache capacity"),
            ),
        }
    }

    /// Texture for `clip`'s current playback frame, uploading if needed.
    fn clip_texture(
        &mut self,
        ctx: &egui::Context,
        inputs: &StageInputs<'_>,
        clip: u32,
    ) -> Option<egui::TextureHandle> {
        let frame_count = inputs.store.frame_count(clip);
        if frame_count == 0 {
            return None;
        }
        let frame_idx = inputs
            .playbacks
            .get(&clip)
            .map(|p| p.frame() % frame_count)
            .unwrap_or(0);

        if let Some(tex) = self.textures.get(&(clip, frame_idx)) {
            return Some(tex.clone());
        }

        let frame = inputs.store.frame(clip, frame_idx)?;
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.width, frame.height],
            &frame.rgba,
        );
        let tex = ctx.load_texture(
            format!("clip-{}-frame-{}", clip, frame_idx),
            image,
            egui::TextureOptions::LINEAR,
        );
        trace!("Uploaded texture for clip {} frame {}", clip, frame_idx);
        self.textures.put((clip, frame_idx), tex.clone());
        Some(tex)
    }

    /// Render the stage into `rect`. Click events go out through `emitter`.
    pub fn render(
        &mut self,
        ui: &mut egui::Ui,
        rect: egui::Rect,
        inputs: &StageInputs<'_>,
        emitter: &EventEmitter,
        now: Instant,
    ) {
        let ctx = ui.ctx().clone();
        let painter = ui.painter_at(rect);

        // Backdrop: current clip clipped to the frame outline
        let outline = polygon_in_rect(&inputs.shape, rect);
        match self.clip_texture(&ctx, inputs, inputs.reel.current()) {
            Some(tex) => {
                let uv = cover_uv(tex.size(), rect.aspect_ratio());
                painter.add(textured_polygon(&outline, rect, tex.id(), uv));
            }
            None => {
                painter.add(egui::Shape::convex_polygon(
                    outline.clone(),
                    BACKDROP_FILL,
                    egui::Stroke::NONE,
                ));
            }
        }

        // Swap surfaces, only while a transition is in flight
        if let Some(swap) = inputs.transition {
            if let Some(tex) = self.clip_texture(&ctx, inputs, swap.to) {
                let scale = swap.upcoming_scale(now);
                let surface = egui::Rect::from_center_size(rect.center(), rect.size() * scale);
                let uv = cover_uv(tex.size(), surface.aspect_ratio());
                painter.image(tex.id(), surface, uv, egui::Color32::WHITE);
            }
            let outgoing = swap.outgoing_scale(now);
            if outgoing > 0.0 {
                if let Some(tex) = self.clip_texture(&ctx, inputs, swap.from) {
                    let surface =
                        egui::Rect::from_center_size(rect.center(), rect.size() * outgoing);
                    let uv = cover_uv(tex.size(), surface.aspect_ratio());
                    painter.image(tex.id(), surface, uv, egui::Color32::WHITE);
                }
            }
        }

        // Miniature preview of the upcoming clip, revealed on hover
        let side = rect.width().min(rect.height()) * PREVIEW_INSET_SCALE;
        let mini_rect = egui::Rect::from_center_size(rect.center(), egui::vec2(side, side));
        let response = ui.interact(
            mini_rect,
            ui.id().with("mini-preview"),
            egui::Sense::click(),
        );
        if response.clicked() {
            trace!("Mini preview clicked");
            emitter.emit(AdvanceReelEvent);
        }

        let reveal = if inputs.animations_enabled {
            ctx.animate_bool(ui.id().with("mini-reveal"), response.hovered())
        } else if response.hovered() {
            1.0
        } else {
            0.0
        };
        if reveal > 0.0 {
            let scale = lerp(0.5, 1.0, reveal);
            let shown = egui::Rect::from_center_size(mini_rect.center(), mini_rect.size() * scale);
            let tint = egui::Color32::WHITE.gamma_multiply(reveal);
            match self.clip_texture(&ctx, inputs, inputs.reel.upcoming()) {
                Some(tex) => {
                    let uv = cover_uv(tex.size(), shown.aspect_ratio());
                    painter.image(tex.id(), shown, uv, tint);
                }
                None => {
                    painter.rect_filled(shown, 8.0, BACKDROP_FILL.gamma_multiply(reveal));
                }
            }
            painter.rect_stroke(
                shown,
                8.0,
                egui::Stroke::new(1.0, egui::Color32::from_gray(200).gamma_multiply(reveal)),
                egui::StrokeKind::Inside,
            );
        }

        if inputs.show_clip_numbers {
            painter.text(
                rect.left_top() + egui::vec2(12.0, 10.0),
                egui::Align2::LEFT_TOP,
                format!(
                    "clip {}/{}  next {}",
                    inputs.reel.current(),
                    inputs.reel.total(),
                    inputs.reel.upcoming()
                ),
                egui::FontId::monospace(12.0),
                egui::Color32::from_gray(220),
            );
        }
    }
}

/// Frame outline points mapped from unit space into `rect`.
fn polygon_in_rect(shape: &FrameShape, rect: egui::Rect) -> Vec<egui::Pos2> {
    shape
        .outline(CORNER_ARC_STEPS)
        .into_iter()
        .map(|[x, y]| {
            egui::pos2(
                rect.left() + x * rect.width(),
                rect.top() + y * rect.height(),
            )
        })
        .collect()
}

/// UV sub-rect giving `object-fit: cover` behavior for a texture of
/// `tex_size` shown in a surface with `target_aspect` (w/h).
fn cover_uv(tex_size: [usize; 2], target_aspect: f32) -> egui::Rect {
    let tex_aspect = if tex_size[1] == 0 {
        1.0
    } else {
        tex_size[0] as f32 / tex_size[1] as f32
    };
    if !target_aspect.is_finite() || target_aspect <= 0.0 {
        return egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    }
    if tex_aspect > target_aspect {
        // Texture wider than surface: crop left/right
        let w = target_aspect / tex_aspect;
        let x0 = (1.0 - w) / 2.0;
        egui::Rect::from_min_max(egui::pos2(x0, 0.0), egui::pos2(x0 + w, 1.0))
    } else {
        // Texture taller: crop top/bottom
        let h = tex_aspect / target_aspect;
        let y0 = (1.0 - h) / 2.0;
        egui::Rect::from_min_max(egui::pos2(0.0, y0), egui::pos2(1.0, y0 + h))
    }
}

/// Fan-triangulated textured polygon. UVs are taken from each vertex's
/// position within `rect`, remapped through `uv`.
fn textured_polygon(
    points: &[egui::Pos2],
    rect: egui::Rect,
    texture: egui::TextureId,
    uv: egui::Rect,
) -> egui::Shape {
    let mut mesh = egui::Mesh::with_texture(texture);
    if points.len() < 3 {
        return egui::Shape::mesh(mesh);
    }

    let centroid = points
        .iter()
        .fold(egui::pos2(0.0, 0.0), |acc, p| {
            egui::pos2(acc.x + p.x, acc.y + p.y)
        });
    let centroid = egui::pos2(centroid.x / points.len() as f32, centroid.y / points.len() as f32);

    let vertex = |pos: egui::Pos2| egui::epaint::Vertex {
        pos,
        uv: egui::pos2(
            uv.left() + (pos.x - rect.left()) / rect.width() * uv.width(),
            uv.top() + (pos.y - rect.top()) / rect.height() * uv.height(),
        ),
        color: egui::Color32::WHITE,
    };

    mesh.vertices.push(vertex(centroid));
    for p in points {
        mesh.vertices.push(vertex(*p));
    }
    let n = points.len() as u32;
    for i in 0..n {
        mesh.indices.extend_from_slice(&[0, 1 + i, 1 + (i + 1) % n]);
    }
    egui::Shape::mesh(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_uv_wide_texture_crops_sides() {
        let uv = cover_uv([200, 100], 1.0); // 2:1 texture on square surface
        assert!((uv.width() - 0.5).abs() < 1e-5);
        assert!((uv.height() - 1.0).abs() < 1e-5);
        assert!((uv.center().x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_cover_uv_tall_texture_crops_top_bottom() {
        let uv = cover_uv([100, 200], 1.0);
        assert!((uv.height() - 0.5).abs() < 1e-5);
        assert!((uv.width() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_cover_uv_matching_aspect_is_full() {
        let uv = cover_uv([160, 90], 160.0 / 90.0);
        assert!((uv.width() - 1.0).abs() < 1e-5);
        assert!((uv.height() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_textured_polygon_triangle_count() {
        let rect = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(100.0, 100.0));
        let points = vec![
            egui::pos2(0.0, 0.0),
            egui::pos2(100.0, 0.0),
            egui::pos2(100.0, 100.0),
            egui::pos2(0.0, 100.0),
        ];
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        let egui::Shape::Mesh(mesh) = textured_polygon(&points, rect, egui::TextureId::default(), uv)
        else {
            panic!("expected mesh shape");
        };
        assert_eq!(mesh.vertices.len(), 5); // centroid + 4 corners
        assert_eq!(mesh.indices.len(), 12); // 4 fan triangles
    }
}
