//! GPU scene backend: `Surface` onto a `vello::Scene`.
//!
//! Builds a fresh display list per frame; the host rasterizes and
//! presents the scene via wgpu. Geometry arrives in screen space, so
//! every draw uses the identity transform.

use crate::surface::{Stroke, Surface, TextStyle};
use ink_core::model::Color;
use kurbo::{Affine, BezPath, Circle, Rect, Stroke as KurboStroke};
use peniko::Fill;
use vello::Scene;

pub struct VelloSurface<'a> {
    scene: &'a mut Scene,
}

impl<'a> VelloSurface<'a> {
    /// Wrap a scene for one frame. Pass a freshly-reset `Scene`.
    pub fn new(scene: &'a mut Scene) -> Self {
        Self { scene }
    }
}

impl Surface for VelloSurface<'_> {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let rect = Rect::new(x as f64, y as f64, (x + width) as f64, (y + height) as f64);
        self.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            peniko_color(color, 1.0),
            None,
            &rect,
        );
    }

    fn fill_path(&mut self, path: &BezPath, color: Color, opacity: f32) {
        self.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            peniko_color(color, opacity),
            None,
            path,
        );
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &Stroke) {
        self.scene.stroke(
            &kurbo_stroke(stroke),
            Affine::IDENTITY,
            peniko_color(stroke.color, stroke.opacity),
            None,
            path,
        );
    }

    fn stroke_arc(&mut self, cx: f32, cy: f32, radius: f32, stroke: &Stroke) {
        let circle = Circle::new((cx as f64, cy as f64), radius as f64);
        self.scene.stroke(
            &kurbo_stroke(stroke),
            Affine::IDENTITY,
            peniko_color(stroke.color, stroke.opacity),
            None,
            &circle,
        );
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        // Glyph shaping needs a font context; deferred to the glyph
        // pipeline milestone.
        log::trace!(
            "TEXT {:?} at ({x}, {y}) {}px {}",
            text,
            style.size,
            style.family
        );
    }
}

fn kurbo_stroke(stroke: &Stroke) -> KurboStroke {
    let mut out = KurboStroke::new(stroke.width as f64);
    if !stroke.dash.is_empty() {
        out = out.with_dashes(0.0, stroke.dash.iter().map(|&d| d as f64));
    }
    out
}

fn peniko_color(color: Color, opacity: f32) -> peniko::Color {
    peniko::Color::from_rgba8(
        (color.r * 255.0).round() as u8,
        (color.g * 255.0).round() as u8,
        (color.b * 255.0).round() as u8,
        (color.a * opacity.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}
