//! Drawing surface abstraction.
//!
//! The scene painter in `paint` is written against this small capability
//! trait, so one scene walk drives any 2D backend: the Vello scene
//! builder, the recording surface the tests assert against, or a host
//! canvas binding. Backends receive screen-space geometry; the painter
//! applies the viewport transform before calling in.

use ink_core::model::Color;
use kurbo::BezPath;
use smallvec::{SmallVec, smallvec};

/// Stroke style for a path or arc, in screen units.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    /// 0.0 to 1.0, applied to the whole stroke.
    pub opacity: f32,
    /// Dash pattern lengths; empty paints solid.
    pub dash: SmallVec<[f32; 2]>,
}

impl Stroke {
    pub fn solid(color: Color, width: f32, opacity: f32) -> Self {
        Self {
            color,
            width,
            opacity,
            dash: SmallVec::new(),
        }
    }

    pub fn dashed(color: Color, width: f32, opacity: f32, on: f32, off: f32) -> Self {
        Self {
            color,
            width,
            opacity,
            dash: smallvec![on, off],
        }
    }
}

/// Font and fill for a single `draw_text` call.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    /// Font size in screen pixels.
    pub size: f32,
    pub family: String,
    pub opacity: f32,
}

/// The operations a 2D backend must provide.
///
/// Calls are best-effort: a backend that cannot honor one (an
/// unsupported font, an offscreen arc) skips it rather than failing, so
/// painting never throws.
pub trait Surface {
    /// Paint an axis-aligned rectangle in a solid color. Used to clear
    /// the background.
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    /// Fill a closed path.
    fn fill_path(&mut self, path: &BezPath, color: Color, opacity: f32);

    /// Stroke a path.
    fn stroke_path(&mut self, path: &BezPath, stroke: &Stroke);

    /// Stroke a full circle of `radius` around `(cx, cy)`.
    fn stroke_arc(&mut self, cx: f32, cy: f32, radius: f32, stroke: &Stroke);

    /// Paint one line of text with its left edge at `x` and its baseline
    /// at `y`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);
}

// ─── Recording backend ───────────────────────────────────────────────────

/// One recorded `Surface` call.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    ClearRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    FillPath {
        path: BezPath,
        color: Color,
        opacity: f32,
    },
    StrokePath {
        path: BezPath,
        stroke: Stroke,
    },
    StrokeArc {
        cx: f32,
        cy: f32,
        radius: f32,
        stroke: Stroke,
    },
    DrawText {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
}

/// Backend that records every call in order. Tests paint into one of
/// these and assert on the captured display list.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<PaintOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Count of recorded stroke operations, paths and arcs together.
    pub fn stroke_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PaintOp::StrokePath { .. } | PaintOp::StrokeArc { .. }))
            .count()
    }

    /// Count of recorded fill operations.
    pub fn fill_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PaintOp::FillPath { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.ops.push(PaintOp::ClearRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn fill_path(&mut self, path: &BezPath, color: Color, opacity: f32) {
        self.ops.push(PaintOp::FillPath {
            path: path.clone(),
            color,
            opacity,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &Stroke) {
        self.ops.push(PaintOp::StrokePath {
            path: path.clone(),
            stroke: stroke.clone(),
        });
    }

    fn stroke_arc(&mut self, cx: f32, cy: f32, radius: f32, stroke: &Stroke) {
        self.ops.push(PaintOp::StrokeArc {
            cx,
            cy,
            radius,
            stroke: stroke.clone(),
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        self.ops.push(PaintOp::DrawText {
            text: text.to_string(),
            x,
            y,
            style: style.clone(),
        });
    }
}
