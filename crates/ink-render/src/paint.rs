//! Full-scene repaint.
//!
//! One pass per frame, no dirty regions: clear the background, then walk
//! the element list in z-order (plus the in-progress element), painting
//! each shape through the `Surface` trait. The viewport affine is applied
//! here, world → screen, so backends never see a transform: geometry,
//! stroke widths, dash lengths and font sizes arrive pre-scaled by zoom.

use crate::hit::{RESIZE_HANDLE_SIZE, handle_positions};
use crate::surface::{Stroke, Surface, TextStyle};
use ink_core::id::ElementId;
use ink_core::model::{Color, Element, Shape, Tool};
use ink_core::viewport::Viewport;
use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape as _};

/// Canvas background.
pub const BACKGROUND: Color = Color::rgba(26.0 / 255.0, 26.0 / 255.0, 26.0 / 255.0, 1.0);
/// Highlight stroke for the selected element, also the handle fill.
pub const SELECTION_STROKE: Color = Color::rgba(59.0 / 255.0, 130.0 / 255.0, 246.0 / 255.0, 1.0);
/// Outline of the handle squares.
pub const HANDLE_STROKE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

const SELECTION_WIDTH: f32 = 2.0;
const SELECTION_DASH: f32 = 5.0;
/// Arrowhead edge length in world units.
const ARROW_SIZE: f32 = 12.0;
/// Fallback when an element carries an unparseable stroke color.
const FALLBACK_STROKE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

/// Everything one repaint needs, borrowed from the engine.
pub struct SceneParams<'a> {
    pub elements: &'a [Element],
    /// The element mid-gesture, painted on top of the list.
    pub current: Option<&'a Element>,
    pub selected_id: Option<ElementId>,
    pub tool: Tool,
    pub viewport: Viewport,
    /// Drawing surface size in screen pixels.
    pub surface_width: f32,
    pub surface_height: f32,
}

/// Repaint the whole scene onto `surface`. Best-effort and non-throwing;
/// shapes that cannot be expressed (a freehand stroke with one point, an
/// unparseable fill) are skipped, never errors.
pub fn paint_scene(surface: &mut dyn Surface, params: &SceneParams<'_>) {
    surface.clear_rect(
        0.0,
        0.0,
        params.surface_width,
        params.surface_height,
        BACKGROUND,
    );

    let vp = params.viewport;
    let affine = Affine::new([
        vp.zoom as f64,
        0.0,
        0.0,
        vp.zoom as f64,
        vp.offset_x as f64,
        vp.offset_y as f64,
    ]);

    for element in params.elements.iter().chain(params.current) {
        if element.is_deleted {
            continue;
        }
        let selected = params.tool == Tool::Select && params.selected_id == Some(element.id);
        paint_element(surface, element, selected, affine, vp.zoom);
        if selected {
            paint_handles(surface, element, affine, vp.zoom);
        }
    }
}

fn paint_element(
    surface: &mut dyn Surface,
    element: &Element,
    selected: bool,
    affine: Affine,
    zoom: f32,
) {
    // Selection overrides the element's own stroke: highlight color,
    // fixed width, dashed.
    let stroke = if selected {
        Stroke::dashed(
            SELECTION_STROKE,
            SELECTION_WIDTH * zoom,
            element.opacity,
            SELECTION_DASH * zoom,
            SELECTION_DASH * zoom,
        )
    } else {
        Stroke::solid(stroke_color(element), element.stroke_width * zoom, element.opacity)
    };

    match &element.shape {
        Shape::Draw { points } => {
            // A stroke needs at least one segment.
            if points.len() < 2 {
                return;
            }
            let mut path = BezPath::new();
            path.move_to((points[0][0] as f64, points[0][1] as f64));
            for &[x, y] in &points[1..] {
                path.line_to((x as f64, y as f64));
            }
            path.apply_affine(affine);
            surface.stroke_path(&path, &stroke);
        }
        Shape::Rectangle {
            x, y, width, height, fill_color, ..
        } => {
            let mut path = rect_path(*x, *y, *width, *height);
            path.apply_affine(affine);
            fill_then_stroke(surface, &path, fill_color, element.opacity, &stroke);
        }
        Shape::Circle {
            x, y, radius, fill_color,
        } => {
            let center = affine * Point::new(*x as f64, *y as f64);
            let screen_radius = radius * zoom;
            if let Some(fill) = parse_fill(fill_color) {
                let disc = Circle::new(center, screen_radius as f64).to_path(0.1);
                surface.fill_path(&disc, fill, element.opacity);
            }
            surface.stroke_arc(center.x as f32, center.y as f32, screen_radius, &stroke);
        }
        Shape::Line {
            x1, y1, x2, y2, arrow_end,
        } => {
            let mut path = BezPath::new();
            path.move_to((*x1 as f64, *y1 as f64));
            path.line_to((*x2 as f64, *y2 as f64));
            path.apply_affine(affine);
            surface.stroke_path(&path, &stroke);
            if *arrow_end {
                paint_arrowhead(surface, element, &stroke, affine);
            }
        }
        Shape::Diamond {
            x, y, width, height, fill_color,
        } => {
            let (cx, cy) = ((x + width / 2.0) as f64, (y + height / 2.0) as f64);
            let mut path = BezPath::new();
            path.move_to((cx, *y as f64));
            path.line_to(((x + width) as f64, cy));
            path.line_to((cx, (y + height) as f64));
            path.line_to((*x as f64, cy));
            path.close_path();
            path.apply_affine(affine);
            fill_then_stroke(surface, &path, fill_color, element.opacity, &stroke);
        }
        Shape::RoundedRect {
            x,
            y,
            width,
            height,
            fill_color,
            corner_radius,
            ..
        } => {
            let mut path = rounded_rect_path(*x, *y, *width, *height, *corner_radius);
            path.apply_affine(affine);
            fill_then_stroke(surface, &path, fill_color, element.opacity, &stroke);
        }
        Shape::Text {
            x,
            y,
            text,
            font_size,
            font_family,
            color,
        } => {
            // Text paints with its own color field, never the stroke.
            let anchor = affine * Point::new(*x as f64, *y as f64);
            let style = TextStyle {
                color: Color::from_hex(color).unwrap_or(FALLBACK_STROKE),
                size: font_size * zoom,
                family: font_family.clone(),
                opacity: element.opacity,
            };
            surface.draw_text(text, anchor.x as f32, anchor.y as f32, &style);
        }
    }
}

/// Triangular arrowhead at the line's second endpoint, oriented along
/// the segment, filled with the element's own stroke color.
fn paint_arrowhead(surface: &mut dyn Surface, element: &Element, stroke: &Stroke, affine: Affine) {
    let Shape::Line { x1, y1, x2, y2, .. } = &element.shape else {
        return;
    };
    let angle = (y2 - y1).atan2(x2 - x1);
    let wing = std::f32::consts::FRAC_PI_6;

    let mut path = BezPath::new();
    path.move_to((*x2 as f64, *y2 as f64));
    path.line_to((
        (x2 - ARROW_SIZE * (angle - wing).cos()) as f64,
        (y2 - ARROW_SIZE * (angle - wing).sin()) as f64,
    ));
    path.line_to((
        (x2 - ARROW_SIZE * (angle + wing).cos()) as f64,
        (y2 - ARROW_SIZE * (angle + wing).sin()) as f64,
    ));
    path.close_path();
    path.apply_affine(affine);

    surface.fill_path(&path, stroke_color(element), element.opacity);
    surface.stroke_path(&path, stroke);
}

/// Filled + outlined squares at each handle position of the selected
/// element.
fn paint_handles(surface: &mut dyn Surface, element: &Element, affine: Affine, zoom: f32) {
    let half = RESIZE_HANDLE_SIZE / 2.0;
    let outline = Stroke::solid(HANDLE_STROKE, 2.0 * zoom, 1.0);
    for (_, hx, hy) in handle_positions(element) {
        let mut square = rect_path(hx - half, hy - half, RESIZE_HANDLE_SIZE, RESIZE_HANDLE_SIZE);
        square.apply_affine(affine);
        surface.fill_path(&square, SELECTION_STROKE, 1.0);
        surface.stroke_path(&square, &outline);
    }
}

// ─── Path helpers ────────────────────────────────────────────────────────

fn rect_path(x: f32, y: f32, w: f32, h: f32) -> BezPath {
    Rect::new(x as f64, y as f64, (x + w) as f64, (y + h) as f64).to_path(0.1)
}

/// Rounded rectangle from four quadratic corner curves, radius clamped to
/// the half-extents.
fn rounded_rect_path(x: f32, y: f32, w: f32, h: f32, corner_radius: f32) -> BezPath {
    let r = corner_radius.min(w / 2.0).min(h / 2.0) as f64;
    let (x, y, w, h) = (x as f64, y as f64, w as f64, h as f64);
    let mut path = BezPath::new();
    path.move_to((x + r, y));
    path.line_to((x + w - r, y));
    path.quad_to((x + w, y), (x + w, y + r));
    path.line_to((x + w, y + h - r));
    path.quad_to((x + w, y + h), (x + w - r, y + h));
    path.line_to((x + r, y + h));
    path.quad_to((x, y + h), (x, y + h - r));
    path.line_to((x, y + r));
    path.quad_to((x, y), (x + r, y));
    path.close_path();
    path
}

fn stroke_color(element: &Element) -> Color {
    Color::from_hex(&element.stroke_color).unwrap_or(FALLBACK_STROKE)
}

/// `None` for the `"transparent"` sentinel or an unparseable value, in
/// which case the fill pass is skipped.
fn parse_fill(fill_color: &str) -> Option<Color> {
    Color::from_hex(fill_color)
}

fn fill_then_stroke(
    surface: &mut dyn Surface,
    path: &BezPath,
    fill_color: &str,
    opacity: f32,
    stroke: &Stroke,
) {
    if let Some(fill) = parse_fill(fill_color) {
        surface.fill_path(path, fill, opacity);
    }
    surface.stroke_path(path, stroke);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{PaintOp, RecordingSurface};
    use ink_core::model::Element;

    fn rect_element(x: f32, y: f32, w: f32, h: f32, fill: &str) -> Element {
        Element::new(
            Shape::Rectangle {
                x,
                y,
                width: w,
                height: h,
                fill_color: fill.to_string(),
                rotation: 0.0,
            },
            "#ffffff",
            2.0,
        )
    }

    fn params<'a>(elements: &'a [Element], viewport: Viewport) -> SceneParams<'a> {
        SceneParams {
            elements,
            current: None,
            selected_id: None,
            tool: Tool::Draw,
            viewport,
            surface_width: 800.0,
            surface_height: 600.0,
        }
    }

    #[test]
    fn background_is_cleared_first() {
        let mut surface = RecordingSurface::new();
        paint_scene(&mut surface, &params(&[], Viewport::default()));
        assert_eq!(surface.ops.len(), 1);
        assert_eq!(
            surface.ops[0],
            PaintOp::ClearRect {
                x: 0.0,
                y: 0.0,
                width: 800.0,
                height: 600.0,
                color: BACKGROUND,
            }
        );
    }

    #[test]
    fn viewport_transform_is_applied_to_geometry() {
        let elements = vec![rect_element(10.0, 10.0, 20.0, 20.0, "transparent")];
        let viewport = Viewport {
            offset_x: 5.0,
            offset_y: 5.0,
            zoom: 2.0,
        };
        let mut surface = RecordingSurface::new();
        paint_scene(&mut surface, &params(&elements, viewport));

        let PaintOp::StrokePath { path, stroke } = &surface.ops[1] else {
            panic!("expected stroked rectangle, got {:?}", surface.ops[1]);
        };
        let bbox = path.bounding_box();
        // screen = world * 2 + 5
        assert!((bbox.x0 - 25.0).abs() < 1e-6);
        assert!((bbox.y0 - 25.0).abs() < 1e-6);
        assert!((bbox.x1 - 65.0).abs() < 1e-6);
        assert!((bbox.y1 - 65.0).abs() < 1e-6);
        // Stroke width is pre-scaled by zoom.
        assert_eq!(stroke.width, 4.0);
    }

    #[test]
    fn transparent_fill_is_skipped() {
        let elements = vec![rect_element(0.0, 0.0, 10.0, 10.0, "transparent")];
        let mut surface = RecordingSurface::new();
        paint_scene(&mut surface, &params(&elements, Viewport::default()));
        assert_eq!(surface.fill_count(), 0);
        assert_eq!(surface.stroke_count(), 1);
    }

    #[test]
    fn fill_happens_before_stroke() {
        let elements = vec![rect_element(0.0, 0.0, 10.0, 10.0, "#224466")];
        let mut surface = RecordingSurface::new();
        paint_scene(&mut surface, &params(&elements, Viewport::default()));
        assert!(matches!(surface.ops[1], PaintOp::FillPath { .. }));
        assert!(matches!(surface.ops[2], PaintOp::StrokePath { .. }));
    }

    #[test]
    fn deleted_elements_are_not_painted() {
        let mut el = rect_element(0.0, 0.0, 10.0, 10.0, "#224466");
        el.is_deleted = true;
        let elements = vec![el];
        let mut surface = RecordingSurface::new();
        paint_scene(&mut surface, &params(&elements, Viewport::default()));
        assert_eq!(surface.ops.len(), 1, "only the background clear");
    }

    #[test]
    fn in_progress_element_is_painted_on_top() {
        let elements = vec![rect_element(0.0, 0.0, 10.0, 10.0, "transparent")];
        let current = rect_element(50.0, 50.0, 5.0, 5.0, "transparent");
        let p = SceneParams {
            current: Some(&current),
            ..params(&elements, Viewport::default())
        };
        let mut surface = RecordingSurface::new();
        paint_scene(&mut surface, &p);
        assert_eq!(surface.stroke_count(), 2);
    }

    #[test]
    fn selection_overrides_stroke_with_dash() {
        let elements = vec![rect_element(0.0, 0.0, 10.0, 10.0, "#224466")];
        let p = SceneParams {
            selected_id: Some(elements[0].id),
            tool: Tool::Select,
            ..params(&elements, Viewport::default())
        };
        let mut surface = RecordingSurface::new();
        paint_scene(&mut surface, &p);

        let PaintOp::StrokePath { stroke, .. } = &surface.ops[2] else {
            panic!("expected element stroke");
        };
        assert_eq!(stroke.color, SELECTION_STROKE);
        assert_eq!(stroke.width, 2.0);
        assert_eq!(stroke.dash.as_slice(), &[5.0, 5.0]);
    }

    #[test]
    fn selection_ignored_when_tool_is_not_select() {
        let elements = vec![rect_element(0.0, 0.0, 10.0, 10.0, "transparent")];
        let p = SceneParams {
            selected_id: Some(elements[0].id),
            tool: Tool::Rectangle,
            ..params(&elements, Viewport::default())
        };
        let mut surface = RecordingSurface::new();
        paint_scene(&mut surface, &p);

        let PaintOp::StrokePath { stroke, .. } = &surface.ops[1] else {
            panic!("expected element stroke");
        };
        assert!(stroke.dash.is_empty());
        assert_eq!(stroke.color, Color::rgba(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn selected_rect_gets_eight_handle_squares() {
        let elements = vec![rect_element(0.0, 0.0, 100.0, 60.0, "transparent")];
        let p = SceneParams {
            selected_id: Some(elements[0].id),
            tool: Tool::Select,
            ..params(&elements, Viewport::default())
        };
        let mut surface = RecordingSurface::new();
        paint_scene(&mut surface, &p);
        // clear + element stroke + 8 * (fill + stroke)
        assert_eq!(surface.fill_count(), 8);
        assert_eq!(surface.stroke_count(), 9);
    }

    #[test]
    fn selected_circle_gets_one_handle() {
        let elements = vec![Element::new(
            Shape::Circle {
                x: 100.0,
                y: 100.0,
                radius: 20.0,
                fill_color: "transparent".to_string(),
            },
            "#ffffff",
            2.0,
        )];
        let p = SceneParams {
            selected_id: Some(elements[0].id),
            tool: Tool::Select,
            ..params(&elements, Viewport::default())
        };
        let mut surface = RecordingSurface::new();
        paint_scene(&mut surface, &p);
        assert_eq!(surface.fill_count(), 1, "one handle square fill");
    }

    #[test]
    fn single_point_draw_is_skipped() {
        let elements = vec![Element::new(
            Shape::Draw {
                points: vec![[5.0, 5.0]],
            },
            "#ffffff",
            2.0,
        )];
        let mut surface = RecordingSurface::new();
        paint_scene(&mut surface, &params(&elements, Viewport::default()));
        assert_eq!(surface.ops.len(), 1);
    }

    #[test]
    fn arrow_line_paints_filled_head() {
        let elements = vec![Element::new(
            Shape::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 100.0,
                y2: 0.0,
                arrow_end: true,
            },
            "#ff0000",
            2.0,
        )];
        let mut surface = RecordingSurface::new();
        paint_scene(&mut surface, &params(&elements, Viewport::default()));
        // line stroke + head fill + head stroke
        assert_eq!(surface.stroke_count(), 2);
        assert_eq!(surface.fill_count(), 1);
        let PaintOp::FillPath { path, color, .. } = &surface.ops[2] else {
            panic!("expected arrowhead fill");
        };
        assert_eq!(*color, Color::from_hex("#ff0000").unwrap());
        // Head sits at the second endpoint, pointing back along the line.
        let bbox = path.bounding_box();
        assert!((bbox.x1 - 100.0).abs() < 1e-4);
        assert!(bbox.x0 < 100.0);
    }

    #[test]
    fn text_paints_with_own_color_and_scaled_font() {
        let elements = vec![Element::new(
            Shape::Text {
                x: 10.0,
                y: 30.0,
                text: "hi".to_string(),
                font_size: 24.0,
                font_family: "Arial".to_string(),
                color: "#00ff00".to_string(),
            },
            "#ffffff",
            2.0,
        )];
        let viewport = Viewport {
            offset_x: 100.0,
            offset_y: 0.0,
            zoom: 2.0,
        };
        let mut surface = RecordingSurface::new();
        paint_scene(&mut surface, &params(&elements, viewport));

        let PaintOp::DrawText { text, x, y, style } = &surface.ops[1] else {
            panic!("expected text op");
        };
        assert_eq!(text, "hi");
        assert_eq!(*x, 120.0);
        assert_eq!(*y, 60.0);
        assert_eq!(style.size, 48.0);
        assert_eq!(style.family, "Arial");
        assert_eq!(style.color, Color::from_hex("#00ff00").unwrap());
    }
}
