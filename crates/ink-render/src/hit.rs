//! Hit testing: world point → element and resize-handle lookup.
//!
//! Pure geometry over committed elements. Both lookups scan the element
//! list front-to-back (list order), so when shapes overlap the
//! lowest-z-order match wins. Extents are assumed non-negative; the
//! editor normalizes geometry at gesture end before anything here sees
//! it.

use ink_core::model::{Element, Shape};
use smallvec::SmallVec;

/// Max distance (world units) from a line segment that still hits it.
pub const LINE_HIT_TOLERANCE: f32 = 5.0;
/// Hit radius (world units) around each sampled freehand point.
pub const DRAW_HIT_RADIUS: f32 = 10.0;
/// Handle square edge length (world units). The hit box extends this far
/// from the handle center on each axis.
pub const RESIZE_HANDLE_SIZE: f32 = 8.0;

/// Does the world point `(x, y)` hit `element`?
pub fn hit_test(x: f32, y: f32, element: &Element) -> bool {
    match &element.shape {
        Shape::Rectangle {
            x: ex,
            y: ey,
            width,
            height,
            ..
        } => x >= *ex && x <= ex + width && y >= *ey && y <= ey + height,
        Shape::Circle {
            x: cx, y: cy, radius, ..
        } => (x - cx).hypot(y - cy) <= *radius,
        Shape::Line { x1, y1, x2, y2, .. } => {
            // Tolerance band: the point is "on" the segment when the sum
            // of distances to the endpoints is within 5 of the length.
            let length = (x2 - x1).hypot(y2 - y1);
            let d1 = (x - x1).hypot(y - y1);
            let d2 = (x - x2).hypot(y - y2);
            (d1 + d2 - length).abs() < LINE_HIT_TOLERANCE
        }
        Shape::Draw { points } => points
            .iter()
            .any(|&[px, py]| (x - px).hypot(y - py) < DRAW_HIT_RADIUS),
        Shape::Diamond {
            x: ex,
            y: ey,
            width,
            height,
            ..
        } => {
            // Normalize into the bounding box and test the L1 ball.
            let nx = (x - (ex + width / 2.0)) / (width / 2.0);
            let ny = (y - (ey + height / 2.0)) / (height / 2.0);
            nx.abs() + ny.abs() <= 1.0
        }
        Shape::RoundedRect {
            x: ex,
            y: ey,
            width,
            height,
            corner_radius,
            ..
        } => {
            let r = corner_radius.min(width / 2.0).min(height / 2.0);
            if x < *ex || x > ex + width || y < *ey || y > ey + height {
                return false;
            }
            let (left, right) = (ex + r, ex + width - r);
            let (top, bottom) = (ey + r, ey + height - r);
            // Inset rectangle or one of the four corner discs. Points in
            // the straight edge bands outside the inset miss; kept as-is.
            if x >= left && x <= right && y >= top && y <= bottom {
                return true;
            }
            [(left, top), (right, top), (right, bottom), (left, bottom)]
                .iter()
                .any(|&(cx, cy)| (x - cx).powi(2) + (y - cy).powi(2) <= r * r)
        }
        Shape::Text {
            x: ex,
            y: ey,
            text,
            font_size,
            ..
        } => {
            // Approximate glyph box, not real metrics: 0.6em average
            // advance, one em of ascent, 0.3em of descent.
            let approx_width = text.chars().count() as f32 * font_size * 0.6;
            x >= *ex && x <= ex + approx_width && y >= ey - font_size && y <= ey + font_size * 0.3
        }
    }
}

/// First element in list order hit by the world point, skipping deleted
/// ones.
pub fn element_at(x: f32, y: f32, elements: &[Element]) -> Option<&Element> {
    elements
        .iter()
        .filter(|el| !el.is_deleted)
        .find(|el| hit_test(x, y, el))
}

// ─── Resize handles ──────────────────────────────────────────────────────

/// One of the eight boundary hot-zones on a resizable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    Tl,
    Tr,
    Bl,
    Br,
    Top,
    Right,
    Bottom,
    Left,
}

impl ResizeHandle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeHandle::Tl => "tl",
            ResizeHandle::Tr => "tr",
            ResizeHandle::Bl => "bl",
            ResizeHandle::Br => "br",
            ResizeHandle::Top => "top",
            ResizeHandle::Right => "right",
            ResizeHandle::Bottom => "bottom",
            ResizeHandle::Left => "left",
        }
    }

    /// True for the four corner handles.
    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            ResizeHandle::Tl | ResizeHandle::Tr | ResizeHandle::Bl | ResizeHandle::Br
        )
    }
}

/// Handle centers for `element` in world coordinates, in scan order
/// (corners first, then edge midpoints). Rect-like shapes get all eight;
/// a circle gets a single `Right` handle at `(x + radius, y)`; line,
/// draw, and text have none.
pub fn handle_positions(element: &Element) -> SmallVec<[(ResizeHandle, f32, f32); 8]> {
    use ResizeHandle::*;
    let mut out = SmallVec::new();
    match &element.shape {
        Shape::Rectangle {
            x, y, width, height, ..
        }
        | Shape::Diamond {
            x, y, width, height, ..
        }
        | Shape::RoundedRect {
            x, y, width, height, ..
        } => {
            out.push((Tl, *x, *y));
            out.push((Tr, x + width, *y));
            out.push((Bl, *x, y + height));
            out.push((Br, x + width, y + height));
            out.push((Top, x + width / 2.0, *y));
            out.push((Right, x + width, y + height / 2.0));
            out.push((Bottom, x + width / 2.0, y + height));
            out.push((Left, *x, y + height / 2.0));
        }
        Shape::Circle {
            x, y, radius, ..
        } => out.push((Right, x + radius, *y)),
        Shape::Draw { .. } | Shape::Line { .. } | Shape::Text { .. } => {}
    }
    out
}

/// The resize handle of `element` under the world point, if any.
pub fn resize_handle_at(x: f32, y: f32, element: &Element) -> Option<ResizeHandle> {
    handle_positions(element)
        .into_iter()
        .find(|&(_, hx, hy)| {
            (x - hx).abs() < RESIZE_HANDLE_SIZE && (y - hy).abs() < RESIZE_HANDLE_SIZE
        })
        .map(|(handle, _, _)| handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ink_core::model::Element;

    fn element(shape: Shape) -> Element {
        Element::new(shape, "#ffffff", 2.0)
    }

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Element {
        element(Shape::Rectangle {
            x,
            y,
            width: w,
            height: h,
            fill_color: "transparent".to_string(),
            rotation: 0.0,
        })
    }

    #[test]
    fn rectangle_containment_is_inclusive() {
        let el = rect(10.0, 10.0, 100.0, 50.0);
        assert!(hit_test(10.0, 10.0, &el));
        assert!(hit_test(110.0, 60.0, &el));
        assert!(hit_test(50.0, 30.0, &el));
        assert!(!hit_test(110.1, 30.0, &el));
        assert!(!hit_test(9.9, 30.0, &el));
    }

    #[test]
    fn circle_boundary_is_inclusive() {
        let el = element(Shape::Circle {
            x: 100.0,
            y: 100.0,
            radius: 20.0,
            fill_color: "transparent".to_string(),
        });
        assert!(hit_test(120.0, 100.0, &el), "distance exactly 20 hits");
        assert!(!hit_test(120.1, 100.0, &el), "distance 20.1 misses");
    }

    #[test]
    fn line_tolerance_band() {
        let el = element(Shape::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 100.0,
            y2: 0.0,
            arrow_end: false,
        });
        assert!(hit_test(50.0, 0.0, &el));
        assert!(hit_test(50.0, 4.0, &el), "within the 5-unit band");
        assert!(!hit_test(50.0, 40.0, &el));
        // Beyond an endpoint the band narrows quickly.
        assert!(!hit_test(130.0, 0.0, &el));
    }

    #[test]
    fn draw_hits_near_sampled_points() {
        let el = element(Shape::Draw {
            points: vec![[0.0, 0.0], [50.0, 50.0], [100.0, 0.0]],
        });
        assert!(hit_test(55.0, 52.0, &el));
        // Between samples but more than 10 from each: missed. Proximity
        // is to vertices, not the polyline itself.
        assert!(!hit_test(25.0, 25.0, &el));
    }

    #[test]
    fn diamond_l1_ball() {
        let el = element(Shape::Diamond {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            fill_color: "transparent".to_string(),
        });
        assert!(hit_test(50.0, 50.0, &el), "center");
        assert!(hit_test(50.0, 0.0, &el), "top vertex");
        assert!(hit_test(75.0, 75.0, &el), "on the edge |nx|+|ny|=1");
        assert!(!hit_test(5.0, 5.0, &el), "box corner outside rhombus");
    }

    #[test]
    fn rounded_rect_corners_are_rounded_off() {
        let el = element(Shape::RoundedRect {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 60.0,
            fill_color: "transparent".to_string(),
            corner_radius: 12.0,
            rotation: 0.0,
        });
        assert!(hit_test(50.0, 30.0, &el), "center");
        assert!(!hit_test(0.5, 0.5, &el), "sharp corner is cut off");
        // Point on the corner disc.
        assert!(hit_test(12.0, 12.0, &el));
        assert!(hit_test(4.0, 12.0, &el), "within radius of the tl corner center");
        // Straight edge band outside the inset misses: inset-or-disc
        // test, not true rounded-rect containment.
        assert!(!hit_test(1.0, 30.0, &el));
    }

    #[test]
    fn text_approximate_box() {
        let el = element(Shape::Text {
            x: 100.0,
            y: 100.0,
            text: "hello".to_string(),
            font_size: 20.0,
            font_family: "Arial".to_string(),
            color: "#ffffff".to_string(),
        });
        // Box is [100, 100 + 5*20*0.6] x [80, 106].
        assert!(hit_test(130.0, 95.0, &el));
        assert!(hit_test(100.0, 80.0, &el));
        assert!(!hit_test(161.0, 95.0, &el));
        assert!(!hit_test(130.0, 107.0, &el));
    }

    #[test]
    fn element_at_returns_first_in_list_order() {
        let bottom = rect(0.0, 0.0, 100.0, 100.0);
        let top = rect(0.0, 0.0, 100.0, 100.0);
        let bottom_id = bottom.id;
        let elements = vec![bottom, top];
        // Both overlap, the earlier (lower z-order) one wins.
        let hit = element_at(50.0, 50.0, &elements).unwrap();
        assert_eq!(hit.id, bottom_id);
    }

    #[test]
    fn element_at_skips_deleted() {
        let mut bottom = rect(0.0, 0.0, 100.0, 100.0);
        bottom.is_deleted = true;
        let top = rect(0.0, 0.0, 100.0, 100.0);
        let top_id = top.id;
        let elements = vec![bottom, top];
        assert_eq!(element_at(50.0, 50.0, &elements).unwrap().id, top_id);
    }

    #[test]
    fn rect_handles_all_eight() {
        let el = rect(0.0, 0.0, 100.0, 60.0);
        assert_eq!(resize_handle_at(0.0, 0.0, &el), Some(ResizeHandle::Tl));
        assert_eq!(resize_handle_at(100.0, 0.0, &el), Some(ResizeHandle::Tr));
        assert_eq!(resize_handle_at(0.0, 60.0, &el), Some(ResizeHandle::Bl));
        assert_eq!(resize_handle_at(100.0, 60.0, &el), Some(ResizeHandle::Br));
        assert_eq!(resize_handle_at(50.0, 0.0, &el), Some(ResizeHandle::Top));
        assert_eq!(resize_handle_at(100.0, 30.0, &el), Some(ResizeHandle::Right));
        assert_eq!(resize_handle_at(50.0, 60.0, &el), Some(ResizeHandle::Bottom));
        assert_eq!(resize_handle_at(0.0, 30.0, &el), Some(ResizeHandle::Left));
        assert_eq!(resize_handle_at(50.0, 30.0, &el), None, "center is body, not handle");
    }

    #[test]
    fn handle_tolerance_is_eight_units() {
        let el = rect(0.0, 0.0, 100.0, 60.0);
        assert_eq!(resize_handle_at(7.9, 7.9, &el), Some(ResizeHandle::Tl));
        assert_eq!(resize_handle_at(-7.9, -7.9, &el), Some(ResizeHandle::Tl));
        assert_eq!(resize_handle_at(-8.1, 0.0, &el), None);
    }

    #[test]
    fn circle_handle_is_always_right() {
        let el = element(Shape::Circle {
            x: 100.0,
            y: 100.0,
            radius: 30.0,
            fill_color: "transparent".to_string(),
        });
        assert_eq!(resize_handle_at(130.0, 100.0, &el), Some(ResizeHandle::Right));
        assert_eq!(resize_handle_at(70.0, 100.0, &el), None);
    }

    #[test]
    fn line_draw_text_have_no_handles() {
        let line = element(Shape::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 50.0,
            y2: 0.0,
            arrow_end: false,
        });
        assert!(handle_positions(&line).is_empty());
        assert_eq!(resize_handle_at(0.0, 0.0, &line), None);

        let draw = element(Shape::Draw {
            points: vec![[0.0, 0.0], [10.0, 10.0]],
        });
        assert!(handle_positions(&draw).is_empty());
    }
}
