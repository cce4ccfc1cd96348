//! Viewport state and the screen/world coordinate transform.
//!
//! Element geometry lives in an infinite world space; the viewport maps
//! it to drawing-surface pixels as `screen = world * zoom + offset`.
//! Panning moves the offset. Zooming is anchored: the world point under
//! the cursor stays under the cursor across the zoom change.

use serde::{Deserialize, Serialize};

/// Lower zoom bound.
pub const MIN_ZOOM: f32 = 0.1;
/// Upper zoom bound.
pub const MAX_ZOOM: f32 = 4.0;
/// Zoom change per discrete wheel tick.
pub const ZOOM_STEP: f32 = 0.1;

/// Pan offset (screen pixels) plus zoom factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Viewport {
    pub offset_x: f32,
    pub offset_y: f32,
    /// Always within `[MIN_ZOOM, MAX_ZOOM]`.
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Map a screen point to world coordinates.
    pub fn screen_to_world(&self, sx: f32, sy: f32) -> (f32, f32) {
        (
            (sx - self.offset_x) / self.zoom,
            (sy - self.offset_y) / self.zoom,
        )
    }

    /// Map a world point to screen coordinates.
    pub fn world_to_screen(&self, wx: f32, wy: f32) -> (f32, f32) {
        (
            wx * self.zoom + self.offset_x,
            wy * self.zoom + self.offset_y,
        )
    }

    /// Change zoom by `delta`, anchored at the screen point `(sx, sy)`.
    ///
    /// Captures the world point under the anchor before the change, then
    /// recomputes the offset so that point is still under the anchor
    /// afterwards. Zoom saturates at the clamp bounds.
    pub fn zoom_at(&mut self, sx: f32, sy: f32, delta: f32) {
        let (wx, wy) = self.screen_to_world(sx, sy);
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        self.offset_x = sx - wx * self.zoom;
        self.offset_y = sy - wy * self.zoom;
    }

    /// Reposition so the world point `(wx, wy)` lands under the screen
    /// point `(sx, sy)`.
    ///
    /// Panning uses the same anchor technique as zooming: capture the
    /// world point under the pointer at pan start, then call this on
    /// every pointer move.
    pub fn pan_to(&mut self, wx: f32, wy: f32, sx: f32, sy: f32) {
        self.offset_x = sx - wx * self.zoom;
        self.offset_y = sy - wy * self.zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn screen_world_roundtrip() {
        let vp = Viewport {
            offset_x: 37.5,
            offset_y: -120.0,
            zoom: 2.3,
        };
        let (wx, wy) = vp.screen_to_world(400.0, 300.0);
        let (sx, sy) = vp.world_to_screen(wx, wy);
        assert!((sx - 400.0).abs() < EPS, "x round-trip drifted: {sx}");
        assert!((sy - 300.0).abs() < EPS, "y round-trip drifted: {sy}");
    }

    #[test]
    fn zoom_at_keeps_anchor_fixed() {
        let mut vp = Viewport {
            offset_x: 50.0,
            offset_y: 80.0,
            zoom: 1.0,
        };
        let before = vp.screen_to_world(320.0, 240.0);
        vp.zoom_at(320.0, 240.0, ZOOM_STEP);
        let after = vp.screen_to_world(320.0, 240.0);
        assert!((before.0 - after.0).abs() < EPS);
        assert!((before.1 - after.1).abs() < EPS);
        assert!((vp.zoom - 1.1).abs() < EPS);
    }

    #[test]
    fn zoom_saturates_at_max() {
        let mut vp = Viewport::default();
        for _ in 0..50 {
            vp.zoom_at(100.0, 100.0, ZOOM_STEP);
        }
        assert!(
            (vp.zoom - MAX_ZOOM).abs() < EPS,
            "zoom should saturate at {MAX_ZOOM}, got {}",
            vp.zoom
        );
    }

    #[test]
    fn zoom_saturates_at_min() {
        let mut vp = Viewport::default();
        for _ in 0..50 {
            vp.zoom_at(100.0, 100.0, -ZOOM_STEP);
        }
        assert!(
            (vp.zoom - MIN_ZOOM).abs() < EPS,
            "zoom should saturate at {MIN_ZOOM}, got {}",
            vp.zoom
        );
    }

    #[test]
    fn pan_to_puts_anchor_under_pointer() {
        let mut vp = Viewport {
            offset_x: 0.0,
            offset_y: 0.0,
            zoom: 2.0,
        };
        // World point grabbed at pan start.
        let (wx, wy) = vp.screen_to_world(100.0, 100.0);
        // Pointer moved to (130, 90).
        vp.pan_to(wx, wy, 130.0, 90.0);
        let (nwx, nwy) = vp.screen_to_world(130.0, 90.0);
        assert!((nwx - wx).abs() < EPS);
        assert!((nwy - wy).abs() < EPS);
        // Offset moved by the screen-space delta.
        assert!((vp.offset_x - 30.0).abs() < EPS);
        assert!((vp.offset_y + 10.0).abs() < EPS);
    }

    #[test]
    fn viewport_serializes_camel_case() {
        let vp = Viewport {
            offset_x: 1.0,
            offset_y: 2.0,
            zoom: 3.0,
        };
        let value = serde_json::to_value(vp).unwrap();
        assert_eq!(value["offsetX"], 1.0);
        assert_eq!(value["offsetY"], 2.0);
        assert_eq!(value["zoom"], 3.0);
    }
}
