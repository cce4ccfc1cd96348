//! Core data model for Inkboard documents.
//!
//! A document is a flat list of `Element` values. List order is z-order:
//! later elements paint on top. Every element carries shared stroke and
//! bookkeeping fields plus a `Shape` variant holding the geometry for its
//! kind. All geometry is stored in world coordinates (see `viewport`).
//!
//! The model is purely structural. Mutation math (drag, resize, extent
//! updates) lives in the editor engine, which replaces whole elements
//! rather than patching them in place so history snapshots stay correct.

use crate::id::ElementId;
use serde::{Deserialize, Serialize};

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
///
/// Element colors are persisted as CSS-style strings (`"#RRGGBB"` or the
/// `"transparent"` sentinel); `Color` is the parsed form the renderer
/// works with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgba(
                    (r * 17) as f32 / 255.0,
                    (g * 17) as f32 / 255.0,
                    (b * 17) as f32 / 255.0,
                    1.0,
                ))
            }
            4 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                let a = hex_val(bytes[3])?;
                Some(Self::rgba(
                    (r * 17) as f32 / 255.0,
                    (g * 17) as f32 / 255.0,
                    (b * 17) as f32 / 255.0,
                    (a * 17) as f32 / 255.0,
                ))
            }
            6 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                Some(Self::rgba(
                    r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0,
                    1.0,
                ))
            }
            8 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                let a = hex_val(bytes[6])? << 4 | hex_val(bytes[7])?;
                Some(Self::rgba(
                    r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0,
                    a as f32 / 255.0,
                ))
            }
            _ => None,
        }
    }

    /// Emit as shortest valid hex string.
    pub fn to_hex(&self) -> String {
        const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";
        let r = (self.r * 255.0).round() as u8;
        let g = (self.g * 255.0).round() as u8;
        let b = (self.b * 255.0).round() as u8;
        let a = (self.a * 255.0).round() as u8;

        if a == 255 {
            let buf = [
                b'#',
                HEX_CHARS[(r >> 4) as usize],
                HEX_CHARS[(r & 0xF) as usize],
                HEX_CHARS[(g >> 4) as usize],
                HEX_CHARS[(g & 0xF) as usize],
                HEX_CHARS[(b >> 4) as usize],
                HEX_CHARS[(b & 0xF) as usize],
            ];
            // SAFETY: buffer only contains valid ASCII hex characters and '#'
            unsafe { String::from_utf8_unchecked(buf.to_vec()) }
        } else {
            let buf = [
                b'#',
                HEX_CHARS[(r >> 4) as usize],
                HEX_CHARS[(r & 0xF) as usize],
                HEX_CHARS[(g >> 4) as usize],
                HEX_CHARS[(g & 0xF) as usize],
                HEX_CHARS[(b >> 4) as usize],
                HEX_CHARS[(b & 0xF) as usize],
                HEX_CHARS[(a >> 4) as usize],
                HEX_CHARS[(a & 0xF) as usize],
            ];
            // SAFETY: buffer only contains valid ASCII hex characters and '#'
            unsafe { String::from_utf8_unchecked(buf.to_vec()) }
        }
    }
}

// ─── Tools ───────────────────────────────────────────────────────────────

/// The active tool determines how pointer events are interpreted.
///
/// `Arrow` is a line with `arrow_end` set at creation; it is a distinct
/// tool but not a distinct shape variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tool {
    #[default]
    Select,
    Draw,
    Rectangle,
    Circle,
    Line,
    Arrow,
    Diamond,
    RoundedRect,
    Text,
    Eraser,
}

// ─── Elements ────────────────────────────────────────────────────────────

/// Per-variant geometry, discriminated by `type` on the wire.
///
/// The variant set is closed; consumers match exhaustively so adding a
/// shape is a compile-guided change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Shape {
    /// Freehand polyline of sampled pointer positions.
    Draw { points: Vec<[f32; 2]> },
    Rectangle {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill_color: String,
        /// Stored but not yet consulted by rendering or hit testing.
        rotation: f32,
    },
    /// `x, y` is the center.
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        fill_color: String,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        /// Paint an arrowhead at `(x2, y2)`.
        #[serde(default)]
        arrow_end: bool,
    },
    /// `x, y, width, height` is the bounding box of the rhombus.
    Diamond {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill_color: String,
    },
    RoundedRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill_color: String,
        corner_radius: f32,
        rotation: f32,
    },
    /// `y` is the text baseline.
    Text {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
        font_family: String,
        color: String,
    },
}

impl Shape {
    /// The wire-format discriminant for this variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Draw { .. } => "draw",
            Shape::Rectangle { .. } => "rectangle",
            Shape::Circle { .. } => "circle",
            Shape::Line { .. } => "line",
            Shape::Diamond { .. } => "diamond",
            Shape::RoundedRect { .. } => "roundedRect",
            Shape::Text { .. } => "text",
        }
    }
}

/// One drawable primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique within the document, assigned at creation, immutable.
    pub id: ElementId,
    /// CSS-style stroke color string.
    pub stroke_color: String,
    pub stroke_width: f32,
    /// 0.0 to 1.0.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Soft-delete flag. Kept for the document format; the editor hard
    /// deletes instead, so this stays false in practice.
    #[serde(default)]
    pub is_deleted: bool,
    /// Unix millis, informational only.
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
    #[serde(flatten)]
    pub shape: Shape,
}

fn default_opacity() -> f32 {
    1.0
}

impl Element {
    /// Construct a fresh element: new id, timestamps stamped once from
    /// the clock, not deleted.
    pub fn new(shape: Shape, stroke_color: impl Into<String>, stroke_width: f32) -> Self {
        let now = crate::id::unix_millis();
        Self {
            id: ElementId::generate(),
            stroke_color: stroke_color.into(),
            stroke_width,
            opacity: 1.0,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            shape,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#6C5CE7").unwrap();
        assert_eq!(c.to_hex(), "#6C5CE7");

        let c2 = Color::from_hex("#FF000080").unwrap();
        assert!((c2.a - 128.0 / 255.0).abs() < 0.01);
        assert!(c2.to_hex().len() == 9); // #RRGGBBAA
    }

    #[test]
    fn color_short_hex_expands() {
        let c = Color::from_hex("fff").unwrap();
        assert_eq!(c.to_hex(), "#FFFFFF");
        assert!(Color::from_hex("transparent").is_none());
        assert!(Color::from_hex("#12345").is_none());
    }

    #[test]
    fn element_wire_shape() {
        let el = Element::new(
            Shape::Rectangle {
                x: 10.0,
                y: 20.0,
                width: 30.0,
                height: 40.0,
                fill_color: "transparent".to_string(),
                rotation: 0.0,
            },
            "#ffffff",
            2.0,
        );
        let value = serde_json::to_value(&el).unwrap();
        assert_eq!(value["type"], "rectangle");
        assert_eq!(value["fillColor"], "transparent");
        assert_eq!(value["strokeColor"], "#ffffff");
        assert_eq!(value["isDeleted"], false);
        assert_eq!(value["width"], 30.0);
        assert!(value["createdAt"].is_u64());
    }

    #[test]
    fn rounded_rect_tag_is_camel_case() {
        let el = Element::new(
            Shape::RoundedRect {
                x: 0.0,
                y: 0.0,
                width: 10.0,
                height: 10.0,
                fill_color: "#ff0000".to_string(),
                corner_radius: 12.0,
                rotation: 0.0,
            },
            "#ffffff",
            2.0,
        );
        let value = serde_json::to_value(&el).unwrap();
        assert_eq!(value["type"], "roundedRect");
        assert_eq!(value["cornerRadius"], 12.0);
    }

    #[test]
    fn line_arrow_end_defaults_to_false() {
        let json = r##"{
            "id": "element_1700000000000_a1b2c3d4e",
            "strokeColor": "#ffffff",
            "strokeWidth": 2,
            "opacity": 1,
            "isDeleted": false,
            "createdAt": 1700000000000,
            "updatedAt": 1700000000000,
            "type": "line",
            "x1": 0, "y1": 0, "x2": 50, "y2": 50
        }"##;
        let el: Element = serde_json::from_str(json).unwrap();
        assert_eq!(
            el.shape,
            Shape::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 50.0,
                y2: 50.0,
                arrow_end: false
            }
        );
    }

    #[test]
    fn tool_wire_names() {
        assert_eq!(
            serde_json::to_value(Tool::RoundedRect).unwrap(),
            serde_json::json!("roundedRect")
        );
        assert_eq!(
            serde_json::to_value(Tool::Select).unwrap(),
            serde_json::json!("select")
        );
        let t: Tool = serde_json::from_str("\"eraser\"").unwrap();
        assert_eq!(t, Tool::Eraser);
    }

    #[test]
    fn element_json_roundtrip_every_variant() {
        let shapes = vec![
            Shape::Draw {
                points: vec![[0.0, 0.0], [5.0, 5.0], [10.0, 3.0]],
            },
            Shape::Rectangle {
                x: 1.0,
                y: 2.0,
                width: 3.0,
                height: 4.0,
                fill_color: "#102030".to_string(),
                rotation: 0.0,
            },
            Shape::Circle {
                x: 100.0,
                y: 100.0,
                radius: 20.0,
                fill_color: "transparent".to_string(),
            },
            Shape::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 9.0,
                y2: 9.0,
                arrow_end: true,
            },
            Shape::Diamond {
                x: 5.0,
                y: 5.0,
                width: 10.0,
                height: 6.0,
                fill_color: "#ffffff".to_string(),
            },
            Shape::RoundedRect {
                x: 0.0,
                y: 0.0,
                width: 40.0,
                height: 20.0,
                fill_color: "transparent".to_string(),
                corner_radius: 12.0,
                rotation: 0.0,
            },
            Shape::Text {
                x: 10.0,
                y: 30.0,
                text: "hello".to_string(),
                font_size: 24.0,
                font_family: "Arial".to_string(),
                color: "#ffffff".to_string(),
            },
        ];
        for shape in shapes {
            let el = Element::new(shape, "#ffffff", 2.0);
            let json = serde_json::to_string(&el).unwrap();
            let back: Element = serde_json::from_str(&json).unwrap();
            assert_eq!(back, el, "variant {} must round-trip", el.shape.kind());
        }
    }
}
