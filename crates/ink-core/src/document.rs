//! Persisted document format and tolerant load/merge.
//!
//! Documents travel through an external key-value store as JSON. Loading
//! never fails: anything missing or wrong-shaped is defaulted field by
//! field so legacy and partially-written documents still open. Saving
//! merges the canvas-owned fields into whatever already exists remotely,
//! leaving unrelated fields untouched.

use crate::id::ElementId;
use crate::model::{Element, Tool};
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// UI and viewport state persisted alongside the elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    #[serde(flatten)]
    pub viewport: Viewport,
    pub selected_tool: Tool,
    pub stroke_color: String,
    pub fill_color: String,
    pub stroke_width: f32,
    pub selected_element_id: Option<ElementId>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            selected_tool: Tool::Select,
            stroke_color: "#000000".to_string(),
            fill_color: "#ffffff".to_string(),
            stroke_width: 1.0,
            selected_element_id: None,
        }
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasData {
    pub version: String,
    pub app_state: AppState,
    pub elements: Vec<Element>,
}

impl Default for CanvasData {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            app_state: AppState::default(),
            elements: Vec::new(),
        }
    }
}

impl CanvasData {
    /// Build a document from raw JSON, recovering from anything missing
    /// or malformed instead of failing.
    ///
    /// Accepted legacy shapes: a numeric `version`, and a singular
    /// `element` key for the element list. Elements that do not parse
    /// are dropped individually.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            log::debug!("document body is not an object, starting empty");
            return Self::default();
        };

        let version = match map.remove("version") {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => "1".to_string(),
        };

        let app_state = map
            .remove("appState")
            .map(app_state_from_value)
            .unwrap_or_default();

        let elements = match map.remove("elements").or_else(|| map.remove("element")) {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match serde_json::from_value::<Element>(item) {
                    Ok(el) => Some(el),
                    Err(err) => {
                        log::debug!("dropping malformed element on load: {err}");
                        None
                    }
                })
                .collect(),
            _ => Vec::new(),
        };

        Self {
            version,
            app_state,
            elements,
        }
    }

    /// Merge this document into an existing remote value.
    ///
    /// Only the canvas-owned fields are written: `type` (defaulted to
    /// `"canvas"` when absent), `version` (kept when the remote already
    /// has one), `appState`, and `elements`. Everything else the remote
    /// carries survives untouched.
    pub fn merge_into(&self, remote: &mut Value) -> Result<(), serde_json::Error> {
        if !remote.is_object() {
            *remote = Value::Object(Map::new());
        }
        if let Some(map) = remote.as_object_mut() {
            if !map.contains_key("type") {
                map.insert("type".to_string(), Value::String("canvas".to_string()));
            }
            if !map.contains_key("version") {
                map.insert("version".to_string(), Value::String(self.version.clone()));
            }
            map.insert("appState".to_string(), serde_json::to_value(&self.app_state)?);
            map.insert("elements".to_string(), serde_json::to_value(&self.elements)?);
        }
        Ok(())
    }
}

/// Field-by-field `AppState` recovery: every usable value is taken, every
/// missing or wrong-typed one falls back to the document default.
fn app_state_from_value(value: Value) -> AppState {
    let mut state = AppState::default();
    let Value::Object(map) = value else {
        return state;
    };
    if let Some(zoom) = map.get("zoom").and_then(Value::as_f64) {
        state.viewport.zoom = zoom as f32;
    }
    if let Some(x) = map.get("offsetX").and_then(Value::as_f64) {
        state.viewport.offset_x = x as f32;
    }
    if let Some(y) = map.get("offsetY").and_then(Value::as_f64) {
        state.viewport.offset_y = y as f32;
    }
    if let Some(tool) = map
        .get("selectedTool")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
    {
        state.selected_tool = tool;
    }
    if let Some(color) = map.get("strokeColor").and_then(Value::as_str) {
        state.stroke_color = color.to_string();
    }
    if let Some(color) = map.get("fillColor").and_then(Value::as_str) {
        state.fill_color = color.to_string();
    }
    if let Some(width) = map.get("strokeWidth").and_then(Value::as_f64) {
        state.stroke_width = width as f32;
    }
    if let Some(id) = map.get("selectedElementId").and_then(Value::as_str) {
        state.selected_element_id = Some(ElementId::intern(id));
    }
    state
}
