//! The interaction state machine.
//!
//! `CanvasEngine` owns the authoritative editor state: the element list,
//! viewport, tool settings, selection, in-progress element, and history.
//! Hosts feed it pointer/wheel/key events and repaint after every call;
//! the engine itself is synchronous, single-threaded, and framework-free.
//!
//! Exactly one gesture is active at a time (or none). Pointer-up and
//! pointer-leave always return to `Idle`.
//!
//! Element mutations never edit in place: the touched element is cloned,
//! rewritten, and swapped back into its list slot under the same id, so
//! history snapshots stay independent.

use crate::history::History;
use crate::persist::{self, DocumentStore, PersistError};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use ink_core::document::{AppState, CanvasData};
use ink_core::id::ElementId;
use ink_core::model::{Element, Shape, Tool};
use ink_core::viewport::{MAX_ZOOM, MIN_ZOOM, Viewport, ZOOM_STEP};
use ink_render::hit::{ResizeHandle, hit_test, resize_handle_at};
use ink_render::paint::{SceneParams, paint_scene};
use ink_render::surface::Surface;

/// Pointer button as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// The active gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    /// A shape tool is extending the in-progress element.
    Drawing,
    /// The selected element follows the pointer. `last` is the previous
    /// pointer position in world coordinates.
    Dragging { last_x: f32, last_y: f32 },
    /// One handle of the selected element follows the pointer.
    Resizing { handle: ResizeHandle },
    /// The viewport follows the pointer. `anchor` is the world point
    /// grabbed at pan start; it stays under the pointer.
    Panning { anchor_x: f32, anchor_y: f32 },
}

/// What the engine needs from the host after a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    Handled,
    /// The text tool wants input. Prompt the user out-of-band, then call
    /// [`CanvasEngine::commit_text`] with this world position.
    PromptText { x: f32, y: f32 },
}

/// Optional property overrides for the selected element. `None` fields
/// are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ElementPatch {
    pub stroke_color: Option<String>,
    pub fill_color: Option<String>,
    pub stroke_width: Option<f32>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub text: Option<String>,
    pub color: Option<String>,
}

pub struct CanvasEngine {
    elements: Vec<Element>,
    viewport: Viewport,
    tool: Tool,
    stroke_color: String,
    fill_color: String,
    stroke_width: f32,
    font_family: String,
    font_size: f32,
    selected_id: Option<ElementId>,
    /// Element mid-gesture, not yet in the list.
    current: Option<Element>,
    state: InteractionState,
    history: History,
    space_pressed: bool,
}

impl Default for CanvasEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasEngine {
    /// Fresh engine with the drawing defaults: draw tool, white stroke,
    /// no fill, identity viewport.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            viewport: Viewport::default(),
            tool: Tool::Draw,
            stroke_color: "#ffffff".to_string(),
            fill_color: "transparent".to_string(),
            stroke_width: 2.0,
            font_family: "Arial".to_string(),
            font_size: 24.0,
            selected_id: None,
            current: None,
            state: InteractionState::Idle,
            history: History::new(),
            space_pressed: false,
        }
    }

    /// Engine initialized from a loaded document.
    pub fn from_document(data: CanvasData) -> Self {
        let mut engine = Self::new();
        engine.load(data);
        engine
    }

    // ─── Pointer events ──────────────────────────────────────────────

    pub fn pointer_down(&mut self, sx: f32, sy: f32, button: PointerButton) -> PointerOutcome {
        let (wx, wy) = self.viewport.screen_to_world(sx, sy);

        if button == PointerButton::Middle
            || (button == PointerButton::Left && self.space_pressed)
        {
            self.state = InteractionState::Panning {
                anchor_x: wx,
                anchor_y: wy,
            };
            return PointerOutcome::Handled;
        }
        if button != PointerButton::Left {
            return PointerOutcome::Handled;
        }

        match self.tool {
            Tool::Eraser => {
                self.erase_at(wx, wy);
                PointerOutcome::Handled
            }
            Tool::Text => PointerOutcome::PromptText { x: wx, y: wy },
            Tool::Select => {
                self.select_at(wx, wy);
                PointerOutcome::Handled
            }
            shape_tool => {
                self.history.record(&self.elements);
                self.current = Some(self.start_element(shape_tool, wx, wy));
                self.state = InteractionState::Drawing;
                PointerOutcome::Handled
            }
        }
    }

    pub fn pointer_move(&mut self, sx: f32, sy: f32) {
        let (wx, wy) = self.viewport.screen_to_world(sx, sy);

        match self.state {
            InteractionState::Panning { anchor_x, anchor_y } => {
                self.viewport.pan_to(anchor_x, anchor_y, sx, sy);
            }
            InteractionState::Dragging { last_x, last_y } => {
                let (dx, dy) = (wx - last_x, wy - last_y);
                self.translate_selected(dx, dy);
                self.state = InteractionState::Dragging {
                    last_x: wx,
                    last_y: wy,
                };
            }
            InteractionState::Resizing { handle } => {
                self.resize_selected(handle, wx, wy);
            }
            InteractionState::Drawing => {
                if let Some(current) = &mut self.current {
                    extend_shape(&mut current.shape, wx, wy);
                }
            }
            InteractionState::Idle => {}
        }
    }

    /// Finalize whatever gesture is active and return to `Idle`.
    pub fn pointer_up(&mut self) {
        if let Some(mut element) = self.current.take() {
            normalize_extents(&mut element.shape);
            self.elements.push(element);
        }
        if let InteractionState::Resizing { .. } = self.state
            && let Some(index) = self.selected_index()
        {
            normalize_extents(&mut self.elements[index].shape);
        }
        self.state = InteractionState::Idle;
    }

    /// Same contract as pointer-up: gestures never survive the pointer
    /// leaving the surface.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// One discrete wheel tick. Scrolling down zooms out, anything else
    /// zooms in, anchored at the cursor.
    pub fn wheel(&mut self, sx: f32, sy: f32, delta_y: f32) {
        let delta = if delta_y > 0.0 { -ZOOM_STEP } else { ZOOM_STEP };
        self.viewport.zoom_at(sx, sy, delta);
    }

    // ─── Keyboard ────────────────────────────────────────────────────

    /// Returns true when the key was consumed.
    pub fn key_down(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        match ShortcutMap::resolve(key, ctrl, shift, alt, meta) {
            Some(ShortcutAction::Undo) => self.undo(),
            Some(ShortcutAction::Redo) => self.redo(),
            Some(ShortcutAction::Delete) => {
                // Only acts on an existing selection.
                if self.selected_id.is_some() {
                    self.delete_selected();
                    true
                } else {
                    false
                }
            }
            Some(ShortcutAction::PanStart) => {
                self.space_pressed = true;
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if key == " " {
            self.space_pressed = false;
            // Releasing the pan modifier aborts an active pan.
            if let InteractionState::Panning { .. } = self.state {
                self.state = InteractionState::Idle;
            }
        }
    }

    // ─── One-shot operations ─────────────────────────────────────────

    /// Append a text element from host-prompted input. Whitespace-only
    /// input inserts nothing and records nothing.
    pub fn commit_text(&mut self, x: f32, y: f32, input: &str) -> bool {
        let text = input.trim();
        if text.is_empty() {
            return false;
        }
        self.history.record(&self.elements);
        let element = Element::new(
            Shape::Text {
                x,
                y,
                text: text.to_string(),
                font_size: self.font_size,
                font_family: self.font_family.clone(),
                color: self.stroke_color.clone(),
            },
            self.stroke_color.clone(),
            self.stroke_width,
        );
        self.elements.push(element);
        true
    }

    /// Remove the selected element. Undoable.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id else {
            return;
        };
        self.history.record(&self.elements);
        self.elements.retain(|el| el.id != id);
        self.selected_id = None;
    }

    /// Empty the whole canvas in one undoable step. The host confirms
    /// out-of-band before calling.
    pub fn clear(&mut self) {
        self.history.record(&self.elements);
        self.elements.clear();
        self.selected_id = None;
    }

    /// Rebuild the selected element with the patch applied. Stroke
    /// fields apply to every variant, fill only where the variant has
    /// one, font/text/color only to text. False when nothing is
    /// selected.
    pub fn update_selected(&mut self, patch: &ElementPatch) -> bool {
        let Some(index) = self.selected_index() else {
            return false;
        };
        self.history.record(&self.elements);

        let mut element = self.elements[index].clone();
        if let Some(stroke_color) = &patch.stroke_color {
            element.stroke_color = stroke_color.clone();
        }
        if let Some(stroke_width) = patch.stroke_width {
            element.stroke_width = stroke_width;
        }
        match &mut element.shape {
            Shape::Rectangle { fill_color, .. }
            | Shape::Circle { fill_color, .. }
            | Shape::Diamond { fill_color, .. }
            | Shape::RoundedRect { fill_color, .. } => {
                if let Some(fill) = &patch.fill_color {
                    *fill_color = fill.clone();
                }
            }
            Shape::Text {
                text,
                font_size,
                font_family,
                color,
                ..
            } => {
                if let Some(family) = &patch.font_family {
                    *font_family = family.clone();
                }
                if let Some(size) = patch.font_size {
                    *font_size = size;
                }
                if let Some(new_text) = &patch.text {
                    *text = new_text.clone();
                }
                if let Some(new_color) = &patch.color {
                    *color = new_color.clone();
                }
            }
            Shape::Draw { .. } | Shape::Line { .. } => {}
        }
        self.elements[index] = element;
        true
    }

    // ─── History ─────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        let selected = &mut self.selected_id;
        self.history.undo(&mut self.elements, |elements| {
            reconcile_selection(selected, elements);
        })
    }

    pub fn redo(&mut self) -> bool {
        let selected = &mut self.selected_id;
        self.history.redo(&mut self.elements, |elements| {
            reconcile_selection(selected, elements);
        })
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─── Document exchange ───────────────────────────────────────────

    /// Plain snapshot for persistence. The saved selection is always
    /// cleared; font settings are engine-local and never persisted.
    pub fn snapshot(&self) -> CanvasData {
        CanvasData {
            version: "1.0.0".to_string(),
            app_state: AppState {
                viewport: self.viewport,
                selected_tool: self.tool,
                stroke_color: self.stroke_color.clone(),
                fill_color: self.fill_color.clone(),
                stroke_width: self.stroke_width,
                selected_element_id: None,
            },
            elements: self.elements.clone(),
        }
    }

    /// Replace all state from a loaded document. History is reset; a
    /// persisted selection pointing at a missing element is cleared.
    pub fn load(&mut self, data: CanvasData) {
        self.elements = data.elements;
        // Older documents may carry negative extents (nothing normalized
        // them at save time); hit testing assumes non-negative geometry.
        for element in &mut self.elements {
            normalize_extents(&mut element.shape);
        }
        self.viewport = data.app_state.viewport;
        self.viewport.zoom = self.viewport.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.tool = data.app_state.selected_tool;
        self.stroke_color = data.app_state.stroke_color;
        self.fill_color = data.app_state.fill_color;
        self.stroke_width = data.app_state.stroke_width;
        self.selected_id = data.app_state.selected_element_id;
        reconcile_selection(&mut self.selected_id, &self.elements);
        self.current = None;
        self.state = InteractionState::Idle;
        self.history = History::new();
    }

    /// Fire-and-forget save through the storage collaborator. Local
    /// state is never touched, success or fail.
    pub fn save_to(
        &self,
        store: &mut dyn DocumentStore,
        target: Option<&str>,
    ) -> Result<(), PersistError> {
        persist::save_document(store, target, &self.snapshot())
    }

    // ─── Rendering ───────────────────────────────────────────────────

    /// Repaint the whole scene. The host owns the surface; without one
    /// it simply does not call this.
    pub fn paint(&self, surface: &mut dyn Surface, width: f32, height: f32) {
        paint_scene(
            surface,
            &SceneParams {
                elements: &self.elements,
                current: self.current.as_ref(),
                selected_id: self.selected_id,
                tool: self.tool,
                viewport: self.viewport,
                surface_width: width,
                surface_height: height,
            },
        );
    }

    // ─── Accessors & settings ────────────────────────────────────────

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn selected_id(&self) -> Option<ElementId> {
        self.selected_id
    }

    pub fn selected_element(&self) -> Option<&Element> {
        let id = self.selected_id?;
        self.elements.iter().find(|el| el.id == id)
    }

    pub fn stroke_color(&self) -> &str {
        &self.stroke_color
    }

    pub fn set_stroke_color(&mut self, color: impl Into<String>) {
        self.stroke_color = color.into();
    }

    pub fn fill_color(&self) -> &str {
        &self.fill_color
    }

    pub fn set_fill_color(&mut self, color: impl Into<String>) {
        self.fill_color = color.into();
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width = width;
    }

    pub fn set_font(&mut self, family: impl Into<String>, size: f32) {
        self.font_family = family.into();
        self.font_size = size;
    }

    // ─── Internals ───────────────────────────────────────────────────

    fn selected_index(&self) -> Option<usize> {
        let id = self.selected_id?;
        self.elements.iter().position(|el| el.id == id)
    }

    /// Eraser one-shot: remove the first element hit. Erasing is not
    /// recorded in history and cannot be undone.
    fn erase_at(&mut self, wx: f32, wy: f32) {
        let Some(target) = ink_render::hit::element_at(wx, wy, &self.elements).map(|el| el.id)
        else {
            return;
        };
        self.elements.retain(|el| el.id != target);
        if self.selected_id == Some(target) {
            self.selected_id = None;
        }
        log::debug!("erased element {target}");
    }

    /// Selection-tool press: scan in list order, handles before body per
    /// element. Handle hit starts a resize, body hit starts a drag,
    /// empty space clears the selection.
    fn select_at(&mut self, wx: f32, wy: f32) {
        for element in self.elements.iter().filter(|el| !el.is_deleted) {
            if let Some(handle) = resize_handle_at(wx, wy, element) {
                self.history.record(&self.elements);
                self.selected_id = Some(element.id);
                self.state = InteractionState::Resizing { handle };
                return;
            }
            if hit_test(wx, wy, element) {
                self.history.record(&self.elements);
                self.selected_id = Some(element.id);
                self.state = InteractionState::Dragging {
                    last_x: wx,
                    last_y: wy,
                };
                return;
            }
        }
        self.selected_id = None;
    }

    /// Zero-extent element under the pointer for a shape tool press.
    fn start_element(&self, tool: Tool, x: f32, y: f32) -> Element {
        let shape = match tool {
            Tool::Draw => Shape::Draw {
                points: vec![[x, y]],
            },
            Tool::Rectangle => Shape::Rectangle {
                x,
                y,
                width: 0.0,
                height: 0.0,
                fill_color: self.fill_color.clone(),
                rotation: 0.0,
            },
            Tool::Circle => Shape::Circle {
                x,
                y,
                radius: 0.0,
                fill_color: self.fill_color.clone(),
            },
            // The arrow tool is a line with the arrowhead flag set.
            Tool::Line | Tool::Arrow => Shape::Line {
                x1: x,
                y1: y,
                x2: x,
                y2: y,
                arrow_end: tool == Tool::Arrow,
            },
            Tool::Diamond => Shape::Diamond {
                x,
                y,
                width: 0.0,
                height: 0.0,
                fill_color: self.fill_color.clone(),
            },
            Tool::RoundedRect => Shape::RoundedRect {
                x,
                y,
                width: 0.0,
                height: 0.0,
                fill_color: self.fill_color.clone(),
                corner_radius: 12.0,
                rotation: 0.0,
            },
            // Select, eraser, and text branch before this point.
            Tool::Select | Tool::Eraser | Tool::Text => unreachable!("not a shape tool"),
        };
        Element::new(shape, self.stroke_color.clone(), self.stroke_width)
    }

    fn translate_selected(&mut self, dx: f32, dy: f32) {
        let Some(index) = self.selected_index() else {
            return;
        };
        let mut element = self.elements[index].clone();
        match &mut element.shape {
            Shape::Draw { points } => {
                for point in points {
                    point[0] += dx;
                    point[1] += dy;
                }
            }
            Shape::Rectangle { x, y, .. }
            | Shape::Circle { x, y, .. }
            | Shape::Diamond { x, y, .. }
            | Shape::RoundedRect { x, y, .. }
            | Shape::Text { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            Shape::Line { x1, y1, x2, y2, .. } => {
                *x1 += dx;
                *y1 += dy;
                *x2 += dx;
                *y2 += dy;
            }
        }
        self.elements[index] = element;
    }

    fn resize_selected(&mut self, handle: ResizeHandle, wx: f32, wy: f32) {
        let Some(index) = self.selected_index() else {
            return;
        };
        let mut element = self.elements[index].clone();
        match &mut element.shape {
            Shape::Rectangle {
                x, y, width, height, ..
            }
            | Shape::Diamond {
                x, y, width, height, ..
            }
            | Shape::RoundedRect {
                x, y, width, height, ..
            } => resize_box(handle, wx, wy, x, y, width, height),
            Shape::Circle { x, y, radius, .. } => {
                *radius = (wx - *x).hypot(wy - *y);
            }
            Shape::Draw { .. } | Shape::Line { .. } | Shape::Text { .. } => {}
        }
        self.elements[index] = element;
    }
}

/// Corner handles move their corner with the opposite one fixed; edge
/// handles move one edge, affecting a single axis.
fn resize_box(
    handle: ResizeHandle,
    wx: f32,
    wy: f32,
    x: &mut f32,
    y: &mut f32,
    width: &mut f32,
    height: &mut f32,
) {
    match handle {
        ResizeHandle::Br => {
            *width = wx - *x;
            *height = wy - *y;
        }
        ResizeHandle::Tl => {
            *width += *x - wx;
            *height += *y - wy;
            *x = wx;
            *y = wy;
        }
        ResizeHandle::Tr => {
            *width = wx - *x;
            *height += *y - wy;
            *y = wy;
        }
        ResizeHandle::Bl => {
            *width += *x - wx;
            *height = wy - *y;
            *x = wx;
        }
        ResizeHandle::Top => {
            *height += *y - wy;
            *y = wy;
        }
        ResizeHandle::Bottom => {
            *height = wy - *y;
        }
        ResizeHandle::Left => {
            *width += *x - wx;
            *x = wx;
        }
        ResizeHandle::Right => {
            *width = wx - *x;
        }
    }
}

/// Grow the in-progress shape toward the pointer.
fn extend_shape(shape: &mut Shape, wx: f32, wy: f32) {
    match shape {
        Shape::Draw { points } => points.push([wx, wy]),
        Shape::Rectangle {
            x, y, width, height, ..
        }
        | Shape::Diamond {
            x, y, width, height, ..
        }
        | Shape::RoundedRect {
            x, y, width, height, ..
        } => {
            *width = wx - *x;
            *height = wy - *y;
        }
        Shape::Circle { x, y, radius, .. } => {
            *radius = (wx - *x).hypot(wy - *y);
        }
        Shape::Line { x2, y2, .. } => {
            *x2 = wx;
            *y2 = wy;
        }
        Shape::Text { .. } => {}
    }
}

/// Rewrite signed extents so committed geometry is always non-negative.
/// Live gestures keep signed extents; this runs at gesture finalization
/// and on document load.
fn normalize_extents(shape: &mut Shape) {
    match shape {
        Shape::Rectangle {
            x, y, width, height, ..
        }
        | Shape::Diamond {
            x, y, width, height, ..
        }
        | Shape::RoundedRect {
            x, y, width, height, ..
        } => {
            if *width < 0.0 {
                *x += *width;
                *width = -*width;
            }
            if *height < 0.0 {
                *y += *height;
                *height = -*height;
            }
        }
        // Radius is a distance, lines and strokes are direction-free,
        // text has no extent.
        Shape::Circle { .. } | Shape::Line { .. } | Shape::Draw { .. } | Shape::Text { .. } => {}
    }
}

/// A selection referencing an element no longer in the list is invalid;
/// clear it. Runs after every operation that replaces the list.
fn reconcile_selection(selected: &mut Option<ElementId>, elements: &[Element]) {
    if let Some(id) = *selected
        && !elements.iter().any(|el| el.id == id)
    {
        log::trace!("clearing dangling selection {id}");
        *selected = None;
    }
}
