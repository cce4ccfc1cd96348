pub mod document;
pub mod id;
pub mod model;
pub mod viewport;

pub use document::{AppState, CanvasData};
pub use id::{ElementId, unix_millis};
pub use model::*;
pub use viewport::{MAX_ZOOM, MIN_ZOOM, Viewport, ZOOM_STEP};
