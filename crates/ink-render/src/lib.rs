pub mod export;
pub mod hit;
pub mod paint;
pub mod surface;
pub mod vello;

pub use export::{ExportError, PixelSource, export_snapshot};
pub use hit::{ResizeHandle, element_at, hit_test, resize_handle_at};
pub use paint::{SceneParams, paint_scene};
pub use surface::{PaintOp, RecordingSurface, Stroke, Surface, TextStyle};
pub use self::vello::VelloSurface;
