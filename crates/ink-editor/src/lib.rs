pub mod engine;
pub mod history;
pub mod persist;
pub mod shortcuts;

pub use engine::{
    CanvasEngine, ElementPatch, InteractionState, PointerButton, PointerOutcome,
};
pub use history::{HISTORY_LIMIT, History};
pub use persist::{DocumentStore, MemoryStore, PersistError, StoreError, fetch_document, save_document};
pub use shortcuts::{ShortcutAction, ShortcutMap};
