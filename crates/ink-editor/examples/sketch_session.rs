//! Scripted drawing session against a headless engine.
//!
//! Drives the full pipeline without a window: pointer gestures build a
//! small scene, the recording surface paints it, the document is saved
//! to an in-memory store and read back. Optionally writes the document
//! JSON to a path given as the first argument.
//!
//! Run with `RUST_LOG=debug` to see the engine's internal logging.

use ink_core::model::Tool;
use ink_editor::{CanvasEngine, MemoryStore, PointerButton, fetch_document};
use ink_render::RecordingSurface;
use std::env;
use std::fs;

fn main() {
    env_logger::init();

    let mut engine = CanvasEngine::new();

    // A house: walls, roof, door, sun, and a caption.
    engine.set_tool(Tool::Rectangle);
    engine.pointer_down(200.0, 300.0, PointerButton::Left);
    engine.pointer_move(400.0, 450.0);
    engine.pointer_up();

    engine.set_tool(Tool::Line);
    for (from, to) in [
        ((200.0, 300.0), (300.0, 200.0)),
        ((300.0, 200.0), (400.0, 300.0)),
    ] {
        engine.pointer_down(from.0, from.1, PointerButton::Left);
        engine.pointer_move(to.0, to.1);
        engine.pointer_up();
    }

    engine.set_tool(Tool::RoundedRect);
    engine.pointer_down(280.0, 380.0, PointerButton::Left);
    engine.pointer_move(320.0, 450.0);
    engine.pointer_up();

    engine.set_fill_color("#fbbf24");
    engine.set_tool(Tool::Circle);
    engine.pointer_down(500.0, 120.0, PointerButton::Left);
    engine.pointer_move(530.0, 120.0);
    engine.pointer_up();

    engine.commit_text(240.0, 500.0, "home sweet home");

    // Second thoughts about the sun: undo, then bring it back.
    engine.undo();
    engine.undo();
    println!("after undo x2: {} elements", engine.elements().len());
    engine.redo();
    engine.redo();

    // Zoom in a couple of ticks around the house.
    engine.wheel(300.0, 375.0, -120.0);
    engine.wheel(300.0, 375.0, -120.0);

    let mut surface = RecordingSurface::new();
    engine.paint(&mut surface, 800.0, 600.0);
    println!(
        "scene: {} elements, {} strokes, {} fills at zoom {:.1}",
        engine.elements().len(),
        surface.stroke_count(),
        surface.fill_count(),
        engine.viewport().zoom,
    );

    // Round-trip through the store.
    let mut store = MemoryStore::new();
    if let Err(e) = engine.save_to(&mut store, Some("session.draw.json")) {
        eprintln!("save failed: {e}");
        std::process::exit(1);
    }
    let restored = CanvasEngine::from_document(fetch_document(&store, "session.draw.json"));
    assert_eq!(restored.elements(), engine.elements());
    println!("round-trip OK: {} elements restored", restored.elements().len());

    if let Some(path) = env::args().nth(1) {
        let json = serde_json::to_string_pretty(&engine.snapshot())
            .expect("snapshot is always serializable");
        match fs::write(&path, json) {
            Ok(()) => println!("wrote {path}"),
            Err(e) => eprintln!("ERROR writing {path}: {e}"),
        }
    }
}
