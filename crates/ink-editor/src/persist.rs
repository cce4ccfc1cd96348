//! Save/load orchestration against an external document store.
//!
//! The store is a generic key-value collaborator reached over get/patch;
//! documents are raw JSON. Loading is tolerant (anything malformed
//! defaults, see `CanvasData::from_value`); saving fetches the remote
//! document first and merges only the canvas-owned fields into it, so
//! unrelated fields other features keep in the same document survive.
//! A failed save leaves local state untouched.

use ink_core::document::CanvasData;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// The external storage collaborator.
pub trait DocumentStore {
    fn get(&self, id: &str) -> Result<Value, StoreError>;
    fn patch(&mut self, id: &str, document: &Value) -> Result<(), StoreError>;
}

#[derive(Debug)]
pub enum StoreError {
    NotFound(String),
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "document {id} not found"),
            StoreError::Backend(msg) => write!(f, "storage backend error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug)]
pub enum PersistError {
    /// Save requested with no active document. Aborted before any
    /// store interaction.
    NoTarget,
    /// Local state could not be serialized into the merge.
    Encode(serde_json::Error),
    /// The remote write failed; local state is unchanged.
    Write(StoreError),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::NoTarget => write!(f, "no document selected to save"),
            PersistError::Encode(err) => write!(f, "failed to encode document: {err}"),
            PersistError::Write(err) => write!(f, "failed to save document: {err}"),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::NoTarget => None,
            PersistError::Encode(err) => Some(err),
            PersistError::Write(err) => Some(err),
        }
    }
}

/// Merge-write `data` into the remote document `target`.
///
/// A failed pre-save fetch degrades to merging into an empty document;
/// only the write itself can fail the save.
pub fn save_document(
    store: &mut dyn DocumentStore,
    target: Option<&str>,
    data: &CanvasData,
) -> Result<(), PersistError> {
    let id = target.ok_or(PersistError::NoTarget)?;

    let mut remote = match store.get(id) {
        Ok(value) => value,
        Err(err) => {
            log::debug!("fetch before save failed ({err}), merging into empty document");
            Value::Object(Map::new())
        }
    };
    data.merge_into(&mut remote).map_err(PersistError::Encode)?;
    store.patch(id, &remote).map_err(PersistError::Write)?;
    log::debug!("saved document {id} ({} elements)", data.elements.len());
    Ok(())
}

/// Load the document `id`, defaulting wholesale when the fetch fails.
pub fn fetch_document(store: &dyn DocumentStore, id: &str) -> CanvasData {
    match store.get(id) {
        Ok(value) => CanvasData::from_value(value),
        Err(err) => {
            log::debug!("load of {id} failed ({err}), starting empty");
            CanvasData::default()
        }
    }
}

// ─── In-memory store ─────────────────────────────────────────────────────

/// Map-backed store for tests and the scripted example. `fail_writes`
/// simulates a storage outage on patch.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: HashMap<String, Value>,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, document: Value) {
        self.docs.insert(id.into(), document);
    }

    pub fn document(&self, id: &str) -> Option<&Value> {
        self.docs.get(id)
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Value, StoreError> {
        self.docs
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn patch(&mut self, id: &str, document: &Value) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Backend("write refused".to_string()));
        }
        self.docs.insert(id.to_string(), document.clone());
        Ok(())
    }
}
