//! Bounded undo/redo history of full element-list snapshots.
//!
//! The engine calls `record` once at each action boundary, immediately
//! before the mutation starts, so a whole drag or resize gesture is one
//! undo step. No diffing: each entry is a deep copy of the element list,
//! acceptable at the bounded depth and moderate element counts this
//! editor targets.

use ink_core::model::Element;

/// Maximum undo depth. Pushing past it evicts the oldest entry.
pub const HISTORY_LIMIT: usize = 50;

pub struct History {
    past: Vec<Vec<Element>>,
    future: Vec<Vec<Element>>,
    /// Set while undo/redo is applying a restored snapshot, so state
    /// sync running inside the restore cannot record a new entry.
    restoring: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            restoring: false,
        }
    }

    /// Capture the pre-mutation state. Call immediately before a
    /// mutating action begins. Any redo branch is discarded.
    pub fn record(&mut self, snapshot: &[Element]) {
        if self.restoring {
            log::trace!("history record suppressed during restore");
            return;
        }
        self.past.push(snapshot.to_vec());
        if self.past.len() > HISTORY_LIMIT {
            self.past.remove(0);
        }
        self.future.clear();
    }

    /// Restore the most recent snapshot into `elements`, moving the
    /// current state to the redo stack. `sync` runs with the restore
    /// guard held, for side effects that must follow a list swap
    /// (selection reconciliation) without recording.
    pub fn undo<F>(&mut self, elements: &mut Vec<Element>, sync: F) -> bool
    where
        F: FnOnce(&mut Vec<Element>),
    {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        self.restoring = true;
        self.future.push(std::mem::replace(elements, previous));
        sync(elements);
        self.restoring = false;
        true
    }

    /// Inverse of `undo`.
    pub fn redo<F>(&mut self, elements: &mut Vec<Element>, sync: F) -> bool
    where
        F: FnOnce(&mut Vec<Element>),
    {
        let Some(next) = self.future.pop() else {
            return false;
        };
        self.restoring = true;
        self.past.push(std::mem::replace(elements, next));
        sync(elements);
        self.restoring = false;
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.past.len()
    }
}
