//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s so hosts
//! forward raw key events and the engine decides what they mean.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    /// Remove the current selection.
    Delete,
    /// Space pressed: hold-to-pan modifier engages.
    PanStart,
}

/// Resolves key events into shortcut actions.
///
/// Platform-aware: `meta` is ⌘ on macOS, `ctrl` serves the same role
/// elsewhere; either counts as the command modifier.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the host's `KeyboardEvent.key` value (e.g. `"z"`,
    /// `"Delete"`, `" "`). Returns `None` for unbound combos.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        // Most specific combos first.
        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            " " => Some(ShortcutAction::PanStart),
            _ => None,
        }
    }
}
