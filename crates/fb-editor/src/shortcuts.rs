//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.
//! The shortcut map lives in Rust so it's shared across WASM and native.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Remove the selected field.
    DeleteSelected,
    /// Cancel the drag in progress, or close the properties panel.
    Dismiss,
    /// Commit the properties scratch buffer.
    CommitProperties,
    /// Switch between designer and preview.
    TogglePreview,
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"p"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd && !shift && !alt {
            return match key {
                "Enter" => Some(ShortcutAction::CommitProperties),
                "p" | "P" => Some(ShortcutAction::TogglePreview),
                _ => None,
            };
        }

        if cmd || shift || alt {
            return None;
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::DeleteSelected),
            "Escape" => Some(ShortcutAction::Dismiss),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_delete() {
        assert_eq!(
            ShortcutMap::resolve("Delete", false, false, false, false),
            Some(ShortcutAction::DeleteSelected)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", false, false, false, false),
            Some(ShortcutAction::DeleteSelected)
        );
    }

    #[test]
    fn resolve_escape() {
        assert_eq!(
            ShortcutMap::resolve("Escape", false, false, false, false),
            Some(ShortcutAction::Dismiss)
        );
    }

    #[test]
    fn resolve_commit() {
        // Cmd+Enter
        assert_eq!(
            ShortcutMap::resolve("Enter", false, false, false, true),
            Some(ShortcutAction::CommitProperties)
        );
        // Ctrl+Enter
        assert_eq!(
            ShortcutMap::resolve("Enter", true, false, false, false),
            Some(ShortcutAction::CommitProperties)
        );
        // bare Enter belongs to the focused input
        assert_eq!(ShortcutMap::resolve("Enter", false, false, false, false), None);
    }

    #[test]
    fn resolve_preview_toggle() {
        assert_eq!(
            ShortcutMap::resolve("p", false, false, false, true),
            Some(ShortcutAction::TogglePreview)
        );
        assert_eq!(ShortcutMap::resolve("p", false, false, false, false), None);
    }

    #[test]
    fn modified_delete_is_unbound() {
        assert_eq!(ShortcutMap::resolve("Delete", true, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("Escape", false, true, false, false), None);
    }
}
