//! Keyboard shortcuts.
//!
//! Save, undo and close work everywhere. Everything else needs a selection
//! and is left alone while the user is typing in a field.

use crate::reorder::ReorderOp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyEvent {
    /// DOM `key` value: `"s"`, `"ArrowUp"`, `"Escape"`, ...
    pub key: String,
    pub ctrl: bool,
    /// Cmd on macOS
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditorAction {
    Save,
    Undo,
    Close,
    Delete,
    ApplyAttributes,
    Move(ReorderOp),
    Indent,
    Outdent,
}

/// Map a key press to an action. `typing` is true while focus is in a text
/// field; `has_selection` whether an element is selected.
pub fn action_for(event: &KeyEvent, typing: bool, has_selection: bool) -> Option<EditorAction> {
    let key = event.key.as_str();
    if event.command() && key.eq_ignore_ascii_case("s") {
        return Some(EditorAction::Save);
    }
    if event.command() && key.eq_ignore_ascii_case("z") {
        return Some(EditorAction::Undo);
    }
    if key == "Escape" {
        return Some(EditorAction::Close);
    }
    if typing || !has_selection {
        return None;
    }

    let action = match key {
        "Delete" => EditorAction::Delete,
        "Enter" => EditorAction::ApplyAttributes,
        "ArrowUp" if event.command() => EditorAction::Move(ReorderOp::ToFirst),
        "ArrowDown" if event.command() => EditorAction::Move(ReorderOp::ToLast),
        "Home" => EditorAction::Move(ReorderOp::ToFirst),
        "End" => EditorAction::Move(ReorderOp::ToLast),
        "ArrowUp" | "PageUp" => EditorAction::Move(ReorderOp::Up),
        "ArrowDown" | "PageDown" => EditorAction::Move(ReorderOp::Down),
        "Tab" if event.shift => EditorAction::Outdent,
        "ArrowRight" | "Tab" => EditorAction::Indent,
        "ArrowLeft" => EditorAction::Outdent,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_shortcuts_ignore_typing() {
        assert_eq!(
            action_for(&KeyEvent::new("S").with_ctrl(), true, false),
            Some(EditorAction::Save)
        );
        assert_eq!(
            action_for(&KeyEvent::new("z").with_ctrl(), true, false),
            Some(EditorAction::Undo)
        );
        assert_eq!(action_for(&KeyEvent::new("Escape"), true, false), Some(EditorAction::Close));
    }

    #[test]
    fn test_selection_shortcuts() {
        let key = |k: &str| action_for(&KeyEvent::new(k), false, true);
        assert_eq!(key("Delete"), Some(EditorAction::Delete));
        assert_eq!(key("PageUp"), Some(EditorAction::Move(ReorderOp::Up)));
        assert_eq!(key("ArrowDown"), Some(EditorAction::Move(ReorderOp::Down)));
        assert_eq!(key("Home"), Some(EditorAction::Move(ReorderOp::ToFirst)));
        assert_eq!(key("End"), Some(EditorAction::Move(ReorderOp::ToLast)));
        assert_eq!(key("Tab"), Some(EditorAction::Indent));
        assert_eq!(key("ArrowLeft"), Some(EditorAction::Outdent));
        assert_eq!(
            action_for(&KeyEvent::new("Tab").with_shift(), false, true),
            Some(EditorAction::Outdent)
        );
        assert_eq!(key("x"), None);
    }

    #[test]
    fn test_ctrl_arrows_match_home_end() {
        assert_eq!(
            action_for(&KeyEvent::new("ArrowUp").with_ctrl(), false, true),
            action_for(&KeyEvent::new("Home"), false, true)
        );
        assert_eq!(
            action_for(&KeyEvent::new("ArrowDown").with_ctrl(), false, true),
            action_for(&KeyEvent::new("End"), false, true)
        );
    }

    #[test]
    fn test_selection_keys_need_selection_and_no_typing() {
        assert_eq!(action_for(&KeyEvent::new("Delete"), false, false), None);
        assert_eq!(action_for(&KeyEvent::new("ArrowUp"), true, true), None);
    }
}
