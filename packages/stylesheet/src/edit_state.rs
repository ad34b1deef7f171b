//! Per-property edit tracking for the style inspector.
//!
//! Each inspected property remembers the value it had when the element was
//! selected. A property is dirty while its current value differs from that
//! original; only dirty properties take part in a partial stylesheet write.

use crate::declarations::Declarations;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEditState {
    pub original: String,
    pub current: String,
    pub dirty: bool,
}

impl PropertyEditState {
    pub fn new(original: impl Into<String>) -> Self {
        let original = original.into();
        Self {
            current: original.clone(),
            original,
            dirty: false,
        }
    }
}

/// Edit states for the properties of the currently inspected element, in
/// inspection order.
#[derive(Debug, Clone, Default)]
pub struct PropertyEdits {
    entries: Vec<(String, PropertyEditState)>,
}

impl PropertyEdits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the value a property had at selection time, discarding any
    /// previous edit of it.
    pub fn inspect(&mut self, property: &str, original: impl Into<String>) {
        let state = PropertyEditState::new(original);
        match self.entry_mut(property) {
            Some(existing) => *existing = state,
            None => self.entries.push((property.to_string(), state)),
        }
    }

    /// Stage a user edit. Properties that were never inspected start from an
    /// empty original.
    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        if self.entry_mut(property).is_none() {
            self.entries
                .push((property.to_string(), PropertyEditState::default()));
        }
        if let Some(state) = self.entry_mut(property) {
            state.dirty = value != state.original;
            state.current = value;
        }
    }

    pub fn get(&self, property: &str) -> Option<&PropertyEditState> {
        self.entries
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, s)| s)
    }

    fn entry_mut(&mut self, property: &str) -> Option<&mut PropertyEditState> {
        self.entries
            .iter_mut()
            .find(|(p, _)| p == property)
            .map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyEditState)> {
        self.entries.iter().map(|(p, s)| (p.as_str(), s))
    }

    pub fn is_dirty(&self) -> bool {
        self.entries.iter().any(|(_, s)| s.dirty)
    }

    /// Current values of dirty properties only. A property cleared to an
    /// empty value has nothing to write and is left out.
    pub fn dirty_declarations(&self) -> Declarations {
        self.entries
            .iter()
            .filter(|(_, s)| s.dirty && !s.current.trim().is_empty())
            .map(|(p, s)| (p.as_str(), s.current.as_str()))
            .collect()
    }

    /// Current values of every property with a non-empty value.
    pub fn all_declarations(&self) -> Declarations {
        self.entries
            .iter()
            .filter(|(_, s)| !s.current.trim().is_empty())
            .map(|(p, s)| (p.as_str(), s.current.as_str()))
            .collect()
    }

    /// After a successful write: the written properties become the new
    /// baseline and stop being dirty.
    pub fn mark_persisted(&mut self, written: &Declarations) {
        for (property, _) in written.iter() {
            if let Some(state) = self.entry_mut(property) {
                state.original = state.current.clone();
                state.dirty = false;
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_changed_properties_are_dirty() {
        let mut edits = PropertyEdits::new();
        edits.inspect("color", "blue");
        edits.inspect("margin", "0");

        edits.set("color", "red");
        edits.set("margin", "0");

        assert!(edits.get("color").unwrap().dirty);
        assert!(!edits.get("margin").unwrap().dirty);
        assert_eq!(edits.dirty_declarations().to_inline(), "color: red");
    }

    #[test]
    fn test_reverting_clears_dirty() {
        let mut edits = PropertyEdits::new();
        edits.inspect("color", "blue");
        edits.set("color", "red");
        edits.set("color", "blue");
        assert!(!edits.is_dirty());
    }

    #[test]
    fn test_cleared_property_is_not_written() {
        let mut edits = PropertyEdits::new();
        edits.inspect("color", "blue");
        edits.set("color", "");
        edits.set("margin", "  ");

        assert!(edits.get("color").unwrap().dirty);
        assert!(edits.dirty_declarations().is_empty());

        edits.set("padding", "1em");
        assert_eq!(edits.dirty_declarations().to_inline(), "padding: 1em");
    }

    #[test]
    fn test_mark_persisted_resets_baseline() {
        let mut edits = PropertyEdits::new();
        edits.inspect("color", "blue");
        edits.set("color", "red");
        edits.set("padding", "4px");

        let written = edits.dirty_declarations();
        edits.mark_persisted(&written);

        let color = edits.get("color").unwrap();
        assert_eq!(color.original, "red");
        assert!(!color.dirty);
        assert!(edits.dirty_declarations().is_empty());

        edits.set("color", "green");
        assert_eq!(edits.dirty_declarations().to_inline(), "color: green");
    }
}
