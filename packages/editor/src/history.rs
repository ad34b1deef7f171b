//! # Snapshot History
//!
//! Linear, bounded undo over full-document snapshots.
//!
//! ## Design
//!
//! - A snapshot is the complete document markup at one instant
//! - `position` points at the snapshot matching the live document
//! - Pushing after an undo discards everything past `position` (no redo tree)
//! - When the limit is exceeded the oldest snapshot is evicted
//! - Undo only moves `position`; the caller restores the document from
//!   [`HistoryManager::current`]
//!
//! ## Example
//!
//! ```rust
//! use livepage_editor::HistoryManager;
//!
//! let mut history = HistoryManager::with_limit(10);
//! history.push("<html>v1</html>");
//! history.push("<html>v2</html>");
//! assert_eq!(history.undo().unwrap().markup(), "<html>v1</html>");
//! assert!(history.undo().is_err());
//! ```

use thiserror::Error;
use tracing::debug;

pub const DEFAULT_HISTORY_LIMIT: usize = 60;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistoryError {
    #[error("Nothing to undo")]
    NothingToUndo,
}

/// Immutable capture of the whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySnapshot {
    markup: String,
}

impl HistorySnapshot {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }
}

#[derive(Debug)]
pub struct HistoryManager {
    snapshots: Vec<HistorySnapshot>,

    /// Index of the current snapshot; `None` while empty
    position: Option<usize>,

    /// Maximum number of snapshots (at least 1)
    limit: usize,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            position: None,
            limit: limit.max(1),
        }
    }

    /// Record a snapshot as the new current state.
    pub fn push(&mut self, markup: impl Into<String>) {
        // Discard forward history left behind by undo
        let keep = self.position.map(|p| p + 1).unwrap_or(0);
        self.snapshots.truncate(keep);

        self.snapshots.push(HistorySnapshot::new(markup));
        if self.snapshots.len() > self.limit {
            self.snapshots.remove(0);
        }
        self.position = Some(self.snapshots.len() - 1);

        debug!(
            position = self.snapshots.len() - 1,
            len = self.snapshots.len(),
            "history push"
        );
    }

    /// The snapshot `undo` would step back to, without moving.
    pub fn previous(&self) -> Option<&HistorySnapshot> {
        self.position
            .filter(|p| *p > 0)
            .and_then(|p| self.snapshots.get(p - 1))
    }

    /// Step back one snapshot and return it.
    pub fn undo(&mut self) -> Result<&HistorySnapshot, HistoryError> {
        let Some(p) = self.position.filter(|p| *p > 0) else {
            return Err(HistoryError::NothingToUndo);
        };
        self.position = Some(p - 1);
        debug!(position = p - 1, "history undo");
        Ok(&self.snapshots[p - 1])
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.position, Some(p) if p > 0)
    }

    pub fn current(&self) -> Option<&HistorySnapshot> {
        self.position.and_then(|p| self.snapshots.get(p))
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn snapshots(&self) -> &[HistorySnapshot] {
        &self.snapshots
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.position = None;
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}
