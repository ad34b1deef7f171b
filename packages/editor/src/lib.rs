//! # Livepage Editor
//!
//! The live document editing engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ dom: markup → Document (arena)              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - outline + node registry                  │
//! │  - selection, highlight, click routing      │
//! │  - reorder / indent / outdent               │
//! │  - snapshot history (undo)                  │
//! │  - style merge into the stylesheet text     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ serializer: Document → index.html           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The document is the source of truth**: the outline is a derived view,
//!    rebuilt in full after every structural change
//! 2. **Scripts stay last**: no move ever lands an element behind a script
//! 3. **Fail before mutating**: a rejected operation changes nothing
//! 4. **Saves never roll back**: a failed write keeps history and edits
//!
//! ## Usage
//!
//! ```rust
//! use livepage_editor::{EditSession, MemoryBackend, Mode, ReorderOp, StaticLayout};
//!
//! let backend = MemoryBackend::new().with_project(
//!     "site",
//!     "<body><p id=\"a\">A</p><p id=\"b\">B</p><script></script></body>",
//!     "",
//! );
//! let mut session = EditSession::default();
//! session.open(&backend, "site", Mode::Edit).unwrap();
//!
//! let b = session.document().unwrap().get_element_by_id("b").unwrap();
//! session.select(Some(b), &StaticLayout::default()).unwrap();
//! session.move_selected(ReorderOp::ToFirst).unwrap();
//! session.undo().unwrap();
//! ```

pub mod config;
mod errors;
pub mod history;
pub mod inspector;
pub mod outline;
pub mod overlay;
pub mod registry;
pub mod reorder;
pub mod schema;
pub mod selection;
pub mod serializer;
mod session;
pub mod shortcuts;
pub mod storage;

pub use config::{EditorConfig, INJECTED_STYLE_ID, OVERLAY_MARKER};
pub use errors::{EditorError, EditorResult, ErrorKind};
pub use history::{HistoryError, HistoryManager, HistorySnapshot, DEFAULT_HISTORY_LIMIT};
pub use inspector::{
    selector_for, AttributeInspector, InspectContext, Inspector, InspectorTab, InspectorView,
    StyleInspector,
};
pub use outline::{Outline, OutlineNode};
pub use overlay::{HighlightOverlay, OverlayMatcher, Point, Rect};
pub use registry::{NodeRegistry, OutlineId};
pub use reorder::{ReorderError, ReorderOp};
pub use schema::{CssSchema, PropertyDef, TagAttributes};
pub use selection::{ClickOutcome, LayoutProbe, SelectionController, StaticLayout};
pub use serializer::{pretty_print, serialize_document};
pub use session::{AttributeEdit, EditSession, Mode};
pub use shortcuts::{action_for, EditorAction, KeyEvent};
pub use storage::{Asset, MemoryBackend, ProjectBackend, StorageError, StorageResult};

// Re-export the document model for hosts
pub use livepage_dom::{Document, NodeId};
