//! Error types for the editor
//!
//! Every failure is detected before the document is touched, so an error
//! never leaves selection, history or the registry half-updated. The host
//! shows [`EditorError::notice`] to the user and carries on.

use crate::history::HistoryError;
use crate::reorder::ReorderError;
use crate::storage::StorageError;
use livepage_dom::{DomError, ParseError};
use livepage_stylesheet::StylesheetError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("No element selected")]
    NoSelection,

    #[error("No project loaded")]
    NoProject,

    #[error("Document is read-only")]
    ReadOnly,

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("{0}")]
    Reorder(#[from] ReorderError),

    #[error("Document is not accessible: {0}")]
    Access(String),

    #[error("Save failed: {0}")]
    Persistence(#[from] StorageError),

    #[error("{0}")]
    History(#[from] HistoryError),

    #[error("Document error: {0}")]
    Dom(#[from] DomError),

    #[error("Markup error: {0}")]
    Markup(#[from] ParseError),

    #[error("Stylesheet error: {0}")]
    Stylesheet(#[from] StylesheetError),
}

/// How the host should treat an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Missing selection, project or a bad target
    UserInput,
    /// The move would break the tree's ordering rules
    StructuralInvariant,
    /// The document could not be read; the session is read-only
    Access,
    /// Storage rejected a write; local state is kept for a retry
    Persistence,
    HistoryUnderflow,
}

impl EditorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EditorError::NoSelection
            | EditorError::NoProject
            | EditorError::ReadOnly
            | EditorError::InvalidTarget(_)
            | EditorError::Markup(_)
            | EditorError::Stylesheet(_) => ErrorKind::UserInput,
            EditorError::Reorder(ReorderError::NotAttached) => ErrorKind::UserInput,
            EditorError::Reorder(_) | EditorError::Dom(_) => ErrorKind::StructuralInvariant,
            EditorError::Access(_) => ErrorKind::Access,
            EditorError::Persistence(_) => ErrorKind::Persistence,
            EditorError::History(_) => ErrorKind::HistoryUnderflow,
        }
    }

    /// Message shown to the user.
    pub fn notice(&self) -> String {
        self.to_string()
    }
}

pub type EditorResult<T> = Result<T, EditorError>;
