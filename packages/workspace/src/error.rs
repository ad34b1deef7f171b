use livepage_editor::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Invalid project name")]
    InvalidName,

    #[error("Project already exists: {0}")]
    AlreadyExists(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Path escapes the project directory: {0}")]
    Forbidden(String),

    #[error("{0}")]
    Rejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

impl From<WorkspaceError> for StorageError {
    fn from(err: WorkspaceError) -> Self {
        match err {
            WorkspaceError::ProjectNotFound(name) => StorageError::ProjectNotFound(name),
            WorkspaceError::Forbidden(path) => StorageError::AccessDenied(path),
            WorkspaceError::FileNotFound(path) => StorageError::Io(format!("missing file {}", path)),
            WorkspaceError::InvalidName
            | WorkspaceError::AlreadyExists(_)
            | WorkspaceError::Rejected(_) => StorageError::Rejected(err.to_string()),
            WorkspaceError::Io(e) => StorageError::Io(e.to_string()),
            WorkspaceError::Json(e) => StorageError::Io(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_mapping() {
        let err: StorageError = WorkspaceError::ProjectNotFound("site".into()).into();
        assert_eq!(err, StorageError::ProjectNotFound("site".into()));

        let err: StorageError = WorkspaceError::Rejected("invalid extension".into()).into();
        assert_eq!(err, StorageError::Rejected("invalid extension".into()));

        let err: StorageError = WorkspaceError::Forbidden("../x".into()).into();
        assert!(matches!(err, StorageError::AccessDenied(_)));
    }
}
