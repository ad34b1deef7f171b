//! # Project Storage Boundary
//!
//! The editor never touches files or the network directly. Whatever holds
//! projects implements [`ProjectBackend`]; persistence is whole text in,
//! whole text out.
//!
//! [`MemoryBackend`] keeps everything in maps and can be told to fail, which
//! is what the session tests use to exercise failed saves.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A binary file handed to [`ProjectBackend::upload_asset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Asset {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

pub trait ProjectBackend {
    fn fetch_markup(&self, project: &str) -> StorageResult<String>;

    /// A project without a stylesheet yields an empty string.
    fn fetch_stylesheet(&self, project: &str) -> StorageResult<String>;

    fn persist_markup(&mut self, project: &str, markup: &str) -> StorageResult<()>;

    fn persist_stylesheet(&mut self, project: &str, css: &str) -> StorageResult<()>;

    /// Store `asset` under the `target` bucket and return its project-relative
    /// path (`category/filename`).
    fn upload_asset(&mut self, project: &str, target: &str, asset: Asset) -> StorageResult<String>;
}

#[derive(Debug, Clone, Default)]
struct MemoryProject {
    markup: String,
    stylesheet: String,
    assets: HashMap<String, Vec<u8>>,
}

/// In-memory backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    projects: HashMap<String, MemoryProject>,
    fail_writes: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project: &str, markup: &str, stylesheet: &str) -> Self {
        self.insert(project, markup, stylesheet);
        self
    }

    pub fn insert(&mut self, project: &str, markup: &str, stylesheet: &str) {
        self.projects.insert(
            project.to_string(),
            MemoryProject {
                markup: markup.to_string(),
                stylesheet: stylesheet.to_string(),
                assets: HashMap::new(),
            },
        );
    }

    /// Make every following write fail with an IO error.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn markup(&self, project: &str) -> Option<&str> {
        self.projects.get(project).map(|p| p.markup.as_str())
    }

    pub fn stylesheet(&self, project: &str) -> Option<&str> {
        self.projects.get(project).map(|p| p.stylesheet.as_str())
    }

    pub fn asset(&self, project: &str, path: &str) -> Option<&[u8]> {
        self.projects
            .get(project)
            .and_then(|p| p.assets.get(path))
            .map(Vec::as_slice)
    }

    fn writable(&mut self, project: &str) -> StorageResult<&mut MemoryProject> {
        if self.fail_writes {
            return Err(StorageError::Io("write refused".to_string()));
        }
        self.projects
            .get_mut(project)
            .ok_or_else(|| StorageError::ProjectNotFound(project.to_string()))
    }
}

impl ProjectBackend for MemoryBackend {
    fn fetch_markup(&self, project: &str) -> StorageResult<String> {
        self.markup(project)
            .map(str::to_string)
            .ok_or_else(|| StorageError::ProjectNotFound(project.to_string()))
    }

    fn fetch_stylesheet(&self, project: &str) -> StorageResult<String> {
        self.stylesheet(project)
            .map(str::to_string)
            .ok_or_else(|| StorageError::ProjectNotFound(project.to_string()))
    }

    fn persist_markup(&mut self, project: &str, markup: &str) -> StorageResult<()> {
        self.writable(project)?.markup = markup.to_string();
        debug!(project, bytes = markup.len(), "persisted markup");
        Ok(())
    }

    fn persist_stylesheet(&mut self, project: &str, css: &str) -> StorageResult<()> {
        self.writable(project)?.stylesheet = css.to_string();
        debug!(project, bytes = css.len(), "persisted stylesheet");
        Ok(())
    }

    fn upload_asset(&mut self, project: &str, target: &str, asset: Asset) -> StorageResult<String> {
        if asset.filename.is_empty() {
            return Err(StorageError::Rejected("empty filename".to_string()));
        }
        let path = format!("{}/{}", target, asset.filename);
        self.writable(project)?
            .assets
            .insert(path.clone(), asset.bytes);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_round_trip() {
        let mut backend = MemoryBackend::new().with_project("site", "<p>a</p>", "");
        assert_eq!(backend.fetch_markup("site").unwrap(), "<p>a</p>");
        backend.persist_stylesheet("site", "p {}").unwrap();
        assert_eq!(backend.fetch_stylesheet("site").unwrap(), "p {}");

        let path = backend
            .upload_asset("site", "images", Asset::new("a.png", vec![1, 2]))
            .unwrap();
        assert_eq!(path, "images/a.png");
        assert_eq!(backend.asset("site", "images/a.png"), Some(&[1u8, 2][..]));
    }

    #[test]
    fn test_failing_writes() {
        let mut backend = MemoryBackend::new().with_project("site", "x", "");
        backend.set_fail_writes(true);
        assert!(matches!(
            backend.persist_markup("site", "y"),
            Err(StorageError::Io(_))
        ));
        assert_eq!(backend.markup("site"), Some("x"));
        assert_eq!(
            backend.fetch_markup("missing"),
            Err(StorageError::ProjectNotFound("missing".into()))
        );
    }
}
