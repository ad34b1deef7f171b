//! Upload categories and extension allow-lists.

use crate::error::{WorkspaceError, WorkspaceResult};
use crate::project::secure_filename;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Category used when an upload names none.
pub const DEFAULT_CATEGORY: &str = "images";

/// Folder for a category that sanitizes to nothing.
const FALLBACK_FOLDER: &str = "uploads";

#[derive(Debug, Clone)]
pub struct UploadPolicy {
    /// Category → allowed extensions. `None` accepts any extension.
    allowed: BTreeMap<String, Option<Vec<String>>>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        let list = |exts: &[&str]| Some(exts.iter().map(|e| e.to_string()).collect());
        let mut allowed = BTreeMap::new();
        allowed.insert(
            "images".to_string(),
            list(&["png", "jpg", "jpeg", "gif", "webp", "svg"]),
        );
        allowed.insert("videos".to_string(), list(&["mp4", "webm", "ogg", "mov"]));
        allowed.insert(
            "audio".to_string(),
            list(&["mp3", "avi", "wav", "ogg", "m4a"]),
        );
        allowed.insert("files".to_string(), None);
        Self { allowed }
    }
}

impl UploadPolicy {
    /// Folder an upload for `target` lands in. Known categories map to
    /// themselves; anything else is sanitized into a folder name.
    pub fn folder_for(&self, target: &str) -> String {
        if self.allowed.contains_key(target) {
            return target.to_string();
        }
        let folder = secure_filename(target);
        if folder.is_empty() {
            FALLBACK_FOLDER.to_string()
        } else {
            folder
        }
    }

    /// Whether `extension` may be stored under `folder`. Folders without an
    /// allow-list accept anything.
    pub fn is_allowed(&self, folder: &str, extension: &str) -> bool {
        match self.allowed.get(folder) {
            Some(Some(list)) => {
                let extension = extension.to_ascii_lowercase();
                list.iter().any(|e| *e == extension)
            }
            Some(None) | None => true,
        }
    }

    /// Write `bytes` into the project and return the project-relative path
    /// (`folder/filename`).
    pub fn save(
        &self,
        project_dir: &Path,
        target: &str,
        filename: &str,
        bytes: &[u8],
    ) -> WorkspaceResult<String> {
        let filename = secure_filename(filename);
        if filename.is_empty() {
            return Err(WorkspaceError::Rejected("empty filename".to_string()));
        }

        let folder = self.folder_for(target);
        let extension = match filename.rsplit_once('.') {
            Some((_, ext)) => ext,
            None => "",
        };
        if !self.is_allowed(&folder, extension) {
            warn!(folder = %folder, filename = %filename, "Upload extension not allowed");
            return Err(WorkspaceError::Rejected("invalid extension".to_string()));
        }

        let dest_dir = project_dir.join(&folder);
        fs::create_dir_all(&dest_dir)?;
        fs::write(dest_dir.join(&filename), bytes)?;

        let relative = format!("{}/{}", folder, filename);
        info!(path = %relative, bytes = bytes.len(), "Stored upload");
        Ok(relative)
    }
}
