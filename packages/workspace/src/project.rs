//! # Project Store
//!
//! Each project is a directory under the projects directory holding an
//! `index.html`, an optional `style.css` and any uploaded assets. Project
//! names pass through [`secure_filename`] before they touch the filesystem.

use crate::error::{WorkspaceError, WorkspaceResult};
use crate::template::{starter_index, starter_script, STARTER_STYLESHEET};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use unicode_normalization::UnicodeNormalization;

pub const INDEX_FILE: &str = "index.html";
pub const STYLESHEET_FILE: &str = "style.css";
pub const SCRIPT_FILE: &str = "script.js";

/// Reduce `name` to a single safe path segment.
///
/// Accented letters are decomposed to their ASCII base, path separators and
/// whitespace runs become `_`, every other character outside
/// `[A-Za-z0-9._-]` is dropped, and leading or trailing `.`/`_` are
/// stripped. The result may be empty.
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOptions {
    /// Write a starter `style.css` and link it
    pub css: bool,
    /// Write a starter `script.js` and reference it
    pub js: bool,
}

#[derive(Debug, Clone)]
pub struct ProjectStore {
    projects_dir: PathBuf,
}

impl ProjectStore {
    /// Open (creating if needed) the projects directory.
    pub fn open(projects_dir: impl Into<PathBuf>) -> WorkspaceResult<Self> {
        let projects_dir = projects_dir.into();
        fs::create_dir_all(&projects_dir)?;
        Ok(Self { projects_dir })
    }

    pub fn projects_dir(&self) -> &Path {
        &self.projects_dir
    }

    /// Directory a project lives in. The name is sanitized; an empty result
    /// is an error.
    pub fn project_path(&self, project: &str) -> WorkspaceResult<PathBuf> {
        let name = secure_filename(project);
        if name.is_empty() {
            return Err(WorkspaceError::InvalidName);
        }
        Ok(self.projects_dir.join(name))
    }

    pub fn exists(&self, project: &str) -> bool {
        self.project_path(project)
            .map(|path| path.is_dir())
            .unwrap_or(false)
    }

    /// Existing project directory, or `ProjectNotFound`.
    pub fn existing_path(&self, project: &str) -> WorkspaceResult<PathBuf> {
        let path = self.project_path(project)?;
        if !path.is_dir() {
            return Err(WorkspaceError::ProjectNotFound(project.to_string()));
        }
        Ok(path)
    }

    /// Project names, sorted.
    pub fn list(&self) -> WorkspaceResult<Vec<String>> {
        if !self.projects_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.projects_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Create a project with starter files. Returns the sanitized name.
    pub fn create(&self, project: &str, options: CreateOptions) -> WorkspaceResult<String> {
        let path = self.project_path(project)?;
        let name = secure_filename(project);
        if path.exists() {
            return Err(WorkspaceError::AlreadyExists(name));
        }
        fs::create_dir_all(&path)?;

        fs::write(
            path.join(INDEX_FILE),
            starter_index(&name, options.css, options.js),
        )?;
        if options.css {
            fs::write(path.join(STYLESHEET_FILE), STARTER_STYLESHEET)?;
        }
        if options.js {
            fs::write(path.join(SCRIPT_FILE), starter_script(&name))?;
        }

        info!(project = %name, css = options.css, js = options.js, "Created project");
        Ok(name)
    }

    pub fn delete(&self, project: &str) -> WorkspaceResult<()> {
        let path = self.existing_path(project)?;
        fs::remove_dir_all(&path)?;
        info!(project = %project, "Deleted project");
        Ok(())
    }

    pub fn read_markup(&self, project: &str) -> WorkspaceResult<String> {
        let path = self.existing_path(project)?.join(INDEX_FILE);
        if !path.is_file() {
            return Err(WorkspaceError::FileNotFound(INDEX_FILE.to_string()));
        }
        Ok(fs::read_to_string(path)?)
    }

    pub fn write_markup(&self, project: &str, markup: &str) -> WorkspaceResult<()> {
        let path = self.existing_path(project)?.join(INDEX_FILE);
        fs::write(&path, markup)?;
        debug!(project = %project, bytes = markup.len(), "Wrote index.html");
        Ok(())
    }

    /// Stylesheet text; a project without `style.css` yields `""`.
    pub fn read_stylesheet(&self, project: &str) -> WorkspaceResult<String> {
        let path = self.existing_path(project)?.join(STYLESHEET_FILE);
        if !path.is_file() {
            return Ok(String::new());
        }
        Ok(fs::read_to_string(path)?)
    }

    pub fn write_stylesheet(&self, project: &str, css: &str) -> WorkspaceResult<()> {
        let path = self.existing_path(project)?.join(STYLESHEET_FILE);
        fs::write(&path, css)?;
        debug!(project = %project, bytes = css.len(), "Wrote style.css");
        Ok(())
    }

    /// Resolve `file` inside a project. Absolute paths and any `..` that
    /// would climb out of the project are rejected.
    pub fn resolve_file(&self, project: &str, file: &str) -> WorkspaceResult<PathBuf> {
        let root = self.existing_path(project)?;
        let relative = contained_path(file).ok_or_else(|| {
            warn!(project = %project, file = %file, "Rejected path outside project");
            WorkspaceError::Forbidden(file.to_string())
        })?;
        let candidate = root.join(relative);
        if !candidate.is_file() {
            return Err(WorkspaceError::FileNotFound(file.to_string()));
        }
        Ok(candidate)
    }

    pub fn read_file(&self, project: &str, file: &str) -> WorkspaceResult<Vec<u8>> {
        let path = self.resolve_file(project, file)?;
        Ok(fs::read(path)?)
    }
}

/// Normalize a relative path lexically. `None` when it is absolute or
/// climbs above its root.
fn contained_path(file: &str) -> Option<PathBuf> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(file).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.iter().collect())
}
