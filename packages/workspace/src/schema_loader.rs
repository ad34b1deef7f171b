//! Locate and load the inspector metadata files.
//!
//! Both files are optional. Each is searched for in a short list of
//! candidate locations under the static directory; the first one that
//! exists wins, even if it then fails to parse.

use crate::error::WorkspaceResult;
use livepage_editor::{CssSchema, TagAttributes};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const TAGS_FILE: &str = "html_tags_attributes.json";
pub const CSS_SCHEMA_FILE: &str = "css-schema-full.json";

#[derive(Debug, Clone)]
pub struct MetadataLoader {
    base_dir: PathBuf,
}

impl MetadataLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// `<base>/name`, `<base>/static/name`, `<base>/static/data/name`.
    pub fn candidates(&self, name: &str) -> Vec<PathBuf> {
        vec![
            self.base_dir.join(name),
            self.base_dir.join("static").join(name),
            self.base_dir.join("static").join("data").join(name),
        ]
    }

    pub fn find(&self, name: &str) -> Option<PathBuf> {
        let found = self.candidates(name).into_iter().find(|p| p.is_file());
        if found.is_none() {
            debug!(file = %name, base = ?self.base_dir, "No metadata file found");
        }
        found
    }

    /// Raw JSON of the first candidate found, with the path it came from.
    pub fn load_raw(&self, name: &str) -> WorkspaceResult<Option<(serde_json::Value, PathBuf)>> {
        match self.find(name) {
            Some(path) => {
                let value = read_json(&path)?;
                info!(path = ?path, "Loaded metadata");
                Ok(Some((value, path)))
            }
            None => Ok(None),
        }
    }

    pub fn tags(&self) -> WorkspaceResult<Option<TagAttributes>> {
        self.load_typed(TAGS_FILE)
    }

    pub fn css_schema(&self) -> WorkspaceResult<Option<CssSchema>> {
        self.load_typed(CSS_SCHEMA_FILE)
    }

    fn load_typed<T: DeserializeOwned>(&self, name: &str) -> WorkspaceResult<Option<T>> {
        match self.find(name) {
            Some(path) => Ok(Some(read_json(&path)?)),
            None => Ok(None),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> WorkspaceResult<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkspaceError;
    use tempfile::TempDir;

    #[test]
    fn test_candidates_are_searched_in_order() {
        let dir = TempDir::new().unwrap();
        let loader = MetadataLoader::new(dir.path());
        assert!(loader.tags().unwrap().is_none());

        fs::create_dir_all(dir.path().join("static/data")).unwrap();
        fs::write(
            dir.path().join("static/data").join(TAGS_FILE),
            r#"{"img": ["src", "alt"]}"#,
        )
        .unwrap();
        let tags = loader.tags().unwrap().unwrap();
        assert_eq!(tags.attributes_for("img"), vec!["class", "id", "src", "alt"]);

        fs::write(dir.path().join(TAGS_FILE), r#"{"a": ["href"]}"#).unwrap();
        let (raw, path) = loader.load_raw(TAGS_FILE).unwrap().unwrap();
        assert_eq!(path, dir.path().join(TAGS_FILE));
        assert!(raw.get("a").is_some());
    }

    #[test]
    fn test_css_schema_loads() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("static")).unwrap();
        fs::write(
            dir.path().join("static").join(CSS_SCHEMA_FILE),
            r#"{"properties": {"color": {"ui": "color"}, "opacity": {"type": "number"}}}"#,
        )
        .unwrap();
        let schema = MetadataLoader::new(dir.path()).css_schema().unwrap().unwrap();
        assert_eq!(schema.get("color").unwrap().ui.as_deref(), Some("color"));
        assert_eq!(schema.ordered(""), vec!["color", "opacity"]);
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(TAGS_FILE), "{ not json").unwrap();
        assert!(matches!(
            MetadataLoader::new(dir.path()).tags(),
            Err(WorkspaceError::Json(_))
        ));
    }
}
