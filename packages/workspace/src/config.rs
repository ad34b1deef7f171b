use crate::error::WorkspaceResult;
use livepage_editor::EditorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "livepage.config.json";

/// Livepage configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceConfig {
    /// Directory holding one folder per project
    pub projects_dir: String,

    /// Directory searched for the inspector metadata files and served at `/`
    pub static_dir: String,

    pub host: String,
    pub port: u16,

    pub editor: EditorConfig,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            projects_dir: "projects".to_string(),
            static_dir: ".".to_string(),
            host: "127.0.0.1".to_string(),
            port: 5000,
            editor: EditorConfig::default(),
        }
    }
}

impl WorkspaceConfig {
    /// Load the config from a directory; defaults when the file is absent.
    pub fn load(root: &Path) -> WorkspaceResult<Self> {
        let config_path = root.join(DEFAULT_CONFIG_NAME);
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn projects_path(&self, root: &Path) -> PathBuf {
        root.join(&self.projects_dir)
    }

    pub fn static_path(&self, root: &Path) -> PathBuf {
        root.join(&self.static_dir)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "projectsDir": "sites",
            "port": 8080,
            "editor": { "historyLimit": 10, "prettyPrint": false }
        }"#;
        let config: WorkspaceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.projects_dir, "sites");
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.editor.history_limit, 10);
        assert!(!config.editor.pretty_print);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = WorkspaceConfig::load(dir.path()).unwrap();
        assert_eq!(config, WorkspaceConfig::default());
        assert_eq!(config.projects_path(dir.path()), dir.path().join("projects"));
        assert_eq!(config.address(), "127.0.0.1:5000");
    }
}
