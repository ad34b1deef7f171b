//! Editor configuration
//!
//! Embedded in the workspace's `livepage.config.json` under `"editor"`;
//! every field has a default so a partial object is enough.

use serde::{Deserialize, Serialize};

/// Id fragment that marks synthetic highlight nodes.
pub const OVERLAY_MARKER: &str = "editor_highlight_overlay";

/// Id of the `<style>` element used to preview stylesheet edits.
pub const INJECTED_STYLE_ID: &str = "__editor_injected_style";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Maximum number of snapshots kept for undo
    pub history_limit: usize,

    /// Substring of the `id` attribute identifying overlay nodes
    pub overlay_marker: String,

    /// Re-indent markup on save
    pub pretty_print: bool,

    /// Mirror stylesheet edits into a preview `<style>` element
    pub inject_preview_style: bool,

    /// Tag used by "add element" when none is given
    pub default_new_tag: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: 60,
            overlay_marker: OVERLAY_MARKER.to_string(),
            pretty_print: true,
            inject_preview_style: true,
            default_new_tag: "div".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{ "historyLimit": 5 }"#).unwrap();
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.overlay_marker, OVERLAY_MARKER);
        assert!(config.pretty_print);
    }
}
