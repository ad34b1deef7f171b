pub mod edit;
pub mod format;
pub mod init;
pub mod list;
pub mod serve;
pub mod style;

pub use edit::{edit, EditArgs};
pub use format::{format, FormatArgs};
pub use init::{init, InitArgs};
pub use list::list;
pub use serve::{serve, ServeArgs};
pub use style::{style, StyleArgs};

use anyhow::Result;
use livepage_workspace::{ProjectStore, WorkspaceConfig};
use std::path::Path;
use tracing::debug;

/// Config and project store for the workspace rooted at `cwd`.
pub(crate) fn open_workspace(cwd: &str) -> Result<(WorkspaceConfig, ProjectStore)> {
    let root = Path::new(cwd);
    let config = WorkspaceConfig::load(root)?;
    let projects = config.projects_path(root);
    debug!(root = %root.display(), projects = %projects.display(), "opening workspace");
    let store = ProjectStore::open(projects)?;
    Ok((config, store))
}
