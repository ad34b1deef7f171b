//! # Livepage Workspace
//!
//! Everything that touches disk or the network on behalf of the editor:
//! the project directory layout, uploads, inspector metadata, the
//! [`FsBackend`] storage implementation and the HTTP API.

pub mod backend;
pub mod config;
pub mod error;
pub mod project;
pub mod schema_loader;
pub mod server;
mod template;
pub mod uploads;

pub use backend::FsBackend;
pub use config::{WorkspaceConfig, DEFAULT_CONFIG_NAME};
pub use error::{WorkspaceError, WorkspaceResult};
pub use project::{
    secure_filename, CreateOptions, ProjectStore, INDEX_FILE, SCRIPT_FILE, STYLESHEET_FILE,
};
pub use schema_loader::{MetadataLoader, CSS_SCHEMA_FILE, TAGS_FILE};
pub use server::{router, ApiResponse, AppState};
pub use uploads::UploadPolicy;
