//! Filesystem implementation of the editor's storage boundary.

use crate::project::ProjectStore;
use crate::uploads::UploadPolicy;
use livepage_editor::{Asset, ProjectBackend, StorageResult};

#[derive(Debug, Clone)]
pub struct FsBackend {
    store: ProjectStore,
    uploads: UploadPolicy,
}

impl FsBackend {
    pub fn new(store: ProjectStore) -> Self {
        Self {
            store,
            uploads: UploadPolicy::default(),
        }
    }

    pub fn with_uploads(mut self, uploads: UploadPolicy) -> Self {
        self.uploads = uploads;
        self
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }
}

impl ProjectBackend for FsBackend {
    fn fetch_markup(&self, project: &str) -> StorageResult<String> {
        Ok(self.store.read_markup(project)?)
    }

    fn fetch_stylesheet(&self, project: &str) -> StorageResult<String> {
        Ok(self.store.read_stylesheet(project)?)
    }

    fn persist_markup(&mut self, project: &str, markup: &str) -> StorageResult<()> {
        Ok(self.store.write_markup(project, markup)?)
    }

    fn persist_stylesheet(&mut self, project: &str, css: &str) -> StorageResult<()> {
        Ok(self.store.write_stylesheet(project, css)?)
    }

    fn upload_asset(&mut self, project: &str, target: &str, asset: Asset) -> StorageResult<String> {
        let dir = self.store.existing_path(project)?;
        Ok(self.uploads.save(&dir, target, &asset.filename, &asset.bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::CreateOptions;
    use livepage_editor::StorageError;
    use tempfile::TempDir;

    fn backend() -> (TempDir, FsBackend) {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();
        store.create("site", CreateOptions::default()).unwrap();
        (dir, FsBackend::new(store))
    }

    #[test]
    fn test_backend_reads_and_writes_project_files() {
        let (_dir, mut backend) = backend();
        assert!(backend.fetch_markup("site").unwrap().contains("Website Name"));
        assert_eq!(backend.fetch_stylesheet("site").unwrap(), "");

        backend.persist_stylesheet("site", "a{color:red}").unwrap();
        assert_eq!(backend.fetch_stylesheet("site").unwrap(), "a{color:red}");
    }

    #[test]
    fn test_backend_errors_map_to_storage_errors() {
        let (_dir, mut backend) = backend();
        assert_eq!(
            backend.fetch_markup("nope"),
            Err(StorageError::ProjectNotFound("nope".into()))
        );
        let err = backend
            .upload_asset("site", "images", Asset::new("x.exe", vec![1]))
            .unwrap_err();
        assert_eq!(err, StorageError::Rejected("invalid extension".into()));
        assert_eq!(
            backend
                .upload_asset("site", "files", Asset::new("x.exe", vec![1]))
                .unwrap(),
            "files/x.exe"
        );
    }
}
