use super::auth::LocalAuth;
use super::cloud_store::CloudStore;
use super::fs_backend::FsBackend;
use std::path::PathBuf;

/// Document and blob store persisted under a data directory.
pub type FileStore = CloudStore<FsBackend>;

/// Accounts and session persisted under a data directory.
pub type FileAuth = LocalAuth<FsBackend>;

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        CloudStore::with_backend(FsBackend::new(root))
    }
}

impl FileAuth {
    pub fn new(root: PathBuf) -> Self {
        LocalAuth::with_backend(FsBackend::new(root))
    }
}
