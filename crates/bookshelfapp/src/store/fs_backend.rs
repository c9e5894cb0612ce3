use super::auth::Account;
use super::backend::StorageBackend;
use crate::error::{BookshelfError, Result};
use crate::model::Document;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

const COLLECTIONS_DIR: &str = "collections";
const BLOBS_DIR: &str = "blobs";
const ACCOUNTS_FILE: &str = "accounts.json";
const SESSION_FILE: &str = "session.json";

#[derive(Serialize, Deserialize, Default)]
struct Session {
    uid: Option<String>,
}

pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_file(&self, collection: &str) -> Result<PathBuf> {
        if collection.is_empty() || !is_plain_name(collection) {
            return Err(BookshelfError::Store(format!(
                "Invalid collection name: {:?}",
                collection
            )));
        }
        Ok(self
            .root
            .join(COLLECTIONS_DIR)
            .join(format!("{}.json", collection)))
    }

    fn blob_path(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let is_safe = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_safe {
            return Err(BookshelfError::Storage(format!(
                "Invalid blob path: {:?}",
                path
            )));
        }
        Ok(self.root.join(BLOBS_DIR).join(relative))
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(BookshelfError::Io)?;
        }
        Ok(())
    }

    /// Write to a sibling tmp file, then rename over the target.
    fn write_atomic(&self, target: &Path, bytes: &[u8]) -> Result<()> {
        let dir = target
            .parent()
            .ok_or_else(|| BookshelfError::Store(format!("No parent for {:?}", target)))?;
        self.ensure_dir(dir)?;
        let tmp_file = dir.join(format!(".tmp-{}", Uuid::new_v4()));
        fs::write(&tmp_file, bytes).map_err(BookshelfError::Io)?;
        fs::rename(&tmp_file, target).map_err(BookshelfError::Io)?;
        Ok(())
    }

    fn read_json<T: DeserializeOwned + Default>(&self, path: &Path) -> Result<T> {
        if !path.exists() {
            return Ok(T::default());
        }
        let content = fs::read_to_string(path).map_err(BookshelfError::Io)?;
        serde_json::from_str(&content).map_err(BookshelfError::Serialization)
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value).map_err(BookshelfError::Serialization)?;
        self.write_atomic(path, content.as_bytes())
    }
}

fn is_plain_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl StorageBackend for FsBackend {
    fn load_collection(&self, collection: &str) -> Result<Vec<Document>> {
        let file = self.collection_file(collection)?;
        self.read_json(&file)
    }

    fn save_collection(&self, collection: &str, documents: &[Document]) -> Result<()> {
        let file = self.collection_file(collection)?;
        self.write_json(&file, documents)
    }

    fn write_blob(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let target = self.blob_path(path)?;
        self.write_atomic(&target, bytes)
    }

    fn blob_exists(&self, path: &str) -> Result<bool> {
        Ok(self.blob_path(path)?.is_file())
    }

    fn blob_url(&self, path: &str) -> Result<String> {
        let target = self.blob_path(path)?;
        if !target.is_file() {
            return Err(BookshelfError::Storage(format!("Blob not found: {}", path)));
        }
        let absolute = target.canonicalize().map_err(BookshelfError::Io)?;
        Ok(format!("file://{}", absolute.display()))
    }

    fn load_accounts(&self) -> Result<Vec<Account>> {
        self.read_json(&self.root.join(ACCOUNTS_FILE))
    }

    fn save_accounts(&self, accounts: &[Account]) -> Result<()> {
        self.write_json(&self.root.join(ACCOUNTS_FILE), accounts)
    }

    fn load_session(&self) -> Result<Option<String>> {
        let session: Session = self.read_json(&self.root.join(SESSION_FILE))?;
        Ok(session.uid)
    }

    fn save_session(&self, uid: Option<&str>) -> Result<()> {
        let session = Session {
            uid: uid.map(String::from),
        };
        self.write_json(&self.root.join(SESSION_FILE), &session)
    }
}
