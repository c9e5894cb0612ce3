use crate::error::Result;
use crate::model::Document;
use crate::store::auth::Account;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while CloudStore and LocalAuth handle the "what" (queries, listeners, accounts).
pub trait StorageBackend {
    // --- Collection Operations ---

    /// Load every document of a collection, in insertion order.
    /// A collection that was never written is empty, not an error.
    fn load_collection(&self, collection: &str) -> Result<Vec<Document>>;

    /// Replace the stored contents of a collection.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save_collection(&self, collection: &str, documents: &[Document]) -> Result<()>;

    // --- Blob Operations ---

    /// Write a blob. Paths are `/`-separated and relative (e.g. `photos/x.jpg`).
    fn write_blob(&self, path: &str, bytes: &[u8]) -> Result<()>;

    fn blob_exists(&self, path: &str) -> Result<bool>;

    /// Locator for an existing blob.
    /// For FsBackend this is a `file://` URL, for MemBackend a virtual `memory://` one.
    fn blob_url(&self, path: &str) -> Result<String>;

    // --- Account Operations ---

    fn load_accounts(&self) -> Result<Vec<Account>>;

    fn save_accounts(&self, accounts: &[Account]) -> Result<()>;

    /// Uid of the signed-in account, if any.
    fn load_session(&self) -> Result<Option<String>>;

    fn save_session(&self, uid: Option<&str>) -> Result<()>;
}
