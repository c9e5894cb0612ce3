//! # Storage Layer
//!
//! This module defines the contract bookshelf expects from its backend: a
//! document collection, a blob store, and an auth provider. The application
//! only ever talks to these traits, never to a concrete backend.
//!
//! ## The Contract
//!
//! - [`DocumentStore`]: add a document, equality query, delete by id, and a
//!   **standing** listener ([`DocumentStore::listen`]) that is called with a
//!   fresh [`Snapshot`] every time the query result may have changed.
//! - [`BlobStore`]: write-once blobs addressed by path, plus resolution of a
//!   download URL right after upload.
//! - [`auth::AuthProvider`]: email/password accounts and the current user's
//!   display name.
//!
//! ## Listeners
//!
//! `listen` delivers the current snapshot immediately, then again after every
//! committed write to the collection. Delivery is synchronous and serialized:
//! a write issued from inside a listener callback is not dispatched until the
//! current round finishes, so callbacks never re-enter each other.
//!
//! A listener stays alive until its [`ListenerRegistration`] is removed or
//! dropped. After that the callback is never invoked again.
//!
//! ## Implementations
//!
//! - [`cloud_store::CloudStore`]: contract logic (queries, ordering, server
//!   timestamps, listener fan-out) over a raw [`backend::StorageBackend`].
//! - [`memory::InMemoryStore`]: `CloudStore<MemBackend>`, for tests.
//! - [`fs::FileStore`]: `CloudStore<FsBackend>`, used by the CLI.
//!
//! ## Storage Layout (fs backend)
//!
//! ```text
//! <data dir>/
//! ├── collections/
//! │   └── BookInformations.json   # documents, insertion order
//! ├── blobs/
//! │   └── photos/{uuid}.jpg       # uploaded photos
//! ├── accounts.json               # LocalAuth accounts
//! └── session.json                # signed-in user
//! ```

use crate::error::{BookshelfError, Result};
use crate::model::{Document, DocumentData, DocumentId};
use std::cell::RefCell;
use std::rc::Weak;

pub mod auth;
pub mod backend;
pub mod cloud_store;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A query over one collection: optional equality filter, optional ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub collection: String,
    pub filter: Option<(String, String)>,
    pub order_by: Option<(String, Direction)>,
}

impl Query {
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            filter: None,
            order_by: None,
        }
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter = Some((field.into(), value.into()));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }
}

/// Point-in-time result set of a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub documents: Vec<Document>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }
}

pub type SnapshotListener = Box<dyn FnMut(std::result::Result<&Snapshot, &BookshelfError>)>;

/// Abstract interface for the remote document collection.
pub trait DocumentStore {
    /// Add a new document. `ServerTimestamp` values are resolved by the store.
    fn add(&self, collection: &str, data: DocumentData) -> Result<DocumentId>;

    /// One-shot query.
    fn get(&self, query: &Query) -> Result<Vec<Document>>;

    /// Delete one document by id.
    fn delete(&self, collection: &str, id: &DocumentId) -> Result<()>;

    /// Register a standing listener on `query`.
    fn listen(&self, query: Query, listener: SnapshotListener) -> Result<ListenerRegistration>;
}

/// Abstract interface for blob storage.
pub trait BlobStore {
    fn put(&self, path: &str, bytes: &[u8]) -> Result<()>;

    /// Durable URL for a previously written blob.
    fn download_url(&self, path: &str) -> Result<String>;
}

pub(crate) type ListenerId = u64;

/// Something a registration can detach itself from.
pub(crate) trait ListenerHost {
    fn remove_listener(&mut self, id: ListenerId);
}

/// Handle to a standing listener. Dropping it removes the listener.
pub struct ListenerRegistration {
    id: ListenerId,
    host: Option<Weak<RefCell<dyn ListenerHost>>>,
}

impl ListenerRegistration {
    pub(crate) fn new(id: ListenerId, host: Weak<RefCell<dyn ListenerHost>>) -> Self {
        Self {
            id,
            host: Some(host),
        }
    }

    pub fn remove(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let Some(host) = self.host.take().and_then(|weak| weak.upgrade()) {
            host.borrow_mut().remove_listener(self.id);
        }
    }
}

impl Drop for ListenerRegistration {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistration")
            .field("id", &self.id)
            .field("attached", &self.host.is_some())
            .finish()
    }
}
