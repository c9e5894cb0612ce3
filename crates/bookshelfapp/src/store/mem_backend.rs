use super::auth::Account;
use super::backend::StorageBackend;
use crate::error::{BookshelfError, Result};
use crate::model::Document;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since bookshelf is single-threaded.
/// Failure switches let tests drive every error path of the flows without a
/// real network.
#[derive(Default)]
pub struct MemBackend {
    collections: RefCell<HashMap<String, Vec<Document>>>,
    blobs: RefCell<HashMap<String, Vec<u8>>>,
    accounts: RefCell<Vec<Account>>,
    session: RefCell<Option<String>>,
    simulate_read_error: Cell<bool>,
    simulate_write_error: Cell<bool>,
    write_budget: Cell<Option<usize>>,
    simulate_blob_error: Cell<bool>,
    simulate_url_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make collection loads fail (listeners receive an error event).
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    /// Make every collection save fail.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Allow exactly `budget` more collection saves, then fail the rest.
    /// `None` lifts the limit.
    pub fn set_write_budget(&self, budget: Option<usize>) {
        self.write_budget.set(budget);
    }

    /// Make blob uploads fail.
    pub fn set_simulate_blob_error(&self, simulate: bool) {
        self.simulate_blob_error.set(simulate);
    }

    /// Make download URL resolution fail.
    pub fn set_simulate_url_error(&self, simulate: bool) {
        self.simulate_url_error.set(simulate);
    }

    /// Test helper: raw bytes of a stored blob.
    pub fn blob(&self, path: &str) -> Option<Vec<u8>> {
        self.blobs.borrow().get(path).cloned()
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.borrow().len()
    }

    fn check_write(&self) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(BookshelfError::Store("Simulated write error".to_string()));
        }
        match self.write_budget.get() {
            Some(0) => Err(BookshelfError::Store("Simulated write error".to_string())),
            Some(n) => {
                self.write_budget.set(Some(n - 1));
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl StorageBackend for MemBackend {
    fn load_collection(&self, collection: &str) -> Result<Vec<Document>> {
        if self.simulate_read_error.get() {
            return Err(BookshelfError::Store("Simulated read error".to_string()));
        }
        let collections = self.collections.borrow();
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    fn save_collection(&self, collection: &str, documents: &[Document]) -> Result<()> {
        self.check_write()?;
        let mut collections = self.collections.borrow_mut();
        collections.insert(collection.to_string(), documents.to_vec());
        Ok(())
    }

    fn write_blob(&self, path: &str, bytes: &[u8]) -> Result<()> {
        if self.simulate_blob_error.get() {
            return Err(BookshelfError::Storage("Simulated upload error".to_string()));
        }
        self.blobs
            .borrow_mut()
            .insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    fn blob_exists(&self, path: &str) -> Result<bool> {
        Ok(self.blobs.borrow().contains_key(path))
    }

    fn blob_url(&self, path: &str) -> Result<String> {
        if self.simulate_url_error.get() {
            return Err(BookshelfError::Storage(
                "Simulated download url error".to_string(),
            ));
        }
        Ok(format!("memory://{}", path))
    }

    fn load_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.borrow().clone())
    }

    fn save_accounts(&self, accounts: &[Account]) -> Result<()> {
        *self.accounts.borrow_mut() = accounts.to_vec();
        Ok(())
    }

    fn load_session(&self) -> Result<Option<String>> {
        Ok(self.session.borrow().clone())
    }

    fn save_session(&self, uid: Option<&str>) -> Result<()> {
        *self.session.borrow_mut() = uid.map(String::from);
        Ok(())
    }
}
