use super::auth::LocalAuth;
use super::cloud_store::CloudStore;
use super::mem_backend::MemBackend;

pub type InMemoryStore = CloudStore<MemBackend>;

pub type InMemoryAuth = LocalAuth<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        CloudStore::with_backend(MemBackend::new())
    }
}

impl Default for InMemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAuth {
    pub fn new() -> Self {
        LocalAuth::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{fields, DocumentData, DocumentId, FieldValue};
    use crate::store::DocumentStore;
    use chrono::DateTime;

    pub const COLLECTION: &str = "BookInformations";

    pub fn book_data(owner: &str, title: &str, date_secs: i64) -> DocumentData {
        let mut data = DocumentData::new();
        data.insert(fields::OWNER.to_string(), owner.into());
        data.insert(fields::TITLE.to_string(), title.into());
        data.insert(fields::AUTHOR.to_string(), format!("Author of {}", title).into());
        data.insert(fields::CONTENT.to_string(), format!("About {}", title).into());
        data.insert(
            fields::DATE.to_string(),
            FieldValue::Timestamp(DateTime::from_timestamp(date_secs, 0).unwrap_or_default()),
        );
        data
    }

    pub struct StoreFixture {
        pub store: InMemoryStore,
        pub ids: Vec<DocumentId>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                ids: Vec::new(),
            }
        }

        /// Add a book with an explicit `date` (seconds since epoch).
        pub fn with_book(mut self, owner: &str, title: &str, date_secs: i64) -> Self {
            let id = self
                .store
                .add(COLLECTION, book_data(owner, title, date_secs))
                .unwrap();
            self.ids.push(id);
            self
        }

        pub fn with_books(mut self, count: usize, owner: &str) -> Self {
            for i in 0..count {
                let title = format!("Test Book {}", i + 1);
                self = self.with_book(owner, &title, i as i64 + 1);
            }
            self
        }

        /// Add a document carrying arbitrary raw fields.
        pub fn with_raw(mut self, data: DocumentData) -> Self {
            let id = self.store.add(COLLECTION, data).unwrap();
            self.ids.push(id);
            self
        }
    }
}
