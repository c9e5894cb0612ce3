//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the listing
//! flow. It is the single entry point for every bookshelf operation, whatever
//! the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Resolves the current user** and passes their display name down as the
//!   owner (create) or the viewer (open)
//! - **Runs caller-side checks**: empty draft fields, empty credentials
//! - **Dispatches** to the appropriate command function
//! - **Returns structured types** (`Result<CmdResult>`, [`TapOutcome`])
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **I/O operations**: no stdout, stderr, or file formatting
//! - **Access control**: ownership is checked on tap only, and only as a UX
//!   guard. Deletes go straight to the store.
//!
//! ## Generic Over the Store
//!
//! `BookshelfApi<S, A>` is generic over the document/blob store and the auth
//! provider:
//! - Production: `BookshelfApi<FileStore, FileAuth>`
//! - Testing: `BookshelfApi<InMemoryStore, InMemoryAuth>`

use crate::commands::{self, open::TapOutcome, CmdResult, MessageSink};
use crate::config::BookshelfConfig;
use crate::error::{BookshelfError, Result};
use crate::listing::ListingFlow;
use crate::model::{BookDraft, DocumentId, Record};
use crate::store::auth::{AuthProvider, User};
use crate::store::{BlobStore, DocumentStore};
use std::rc::Rc;

pub struct BookshelfApi<S, A>
where
    S: DocumentStore + BlobStore,
    A: AuthProvider,
{
    store: S,
    auth: A,
    config: BookshelfConfig,
}

impl<S, A> BookshelfApi<S, A>
where
    S: DocumentStore + BlobStore,
    A: AuthProvider,
{
    pub fn new(store: S, auth: A, config: BookshelfConfig) -> Self {
        Self {
            store,
            auth,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    pub fn config(&self) -> &BookshelfConfig {
        &self.config
    }

    pub fn current_user(&self) -> Result<Option<User>> {
        self.auth.current_user()
    }

    /// Display name of the signed-in user, which doubles as the owner key.
    fn current_owner(&self) -> Result<String> {
        let user = self.auth.current_user()?.ok_or(BookshelfError::NotSignedIn)?;
        user.display_name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| BookshelfError::Api("Signed-in user has no username".to_string()))
    }

    pub fn create_book(&self, draft: BookDraft) -> Result<CmdResult> {
        if let Some(field) = draft.missing_field() {
            return Err(BookshelfError::Api(format!(
                "Book {} cannot be empty!",
                field
            )));
        }
        let owner = self.current_owner()?;
        commands::create::run(&self.store, &self.store, &self.config, &owner, draft)
    }

    /// Delete every book titled exactly `title`, whoever wrote it.
    pub fn delete_books_by_title(&self, title: &str) -> Result<CmdResult> {
        if title.trim().is_empty() {
            return Err(BookshelfError::Api("Title cannot be empty!".to_string()));
        }
        commands::delete::by_title(&self.store, &self.config, title)
    }

    pub fn delete_book_by_id(&self, id: &DocumentId) -> Result<CmdResult> {
        commands::delete::by_id(&self.store, &self.config, id)
    }

    /// Tap authorization for `record` against the signed-in user.
    pub fn open_book(&self, record: &Record) -> Result<TapOutcome> {
        let user = self.auth.current_user()?;
        let name = user.as_ref().and_then(|u| u.display_name.as_deref());
        Ok(commands::open::run(record, name))
    }

    pub fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<CmdResult> {
        commands::account::sign_up(&self.auth, email, password, display_name)
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<CmdResult> {
        commands::account::sign_in(&self.auth, email, password)
    }

    pub fn sign_out(&self) -> Result<CmdResult> {
        commands::account::sign_out(&self.auth)
    }

    /// A listing flow for the configured collection. Call
    /// [`ListingFlow::start`] with [`BookshelfApi::store`] to begin.
    pub fn listing(&self, sink: Rc<dyn MessageSink>) -> ListingFlow {
        ListingFlow::new(&self.config, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLog;
    use crate::store::memory::{InMemoryAuth, InMemoryStore};

    fn make_api() -> BookshelfApi<InMemoryStore, InMemoryAuth> {
        BookshelfApi::new(
            InMemoryStore::new(),
            InMemoryAuth::new(),
            BookshelfConfig::default(),
        )
    }

    fn signed_in(name: &str) -> BookshelfApi<InMemoryStore, InMemoryAuth> {
        let api = make_api();
        api.sign_up(&format!("{}@example.com", name.to_lowercase()), "secret1", name)
            .unwrap();
        api
    }

    #[test]
    fn create_requires_sign_in() {
        let api = make_api();
        let result = api.create_book(BookDraft::new("Dune", "Herbert", "..."));
        assert!(matches!(result, Err(BookshelfError::NotSignedIn)));
    }

    #[test]
    fn create_rejects_empty_fields_before_touching_store() {
        let api = signed_in("Alice");
        match api.create_book(BookDraft::new("Dune", "", "...")) {
            Err(BookshelfError::Api(msg)) => assert_eq!(msg, "Book author cannot be empty!"),
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn create_stamps_display_name_as_owner() {
        let api = signed_in("Alice");
        let result = api
            .create_book(BookDraft::new("Dune", "Herbert", "..."))
            .unwrap();
        assert_eq!(result.affected_books[0].owner.as_deref(), Some("Alice"));
    }

    #[test]
    fn open_uses_current_user() {
        let api = signed_in("Alice");
        let created = api
            .create_book(BookDraft::new("Dune", "Herbert", "..."))
            .unwrap();
        let record = &created.affected_books[0];
        assert!(api.open_book(record).unwrap().is_proceed());

        api.sign_out().unwrap();
        assert!(!api.open_book(record).unwrap().is_proceed());
    }

    #[test]
    fn delete_by_title_rejects_blank() {
        let api = make_api();
        assert!(matches!(
            api.delete_books_by_title("  "),
            Err(BookshelfError::Api(_))
        ));
    }

    #[test]
    fn listing_follows_creates_and_deletes() {
        let api = signed_in("Alice");
        let mut flow = api.listing(Rc::new(MessageLog::new()));
        flow.start(api.store()).unwrap();
        let books = flow.books();

        api.create_book(BookDraft::new("A", "x", "y")).unwrap();
        api.create_book(BookDraft::new("B", "x", "y")).unwrap();
        let titles: Vec<_> = books.snapshot().iter().filter_map(|r| r.title.clone()).collect();
        assert_eq!(titles, vec!["B", "A"]);

        api.delete_books_by_title("B").unwrap();
        assert_eq!(books.snapshot().len(), 1);
    }
}
