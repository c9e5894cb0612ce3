//! # Listing Flow
//!
//! Keeps the displayed book list in step with the store.
//!
//! [`ListingFlow::start`] registers one standing listener on the book
//! collection, ordered by `date` descending. Each event is handled as:
//!
//! - **Error**: an error message goes to the [`MessageSink`]. The list is left
//!   as it was and nothing is retried.
//! - **Non-empty snapshot**: every document is decoded into a [`Record`], in
//!   snapshot order, and the whole list is replaced.
//! - **Empty snapshot**: governed by [`EmptySnapshotPolicy`]. `Clear` shows an
//!   empty list; `Ignore` keeps the previous contents.
//!
//! The flow owns the [`ObservableList`]. Everyone else (the adapter, the CLI)
//! gets a [`ListReader`] from [`ListingFlow::books`].
//!
//! Stopping (or dropping the flow) removes the listener, after which no
//! callback touches the list again.

use crate::commands::{CmdMessage, MessageSink};
use crate::config::{BookshelfConfig, EmptySnapshotPolicy};
use crate::error::{BookshelfError, Result};
use crate::model::{fields, Record};
use crate::observable::{ListReader, ObservableList};
use crate::store::{Direction, DocumentStore, ListenerRegistration, Query, Snapshot};
use std::rc::Rc;

struct ListingState {
    books: ObservableList<Record>,
    sink: Rc<dyn MessageSink>,
    policy: EmptySnapshotPolicy,
}

impl ListingState {
    fn apply(&self, event: std::result::Result<&Snapshot, &BookshelfError>) {
        match event {
            Err(e) => {
                tracing::warn!(error = %e, "listing update failed");
                self.sink.push(CmdMessage::error(e.to_string()));
            }
            Ok(snapshot) if snapshot.is_empty() => match self.policy {
                EmptySnapshotPolicy::Clear => self.books.replace(Vec::new()),
                EmptySnapshotPolicy::Ignore => {
                    tracing::debug!("empty snapshot ignored");
                }
            },
            Ok(snapshot) => {
                let records = snapshot
                    .documents
                    .iter()
                    .map(Record::from_document)
                    .collect();
                self.books.replace(records);
            }
        }
    }
}

pub struct ListingFlow {
    query: Query,
    state: Rc<ListingState>,
    registration: Option<ListenerRegistration>,
}

impl ListingFlow {
    pub fn new(config: &BookshelfConfig, sink: Rc<dyn MessageSink>) -> Self {
        Self {
            query: Query::collection(&config.collection)
                .order_by(fields::DATE, Direction::Descending),
            state: Rc::new(ListingState {
                books: ObservableList::new(),
                sink,
                policy: config.empty_snapshot,
            }),
            registration: None,
        }
    }

    /// Read-only handle to the displayed list.
    pub fn books(&self) -> ListReader<Record> {
        self.state.books.reader()
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Start listening. Calling it again while listening is a no-op.
    pub fn start<S: DocumentStore>(&mut self, store: &S) -> Result<()> {
        if self.registration.is_some() {
            return Ok(());
        }
        let state = self.state.clone();
        let registration = store.listen(
            self.query.clone(),
            Box::new(move |event: std::result::Result<&Snapshot, &BookshelfError>| {
                state.apply(event)
            }),
        )?;
        tracing::debug!(collection = %self.query.collection, "listing started");
        self.registration = Some(registration);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(registration) = self.registration.take() {
            registration.remove();
            tracing::debug!(collection = %self.query.collection, "listing stopped");
        }
    }

    pub fn is_listening(&self) -> bool {
        self.registration.is_some()
    }
}

impl Drop for ListingFlow {
    fn drop(&mut self) {
        self.stop();
    }
}
