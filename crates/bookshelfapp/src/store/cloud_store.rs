use super::backend::StorageBackend;
use super::{
    BlobStore, Direction, DocumentStore, ListenerHost, ListenerId, ListenerRegistration, Query,
    Snapshot, SnapshotListener,
};
use crate::error::{BookshelfError, Result};
use crate::model::{Document, DocumentData, DocumentId, FieldValue};
use chrono::{DateTime, Duration, Utc};
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::rc::Rc;

struct Registered {
    id: ListenerId,
    query: Query,
    // None while the callback is running
    callback: Option<SnapshotListener>,
}

enum Pending {
    Collection(String),
    Listener(ListenerId),
}

#[derive(Default)]
struct ListenerHub {
    next_id: ListenerId,
    listeners: Vec<Registered>,
    queue: VecDeque<Pending>,
    dispatching: bool,
}

impl ListenerHub {
    fn targets(&self, pending: &Pending) -> Vec<(ListenerId, Query)> {
        self.listeners
            .iter()
            .filter(|l| match pending {
                Pending::Collection(name) => &l.query.collection == name,
                Pending::Listener(id) => l.id == *id,
            })
            .map(|l| (l.id, l.query.clone()))
            .collect()
    }

    fn take_callback(&mut self, id: ListenerId) -> Option<SnapshotListener> {
        self.listeners
            .iter_mut()
            .find(|l| l.id == id)
            .and_then(|l| l.callback.take())
    }

    fn restore_callback(&mut self, id: ListenerId, callback: SnapshotListener) {
        // Removed mid-callback: drop it.
        if let Some(entry) = self.listeners.iter_mut().find(|l| l.id == id) {
            entry.callback = Some(callback);
        }
    }
}

impl ListenerHost for ListenerHub {
    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|l| l.id != id);
    }
}

/// Document and blob store over a raw [`StorageBackend`].
///
/// Owns everything the hosted backend would do server-side: resolving
/// server timestamps, evaluating queries, and fanning out snapshots to
/// standing listeners.
pub struct CloudStore<B: StorageBackend> {
    /// The underlying storage backend.
    backend: B,
    hub: Rc<RefCell<ListenerHub>>,
    last_stamp: Cell<Option<DateTime<Utc>>>,
}

impl<B: StorageBackend> CloudStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            hub: Rc::new(RefCell::new(ListenerHub::default())),
            last_stamp: Cell::new(None),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of standing listeners currently registered.
    pub fn listener_count(&self) -> usize {
        self.hub.borrow().listeners.len()
    }

    /// Server clock. Strictly increasing so that two writes never tie on `date`.
    fn server_now(&self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = self.last_stamp.get() {
            if now <= last {
                now = last + Duration::microseconds(1);
            }
        }
        self.last_stamp.set(Some(now));
        now
    }

    fn run_query(&self, query: &Query) -> Result<Vec<Document>> {
        let mut documents = self.backend.load_collection(&query.collection)?;

        if let Some((field, value)) = &query.filter {
            documents.retain(|doc| {
                doc.get(field).and_then(FieldValue::as_str) == Some(value.as_str())
            });
        }

        if let Some((field, direction)) = &query.order_by {
            // Ordered queries only match documents that carry the ordering field.
            documents.retain(|doc| doc.data.contains_key(field));
            documents.sort_by(|a, b| {
                let ord = compare_values(a.get(field), b.get(field)).then_with(|| a.id.cmp(&b.id));
                match direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }

        Ok(documents)
    }

    /// Deliver snapshots for `pending`, then anything queued meanwhile.
    /// Re-entrant calls (from inside a callback) only enqueue.
    fn dispatch(&self, pending: Pending) {
        {
            let mut hub = self.hub.borrow_mut();
            hub.queue.push_back(pending);
            if hub.dispatching {
                return;
            }
            hub.dispatching = true;
        }

        loop {
            let next = self.hub.borrow_mut().queue.pop_front();
            let Some(pending) = next else { break };
            let targets = self.hub.borrow().targets(&pending);

            for (id, query) in targets {
                let callback = self.hub.borrow_mut().take_callback(id);
                let Some(mut callback) = callback else {
                    continue;
                };

                let event = self.run_query(&query).map(|documents| Snapshot { documents });
                match &event {
                    Ok(snapshot) => tracing::debug!(
                        listener = id,
                        collection = %query.collection,
                        documents = snapshot.len(),
                        "delivering snapshot"
                    ),
                    Err(e) => tracing::warn!(
                        listener = id,
                        collection = %query.collection,
                        error = %e,
                        "delivering listener error"
                    ),
                }
                callback(event.as_ref());

                self.hub.borrow_mut().restore_callback(id, callback);
            }
        }

        self.hub.borrow_mut().dispatching = false;
    }
}

fn type_rank(value: &FieldValue) -> u8 {
    match value {
        FieldValue::Null => 0,
        FieldValue::Bool(_) => 1,
        FieldValue::Integer(_) => 2,
        FieldValue::Timestamp(_) => 3,
        FieldValue::String(_) => 4,
        FieldValue::ServerTimestamp => 5,
    }
}

fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a, b) {
            (FieldValue::Bool(x), FieldValue::Bool(y)) => x.cmp(y),
            (FieldValue::Integer(x), FieldValue::Integer(y)) => x.cmp(y),
            (FieldValue::Timestamp(x), FieldValue::Timestamp(y)) => x.cmp(y),
            (FieldValue::String(x), FieldValue::String(y)) => x.cmp(y),
            _ => type_rank(a).cmp(&type_rank(b)),
        },
    }
}

impl<B: StorageBackend> DocumentStore for CloudStore<B> {
    fn add(&self, collection: &str, mut data: DocumentData) -> Result<DocumentId> {
        if collection.is_empty() {
            return Err(BookshelfError::Store(
                "Collection name cannot be empty".to_string(),
            ));
        }

        for value in data.values_mut() {
            if *value == FieldValue::ServerTimestamp {
                *value = FieldValue::Timestamp(self.server_now());
            }
        }

        let id = DocumentId::generate();
        let mut documents = self.backend.load_collection(collection)?;
        documents.push(Document {
            id: id.clone(),
            data,
        });
        self.backend.save_collection(collection, &documents)?;
        tracing::debug!(collection, id = %id, "document added");

        self.dispatch(Pending::Collection(collection.to_string()));
        Ok(id)
    }

    fn get(&self, query: &Query) -> Result<Vec<Document>> {
        self.run_query(query)
    }

    fn delete(&self, collection: &str, id: &DocumentId) -> Result<()> {
        let mut documents = self.backend.load_collection(collection)?;
        let position = documents
            .iter()
            .position(|doc| &doc.id == id)
            .ok_or_else(|| BookshelfError::NotFound(id.clone()))?;
        documents.remove(position);
        self.backend.save_collection(collection, &documents)?;
        tracing::debug!(collection, id = %id, "document deleted");

        self.dispatch(Pending::Collection(collection.to_string()));
        Ok(())
    }

    fn listen(&self, query: Query, listener: SnapshotListener) -> Result<ListenerRegistration> {
        let id = {
            let mut hub = self.hub.borrow_mut();
            let id = hub.next_id;
            hub.next_id += 1;
            hub.listeners.push(Registered {
                id,
                query,
                callback: Some(listener),
            });
            id
        };

        let host: Rc<RefCell<dyn ListenerHost>> = self.hub.clone();
        let registration = ListenerRegistration::new(id, Rc::downgrade(&host));

        self.dispatch(Pending::Listener(id));
        Ok(registration)
    }
}

impl<B: StorageBackend> BlobStore for CloudStore<B> {
    fn put(&self, path: &str, bytes: &[u8]) -> Result<()> {
        if self.backend.blob_exists(path)? {
            return Err(BookshelfError::Storage(format!(
                "Blob already exists: {}",
                path
            )));
        }
        self.backend.write_blob(path, bytes)?;
        tracing::debug!(path, size = bytes.len(), "blob uploaded");
        Ok(())
    }

    fn download_url(&self, path: &str) -> Result<String> {
        if !self.backend.blob_exists(path)? {
            return Err(BookshelfError::Storage(format!("Blob not found: {}", path)));
        }
        self.backend.blob_url(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fields;
    use crate::store::mem_backend::MemBackend;

    fn make_store() -> CloudStore<MemBackend> {
        CloudStore::with_backend(MemBackend::new())
    }

    fn data(title: &str, date: Option<FieldValue>) -> DocumentData {
        let mut data = DocumentData::new();
        data.insert(fields::TITLE.to_string(), title.into());
        if let Some(date) = date {
            data.insert(fields::DATE.to_string(), date);
        }
        data
    }

    fn titles(docs: &[Document]) -> Vec<String> {
        docs.iter()
            .map(|d| d.get(fields::TITLE).and_then(FieldValue::as_str).unwrap_or("").to_string())
            .collect()
    }

    fn ts(secs: i64) -> FieldValue {
        FieldValue::Timestamp(DateTime::from_timestamp(secs, 0).unwrap())
    }

    #[test]
    fn add_resolves_server_timestamp() {
        let store = make_store();
        store
            .add("Books", data("Dune", Some(FieldValue::ServerTimestamp)))
            .unwrap();

        let docs = store.get(&Query::collection("Books")).unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].get(fields::DATE).unwrap().as_timestamp().is_some());
    }

    #[test]
    fn server_timestamps_strictly_increase() {
        let store = make_store();
        for title in ["a", "b", "c", "d"] {
            store
                .add("Books", data(title, Some(FieldValue::ServerTimestamp)))
                .unwrap();
        }
        let docs = store
            .get(&Query::collection("Books").order_by(fields::DATE, Direction::Descending))
            .unwrap();
        assert_eq!(titles(&docs), vec!["d", "c", "b", "a"]);
    }

    #[test]
    fn ordered_query_skips_documents_without_field() {
        let store = make_store();
        store.add("Books", data("dated", Some(ts(5)))).unwrap();
        store.add("Books", data("undated", None)).unwrap();

        let ordered = store
            .get(&Query::collection("Books").order_by(fields::DATE, Direction::Ascending))
            .unwrap();
        assert_eq!(titles(&ordered), vec!["dated"]);

        let all = store.get(&Query::collection("Books")).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn equality_filter_matches_strings_only() {
        let store = make_store();
        store.add("Books", data("Dune", None)).unwrap();
        store.add("Books", data("Emma", None)).unwrap();
        store.add("Books", data("Dune", None)).unwrap();

        let matches = store
            .get(&Query::collection("Books").where_eq(fields::TITLE, "Dune"))
            .unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn delete_missing_is_not_found() {
        let store = make_store();
        let id = DocumentId::from("nope");
        match store.delete("Books", &id) {
            Err(BookshelfError::NotFound(err_id)) => assert_eq!(err_id, id),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn listener_gets_initial_and_update_snapshots() {
        let store = make_store();
        store.add("Books", data("first", Some(ts(1)))).unwrap();

        let seen: Rc<RefCell<Vec<usize>>> = Rc::default();
        let sink = seen.clone();
        let _registration = store
            .listen(
                Query::collection("Books"),
                Box::new(move |event| sink.borrow_mut().push(event.unwrap().len())),
            )
            .unwrap();

        store.add("Books", data("second", Some(ts(2)))).unwrap();
        store.add("Other", data("elsewhere", None)).unwrap();

        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn dropped_registration_stops_delivery() {
        let store = make_store();
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let registration = store
            .listen(
                Query::collection("Books"),
                Box::new(move |_| counter.set(counter.get() + 1)),
            )
            .unwrap();
        assert_eq!(store.listener_count(), 1);

        drop(registration);
        store.add("Books", data("after", None)).unwrap();

        assert_eq!(count.get(), 1);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn read_failure_is_delivered_as_error() {
        let store = make_store();
        store.backend().set_simulate_read_error(true);

        let errors = Rc::new(Cell::new(0));
        let sink = errors.clone();
        let _registration = store
            .listen(
                Query::collection("Books"),
                Box::new(move |event| {
                    if event.is_err() {
                        sink.set(sink.get() + 1);
                    }
                }),
            )
            .unwrap();

        assert_eq!(errors.get(), 1);
    }

    #[test]
    fn write_failure_does_not_notify() {
        let store = make_store();
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let _registration = store
            .listen(
                Query::collection("Books"),
                Box::new(move |_| counter.set(counter.get() + 1)),
            )
            .unwrap();

        store.backend().set_simulate_write_error(true);
        assert!(store.add("Books", data("x", None)).is_err());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn blobs_are_write_once() {
        let store = make_store();
        store.put("photos/a.jpg", b"jpeg").unwrap();
        assert!(matches!(
            store.put("photos/a.jpg", b"other"),
            Err(BookshelfError::Storage(_))
        ));
        assert_eq!(
            store.download_url("photos/a.jpg").unwrap(),
            "memory://photos/a.jpg"
        );
        assert!(store.download_url("photos/missing.jpg").is_err());
    }
}
