use crate::commands::{CmdMessage, CmdResult};
use crate::config::BookshelfConfig;
use crate::error::Result;
use crate::model::{BookDraft, Document, Record};
use crate::store::{BlobStore, DocumentStore};
use uuid::Uuid;

/// Upload `bytes` under a fresh random name and resolve its download URL.
fn upload_photo<B: BlobStore>(blobs: &B, config: &BookshelfConfig, bytes: &[u8]) -> Result<String> {
    let path = config.photo_path(&Uuid::new_v4().to_string());
    blobs.put(&path, bytes)?;
    let url = blobs.download_url(&path)?;
    tracing::debug!(path = %path, url = %url, "photo uploaded");
    Ok(url)
}

/// Persist a new book written by `owner`.
///
/// With a photo: upload, resolve URL, then write. Any failure before the
/// write aborts the whole thing, so no record ever points at a missing photo.
pub fn run<D: DocumentStore, B: BlobStore>(
    docs: &D,
    blobs: &B,
    config: &BookshelfConfig,
    owner: &str,
    mut draft: BookDraft,
) -> Result<CmdResult> {
    let words = draft.word_count();

    let photo_url = match draft.photo.take() {
        Some(bytes) => Some(upload_photo(blobs, config, &bytes)?),
        None => None,
    };

    let data = draft.into_document_data(owner, photo_url);
    let id = docs.add(&config.collection, data.clone())?;
    let record = Record::from_document(&Document { id, data });
    tracing::debug!(id = %record.id, owner, "book created");

    let mut result = CmdResult::default();
    if words > config.word_limit {
        result.add_message(CmdMessage::warning(format!(
            "Content has {} words, more than the suggested {}",
            words, config.word_limit
        )));
    }
    result.add_message(CmdMessage::success(format!(
        "Book information saved: {}",
        record.title.as_deref().unwrap_or_default()
    )));
    Ok(result.with_affected_books(vec![record]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::error::BookshelfError;
    use crate::model::fields;
    use crate::store::memory::InMemoryStore;
    use crate::store::Query;

    fn stored(store: &InMemoryStore) -> Vec<Document> {
        store
            .get(&Query::collection("BookInformations"))
            .unwrap()
    }

    #[test]
    fn writes_without_photo_key() {
        let store = InMemoryStore::new();
        let config = BookshelfConfig::default();
        let result = run(
            &store,
            &store,
            &config,
            "Alice",
            BookDraft::new("Dune", "Herbert", "Spice must flow"),
        )
        .unwrap();

        let docs = stored(&store);
        assert_eq!(docs.len(), 1);
        assert!(docs[0].get(fields::PHOTO_URL).is_none());
        assert!(docs[0].get(fields::DATE).unwrap().as_timestamp().is_some());
        assert_eq!(result.affected_books[0].owner.as_deref(), Some("Alice"));
        assert_eq!(result.affected_books[0].id, docs[0].id);
        assert_eq!(store.backend().blob_count(), 0);
    }

    #[test]
    fn photo_is_uploaded_before_write() {
        let store = InMemoryStore::new();
        let config = BookshelfConfig::default();
        let draft = BookDraft::new("Dune", "Herbert", "Spice").with_photo(b"jpeg".to_vec());
        let result = run(&store, &store, &config, "Alice", draft).unwrap();

        let url = result.affected_books[0].photo_url.clone().unwrap();
        assert!(url.starts_with("memory://photos/"));
        assert!(url.ends_with(".jpg"));

        let path = url.trim_start_matches("memory://");
        assert_eq!(store.backend().blob(path), Some(b"jpeg".to_vec()));

        let docs = stored(&store);
        assert_eq!(
            docs[0].get(fields::PHOTO_URL).and_then(|v| v.as_str()),
            Some(url.as_str())
        );
    }

    #[test]
    fn upload_failure_writes_nothing() {
        let store = InMemoryStore::new();
        store.backend().set_simulate_blob_error(true);
        let draft = BookDraft::new("Dune", "Herbert", "Spice").with_photo(b"jpeg".to_vec());

        let result = run(&store, &store, &BookshelfConfig::default(), "Alice", draft);
        assert!(matches!(result, Err(BookshelfError::Storage(_))));
        assert!(stored(&store).is_empty());
    }

    #[test]
    fn url_failure_writes_nothing() {
        let store = InMemoryStore::new();
        store.backend().set_simulate_url_error(true);
        let draft = BookDraft::new("Dune", "Herbert", "Spice").with_photo(b"jpeg".to_vec());

        let result = run(&store, &store, &BookshelfConfig::default(), "Alice", draft);
        assert!(result.is_err());
        assert!(stored(&store).is_empty());
    }

    #[test]
    fn write_failure_is_returned() {
        let store = InMemoryStore::new();
        store.backend().set_simulate_write_error(true);
        let result = run(
            &store,
            &store,
            &BookshelfConfig::default(),
            "Alice",
            BookDraft::new("Dune", "Herbert", "Spice"),
        );
        assert!(matches!(result, Err(BookshelfError::Store(_))));
    }

    #[test]
    fn long_content_warns_but_still_writes() {
        let store = InMemoryStore::new();
        let config = BookshelfConfig {
            word_limit: 3,
            ..Default::default()
        };
        let result = run(
            &store,
            &store,
            &config,
            "Alice",
            BookDraft::new("Dune", "Herbert", "one two three four"),
        )
        .unwrap();

        assert_eq!(stored(&store).len(), 1);
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert!(result.messages[0].content.contains("4 words"));
        assert_eq!(result.messages[1].level, MessageLevel::Success);
    }

    #[test]
    fn uses_configured_collection() {
        let store = InMemoryStore::new();
        let config = BookshelfConfig {
            collection: "Shelf".to_string(),
            ..Default::default()
        };
        run(
            &store,
            &store,
            &config,
            "Alice",
            BookDraft::new("Dune", "Herbert", "Spice"),
        )
        .unwrap();
        assert_eq!(store.get(&Query::collection("Shelf")).unwrap().len(), 1);
        assert!(stored(&store).is_empty());
    }
}
