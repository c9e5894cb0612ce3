use crate::commands::{CmdMessage, CmdResult};
use crate::config::BookshelfConfig;
use crate::error::{BookshelfError, Result};
use crate::model::{fields, DocumentId, Record};
use crate::store::{DocumentStore, Query};

/// Delete every book whose title is exactly `title`.
///
/// Compatibility mode: books sharing a title are one unit. Each delete is
/// independent, so a failure part way through leaves earlier deletes in place.
pub fn by_title<D: DocumentStore>(
    docs: &D,
    config: &BookshelfConfig,
    title: &str,
) -> Result<CmdResult> {
    let matches = docs.get(&Query::collection(&config.collection).where_eq(fields::TITLE, title))?;

    let mut deleted = Vec::new();
    let mut failures = Vec::new();
    for doc in matches {
        match docs.delete(&config.collection, &doc.id) {
            Ok(()) => deleted.push(Record::from_document(&doc)),
            Err(e) => {
                tracing::warn!(id = %doc.id, error = %e, "delete failed");
                failures.push(e);
            }
        }
    }

    if let Some(first) = failures.first() {
        return Err(BookshelfError::DeleteFailed {
            deleted: deleted.len(),
            failed: failures.len(),
            reason: first.to_string(),
        });
    }

    let mut result = CmdResult::default();
    if deleted.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No book information titled \"{}\"",
            title
        )));
    } else {
        tracing::debug!(title, count = deleted.len(), "books deleted by title");
        result.add_message(CmdMessage::success("Book information deleted"));
    }
    Ok(result.with_affected_books(deleted))
}

/// Delete exactly one book by its document id.
pub fn by_id<D: DocumentStore>(
    docs: &D,
    config: &BookshelfConfig,
    id: &DocumentId,
) -> Result<CmdResult> {
    let doc = docs
        .get(&Query::collection(&config.collection))?
        .into_iter()
        .find(|doc| &doc.id == id)
        .ok_or_else(|| BookshelfError::NotFound(id.clone()))?;

    docs.delete(&config.collection, id)?;
    tracing::debug!(id = %id, "book deleted by id");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Book information deleted"));
    Ok(result.with_affected_books(vec![Record::from_document(&doc)]))
}
