//! # Domain Model: Book Records and Their Wire Form
//!
//! This module defines the core data structures for bookshelf: [`Record`],
//! [`BookDraft`], and the loosely typed [`Document`] the store hands back.
//!
//! ## Documents vs Records
//!
//! The store keeps schemaless documents: a map of field name to [`FieldValue`].
//! Nothing stops another client from writing a number where a string belongs,
//! or leaving a field out entirely. The application never reads those maps
//! directly. Instead every document goes through [`Record::from_document`],
//! which decodes each field on its own:
//!
//! - Present and a string → `Some(value)`
//! - Missing, null, or any other type → `None`
//!
//! One bad field never poisons the rest of the record, and one bad document
//! never aborts a listing.
//!
//! ## Wire Field Names
//!
//! | Record field | Document field  | Notes                         |
//! |--------------|-----------------|-------------------------------|
//! | `owner`      | `username`      | display name of the author    |
//! | `title`      | `bookName`      | also the deletion key         |
//! | `author`     | `bookAuthor`    |                               |
//! | `content`    | `bookContent`   | soft-limited by word count    |
//! | `photo_url`  | `bookPhotoUrl`  | only written when uploaded    |
//! | (ordering)   | `date`          | server timestamp, not exposed |
//!
//! ## Write Side
//!
//! A [`BookDraft`] is what a user types in. It becomes a document via
//! [`BookDraft::into_document_data`], which stamps the owner, asks the store
//! for a server timestamp, and omits `bookPhotoUrl` entirely when there is no
//! photo (the key is absent, not null).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Document field names used by the book collection.
pub mod fields {
    pub const OWNER: &str = "username";
    pub const TITLE: &str = "bookName";
    pub const AUTHOR: &str = "bookAuthor";
    pub const CONTENT: &str = "bookContent";
    pub const PHOTO_URL: &str = "bookPhotoUrl";
    pub const DATE: &str = "date";
}

/// The store's native identifier for a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Mint a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single value inside a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    String(String),
    Timestamp(DateTime<Utc>),
    /// Write-only sentinel: the store replaces it with its own clock at commit.
    ServerTimestamp,
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

pub type DocumentData = BTreeMap<String, FieldValue>;

/// A stored document as returned by queries and snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub data: DocumentData,
}

impl Document {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.data.get(field)
    }

    fn string_field(&self, field: &str) -> Option<String> {
        self.get(field).and_then(FieldValue::as_str).map(String::from)
    }
}

/// One book entry as displayed in the list.
///
/// Every field except `id` is optional because documents are decoded
/// field-by-field; see the module docs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: DocumentId,
    pub owner: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
    pub photo_url: Option<String>,
}

impl Record {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            owner: doc.string_field(fields::OWNER),
            title: doc.string_field(fields::TITLE),
            author: doc.string_field(fields::AUTHOR),
            content: doc.string_field(fields::CONTENT),
            photo_url: doc.string_field(fields::PHOTO_URL),
        }
    }

    /// True when `display_name` owns this record (exact, case-sensitive).
    pub fn is_owned_by(&self, display_name: &str) -> bool {
        self.owner.as_deref() == Some(display_name)
    }
}

/// User input for a new book entry.
#[derive(Debug, Clone, Default)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub content: String,
    /// Raw image bytes, if the user picked a photo.
    pub photo: Option<Vec<u8>>,
}

impl BookDraft {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            content: content.into(),
            photo: None,
        }
    }

    pub fn with_photo(mut self, bytes: Vec<u8>) -> Self {
        self.photo = Some(bytes);
        self
    }

    /// Name of the first empty required field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("title", &self.title),
            ("author", &self.author),
            ("content", &self.content),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.content)
    }

    pub fn into_document_data(self, owner: &str, photo_url: Option<String>) -> DocumentData {
        let mut data = DocumentData::new();
        data.insert(fields::OWNER.to_string(), owner.into());
        data.insert(fields::TITLE.to_string(), self.title.into());
        data.insert(fields::AUTHOR.to_string(), self.author.into());
        data.insert(fields::CONTENT.to_string(), self.content.into());
        data.insert(fields::DATE.to_string(), FieldValue::ServerTimestamp);
        if let Some(url) = photo_url {
            data.insert(fields::PHOTO_URL.to_string(), url.into());
        }
        data
    }
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(pairs: &[(&str, FieldValue)]) -> Document {
        Document {
            id: DocumentId::from("doc-1"),
            data: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn decodes_complete_document() {
        let record = Record::from_document(&doc(&[
            (fields::OWNER, "Alice".into()),
            (fields::TITLE, "Dune".into()),
            (fields::AUTHOR, "Herbert".into()),
            (fields::CONTENT, "Spice".into()),
            (fields::PHOTO_URL, "memory://photos/a.jpg".into()),
        ]));

        assert_eq!(record.id.as_str(), "doc-1");
        assert_eq!(record.owner.as_deref(), Some("Alice"));
        assert_eq!(record.title.as_deref(), Some("Dune"));
        assert_eq!(record.author.as_deref(), Some("Herbert"));
        assert_eq!(record.content.as_deref(), Some("Spice"));
        assert_eq!(record.photo_url.as_deref(), Some("memory://photos/a.jpg"));
    }

    #[test]
    fn malformed_fields_degrade_to_none() {
        let record = Record::from_document(&doc(&[
            (fields::OWNER, FieldValue::Integer(7)),
            (fields::TITLE, "Dune".into()),
            (fields::AUTHOR, FieldValue::Null),
        ]));

        assert_eq!(record.owner, None);
        assert_eq!(record.title.as_deref(), Some("Dune"));
        assert_eq!(record.author, None);
        assert_eq!(record.content, None);
        assert_eq!(record.photo_url, None);
    }

    #[test]
    fn ownership_is_exact_match() {
        let record = Record::from_document(&doc(&[(fields::OWNER, "Alice".into())]));
        assert!(record.is_owned_by("Alice"));
        assert!(!record.is_owned_by("alice"));
        assert!(!record.is_owned_by("Alice "));

        let orphan = Record::from_document(&doc(&[]));
        assert!(!orphan.is_owned_by(""));
    }

    #[test]
    fn draft_without_photo_has_no_photo_key() {
        let data = BookDraft::new("Dune", "Herbert", "...").into_document_data("Alice", None);
        assert!(!data.contains_key(fields::PHOTO_URL));
        assert_eq!(data.get(fields::OWNER), Some(&FieldValue::from("Alice")));
        assert_eq!(data.get(fields::DATE), Some(&FieldValue::ServerTimestamp));
    }

    #[test]
    fn draft_with_photo_url_writes_key() {
        let data = BookDraft::new("Dune", "Herbert", "...")
            .into_document_data("Alice", Some("file:///tmp/x.jpg".into()));
        assert_eq!(
            data.get(fields::PHOTO_URL),
            Some(&FieldValue::from("file:///tmp/x.jpg"))
        );
    }

    #[test]
    fn missing_field_reports_first_blank() {
        assert_eq!(BookDraft::new("T", "A", "C").missing_field(), None);
        assert_eq!(BookDraft::new("  ", "A", "C").missing_field(), Some("title"));
        assert_eq!(BookDraft::new("T", "A", "").missing_field(), Some("content"));
    }

    #[test]
    fn word_count_ignores_extra_whitespace() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  one   two\nthree\t"), 3);
    }

    #[test]
    fn field_value_json_shape() {
        let json = serde_json::to_string(&FieldValue::from("x")).unwrap();
        assert_eq!(json, r#"{"string":"x"}"#);
        let back: FieldValue = serde_json::from_str(r#""null""#).unwrap();
        assert_eq!(back, FieldValue::Null);
    }
}
