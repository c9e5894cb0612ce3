use crate::model::DocumentId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookshelfError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("No user is signed in")]
    NotSignedIn,

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),

    #[error("Deleted {deleted} book entries, {failed} failed: {reason}")]
    DeleteFailed {
        deleted: usize,
        failed: usize,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, BookshelfError>;
