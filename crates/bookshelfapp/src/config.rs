//! # Configuration
//!
//! Bookshelf configuration is a [`confique`] config, loaded in layers from
//! environment variables, a TOML file, and compiled defaults.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `BOOKSHELF_COLLECTION`, `BOOKSHELF_WORD_LIMIT`, etc.
//! 2. **Config file**: `bookshelf.toml` in the data directory.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `collection` | `BOOKSHELF_COLLECTION` | `BookInformations` | Document collection holding books |
//! | `photo_dir` | `BOOKSHELF_PHOTO_DIR` | `photos` | Blob directory for uploaded photos |
//! | `photo_ext` | `BOOKSHELF_PHOTO_EXT` | `.jpg` | Extension for uploaded photos |
//! | `word_limit` | `BOOKSHELF_WORD_LIMIT` | `20` | Advisory word limit for content |
//! | `empty_snapshot` | `BOOKSHELF_EMPTY_SNAPSHOT` | `clear` | `clear` or `ignore` an empty listing |

use crate::error::{BookshelfError, Result};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "bookshelf.toml";

/// What the listing does when the store reports zero documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptySnapshotPolicy {
    /// Show an empty list.
    Clear,
    /// Keep whatever was displayed before.
    Ignore,
}

/// Configuration for bookshelf, stored in `bookshelf.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BookshelfConfig {
    /// Collection that holds the book documents.
    #[config(default = "BookInformations", env = "BOOKSHELF_COLLECTION")]
    pub collection: String,

    /// Blob directory for uploaded photos.
    #[config(default = "photos", env = "BOOKSHELF_PHOTO_DIR")]
    pub photo_dir: String,

    /// Extension for uploaded photos (e.g. ".jpg", "png").
    #[config(default = ".jpg", env = "BOOKSHELF_PHOTO_EXT")]
    pub photo_ext: String,

    /// Content longer than this many words gets a warning. Never blocks a save.
    #[config(default = 20, env = "BOOKSHELF_WORD_LIMIT")]
    pub word_limit: usize,

    #[config(default = "clear", env = "BOOKSHELF_EMPTY_SNAPSHOT")]
    pub empty_snapshot: EmptySnapshotPolicy,
}

impl Default for BookshelfConfig {
    fn default() -> Self {
        Self {
            collection: "BookInformations".to_string(),
            photo_dir: "photos".to_string(),
            photo_ext: ".jpg".to_string(),
            word_limit: 20,
            empty_snapshot: EmptySnapshotPolicy::Clear,
        }
    }
}

impl BookshelfConfig {
    /// Load env > `<data_dir>/bookshelf.toml` > defaults.
    pub fn load(data_dir: &Path) -> Result<Self> {
        BookshelfConfig::builder()
            .env()
            .file(data_dir.join(CONFIG_FILE))
            .load()
            .map_err(|e| BookshelfError::Config(e.to_string()))
    }

    /// Get the photo extension, normalized to start with a dot.
    pub fn photo_ext(&self) -> String {
        if self.photo_ext.starts_with('.') {
            self.photo_ext.clone()
        } else {
            format!(".{}", self.photo_ext)
        }
    }

    /// Blob path for a photo named `name` (no extension).
    pub fn photo_path(&self, name: &str) -> String {
        format!(
            "{}/{}{}",
            self.photo_dir.trim_end_matches('/'),
            name,
            self.photo_ext()
        )
    }
}

/// Default data directory: `BOOKSHELF_DATA` if set, else the OS data dir.
pub fn default_data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("BOOKSHELF_DATA") {
        return Ok(PathBuf::from(dir));
    }
    directories::ProjectDirs::from("", "", "bookshelf")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| BookshelfError::Config("Could not determine a data directory".to_string()))
}
