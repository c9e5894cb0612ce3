//! # Bookshelf Architecture
//!
//! Bookshelf is a **UI-agnostic library** for a shared list of book entries:
//! users sign in, add books (optionally with a cover photo), see everyone's
//! books newest first, and delete entries. The CLI in `crates/bookshelf` is
//! just one client of it.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/bookshelf)                               │
//! │  - Parses arguments, renders rows, handles terminal I/O     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Resolves the signed-in user, caller-side checks          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┴───────────────┐
//!              ▼                               ▼
//! ┌───────────────────────────┐   ┌───────────────────────────┐
//! │  Commands (commands/*.rs) │   │  Read side                │
//! │  create, delete, open,    │   │  listing.rs → observable  │
//! │  account                  │   │  → adapter.rs             │
//! └───────────────────────────┘   └───────────────────────────┘
//!              │                               │
//!              └───────────────┬───────────────┘
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DocumentStore / BlobStore / AuthProvider traits          │
//! │  - CloudStore<B> over a StorageBackend (memory or fs)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Read Side
//!
//! The [`listing::ListingFlow`] holds a standing subscription to the book
//! collection and republishes every change as a whole-list replacement on an
//! [`observable::ObservableList`]. The [`adapter::BookListAdapter`] only ever
//! sees read-only snapshots of that list.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust arguments, returns regular
//! Rust types, and never writes to stdout/stderr. Diagnostics go through
//! `tracing`; whoever embeds the library decides where they end up.
//!
//! ## Testing Strategy
//!
//! - **Commands and flows**: unit tests against [`store::memory::InMemoryStore`],
//!   whose backend can simulate read, write, and blob failures.
//! - **Filesystem backend**: tests against a temp directory.
//! - **Cross-module scenarios**: `tests/` in this crate.
//! - **CLI**: end-to-end tests in `crates/bookshelf/tests`.

pub mod adapter;
pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod listing;
pub mod model;
pub mod observable;
pub mod store;
