//! # CLI Behavior
//!
//! This is **one possible UI client** for bookshelf, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! ## One Process, One Screen
//!
//! Each invocation plays the part of one screen of the app:
//!
//! - `bookshelf list` starts the listing flow, lets it deliver its first
//!   snapshot, and prints the rows the adapter binds.
//! - `bookshelf open <n>` taps row `n` (1-based). The book is shown only if
//!   the signed-in user wrote it.
//! - `bookshelf add` / `bookshelf delete` run the write commands and print
//!   their messages.
//!
//! Running `bookshelf` with no arguments defaults to `bookshelf list`.
//!
//! ## Data Directory
//!
//! Everything lives under one directory: `--data-dir`, else `BOOKSHELF_DATA`,
//! else the platform data dir. `bookshelf.toml` in there is the config file.
//!
//! ## Module Structure
//!
//! - `commands`: context setup and per-command handlers
//! - `render`: output formatting (rows, details, messages)
//! - `setup`: argument parsing via clap
//! - `styles`: terminal styling

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
