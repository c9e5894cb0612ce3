//! # Bookshelf CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/bookshelfapp/`: core library: store contract, listing flow,
//!   list adapter, commands, API facade
//! - `crates/bookshelf/`: this CLI, one client of that library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/bookshelf/src/cli/)                      │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - context wiring + dispatch (commands.rs)                  │
//! │  - terminal rendering (render.rs, styles.rs)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/bookshelfapp/src/api.rs)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The CLI is responsible for **all** user-facing concerns: argument parsing,
//! context initialization, rendering, logging setup, and exit codes.
//!
//! ## Testing Approach
//!
//! - Library behavior is tested in `bookshelfapp`.
//! - Rendering helpers have unit tests next to them.
//! - `tests/cli_e2e.rs` runs the real binary against a temp data directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
