//! # Command Layer
//!
//! This module contains the write-side logic of bookshelf. Each command lives
//! in its own submodule and is a plain function over the store traits.
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Sequence the backend calls (upload, resolve URL, write; query, delete)
//! - Return structured [`CmdResult`] values with affected books and messages
//! - Are completely UI-agnostic
//!
//! ## What Commands Do NOT Do
//!
//! - **Any I/O** beyond the store traits: no stdout, no terminal concerns
//! - **Caller-side validation**: empty-field checks live in the API facade
//! - **Retries**: a failure is returned once; the user decides what to do
//!
//! ## Messages
//!
//! Commands report through [`CmdMessage`]s carried in the [`CmdResult`].
//! Long-lived flows that have no return value to carry them (the listing
//! subscription) push them into a [`MessageSink`] instead. Either way the UI
//! shows them as transient notices.
//!
//! ## Command Modules
//!
//! - [`create`]: Optional photo upload, then write a new book document
//! - [`delete`]: Delete by title (all matches) or by document id
//! - [`open`]: Item-tap authorization on a listed book
//! - [`account`]: Sign up, sign in, sign out

use crate::model::Record;
use serde::Serialize;
use std::cell::RefCell;

pub mod account;
pub mod create;
pub mod delete;
pub mod open;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_books: Vec<Record>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_books(mut self, books: Vec<Record>) -> Self {
        self.affected_books = books;
        self
    }
}

/// Destination for transient notices raised outside a command's return value.
pub trait MessageSink {
    fn push(&self, message: CmdMessage);
}

/// A [`MessageSink`] that keeps everything it is given.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: RefCell<Vec<CmdMessage>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<CmdMessage> {
        self.messages.borrow().clone()
    }

    /// Remove and return everything logged so far.
    pub fn drain(&self) -> Vec<CmdMessage> {
        std::mem::take(&mut *self.messages.borrow_mut())
    }
}

impl MessageSink for MessageLog {
    fn push(&self, message: CmdMessage) {
        self.messages.borrow_mut().push(message);
    }
}
