//! Item-tap authorization.
//!
//! Tapping a listed book only leads somewhere when the signed-in user wrote
//! it. The check is a plain string comparison on the owner display name,
//! made on the client. It keeps people from wandering into other users'
//! delete screens; it does not stop anyone from calling the delete command
//! directly.

use crate::commands::CmdMessage;
use crate::model::Record;

pub const NOT_YOURS: &str = "Sorry, this book information is not yours.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// Carry on to the detail/delete screen with this book.
    Proceed(Record),
    /// Stay put and show the message.
    Rejected(CmdMessage),
}

impl TapOutcome {
    pub fn is_proceed(&self) -> bool {
        matches!(self, TapOutcome::Proceed(_))
    }
}

pub fn run(record: &Record, current_display_name: Option<&str>) -> TapOutcome {
    match current_display_name {
        Some(name) if record.is_owned_by(name) => TapOutcome::Proceed(record.clone()),
        _ => {
            tracing::debug!(id = %record.id, "tap rejected: not the owner");
            TapOutcome::Rejected(CmdMessage::error(NOT_YOURS))
        }
    }
}
