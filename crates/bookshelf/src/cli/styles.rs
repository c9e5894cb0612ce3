//! Styles for the bookshelf CLI.
//!
//! Code refers to styles by what they mean (a title, an owner, an error), not
//! by color. `console` drops the escape codes when stdout is not a terminal,
//! so piped output stays plain.

use bookshelfapp::commands::MessageLevel;
use console::Style;

pub fn index() -> Style {
    Style::new().yellow()
}

pub fn title() -> Style {
    Style::new().bold()
}

pub fn muted() -> Style {
    Style::new().dim()
}

pub fn owner() -> Style {
    Style::new().cyan()
}

pub fn message(level: MessageLevel) -> Style {
    match level {
        MessageLevel::Info => Style::new().blue(),
        MessageLevel::Success => Style::new().green(),
        MessageLevel::Warning => Style::new().yellow(),
        MessageLevel::Error => Style::new().red(),
    }
}
