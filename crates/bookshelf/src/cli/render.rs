//! Output formatting for the CLI.
//!
//! Every function here returns a `String`; printing is left to `commands.rs`.

use super::styles;
use bookshelfapp::adapter::{BookRow, PhotoState};
use bookshelfapp::commands::CmdMessage;
use bookshelfapp::model::Record;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 80;
const ELLIPSIS: &str = "…";

/// Column width for the row number ("  1. ")
const COL_INDEX: usize = 5;

pub const EMPTY_LIST: &str = "No book information yet. Add one with `bookshelf add`.";

/// Cut `text` down to `max_width` display columns, ending in an ellipsis if cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(ELLIPSIS.width());
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str(ELLIPSIS);
    out
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn render_rows(rows: &[BookRow]) -> String {
    if rows.is_empty() {
        return format!("{}\n", styles::muted().apply_to(EMPTY_LIST));
    }

    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        let index = format!("{:>3}. ", i + 1);
        let photo = match row.photo {
            PhotoState::Loading(_) => " [photo]",
            PhotoState::None => "",
        };
        let heading = truncate_to_width(
            &format!("{} by {}", row.title, row.author),
            LINE_WIDTH.saturating_sub(COL_INDEX + row.owner.width() + photo.len() + 3),
        );
        out.push_str(&format!(
            "{}{}  {}{}\n",
            styles::index().apply_to(index),
            styles::title().apply_to(heading),
            styles::owner().apply_to(format!("({})", row.owner)),
            styles::muted().apply_to(photo),
        ));

        let content = truncate_to_width(&single_line(&row.content), LINE_WIDTH - COL_INDEX);
        if !content.is_empty() {
            out.push_str(&format!(
                "{}{}\n",
                " ".repeat(COL_INDEX),
                styles::muted().apply_to(content)
            ));
        }
    }
    out
}

pub fn render_detail(record: &Record) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_default();
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        styles::title().apply_to(field(&record.title))
    ));
    out.push_str(&format!("Author: {}\n", field(&record.author)));
    out.push_str(&format!(
        "Owner:  {}\n",
        styles::owner().apply_to(field(&record.owner))
    ));
    if let Some(url) = &record.photo_url {
        out.push_str(&format!("Photo:  {}\n", url));
    }
    out.push_str(&format!(
        "Id:     {}\n\n",
        styles::muted().apply_to(record.id.as_str())
    ));
    out.push_str(&field(&record.content));
    out.push('\n');
    out
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    messages
        .iter()
        .map(|msg| format!("{}\n", styles::message(msg.level).apply_to(&msg.content)))
        .collect()
}

pub fn render_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelfapp::model::DocumentId;

    fn row(title: &str, photo: PhotoState) -> BookRow {
        BookRow {
            owner: "Alice".to_string(),
            title: title.to_string(),
            author: "Herbert".to_string(),
            content: "Spice\nmust   flow".to_string(),
            photo,
        }
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        // Wide chars take two columns each.
        assert_eq!(truncate_to_width("日本語のタイトル", 7), "日本語…");
    }

    #[test]
    fn rows_are_numbered_from_one() {
        let out = render_rows(&[row("Dune", PhotoState::None), row("Emma", PhotoState::None)]);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("1. "));
        assert!(lines[0].contains("Dune by Herbert"));
        assert!(lines[0].contains("(Alice)"));
        assert!(lines[1].contains("Spice must flow"));
        assert!(lines[2].contains("2. "));
    }

    #[test]
    fn photo_marker_only_when_loading() {
        let with = render_rows(&[row("Dune", PhotoState::Loading("file:///x.jpg".into()))]);
        let without = render_rows(&[row("Dune", PhotoState::None)]);
        assert!(with.contains("[photo]"));
        assert!(!without.contains("[photo]"));
    }

    #[test]
    fn empty_list_has_hint() {
        assert!(render_rows(&[]).contains(EMPTY_LIST));
    }

    #[test]
    fn detail_shows_all_fields() {
        let record = Record {
            id: DocumentId::from("abc"),
            owner: Some("Alice".into()),
            title: Some("Dune".into()),
            author: Some("Herbert".into()),
            content: Some("Spice".into()),
            photo_url: None,
        };
        let out = render_detail(&record);
        assert!(out.contains("Dune"));
        assert!(out.contains("Author: Herbert"));
        assert!(out.contains("abc"));
        assert!(!out.contains("Photo:"));
    }

    #[test]
    fn messages_render_one_per_line() {
        let out = render_messages(&[CmdMessage::success("ok"), CmdMessage::warning("careful")]);
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("careful"));
    }
}
