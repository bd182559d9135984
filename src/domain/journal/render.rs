//! Rendering a finished record as Notion-ready markdown.

use std::fmt::Write;

use super::record::StructuredRecord;

/// Turns a record into text for the user. Must be pure.
pub trait JournalRenderer: Send + Sync {
    fn render(&self, record: &StructuredRecord) -> String;
}

/// Headed markdown sections that paste cleanly into a Notion page.
///
/// Empty sections are rendered as "n/a" so the page layout stays stable
/// from day to day.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotionRenderer;

const EMPTY: &str = "n/a";

impl JournalRenderer for NotionRenderer {
    fn render(&self, record: &StructuredRecord) -> String {
        let mut out = String::new();

        section(&mut out, "Day Log");
        list(&mut out, record.day_log());

        section(&mut out, "Feelings");
        paragraph(&mut out, record.feelings());

        section(&mut out, "Three Wins");
        numbered(&mut out, record.three_wins());

        section(&mut out, "StoryWorthy & Observations");
        paragraph(&mut out, record.story_worthy());

        section(&mut out, "ADHD Score");
        match record.adhd_score() {
            0 => paragraph(&mut out, ""),
            score => paragraph(&mut out, &format!("{}/100", score)),
        }

        section(&mut out, "Action Points");
        let points = record.action_points();
        for (done, label) in [
            (points.book_read, "Book read"),
            (points.notes_done, "Notes done"),
            (points.rpg, "RPG"),
            (points.finance, "Finance"),
        ] {
            let _ = writeln!(out, "- [{}] {}", if done { "x" } else { " " }, label);
        }

        out.trim_end().to_string()
    }
}

fn section(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "## {}", title);
}

fn paragraph(out: &mut String, text: &str) {
    let text = text.trim();
    let _ = writeln!(out, "{}", if text.is_empty() { EMPTY } else { text });
}

fn list(out: &mut String, items: &[String]) {
    if items.is_empty() {
        paragraph(out, "");
    }
    for item in items {
        let _ = writeln!(out, "- {}", item);
    }
}

fn numbered(out: &mut String, items: &[String]) {
    if items.is_empty() {
        paragraph(out, "");
    }
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, item);
    }
}

/// Cuts `text` to at most `max_chars` characters, never splitting one.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
