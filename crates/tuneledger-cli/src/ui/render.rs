//! Turning results into lines of text.
//!
//! Every function returns a `String` so commands decide where it goes;
//! `print` and `print_error` are the only ones that write.

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};

use super::context::UiContext;
use super::mode::OutputMode;
use super::theme::{Badge, Tone};

/// Keys in pretty key/value lines are padded to this width.
const KEY_WIDTH: usize = 20;

/// Title line for a command or record.
pub fn header(ctx: &UiContext, title: &str, detail: Option<&str>) -> String {
    match ctx.mode {
        OutputMode::Json => String::new(),
        OutputMode::Plain => kv(ctx, "section", title),
        OutputMode::Pretty => {
            let mut line = Tone::Strong.paint(title, ctx.color);
            if let Some(detail) = detail {
                line.push_str("  ");
                line.push_str(&Tone::Muted.paint(detail, ctx.color));
            }
            line
        }
    }
}

pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let marker = kind.paint(ctx.unicode, ctx.color);
    if message.is_empty() {
        marker
    } else {
        format!("{marker} {message}")
    }
}

/// One field. Plain output snake-cases the key so scripts can match on it.
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if !ctx.mode.is_pretty() {
        return format!("{}={}", field_name(key), value);
    }
    let label = format!("{:<width$}", key, width = KEY_WIDTH);
    format!("{}{}", Tone::Muted.paint(&label, ctx.color), value)
}

fn field_name(key: &str) -> String {
    key.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

pub fn hint(ctx: &UiContext, text: &str) -> String {
    if !ctx.mode.is_pretty() {
        return format!("hint={text}");
    }
    let arrow = if ctx.unicode { "\u{2192}" } else { "->" };
    Tone::Muted.paint(&format!("{arrow} {text}"), ctx.color)
}

/// Summary printed after a successful action.
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, String)]) -> String {
    let first = if ctx.mode.is_pretty() {
        badge(ctx, Badge::Ok, title)
    } else {
        "status=ok".to_owned()
    };
    let indent = if ctx.mode.is_pretty() { "  " } else { "" };
    std::iter::once(first)
        .chain(items.iter().map(|(key, value)| format!("{indent}{}", kv(ctx, key, value))))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub title: &'static str,
}

impl Column {
    pub const fn new(title: &'static str) -> Self {
        Self { title }
    }
}

/// Rows under a header. Plain output drops the header and separates
/// cells with tabs.
pub fn simple_table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut table = Table::new();
    table
        .load_preset(if ctx.unicode {
            presets::UTF8_HORIZONTAL_ONLY
        } else {
            presets::ASCII_HORIZONTAL_ONLY
        })
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(u16::try_from(ctx.width).unwrap_or(u16::MAX))
        .set_header(columns.iter().map(|column| {
            let cell = Cell::new(column.title);
            if ctx.color {
                cell.add_attribute(Attribute::Bold)
            } else {
                cell
            }
        }));
    for row in rows {
        table.add_row(row.clone());
    }
    table.to_string()
}

/// Write to stdout. JSON mode prints its own document, so this is silent there.
pub fn print(ctx: &UiContext, text: &str) {
    if ctx.mode != OutputMode::Json {
        println!("{text}");
    }
}

pub fn blank_line(ctx: &UiContext) {
    if ctx.mode.is_pretty() {
        println!();
    }
}

fn error_lines(ctx: &UiContext, message: &str, suggestion: Option<&str>) -> Vec<String> {
    let mut lines = vec![if ctx.mode.is_pretty() {
        badge(ctx, Badge::Err, message)
    } else {
        format!("error={message}")
    }];
    lines.extend(suggestion.map(|text| hint(ctx, text)));
    lines
}

/// Errors always go to stderr, even in JSON mode.
pub fn print_error(ctx: &UiContext, message: &str, suggestion: Option<&str>) {
    for line in error_lines(ctx, message, suggestion) {
        eprintln!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ui(mode: OutputMode) -> UiContext {
        UiContext {
            color: false,
            unicode: true,
            width: 100,
            mode,
        }
    }

    #[test]
    fn test_plain_keys_are_snake_case() {
        let plain = ui(OutputMode::Plain);
        assert_eq!(kv(&plain, "Total Listening Time", "180"), "total_listening_time=180");
        assert_eq!(kv(&plain, "Likes", "0"), "likes=0");
    }

    #[test]
    fn test_pretty_keys_are_padded() {
        let line = kv(&ui(OutputMode::Pretty), "Likes", "2");
        assert_eq!(line, format!("{:<20}2", "Likes"));
    }

    #[test]
    fn test_header_per_mode() {
        assert_eq!(header(&ui(OutputMode::Plain), "Track", None), "section=Track");
        assert_eq!(header(&ui(OutputMode::Pretty), "Track", Some("ab12")), "Track  ab12");
        assert!(header(&ui(OutputMode::Json), "Track", None).is_empty());
    }

    #[test]
    fn test_receipt_plain_starts_with_status() {
        let out = receipt(
            &ui(OutputMode::Plain),
            "Track added",
            &[("Position", "0".to_string()), ("Sequence", "7".to_string())],
        );
        assert_eq!(out, "status=ok\nposition=0\nsequence=7");
    }

    #[test]
    fn test_receipt_pretty_indents_fields() {
        let out = receipt(&ui(OutputMode::Pretty), "Track liked", &[("Likes", "1".to_string())]);
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("\u{2714} Track liked"));
        assert_eq!(lines.next().map(str::trim_end), Some(format!("  {:<20}1", "Likes").as_str()));
    }

    #[test]
    fn test_plain_table_is_tab_separated() {
        let columns = [Column::new("Kind"), Column::new("Field")];
        let rows = vec![
            vec!["Track".to_string(), "likes_count".to_string()],
            vec!["Playlist".to_string(), "tracks_count".to_string()],
        ];
        assert_eq!(
            simple_table(&ui(OutputMode::Plain), &columns, &rows),
            "Track\tlikes_count\nPlaylist\ttracks_count"
        );
    }

    #[test]
    fn test_pretty_table_has_titles() {
        let columns = [Column::new("Kind"), Column::new("Field")];
        let rows = vec![vec!["Track".to_string(), "likes_count".to_string()]];
        let out = simple_table(&ui(OutputMode::Pretty), &columns, &rows);
        assert!(out.contains("Kind"));
        assert!(out.contains("likes_count"));
    }

    #[test]
    fn test_error_lines() {
        let lines = error_lines(&ui(OutputMode::Plain), "No config found", Some("run init"));
        assert_eq!(lines, vec!["error=No config found", "hint=run init"]);
        let pretty = error_lines(&ui(OutputMode::Pretty), "No config found", None);
        assert_eq!(pretty, vec!["\u{2718} No config found"]);
    }
}
