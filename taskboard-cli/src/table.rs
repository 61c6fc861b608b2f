//! Terminal-aware table utilities.
//!
//! Provides a pre-configured comfy_table that respects terminal width,
//! preventing ugly line wrapping on narrow screens.

use chrono::{DateTime, Utc};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

/// Create a table pre-configured for terminal-width-aware output.
///
/// Uses crossterm to detect the actual terminal width, falling back to
/// 120 columns when not connected to a TTY.
pub fn new_table() -> Table {
    let width = crossterm::terminal::size()
        .map(|(w, _)| w)
        .unwrap_or(120);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(width);
    table
}

/// Truncate a string to `max` characters, appending "..." if truncated.
///
/// Safe for multi-byte (UTF-8) strings.
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// `YYYY-MM-DD`, or `-` when there is no date
pub fn date_cell(date: Option<&DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Text cell with `-` standing in for nothing
pub fn text_cell(text: Option<&str>) -> String {
    match text {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => "-".to_string(),
    }
}
