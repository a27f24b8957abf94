// Centralized UI strings and labels. ASCII-friendly by default.

use unicode_width::UnicodeWidthStr;

pub const INPUT_HINT: &str = "Type a movie title; Up/Down to pick, Enter to choose";

// UI block titles (keep surrounding spaces for visual padding)
pub const TITLE_SEARCH: &str = " Search movies ";
pub const TITLE_SUGGESTIONS: &str = " Suggestions ";
pub const TITLE_HISTORY: &str = " History ";
pub const TITLE_HELP: &str = " Help / Shortcuts ";

// Marker drawn at the end of each history row; clicking it deletes the entry.
pub const DELETE_MARK: &str = "[x]";

pub const FOCUS_INPUT: &str = "Search";
pub const FOCUS_HISTORY: &str = "History";

pub fn history_row(timestamp: &str, title: &str) -> String {
    format!("{}  {}", timestamp, title)
}

// Build the status bar line with width-aware compaction.
// - focus: e.g., "Search" or "History"
// - query: last dispatched query, if any
// - history_len: number of history entries
// - notice: configuration or request problem to surface
pub fn build_status_line(
    focus: &str,
    query: &str,
    history_len: usize,
    notice: Option<&str>,
    max_width: u16,
) -> String {
    let mut segments: Vec<String> = Vec::new();
    if let Some(n) = notice {
        segments.push(format!("[!] {}", n));
    }
    segments.push(format!("[{}]", focus));
    if !query.is_empty() {
        segments.push(format!("Query:{}", query));
    }
    segments.push(format!("Hist:{}", history_len));
    let hints: [&str; 4] = [
        "Tab: switch pane",
        "Esc: close list",
        "F1: help",
        "Ctrl+C: quit",
    ];
    for h in hints {
        segments.push(h.to_string());
    }

    let sep = "  |  ";
    let mut out = String::new();
    let mut used = 0usize;
    for (i, seg) in segments.iter().enumerate() {
        let segw = UnicodeWidthStr::width(seg.as_str());
        let addw = segw
            + if i == 0 {
                0
            } else {
                UnicodeWidthStr::width(sep)
            };
        if used + addw > max_width as usize {
            break;
        }
        if i > 0 {
            out.push_str(sep);
            used += UnicodeWidthStr::width(sep);
        }
        out.push_str(seg);
        used += segw;
    }
    out
}

pub fn help_lines_ascii() -> &'static [&'static str] {
    &[
        "Search",
        "  Type: suggestions appear after a short pause",
        "  Up/Down: Move selection (wraps)    Enter: Add to history    Esc: Close list",
        "  Mouse click on a suggestion: Add to history",
        "Input Editing",
        "  Left/Right: Move cursor    Backspace/Delete: Delete prev/next char",
        "  Home/End or Ctrl+A/E: Line start/end    Ctrl+W: Delete prev word",
        "  Ctrl+U/K: Kill to line start/end",
        "History",
        "  Tab: Focus history    Up/Down: Select    Delete/Enter: Remove entry",
        "  Mouse click on [x]: Remove entry",
        "Other",
        "  F1: Open/close this panel    Ctrl+C: Quit",
    ]
}
