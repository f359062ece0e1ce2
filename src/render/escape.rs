use std::sync::OnceLock;

use regex::Regex;

fn ansi_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"\x1b(?:\[[0-9;?]*[ -/]*[@-~]|\][^\x07\x1b]*(?:\x07|\x1b\\)?|[@-_])").ok()
        })
        .as_ref()
}

/// Neutralizes server-provided text before terminal embedding: strips ANSI
/// escape sequences and replaces remaining control characters, keeping
/// newlines and tabs. Without the pattern the control-character filter alone
/// still defuses escape sequences, at the cost of leaving replacement marks.
pub fn sanitize_block(raw: &str) -> String {
    let without_ansi = match ansi_pattern() {
        Some(pattern) => pattern.replace_all(raw, ""),
        None => std::borrow::Cow::Borrowed(raw),
    };
    without_ansi
        .chars()
        .filter_map(|c| match c {
            '\r' => None,
            '\n' | '\t' => Some(c),
            c if c.is_control() => Some('\u{fffd}'),
            c => Some(c),
        })
        .collect()
}

/// Single-line variant for titles and badges: newlines collapse to spaces.
pub fn sanitize_inline(raw: &str) -> String {
    sanitize_block(raw)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
