//! Conventions encoded in key names and summaries
//!
//! The schema format has no notion of sections, ordering or hidden keys, so
//! they ride along in plain text:
//! - a summary starting with `[hidden]` keeps the key out of the form
//! - a summary starting with `[N] ` places the key at order `N` (default 0)
//! - the key name up to the first `-` names the section

use once_cell::sync::Lazy;
use regex::Regex;

/// Prefix that hides a key from the settings form
pub const HIDDEN_MARKER: &str = "[hidden]";

/// Separator between the section name and the rest of a key name
pub const SECTION_SEPARATOR: char = '-';

static ORDER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(\d+)\]\s(.*)").expect("order prefix regex is valid"));

/// Result of interpreting a key summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedSummary {
    Hidden,
    Visible { order: u32, text: String },
}

/// Interpret the hidden marker and the ordering prefix of a summary
pub fn parse_summary(summary: &str) -> ParsedSummary {
    if summary.starts_with(HIDDEN_MARKER) {
        return ParsedSummary::Hidden;
    }

    if let Some(caps) = ORDER_PREFIX.captures(summary) {
        if let Ok(order) = caps[1].parse::<u32>() {
            return ParsedSummary::Visible {
                order,
                text: caps[2].to_string(),
            };
        }
    }

    ParsedSummary::Visible {
        order: 0,
        text: summary.to_string(),
    }
}

/// Section a key belongs to: everything before the first separator
pub fn section_for_key(key_name: &str) -> &str {
    key_name
        .split_once(SECTION_SEPARATOR)
        .map(|(section, _)| section)
        .unwrap_or("")
}

/// Upper-case the first character and lower-case the rest
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
