//! Minimal lexing helpers for .hst files.
//!
//! The format has no nesting beyond one quoted block per key and no escaping
//! of `=` or `"` outside the literal-newline convention, so two extraction
//! primitives plus header detection cover all of it.

use once_cell::sync::Lazy;
use regex::Regex;

pub const COMMANDS_HEADER: &str = "[SavedHistory]";
pub const DIALOGS_HEADER: &str = "[SavedDialogHistory]";
pub const FOLDERS_HEADER: &str = "[SavedFolderHistory]";
pub const VIEW_HEADER: &str = "[SavedViewHistory]";

/// Known headers in detection precedence order.
pub const KNOWN_HEADERS: [&str; 4] = [
    COMMANDS_HEADER,
    DIALOGS_HEADER,
    FOLDERS_HEADER,
    VIEW_HEADER,
];

static NEXT_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[A-Za-z0-9_]+=").expect("next-key pattern")
});

static HEADER_RES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    KNOWN_HEADERS
        .iter()
        .map(|hdr| {
            let re = Regex::new(&format!(r"(?m)^\s*{}\s*$", regex::escape(hdr)))
                .expect("header pattern");
            (*hdr, re)
        })
        .collect()
});

fn key_regex(key: &str, quoted: bool) -> Regex {
    let pattern = if quoted {
        format!("(?m)^{}=\"", regex::escape(key))
    } else {
        format!("(?m)^{}=(.*)$", regex::escape(key))
    };
    // Escaped keys always form a valid pattern.
    Regex::new(&pattern).expect("key pattern")
}

/// Extract a far2l-style quoted block: `key="...may span lines..."`.
///
/// Scans from `key="` to the next line starting with `SOMEKEY=` or end of
/// text, then strips exactly one terminal quote (plus trailing whitespace)
/// when present. Returns `(value, remainder)`; an absent key yields an empty
/// value and the text unchanged, so calls can chain through a shrinking
/// buffer.
pub fn extract_quoted_block(text: &str, key: &str) -> (String, String) {
    let m = match key_regex(key, true).find(text) {
        Some(m) => m,
        None => return (String::new(), text.to_string()),
    };

    let value_start = m.end();
    let (raw_block, remainder) = match NEXT_KEY_RE.find_at(text, value_start) {
        Some(m2) => (
            &text[value_start..m2.start()],
            format!("{}{}", &text[..m.start()], &text[m2.start()..]),
        ),
        None => (&text[value_start..], text[..m.start()].to_string()),
    };

    // Drop one terminal quote and any whitespace after it; a block without
    // a closing quote is returned as-is, trailing whitespace included.
    let trimmed = raw_block.trim_end();
    let block = match trimmed.strip_suffix('"') {
        Some(inner) => inner.to_string(),
        None => raw_block.to_string(),
    };
    (block, remainder)
}

/// Extract a simple `key=value` pair; the value is everything to line end,
/// trimmed. The matched line's content is removed from the remainder (its
/// terminating newline stays behind).
pub fn extract_simple_pair(text: &str, key: &str) -> (String, String) {
    let caps = match key_regex(key, false).captures(text) {
        Some(c) => c,
        None => return (String::new(), text.to_string()),
    };
    let whole = caps.get(0).expect("whole match");
    let value = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
    let remainder = format!("{}{}", &text[..whole.start()], &text[whole.end()..]);
    (value, remainder)
}

/// Return the first recognized header present in the text, tested in fixed
/// precedence order (commands, dialogs, folders, view) rather than by
/// position in the text.
pub fn detect_header(text: &str) -> Option<&'static str> {
    HEADER_RES
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(hdr, _)| *hdr)
}
