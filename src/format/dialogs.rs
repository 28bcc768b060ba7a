//! `[SavedDialogHistory]` (dialogs.hst) service: a top-level count plus one
//! named subsection per dialog input field.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::core::lexer::{extract_quoted_block, extract_simple_pair, DIALOGS_HEADER};
use crate::core::lines::{join_items, split_items};
use crate::error::Result;
use crate::model::{DialogCategory, DialogEntry, DialogsDoc};

use super::{
    decode_doc, encode_doc, hex_for_record, iso_for_hex, parse_position, split_hex_tokens,
    HistoryFormat,
};

/// Placeholder for categories imported without a name.
const UNNAMED: &str = "Unnamed";

static SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\[SavedDialogHistory/([^\]]+)\]\s*$").expect("section pattern"));

static TOP_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*\[SavedDialogHistory\]\s*$").expect("top header pattern"));

static TOP_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^HistoryCount=(\d+)\s*$").expect("top count pattern"));

pub struct DialogsFormat;

impl DialogsFormat {
    /// Parse dialogs.hst into a typed document.
    ///
    /// Subsections are discovered by scanning for `[SavedDialogHistory/<Name>]`
    /// headers in document order, which fixes category order in the output.
    /// Each section spans from its header to the next section header or end
    /// of text and carries its own `Lines`/`Locks`/`Position`/`Times`.
    pub fn parse(&self, text: &str) -> Result<DialogsDoc> {
        let mut categories = Vec::new();
        for (name, block) in Self::sections(text) {
            let (lines_raw, _) = extract_quoted_block(block, "Lines");
            let (locks, _) = extract_simple_pair(block, "Locks");
            let (position, _) = extract_simple_pair(block, "Position");
            let (times_str, _) = extract_simple_pair(block, "Times");

            let items = split_items(&lines_raw);
            let hex_list = split_hex_tokens(&times_str);

            let history = items
                .into_iter()
                .enumerate()
                .map(|(i, line)| DialogEntry {
                    line,
                    time_hex: hex_list.get(i).cloned(),
                    time_iso: hex_list.get(i).and_then(|hx| iso_for_hex(hx)),
                })
                .collect();

            categories.push(DialogCategory {
                name: name.to_string(),
                locks,
                position: parse_position(&position)?,
                history,
            });
        }

        Ok(DialogsDoc {
            header: DIALOGS_HEADER.to_string(),
            history_count: Self::top_history_count(text),
            categories,
        })
    }

    /// Serialize the document back to text. The top `HistoryCount` is the
    /// document's own value verbatim (never recomputed from the sections);
    /// a blank line separates the top block and each section.
    pub fn render(&self, doc: &DialogsDoc) -> Result<String> {
        let mut out = format!(
            "{DIALOGS_HEADER}\nHistoryCount={}\n\n",
            doc.history_count
        );

        for cat in &doc.categories {
            let name = if cat.name.is_empty() { UNNAMED } else { &cat.name };
            let lines: Vec<&str> = cat.history.iter().map(|e| e.line.as_str()).collect();
            let times: Vec<String> = cat
                .history
                .iter()
                .map(|e| hex_for_record(e.time_hex.as_deref(), e.time_iso.as_deref()))
                .collect();

            out.push_str(&format!(
                "[SavedDialogHistory/{name}]\nLines=\"{lines}\"\nLocks={locks}\nPosition={position}\nTimes={times}\n\n",
                name = name,
                lines = join_items(&lines),
                locks = cat.locks,
                position = cat.position,
                times = times.join(" "),
            ));
        }

        Ok(out)
    }

    /// Yield `(name, block)` for each subsection in document order.
    fn sections(text: &str) -> Vec<(&str, &str)> {
        let matches: Vec<_> = SECTION_RE.captures_iter(text).collect();
        matches
            .iter()
            .enumerate()
            .map(|(i, caps)| {
                let whole = caps.get(0).expect("whole match");
                let name = caps.get(1).expect("section name").as_str();
                let end = matches
                    .get(i + 1)
                    .map_or(text.len(), |next| next.get(0).expect("whole match").start());
                (name, &text[whole.start()..end])
            })
            .collect()
    }

    /// Declared count from the top-level block, scoped between the first
    /// full `[SavedDialogHistory]` line and the first subsection header.
    fn top_history_count(text: &str) -> i64 {
        let hdr = match TOP_HEADER_RE.find(text) {
            Some(m) => m,
            None => return 0,
        };
        let scope_end = SECTION_RE
            .find_at(text, hdr.end())
            .map_or(text.len(), |m| m.start());
        TOP_COUNT_RE
            .captures(&text[hdr.end()..scope_end])
            .and_then(|caps| caps.get(1).expect("count digits").as_str().parse().ok())
            .unwrap_or(0)
    }
}

impl HistoryFormat for DialogsFormat {
    fn header(&self) -> &'static str {
        DIALOGS_HEADER
    }

    fn export(&self, text: &str) -> Result<Value> {
        encode_doc(&self.parse(text)?)
    }

    fn import(&self, data: &Value) -> Result<String> {
        self.render(&decode_doc(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HX_A0: &str = "0028c8515035dc01";
    const HX_A1: &str = "80be60525035dc01";
    const HX_B0: &str = "0055f9525035dc01";
    const HX_B1: &str = "00ec924e5035dc01";

    fn mock_hst() -> String {
        format!(
            "[SavedDialogHistory]\nHistoryCount=4\n\n\
             [SavedDialogHistory/NewFolder]\nLines=\"Audiobooks\\nassets\"\nLocks=000\nPosition=-1\nTimes={HX_A0} {HX_A1}\n\n\
             [SavedDialogHistory/Copy]\nLines=\"/path/A\\n/path/B\"\nLocks=\nPosition=-1\nTimes={HX_B0} {HX_B1}\n\n"
        )
    }

    #[test]
    fn test_parse_categories_in_document_order() {
        let doc = DialogsFormat.parse(&mock_hst()).unwrap();
        assert_eq!(doc.header, "[SavedDialogHistory]");
        assert_eq!(doc.history_count, 4);
        let names: Vec<&str> = doc.categories.iter().map(|c| c.name.as_str()).collect();
        // Document order, not alphabetical.
        assert_eq!(names, vec!["NewFolder", "Copy"]);
        let a = &doc.categories[0];
        assert_eq!(a.locks, "000");
        assert_eq!(a.history.len(), 2);
        assert_eq!(a.history[0].line, "Audiobooks");
        assert_eq!(a.history[0].time_hex.as_deref(), Some(HX_A0));
    }

    #[test]
    fn test_parse_entry_beyond_times_gets_none() {
        let text = format!(
            "[SavedDialogHistory]\nHistoryCount=1\n\n\
             [SavedDialogHistory/Copy]\nLines=\"a\\nb\"\nLocks=\nPosition=-1\nTimes={HX_B0}\n\n"
        );
        let doc = DialogsFormat.parse(&text).unwrap();
        let hist = &doc.categories[0].history;
        assert_eq!(hist.len(), 2);
        assert_eq!(hist[1].time_hex, None);
        assert_eq!(hist[1].time_iso, None);
    }

    #[test]
    fn test_parse_without_top_header_defaults_count() {
        let text = format!(
            "[SavedDialogHistory/Copy]\nLines=\"a\"\nLocks=\nPosition=-1\nTimes={HX_B0}\n\n"
        );
        let doc = DialogsFormat.parse(&text).unwrap();
        assert_eq!(doc.history_count, 0);
        assert_eq!(doc.categories.len(), 1);
    }

    #[test]
    fn test_roundtrip() {
        let original = mock_hst();
        let doc = DialogsFormat.parse(&original).unwrap();
        assert_eq!(DialogsFormat.render(&doc).unwrap(), original);
    }

    #[test]
    fn test_render_preserves_declared_count() {
        let mut doc = DialogsFormat.parse(&mock_hst()).unwrap();
        doc.categories.pop();
        // Declared count stays 4 even though the sections hold 2 entries now.
        let text = DialogsFormat.render(&doc).unwrap();
        assert!(text.starts_with("[SavedDialogHistory]\nHistoryCount=4\n\n"));
    }

    #[test]
    fn test_render_unnamed_placeholder() {
        let mut doc = DialogsFormat.parse(&mock_hst()).unwrap();
        doc.categories[0].name = String::new();
        let text = DialogsFormat.render(&doc).unwrap();
        assert!(text.contains("[SavedDialogHistory/Unnamed]\n"));
    }
}
