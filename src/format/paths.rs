//! Shared `Lines`/`Types`/`Times` service behind `[SavedFolderHistory]` and
//! `[SavedViewHistory]`; the two formats are structurally identical and
//! differ only in the header tag.

use serde_json::Value;

use crate::core::lexer::{extract_quoted_block, extract_simple_pair};
use crate::core::lines::{join_items, split_items};
use crate::error::Result;
use crate::model::{PathRecord, PathsDoc, PathsMeta};

use super::{
    decode_doc, encode_doc, hex_for_record, iso_for_hex, parse_count, parse_position,
    split_hex_tokens, HistoryFormat,
};

pub struct PathsFormat {
    header: &'static str,
}

impl PathsFormat {
    pub const fn new(header: &'static str) -> Self {
        Self { header }
    }

    /// Parse a Lines/Types/Times history into a typed document.
    ///
    /// `Types` is a contiguous string of single digits aligned to the paths
    /// by index; an index past its end or a non-digit character yields a
    /// `None` type flag. `Times` tokens align the same way.
    pub fn parse(&self, text: &str) -> Result<PathsDoc> {
        let (lines_raw, rest) = extract_quoted_block(text, "Lines");
        let (locks, rest) = extract_simple_pair(&rest, "Locks");
        let (history_count, rest) = extract_simple_pair(&rest, "HistoryCount");
        let (position, rest) = extract_simple_pair(&rest, "Position");
        let (times_str, rest) = extract_simple_pair(&rest, "Times");
        let (types_str, _rest) = extract_simple_pair(&rest, "Types");

        let paths = split_items(&lines_raw);
        let hex_list = split_hex_tokens(&times_str);
        let type_chars: Vec<char> = types_str.chars().collect();

        let history = paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| PathRecord {
                path,
                type_flag: type_chars
                    .get(i)
                    .and_then(|ch| ch.to_digit(10))
                    .map(i64::from),
                time_hex: hex_list.get(i).cloned(),
                time_iso: hex_list.get(i).and_then(|hx| iso_for_hex(hx)),
            })
            .collect::<Vec<_>>();

        Ok(PathsDoc {
            header: self.header.to_string(),
            locks,
            position: parse_position(&position)?,
            meta: PathsMeta {
                history_count: parse_count(&history_count, history.len())?,
                types_raw_length: type_chars.len(),
            },
            history,
        })
    }

    /// Serialize a document back to text; `HistoryCount` is recomputed from
    /// the path list and a `None` type flag renders as the digit `'0'`.
    pub fn render(&self, doc: &PathsDoc) -> Result<String> {
        let paths: Vec<&str> = doc.history.iter().map(|r| r.path.as_str()).collect();

        let times: Vec<String> = doc
            .history
            .iter()
            .map(|r| hex_for_record(r.time_hex.as_deref(), r.time_iso.as_deref()))
            .collect();

        let types: String = doc
            .history
            .iter()
            .map(|r| match r.type_flag {
                Some(flag) => flag.to_string(),
                None => "0".to_string(),
            })
            .collect();

        Ok(format!(
            "{header}\nHistoryCount={count}\nLines=\"{lines}\"\nLocks={locks}\nPosition={position}\nTimes={times}\nTypes={types}\n",
            header = self.header,
            count = paths.len(),
            lines = join_items(&paths),
            locks = doc.locks,
            position = doc.position,
            times = times.join(" "),
            types = types,
        ))
    }
}

impl HistoryFormat for PathsFormat {
    fn header(&self) -> &'static str {
        self.header
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
    use crate::format::{FOLDERS, VIEW};

    const HX0: &str = "0028c8515035dc01";
    const HX1: &str = "80be60525035dc01";
    const HX2: &str = "0055f9525035dc01";

    fn mock_folders_hst() -> String {
        format!(
            "[SavedFolderHistory]\nHistoryCount=3\nLines=\"/a\\n/b\\n/c\"\nLocks=000\nPosition=-1\nTimes={HX0} {HX1} {HX2}\nTypes=101\n"
        )
    }

    #[test]
    fn test_parse_types_alignment() {
        let doc = FOLDERS.parse(&mock_folders_hst()).unwrap();
        assert_eq!(doc.header, "[SavedFolderHistory]");
        assert_eq!(doc.locks, "000");
        let flags: Vec<Option<i64>> = doc.history.iter().map(|r| r.type_flag).collect();
        assert_eq!(flags, vec![Some(1), Some(0), Some(1)]);
        assert_eq!(doc.history[0].path, "/a");
        assert_eq!(doc.meta.types_raw_length, 3);
    }

    #[test]
    fn test_parse_short_types_yields_none() {
        let text = mock_folders_hst().replace("Types=101", "Types=1");
        let doc = FOLDERS.parse(&text).unwrap();
        let flags: Vec<Option<i64>> = doc.history.iter().map(|r| r.type_flag).collect();
        assert_eq!(flags, vec![Some(1), None, None]);
    }

    #[test]
    fn test_roundtrip() {
        let original = mock_folders_hst();
        let doc = FOLDERS.parse(&original).unwrap();
        assert_eq!(FOLDERS.render(&doc).unwrap(), original);
    }

    #[test]
    fn test_none_flag_renders_as_zero() {
        let mut doc = FOLDERS.parse(&mock_folders_hst()).unwrap();
        doc.history[1].type_flag = None;
        let text = FOLDERS.render(&doc).unwrap();
        assert!(text.contains("Types=101"));
        doc.history[0].type_flag = None;
        let text = FOLDERS.render(&doc).unwrap();
        assert!(text.contains("Types=001"));
    }

    #[test]
    fn test_view_shares_layout() {
        let original = format!(
            "[SavedViewHistory]\nHistoryCount=1\nLines=\"/file/one\"\nLocks=000\nPosition=-1\nTimes={HX0}\nTypes=1\n"
        );
        let doc = VIEW.parse(&original).unwrap();
        assert_eq!(doc.header, "[SavedViewHistory]");
        assert_eq!(VIEW.render(&doc).unwrap(), original);
    }
}
