//! `[SavedHistory]` (commands.hst) service: directory/command pairs.

use serde_json::Value;

use crate::core::lexer::{extract_quoted_block, extract_simple_pair, COMMANDS_HEADER};
use crate::core::lines::{join_items, split_items};
use crate::error::Result;
use crate::model::{CommandRecord, CommandsDoc, CommandsMeta};

use super::{
    decode_doc, encode_doc, hex_for_record, iso_for_hex, parse_count, parse_position,
    split_hex_tokens, HistoryFormat,
};

pub struct CommandsFormat;

impl CommandsFormat {
    /// Parse commands.hst text into a typed document.
    ///
    /// `Extras` (directories) and `Lines` (commands) are parallel lists
    /// paired by index; when their lengths differ the longer list wins and
    /// the shorter side pads with empty strings. The declared `HistoryCount`
    /// is kept in metadata but never trusted over the derived length.
    pub fn parse(&self, text: &str) -> Result<CommandsDoc> {
        let (extras_raw, rest) = extract_quoted_block(text, "Extras");
        let (history_count, rest) = extract_simple_pair(&rest, "HistoryCount");
        let (lines_raw, rest) = extract_quoted_block(&rest, "Lines");
        let (times_str, rest) = extract_simple_pair(&rest, "Times");
        let (locks, rest) = extract_simple_pair(&rest, "Locks");
        let (position, _rest) = extract_simple_pair(&rest, "Position");

        let dirs = split_items(&extras_raw);
        let cmds = split_items(&lines_raw);
        let hex_list = split_hex_tokens(&times_str);

        let n = dirs.len().max(cmds.len());
        let mut history = Vec::with_capacity(n);
        for i in 0..n {
            history.push(CommandRecord {
                dir: dirs.get(i).cloned().unwrap_or_default(),
                command: cmds.get(i).cloned().unwrap_or_default(),
                time_hex: hex_list.get(i).cloned(),
                time_iso: hex_list.get(i).and_then(|hx| iso_for_hex(hx)),
            });
        }

        Ok(CommandsDoc {
            header: COMMANDS_HEADER.to_string(),
            locks,
            position: parse_position(&position)?,
            history,
            meta: CommandsMeta {
                history_count: parse_count(&history_count, cmds.len())?,
                extras_style: "escaped".to_string(),
                lines_style: "escaped".to_string(),
            },
        })
    }

    /// Serialize a document back into commands.hst text.
    ///
    /// `HistoryCount` is recomputed from the reconciled command-list length,
    /// and the `Times` line is padded with synthesized values so it always
    /// aligns with the commands.
    pub fn render(&self, doc: &CommandsDoc) -> Result<String> {
        let dirs: Vec<&str> = doc.history.iter().map(|r| r.dir.as_str()).collect();
        let cmds: Vec<&str> = doc.history.iter().map(|r| r.command.as_str()).collect();

        let mut times: Vec<String> = doc
            .history
            .iter()
            .map(|r| hex_for_record(r.time_hex.as_deref(), r.time_iso.as_deref()))
            .collect();
        while times.len() < cmds.len() {
            times.push(hex_for_record(None, None));
        }
        times.truncate(cmds.len());

        Ok(format!(
            "{header}\nExtras=\"{extras}\"\nHistoryCount={count}\nLines=\"{lines}\"\nLocks={locks}\nPosition={position}\nTimes={times}\n",
            header = COMMANDS_HEADER,
            extras = join_items(&dirs),
            count = cmds.len(),
            lines = join_items(&cmds),
            locks = doc.locks,
            position = doc.position,
            times = times.join(" "),
        ))
    }
}

impl HistoryFormat for CommandsFormat {
    fn header(&self) -> &'static str {
        COMMANDS_HEADER
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

    const HX0: &str = "0028c8515035dc01";
    const HX1: &str = "80be60525035dc01";

    fn mock_hst() -> String {
        format!(
            "[SavedHistory]\nExtras=\"/a\\n/b\"\nHistoryCount=2\nLines=\"cmd1\\ncmd2\"\nLocks=\nPosition=-1\nTimes={HX0} {HX1}\n"
        )
    }

    #[test]
    fn test_parse_pairs_by_index() {
        let doc = CommandsFormat.parse(&mock_hst()).unwrap();
        assert_eq!(doc.header, "[SavedHistory]");
        assert_eq!(doc.history.len(), 2);
        assert_eq!(doc.history[0].dir, "/a");
        assert_eq!(doc.history[0].command, "cmd1");
        assert_eq!(doc.history[0].time_hex.as_deref(), Some(HX0));
        assert!(doc.history[0]
            .time_iso
            .as_deref()
            .unwrap()
            .starts_with("2025-10-04T17:00:00"));
        assert_eq!(doc.history[1].dir, "/b");
        assert_eq!(doc.meta.history_count, 2);
    }

    #[test]
    fn test_parse_pads_shorter_list() {
        let text = format!(
            "[SavedHistory]\nExtras=\"/a\\n/b\"\nHistoryCount=3\nLines=\"c1\\nc2\\nc3\"\nLocks=\nPosition=-1\nTimes={HX0} {HX1}\n"
        );
        let doc = CommandsFormat.parse(&text).unwrap();
        assert_eq!(doc.history.len(), 3);
        assert_eq!(doc.history[2].dir, "");
        assert_eq!(doc.history[2].command, "c3");
        assert_eq!(doc.history[2].time_hex, None);
    }

    #[test]
    fn test_roundtrip() {
        let original = mock_hst();
        let doc = CommandsFormat.parse(&original).unwrap();
        assert_eq!(CommandsFormat.render(&doc).unwrap(), original);
    }

    #[test]
    fn test_render_synthesizes_missing_times() {
        let mut doc = CommandsFormat.parse(&mock_hst()).unwrap();
        doc.history[1].time_hex = None;
        doc.history[1].time_iso = None;
        let text = CommandsFormat.render(&doc).unwrap();
        let times_line = text
            .lines()
            .find(|l| l.starts_with("Times="))
            .unwrap();
        let tokens: Vec<&str> = times_line["Times=".len()..].split_whitespace().collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0], HX0);
        assert_eq!(tokens[1].len(), 16);
    }
}
