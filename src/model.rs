//! Typed JSON-facing documents produced by `export` and consumed by `import`.
//!
//! Field names mirror the JSON wire shape exactly. Defaults are deliberately
//! forgiving so hand-edited JSON with missing optional fields still imports;
//! `import` re-synthesizes anything a record lost.

use serde::{Deserialize, Serialize};

fn default_position() -> i64 {
    -1
}

/// One command-history entry: a working directory paired with the command
/// issued from it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CommandRecord {
    #[serde(default)]
    pub dir: String,
    #[serde(default)]
    pub command: String,
    #[serde(rename = "timeHex", default)]
    pub time_hex: Option<String>,
    #[serde(rename = "timeISO", default)]
    pub time_iso: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CommandsMeta {
    #[serde(rename = "historyCount", default)]
    pub history_count: i64,
    #[serde(rename = "extrasStyle", default)]
    pub extras_style: String,
    #[serde(rename = "linesStyle", default)]
    pub lines_style: String,
}

/// `[SavedHistory]` (commands.hst) document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsDoc {
    #[serde(rename = "Header", default)]
    pub header: String,
    #[serde(rename = "Locks", default)]
    pub locks: String,
    #[serde(rename = "Position", default = "default_position")]
    pub position: i64,
    #[serde(rename = "History", default)]
    pub history: Vec<CommandRecord>,
    #[serde(rename = "_meta", default)]
    pub meta: CommandsMeta,
}

/// One path entry for the folder and viewer histories.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathRecord {
    #[serde(default)]
    pub path: String,
    /// Single-digit classification code; `None` when the `Types` string was
    /// shorter than the path list or held a non-digit at this index.
    #[serde(rename = "typeFlag", default)]
    pub type_flag: Option<i64>,
    #[serde(rename = "timeHex", default)]
    pub time_hex: Option<String>,
    #[serde(rename = "timeISO", default)]
    pub time_iso: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathsMeta {
    #[serde(rename = "historyCount", default)]
    pub history_count: i64,
    #[serde(rename = "typesRawLength", default)]
    pub types_raw_length: usize,
}

/// `[SavedFolderHistory]` / `[SavedViewHistory]` document; the two formats
/// share one layout and differ only in the header tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsDoc {
    #[serde(rename = "Header", default)]
    pub header: String,
    #[serde(rename = "Locks", default)]
    pub locks: String,
    #[serde(rename = "Position", default = "default_position")]
    pub position: i64,
    #[serde(rename = "History", default)]
    pub history: Vec<PathRecord>,
    #[serde(rename = "_meta", default)]
    pub meta: PathsMeta,
}

/// One line of a dialog input-field history.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DialogEntry {
    #[serde(default)]
    pub line: String,
    #[serde(rename = "timeHex", default)]
    pub time_hex: Option<String>,
    #[serde(rename = "timeISO", default)]
    pub time_iso: Option<String>,
}

/// A named `[SavedDialogHistory/<Name>]` subsection with its own lock state,
/// cursor, and entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogCategory {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "Locks", default)]
    pub locks: String,
    #[serde(rename = "Position", default = "default_position")]
    pub position: i64,
    #[serde(rename = "History", default)]
    pub history: Vec<DialogEntry>,
}

/// `[SavedDialogHistory]` (dialogs.hst) document. `history_count` is the
/// declared top-level value, passed through verbatim on import rather than
/// recomputed from section contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogsDoc {
    #[serde(rename = "Header", default)]
    pub header: String,
    #[serde(rename = "HistoryCount", default)]
    pub history_count: i64,
    #[serde(rename = "Categories", default)]
    pub categories: Vec<DialogCategory>,
}
