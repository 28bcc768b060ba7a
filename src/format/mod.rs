//! Per-format services: parse .hst text into a typed document and serialize
//! it back byte-for-byte, plus the header registry that dispatches between
//! them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::core::filetime::{hex_to_ticks, iso_to_ticks, now_ticks, ticks_to_hex, ticks_to_iso};
use crate::core::lexer::{COMMANDS_HEADER, DIALOGS_HEADER, FOLDERS_HEADER, VIEW_HEADER};
use crate::error::{HistoryError, Result};

pub mod commands;
pub mod dialogs;
pub mod paths;

pub use commands::CommandsFormat;
pub use dialogs::DialogsFormat;
pub use paths::PathsFormat;

/// Capability interface of one history-file kind.
///
/// `export` and `import` operate on `serde_json::Value` so the registry can
/// hand out a uniform service; each implementation also exposes typed
/// `parse`/`render` inherent methods for library callers.
pub trait HistoryFormat: Sync {
    /// The bracketed header tag this service handles.
    fn header(&self) -> &'static str;

    /// Parse raw .hst text into the JSON document for this format.
    fn export(&self, text: &str) -> Result<Value>;

    /// Serialize a JSON document previously produced by [`export`] (possibly
    /// edited) back into .hst text.
    ///
    /// [`export`]: HistoryFormat::export
    fn import(&self, data: &Value) -> Result<String>;
}

pub static COMMANDS: CommandsFormat = CommandsFormat;
pub static DIALOGS: DialogsFormat = DialogsFormat;
pub static FOLDERS: PathsFormat = PathsFormat::new(FOLDERS_HEADER);
pub static VIEW: PathsFormat = PathsFormat::new(VIEW_HEADER);

/// Resolve a header tag to its service.
pub fn service_for_header(header: &str) -> Result<&'static dyn HistoryFormat> {
    match header {
        COMMANDS_HEADER => Ok(&COMMANDS),
        DIALOGS_HEADER => Ok(&DIALOGS),
        FOLDERS_HEADER => Ok(&FOLDERS),
        VIEW_HEADER => Ok(&VIEW),
        other => Err(HistoryError::UnknownHeader(other.to_string())),
    }
}

// ---- shared helpers used by every service ----

pub(crate) fn encode_doc<T: Serialize>(doc: &T) -> Result<Value> {
    serde_json::to_value(doc).map_err(|e| HistoryError::Schema(e.to_string()))
}

pub(crate) fn decode_doc<T: DeserializeOwned>(data: &Value) -> Result<T> {
    serde_json::from_value(data.clone()).map_err(|e| HistoryError::Schema(e.to_string()))
}

/// Split a `Times` value into its whitespace-separated hex tokens.
pub(crate) fn split_hex_tokens(times: &str) -> Vec<String> {
    times.split_whitespace().map(str::to_string).collect()
}

/// Derive the ISO rendering of one hex token; undecodable tokens become
/// `None` instead of failing the parse.
pub(crate) fn iso_for_hex(token: &str) -> Option<String> {
    hex_to_ticks(token)
        .ok()
        .and_then(|ticks| ticks_to_iso(ticks).ok())
}

/// Three-tier timestamp fallback applied per record on import: the raw hex
/// is authoritative, the ISO string is second, and a synthesized current
/// FILETIME guarantees every record gets some valid value.
pub(crate) fn ticks_for_record(time_hex: Option<&str>, time_iso: Option<&str>) -> u64 {
    if let Some(hx) = time_hex.filter(|s| !s.trim().is_empty()) {
        if let Ok(ticks) = hex_to_ticks(hx) {
            return ticks;
        }
    }
    if let Some(iso) = time_iso.filter(|s| !s.trim().is_empty()) {
        if let Ok(ticks) = iso_to_ticks(iso) {
            return ticks;
        }
    }
    now_ticks()
}

pub(crate) fn hex_for_record(time_hex: Option<&str>, time_iso: Option<&str>) -> String {
    ticks_to_hex(ticks_for_record(time_hex, time_iso))
}

/// Parse a `Position` value; absent means "no selection".
pub(crate) fn parse_position(raw: &str) -> Result<i64> {
    if raw.is_empty() {
        return Ok(-1);
    }
    raw.parse()
        .map_err(|_| HistoryError::Parse(format!("Position is not an integer: {raw:?}")))
}

/// Parse a declared `HistoryCount`, falling back to the derived list length
/// when the field is absent.
pub(crate) fn parse_count(raw: &str, derived_len: usize) -> Result<i64> {
    if raw.is_empty() {
        return Ok(derived_len as i64);
    }
    raw.parse()
        .map_err(|_| HistoryError::Parse(format!("HistoryCount is not an integer: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filetime::FILETIME_EPOCH;

    #[test]
    fn test_registry_resolves_all_headers() {
        for hdr in crate::core::lexer::KNOWN_HEADERS {
            let svc = service_for_header(hdr).unwrap();
            assert_eq!(svc.header(), hdr);
        }
    }

    #[test]
    fn test_registry_rejects_unknown_header() {
        let err = service_for_header("[SavedNothing]").err().unwrap();
        assert!(matches!(err, HistoryError::UnknownHeader(_)));
    }

    #[test]
    fn test_ticks_for_record_prefers_hex() {
        let ticks = ticks_for_record(Some("0028c8515035dc01"), Some("1999-01-01T00:00:00Z"));
        assert_eq!(ticks_to_hex(ticks), "0028c8515035dc01");
    }

    #[test]
    fn test_ticks_for_record_falls_back_to_iso() {
        let via_iso = ticks_for_record(Some("not-hex"), Some("2025-10-04T17:00:00Z"));
        assert_eq!(via_iso, iso_to_ticks("2025-10-04T17:00:00Z").unwrap());
    }

    #[test]
    fn test_ticks_for_record_synthesizes_when_both_missing() {
        assert!(ticks_for_record(None, None) > FILETIME_EPOCH);
        assert!(ticks_for_record(Some(""), Some("")) > FILETIME_EPOCH);
    }

    #[test]
    fn test_parse_position_defaults() {
        assert_eq!(parse_position("").unwrap(), -1);
        assert_eq!(parse_position("7").unwrap(), 7);
        assert!(parse_position("x").is_err());
    }
}
