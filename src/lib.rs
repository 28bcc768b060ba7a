//! far2l history file codec.
//!
//! Converts the four far2l history formats (`commands.hst`, `dialogs.hst`,
//! `folders.hst`, `view.hst`) into a JSON-compatible structure and back with
//! a byte-for-byte roundtrip guarantee.
//!
//! ```
//! use far2l_hst::core::lexer::detect_header;
//! use far2l_hst::format::{service_for_header, HistoryFormat};
//!
//! let text = "[SavedHistory]\nExtras=\"/a\"\nHistoryCount=1\nLines=\"ls\"\n\
//!             Locks=\nPosition=-1\nTimes=0028c8515035dc01\n";
//! let header = detect_header(text).unwrap();
//! let service = service_for_header(header).unwrap();
//! let doc = service.export(text).unwrap();
//! assert_eq!(service.import(&doc).unwrap(), text);
//! ```

pub mod core;
pub mod error;
pub mod format;
pub mod model;

pub use error::{HistoryError, Result};
pub use format::{service_for_header, HistoryFormat};
