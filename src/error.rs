use thiserror::Error;

/// Failure taxonomy shared by the lexer, the format services, and the
/// header registry. Timestamp decode failures inside a single record never
/// surface here; services degrade those to `None` per field.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("unknown history header: {0}")]
    UnknownHeader(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("schema error: {0}")]
    Schema(String),

    /// Reserved for strict-mode re-serialization checks.
    #[error("roundtrip error: {0}")]
    Roundtrip(String),
}

pub type Result<T> = std::result::Result<T, HistoryError>;
