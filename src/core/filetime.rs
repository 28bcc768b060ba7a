//! FILETIME helpers: convert between far2l/Windows FILETIME values and
//! ISO-8601 calendar time.
//!
//! A FILETIME is the number of 100-nanosecond ticks since 1601-01-01 UTC.
//! far2l stores one per history entry as an 8-byte little-endian hex token.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Ticks between 1601-01-01 and 1970-01-01.
pub const FILETIME_EPOCH: u64 = 116_444_736_000_000_000;

const TICKS_PER_SEC: i128 = 10_000_000;

#[derive(Error, Debug)]
pub enum FiletimeError {
    #[error("invalid hex timestamp: {0:?}")]
    InvalidHex(String),
    #[error("invalid ISO-8601 timestamp: {0:?}")]
    InvalidIso(String),
    #[error("timestamp out of representable range")]
    OutOfRange,
}

/// Decode an 8-byte little-endian hex token into a FILETIME value.
///
/// Shorter tokens are left-padded with `'0'`; longer ones keep their last
/// 16 characters. Only non-hex characters are an error.
pub fn hex_to_ticks(hex: &str) -> Result<u64, FiletimeError> {
    let trimmed = hex.trim();
    let count = trimmed.chars().count();
    let padded: String = if count < 16 {
        std::iter::repeat('0')
            .take(16 - count)
            .chain(trimmed.chars())
            .collect()
    } else {
        trimmed.chars().skip(count - 16).collect()
    };

    let mut bytes = [0u8; 8];
    for (i, byte) in bytes.iter_mut().enumerate() {
        let pair = padded
            .get(i * 2..i * 2 + 2)
            .ok_or_else(|| FiletimeError::InvalidHex(hex.to_string()))?;
        *byte = u8::from_str_radix(pair, 16)
            .map_err(|_| FiletimeError::InvalidHex(hex.to_string()))?;
    }
    Ok(u64::from_le_bytes(bytes))
}

/// Encode a FILETIME value as a 16-character lowercase little-endian hex token.
pub fn ticks_to_hex(ticks: u64) -> String {
    let mut out = String::with_capacity(16);
    for byte in ticks.to_le_bytes() {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// Render a FILETIME value as an ISO-8601 UTC timestamp string.
pub fn ticks_to_iso(ticks: u64) -> Result<String, FiletimeError> {
    let unix_ticks = ticks as i128 - FILETIME_EPOCH as i128;
    let secs = unix_ticks.div_euclid(TICKS_PER_SEC);
    let nanos = (unix_ticks.rem_euclid(TICKS_PER_SEC) * 100) as u32;

    let secs = i64::try_from(secs).map_err(|_| FiletimeError::OutOfRange)?;
    let dt = DateTime::<Utc>::from_timestamp(secs, nanos).ok_or(FiletimeError::OutOfRange)?;
    Ok(dt.to_rfc3339_opts(SecondsFormat::AutoSi, false))
}

/// Parse an ISO-8601 timestamp into a FILETIME value.
///
/// A trailing `Z` is accepted as UTC; a timestamp with no offset at all is
/// assumed to be UTC.
pub fn iso_to_ticks(iso: &str) -> Result<u64, FiletimeError> {
    let trimmed = iso.trim();
    let utc: DateTime<Utc> = match DateTime::parse_from_rfc3339(trimmed) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(_) => NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|_| FiletimeError::InvalidIso(iso.to_string()))?
            .and_utc(),
    };
    datetime_to_ticks(utc)
}

/// Current UTC time as a FILETIME value.
pub fn now_ticks() -> u64 {
    // Utc::now() is always inside the representable FILETIME range.
    datetime_to_ticks(Utc::now()).unwrap_or(FILETIME_EPOCH)
}

fn datetime_to_ticks(dt: DateTime<Utc>) -> Result<u64, FiletimeError> {
    let unix_ticks =
        dt.timestamp() as i128 * TICKS_PER_SEC + (dt.timestamp_subsec_nanos() / 100) as i128;
    let total = unix_ticks + FILETIME_EPOCH as i128;
    u64::try_from(total).map_err(|_| FiletimeError::OutOfRange)
}
