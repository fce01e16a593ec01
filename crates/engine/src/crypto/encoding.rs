//! Primitive decoders for plist value text: wrapped base64, big-endian
//! serial numbers and plist dates.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::domain::types::SerialNumber;

/// Format of `<date>` values in trust-store exports (always UTC).
pub const PLIST_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

fn is_base64_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '='
}

/// Drop everything outside the base64 alphabet. `<data>` text is wrapped
/// across lines and indented.
pub fn normalize_base64(text: &str) -> String {
    text.chars().filter(|c| is_base64_char(*c)).collect()
}

/// Normalize, then decode with the standard padded alphabet.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(normalize_base64(text))
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// `<data>` text holding a big-endian unsigned integer of any length.
pub fn decode_serial_number(text: &str) -> Result<SerialNumber, base64::DecodeError> {
    decode_base64(text).map(|bytes| SerialNumber::from_be_bytes(&bytes))
}

pub fn parse_plist_date(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), PLIST_DATE_FORMAT)?;
    Ok(Utc.from_utc_datetime(&naive))
}
