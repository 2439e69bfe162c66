//! Fixed-width integers, length-prefixed UTF-8 strings, and length-prefixed
//! byte arrays — the primitives every variable header and payload is built
//! from (§4.1).

use crate::mqtt::common::ByteReader;
use crate::mqtt::result_code::DecodeError;
use alloc::vec::Vec;

pub fn read_u8(reader: &mut ByteReader<'_>) -> Result<u8, DecodeError> {
    reader.read_u8().ok_or(DecodeError::Truncated)
}

pub fn read_u16_be(reader: &mut ByteReader<'_>) -> Result<u16, DecodeError> {
    let bytes = reader.read_bytes(2).ok_or(DecodeError::Truncated)?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

pub fn read_u32_be(reader: &mut ByteReader<'_>) -> Result<u32, DecodeError> {
    let bytes = reader.read_bytes(4).ok_or(DecodeError::Truncated)?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Reject U+0000 and lone surrogate halves, as required for client
/// identifiers and topic strings (§4.1).
pub fn contains_disallowed_codepoints(s: &str) -> bool {
    s.chars().any(|c| c == '\u{0000}')
}

/// Reads a 2-byte length-prefixed UTF-8 string.
///
/// If the decoded length falls outside `min_len..=max_len`, the codec still
/// skips the declared number of bytes (so the cursor stays in sync) and
/// returns `Ok(None)` — the call site decides whether an absent optional
/// field is fine or a `ProtocolViolation`.
pub fn read_utf8_string<'a>(
    reader: &mut ByteReader<'a>,
    min_len: u16,
    max_len: u16,
) -> Result<Option<&'a str>, DecodeError> {
    let len = read_u16_be(reader)?;
    let bytes = reader.read_bytes(len as usize).ok_or(DecodeError::Truncated)?;
    if len < min_len || len > max_len {
        return Ok(None);
    }
    let s = core::str::from_utf8(bytes)
        .map_err(|_| DecodeError::ProtocolViolation("string is not valid utf-8"))?;
    Ok(Some(s))
}

pub fn read_byte_array<'a>(reader: &mut ByteReader<'a>) -> Result<&'a [u8], DecodeError> {
    let len = read_u16_be(reader)?;
    reader.read_bytes(len as usize).ok_or(DecodeError::Truncated)
}

/// A PUBLISH topic name must be non-empty and may not contain the
/// subscription wildcard characters (§4.3, invariant #6).
pub fn validate_topic_name(topic: &str) -> Result<(), DecodeError> {
    if topic.is_empty() || topic.contains(['+', '#']) || contains_disallowed_codepoints(topic) {
        return Err(DecodeError::InvalidTopic);
    }
    Ok(())
}

/// A SUBSCRIBE/UNSUBSCRIBE topic filter must be non-empty. Unlike a PUBLISH
/// topic name, wildcards ('+', '#') are exactly what a filter is for — only
/// emptiness and disallowed codepoints are rejected here.
pub fn validate_topic_filter(filter: &str) -> Result<(), DecodeError> {
    if filter.is_empty() || contains_disallowed_codepoints(filter) {
        return Err(DecodeError::InvalidTopic);
    }
    Ok(())
}

/// v3.1's client identifier rule: 1-23 characters drawn from
/// `[0-9a-zA-Z]`. v3.1.1 and v5 accept any valid UTF-8, including the empty
/// string, which this function never calls for (§4.5).
pub fn validate_client_id_v3_1(client_id: &str) -> Result<(), DecodeError> {
    let len = client_id.chars().count();
    if len < 1 || len > 23 {
        return Err(DecodeError::IdentifierRejected);
    }
    if !client_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DecodeError::IdentifierRejected);
    }
    Ok(())
}

pub fn write_u8(out: &mut Vec<u8>, v: u8) {
    out.push(v);
}

pub fn write_u16_be(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

pub fn write_u32_be(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

pub fn write_utf8_string(out: &mut Vec<u8>, s: &str) {
    write_u16_be(out, s.len() as u16);
    out.extend_from_slice(s.as_bytes());
}

pub fn write_byte_array(out: &mut Vec<u8>, bytes: &[u8]) {
    write_u16_be(out, bytes.len() as u16);
    out.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_round_trip() {
        let mut out = Vec::new();
        write_utf8_string(&mut out, "a/b");
        let mut reader = ByteReader::new(&out);
        assert_eq!(read_utf8_string(&mut reader, 0, 65535).unwrap(), Some("a/b"));
    }

    #[test]
    fn out_of_range_string_is_skipped_not_truncated() {
        let mut out = Vec::new();
        write_utf8_string(&mut out, "x");
        let mut reader = ByteReader::new(&out);
        assert_eq!(read_utf8_string(&mut reader, 2, 65535).unwrap(), None);
        assert_eq!(reader.remaining_len(), 0, "length-declared bytes must still be consumed");
    }

    #[test]
    fn byte_array_round_trip() {
        let mut out = Vec::new();
        write_byte_array(&mut out, &[0xAA, 0xBB]);
        let mut reader = ByteReader::new(&out);
        assert_eq!(read_byte_array(&mut reader).unwrap(), &[0xAA, 0xBB]);
    }

    #[test]
    fn truncated_u16_is_truncated_error() {
        let bytes = [0x00u8];
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(read_u16_be(&mut reader), Err(DecodeError::Truncated));
    }

    #[test]
    fn topic_with_wildcards_is_rejected() {
        assert!(validate_topic_name("a/+/c").is_err());
        assert!(validate_topic_name("a/#").is_err());
        assert!(validate_topic_name("").is_err());
        assert!(validate_topic_name("a/b").is_ok());
    }

    #[test]
    fn topic_filter_allows_wildcards_but_not_emptiness() {
        assert!(validate_topic_filter("a/+/c").is_ok());
        assert!(validate_topic_filter("y/#").is_ok());
        assert!(validate_topic_filter("").is_err());
    }

    #[test]
    fn v3_1_client_id_charset_and_length() {
        assert!(validate_client_id_v3_1("abcDEF012").is_ok());
        assert!(validate_client_id_v3_1("").is_err());
        assert!(validate_client_id_v3_1(&"a".repeat(24)).is_err());
        assert!(validate_client_id_v3_1("bad-id").is_err());
    }
}
