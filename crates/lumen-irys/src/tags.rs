//! Upload tags and their Avro wire encoding
//!
//! Tags travel inside the signed data item as an Avro array of
//! `{name, value}` string records, the encoding the bundler node and the
//! public gateway index.

use crate::{IrysError, Result};
use serde::{Deserialize, Serialize};

/// Maximum number of tags on a single data item
pub const MAX_TAGS: usize = 128;
/// Maximum tag name length in bytes
pub const MAX_TAG_NAME_BYTES: usize = 1024;
/// Maximum tag value length in bytes
pub const MAX_TAG_VALUE_BYTES: usize = 3072;

/// A key/value metadata pair stored alongside an upload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name (e.g. "Content-Type")
    pub name: String,
    /// Tag value
    pub value: String,
}

impl Tag {
    /// Create a new tag
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Check tags against the wire-format bounds.
///
/// Caller-supplied tags are forwarded verbatim otherwise, so this is the
/// only line of defense against unbounded names and values.
pub fn validate_tags(tags: &[Tag]) -> Result<()> {
    if tags.len() > MAX_TAGS {
        return Err(IrysError::InvalidTag(format!(
            "too many tags: {} exceeds maximum {}",
            tags.len(),
            MAX_TAGS
        )));
    }
    for tag in tags {
        if tag.name.is_empty() {
            return Err(IrysError::InvalidTag("tag name must not be empty".to_string()));
        }
        if tag.name.len() > MAX_TAG_NAME_BYTES {
            return Err(IrysError::InvalidTag(format!(
                "tag name is {} bytes, maximum is {}",
                tag.name.len(),
                MAX_TAG_NAME_BYTES
            )));
        }
        if tag.value.len() > MAX_TAG_VALUE_BYTES {
            return Err(IrysError::InvalidTag(format!(
                "value of tag '{}' is {} bytes, maximum is {}",
                tag.name,
                tag.value.len(),
                MAX_TAG_VALUE_BYTES
            )));
        }
    }
    Ok(())
}

/// Encode tags as an Avro string-record array
pub fn encode_tags(tags: &[Tag]) -> Vec<u8> {
    if tags.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(tags.iter().map(|t| t.name.len() + t.value.len() + 4).sum());
    encode_long(tags.len() as i64, &mut out);
    for tag in tags {
        encode_long(tag.name.len() as i64, &mut out);
        out.extend_from_slice(tag.name.as_bytes());
        encode_long(tag.value.len() as i64, &mut out);
        out.extend_from_slice(tag.value.as_bytes());
    }
    // Avro array block terminator
    encode_long(0, &mut out);
    out
}

/// Decode an Avro string-record array back into tags
pub fn decode_tags(bytes: &[u8]) -> Result<Vec<Tag>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    let mut pos = 0usize;
    let mut tags = Vec::new();
    loop {
        let count = decode_long(bytes, &mut pos)?;
        if count == 0 {
            break;
        }
        // Negative block counts are followed by a byte size we don't need
        let count = if count < 0 {
            decode_long(bytes, &mut pos)?;
            -count
        } else {
            count
        };
        for _ in 0..count {
            let name = decode_string(bytes, &mut pos)?;
            let value = decode_string(bytes, &mut pos)?;
            tags.push(Tag { name, value });
        }
    }
    Ok(tags)
}

/// Avro long: zigzag then base-128 varint, little-endian groups
fn encode_long(n: i64, out: &mut Vec<u8>) {
    let mut z = ((n << 1) ^ (n >> 63)) as u64;
    loop {
        let byte = (z & 0x7f) as u8;
        z >>= 7;
        if z == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}

fn decode_long(bytes: &[u8], pos: &mut usize) -> Result<i64> {
    let mut z: u64 = 0;
    let mut shift = 0u32;
    loop {
        let byte = *bytes
            .get(*pos)
            .ok_or_else(|| IrysError::Serialization("truncated tag encoding".to_string()))?;
        *pos += 1;
        z |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
        if shift > 63 {
            return Err(IrysError::Serialization("varint overflow in tag encoding".to_string()));
        }
    }
    Ok(((z >> 1) as i64) ^ -((z & 1) as i64))
}

fn decode_string(bytes: &[u8], pos: &mut usize) -> Result<String> {
    let len = decode_long(bytes, pos)?;
    let len = usize::try_from(len)
        .map_err(|_| IrysError::Serialization("negative string length in tag encoding".to_string()))?;
    let end = pos
        .checked_add(len)
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| IrysError::Serialization("truncated tag string".to_string()))?;
    let s = std::str::from_utf8(&bytes[*pos..end])
        .map_err(|e| IrysError::Serialization(format!("tag string is not UTF-8: {}", e)))?
        .to_string();
    *pos = end;
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encoded_long(n: i64) -> Vec<u8> {
        let mut out = Vec::new();
        encode_long(n, &mut out);
        out
    }

    #[test]
    fn test_long_encoding_vectors() {
        assert_eq!(encoded_long(0), vec![0x00]);
        assert_eq!(encoded_long(-1), vec![0x01]);
        assert_eq!(encoded_long(1), vec![0x02]);
        assert_eq!(encoded_long(63), vec![0x7e]);
        assert_eq!(encoded_long(64), vec![0x80, 0x01]);
    }

    #[test]
    fn test_single_tag_wire_bytes() {
        let bytes = encode_tags(&[Tag::new("a", "b")]);
        assert_eq!(bytes, vec![0x02, 0x02, b'a', 0x02, b'b', 0x00]);
    }

    #[test]
    fn test_empty_tags_encode_to_nothing() {
        assert!(encode_tags(&[]).is_empty());
        assert!(decode_tags(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_roundtrip() {
        let tags = vec![
            Tag::new("Content-Type", "text/plain"),
            Tag::new("App-Name", "Lumen-Protocol-v1"),
        ];
        assert_eq!(decode_tags(&encode_tags(&tags)).unwrap(), tags);
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let err = validate_tags(&[Tag::new("", "x")]).unwrap_err();
        assert!(matches!(err, IrysError::InvalidTag(_)));
    }

    #[test]
    fn test_validate_rejects_oversized_value() {
        let tag = Tag::new("k", "v".repeat(MAX_TAG_VALUE_BYTES + 1));
        assert!(validate_tags(&[tag]).is_err());
    }

    #[test]
    fn test_validate_rejects_too_many() {
        let tags: Vec<Tag> = (0..=MAX_TAGS).map(|i| Tag::new(format!("k{}", i), "v")).collect();
        assert!(validate_tags(&tags).is_err());
    }

    #[test]
    fn test_truncated_input_errors() {
        let mut bytes = encode_tags(&[Tag::new("name", "value")]);
        bytes.truncate(bytes.len() - 3);
        assert!(decode_tags(&bytes).is_err());
    }

    proptest! {
        #[test]
        fn prop_roundtrip(pairs in proptest::collection::vec(("[a-zA-Z0-9-]{1,24}", ".{0,64}"), 0..16)) {
            let tags: Vec<Tag> = pairs.into_iter().map(|(n, v)| Tag::new(n, v)).collect();
            prop_assert_eq!(decode_tags(&encode_tags(&tags)).unwrap(), tags);
        }
    }
}
