use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use crate::error::{NvmeError, Result};

pub type Offset = usize;

/// Hex spelling of `Hisi-NV-Partition`.
pub const MAGIC_HEX: &str = "486973692D4E562D506172746974696F6E";
pub const MAGIC_LEN: usize = 17;
pub const MAX_GAP: usize = 20;
pub const STRING_LENGTH: usize = 45;
pub const NULL_SENTINEL: &str = "NULL";
pub const TAG_NOT_FOUND_MARKER: &str = "<tag not found>";

/// A record tag, either as literal bytes or as the hex string the catalog
/// stores it as. Hex input is only decoded when the tag is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Bytes(Vec<u8>),
    Hex(String),
}

impl Tag {
    pub fn hex(value: impl Into<String>) -> Self {
        Tag::Hex(value.into())
    }

    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Tag::Bytes(value.into())
    }

    pub fn resolve(&self) -> Result<Cow<'_, [u8]>> {
        match self {
            Tag::Bytes(bytes) => Ok(Cow::Borrowed(bytes.as_slice())),
            Tag::Hex(text) => hex::decode(text)
                .map(Cow::Owned)
                .map_err(|e| NvmeError::InvalidTagEncoding {
                    tag: text.clone(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Length of the tag's hex spelling, as printed in debug output.
    pub fn hex_len(&self) -> usize {
        match self {
            Tag::Bytes(bytes) => bytes.len() * 2,
            Tag::Hex(text) => text.len(),
        }
    }

    pub fn to_hex(&self) -> String {
        match self {
            Tag::Bytes(bytes) => hex::encode_upper(bytes),
            Tag::Hex(text) => text.clone(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Human-readable spelling of resolved tag bytes (`534E` -> `SN`), one
/// character per byte.
pub fn tag_spelling(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoding {
    Strict,
    Lenient,
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Null => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Null => f.write_str(NULL_SENTINEL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    Found { offset: Offset, value: FieldValue },
    TagNotFound,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,
    pub tag: String,
    pub hex_len: usize,
    #[serde(flatten)]
    pub outcome: RecordOutcome,
}

impl Record {
    pub fn offset(&self) -> Option<Offset> {
        match self.outcome {
            RecordOutcome::Found { offset, .. } => Some(offset),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&FieldValue> {
        match &self.outcome {
            RecordOutcome::Found { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self.outcome, RecordOutcome::Found { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub max_gap: usize,
    pub string_length: usize,
    pub parallel: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_gap: MAX_GAP,
            string_length: STRING_LENGTH,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub header_offset: Offset,
    pub records: Vec<Record>,
}

impl ScanReport {
    pub fn found_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_found()).count()
    }

    pub fn get(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_tag_resolves_to_bytes() {
        let tag = Tag::hex("534E");
        assert_eq!(tag.resolve().unwrap().as_ref(), b"SN");
        assert_eq!(tag.hex_len(), 4);
    }

    #[test]
    fn test_odd_length_hex_is_invalid_encoding() {
        let err = Tag::hex("534").resolve().unwrap_err();
        assert!(matches!(err, NvmeError::InvalidTagEncoding { .. }));
    }

    #[test]
    fn test_non_hex_digits_are_invalid_encoding() {
        let err = Tag::hex("SN").resolve().unwrap_err();
        assert!(matches!(err, NvmeError::InvalidTagEncoding { .. }));
    }

    #[test]
    fn test_byte_tag_reports_hex_spelling() {
        let tag = Tag::bytes(b"SN".to_vec());
        assert_eq!(tag.to_hex(), "534E");
        assert_eq!(tag.hex_len(), 4);
    }

    #[test]
    fn test_spelling_counts_one_char_per_byte() {
        let spelling = tag_spelling(b"S\xffN");
        assert_eq!(spelling.chars().count(), 3);
        assert_eq!(tag_spelling(b"MACADDR"), "MACADDR");
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::Null.to_string(), "NULL");
        assert_eq!(FieldValue::Text("A1".into()).to_string(), "A1");
    }

    #[test]
    fn test_magic_hex_spells_partition_header() {
        let magic = Tag::hex(MAGIC_HEX).resolve().unwrap().into_owned();
        assert_eq!(magic, b"Hisi-NV-Partition");
        assert_eq!(magic.len(), MAGIC_LEN);
    }
}
