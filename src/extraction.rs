use tracing::trace;

use crate::error::{NvmeError, Result};
use crate::io::read_window;
use crate::types::{Decoding, FieldValue, MAX_GAP, Offset, STRING_LENGTH};

/// Padding between the end of a tag's spelling and its value field.
pub fn gap(spelling: &str) -> Result<usize> {
    gap_with_max(spelling, MAX_GAP)
}

pub fn gap_with_max(spelling: &str, max_gap: usize) -> Result<usize> {
    max_gap
        .checked_sub(spelling.chars().count())
        .ok_or_else(|| NvmeError::GapOverflow {
            spelling: spelling.to_string(),
            max: max_gap,
        })
}

/// Absolute position of a value field. `None` if it would overflow.
#[inline]
pub fn value_position(tag_offset: Offset, tag_byte_length: usize, gap: usize) -> Option<Offset> {
    tag_offset.checked_add(tag_byte_length)?.checked_add(gap)
}

/// Reads and decodes the value field of a tag found at `tag_offset`.
pub fn extract_value(
    buffer: &[u8],
    tag_offset: Offset,
    gap: usize,
    tag_byte_length: usize,
) -> FieldValue {
    extract_value_with_len(buffer, tag_offset, gap, tag_byte_length, STRING_LENGTH)
}

pub fn extract_value_with_len(
    buffer: &[u8],
    tag_offset: Offset,
    gap: usize,
    tag_byte_length: usize,
    string_length: usize,
) -> FieldValue {
    let Some(position) = value_position(tag_offset, tag_byte_length, gap) else {
        return FieldValue::Null;
    };
    let field = read_window(buffer, position, string_length);
    let (text, decoding) = decode_field(field);
    trace!(position, len = field.len(), ?decoding, "decoded value field");
    meaningful(text)
}

type Decoder = fn(&[u8]) -> Option<String>;

const DECODERS: [(Decoding, Decoder); 3] = [
    (Decoding::Strict, decode_strict),
    (Decoding::Lenient, decode_lenient),
    (Decoding::Raw, decode_raw),
];

/// Decodes a value field, trying each decoder in order until one succeeds.
/// NUL bytes are padding wherever they sit in the field and are dropped.
pub fn decode_field(field: &[u8]) -> (String, Decoding) {
    let content: Vec<u8> = field.iter().copied().filter(|&b| b != 0).collect();

    for (decoding, decoder) in DECODERS {
        if let Some(text) = decoder(&content) {
            return (text, decoding);
        }
    }
    (String::new(), Decoding::Raw)
}

fn decode_strict(bytes: &[u8]) -> Option<String> {
    if bytes.is_ascii() {
        Some(bytes.iter().map(|&b| b as char).collect())
    } else {
        None
    }
}

/// Keeps printable ASCII only. An empty result is still a successful decode.
fn decode_lenient(bytes: &[u8]) -> Option<String> {
    Some(
        bytes
            .iter()
            .filter(|b| b.is_ascii_graphic() || **b == b' ')
            .map(|&b| b as char)
            .collect(),
    )
}

fn decode_raw(bytes: &[u8]) -> Option<String> {
    Some(format!("b'{}'", bytes.escape_ascii()))
}

/// Replaces text with no alphanumeric character by the `NULL` sentinel.
pub fn meaningful(text: String) -> FieldValue {
    if text.chars().any(|c| c.is_ascii_alphanumeric()) {
        FieldValue::Text(text)
    } else {
        FieldValue::Null
    }
}
