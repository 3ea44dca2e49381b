use memchr::memmem;

use crate::error::{NvmeError, Result};
use crate::types::{Offset, Tag};

/// Offset of the first occurrence of `tag` in `buffer`.
///
/// Hex tags are decoded before searching. The search is forward,
/// case-sensitive and covers the whole buffer.
pub fn find_tag(buffer: &[u8], tag: &Tag) -> Result<Offset> {
    if buffer.is_empty() {
        return Err(NvmeError::BufferEmpty);
    }

    let needle = tag.resolve()?;
    find_bytes(buffer, &needle).ok_or_else(|| NvmeError::TagNotFound {
        tag: tag.to_hex(),
    })
}

/// Raw first-occurrence search. An empty needle never matches.
pub fn find_bytes(buffer: &[u8], needle: &[u8]) -> Option<Offset> {
    if needle.is_empty() {
        return None;
    }
    memmem::find(buffer, needle)
}
