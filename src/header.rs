use tracing::info;

use crate::error::{NvmeError, Result};
use crate::io::read_window;
use crate::scanner::find_tag;
use crate::types::{MAGIC_HEX, MAGIC_LEN, Offset, Tag};

/// Literal partition magic, `Hisi-NV-Partition`.
pub fn magic() -> Result<Vec<u8>> {
    Ok(Tag::hex(MAGIC_HEX).resolve()?.into_owned())
}

/// Locates and validates the partition header, returning its offset.
///
/// The offset is informational: record scanning always covers the whole
/// buffer.
pub fn locate_header(buffer: &[u8]) -> Result<Offset> {
    let expected = magic()?;

    let offset = match find_tag(buffer, &Tag::hex(MAGIC_HEX)) {
        Ok(offset) => offset,
        Err(NvmeError::TagNotFound { .. }) => {
            return Err(NvmeError::HeaderNotFound {
                magic: String::from_utf8_lossy(&expected).into_owned(),
            });
        }
        Err(e) => return Err(e),
    };

    verify_header_at(buffer, offset, &expected)?;
    info!(offset, "found partition header");
    Ok(offset)
}

/// Re-reads the header window at `offset` and compares it to `expected`.
pub fn verify_header_at(buffer: &[u8], offset: Offset, expected: &[u8]) -> Result<()> {
    let actual = read_window(buffer, offset, MAGIC_LEN);
    if actual != expected {
        return Err(NvmeError::HeaderMismatch {
            expected: String::from_utf8_lossy(expected).into_owned(),
            actual: actual.escape_ascii().to_string(),
        });
    }
    Ok(())
}
