use rayon::prelude::*;
use tracing::{debug, warn};

use crate::catalog::{CatalogEntry, RecordCatalog};
use crate::error::{NvmeError, Result};
use crate::extraction::{extract_value_with_len, gap_with_max};
use crate::header::locate_header;
use crate::scanner::find_tag;
use crate::types::{Record, RecordOutcome, ScanOptions, ScanReport, tag_spelling};

/// Validates the image header and reads every catalog entry.
///
/// Image-level problems (empty buffer, missing or mismatched header) fail the
/// whole scan. Per-entry problems end up in that entry's record.
pub fn scan_image(buffer: &[u8], catalog: &RecordCatalog) -> Result<ScanReport> {
    scan_image_with(buffer, catalog, &ScanOptions::default())
}

pub fn scan_image_with(
    buffer: &[u8],
    catalog: &RecordCatalog,
    options: &ScanOptions,
) -> Result<ScanReport> {
    if buffer.is_empty() {
        return Err(NvmeError::BufferEmpty);
    }

    let header_offset = locate_header(buffer)?;
    let records = scan_records(buffer, catalog, options);

    Ok(ScanReport {
        header_offset,
        records,
    })
}

/// Per-entry pass without header validation. Output follows catalog order.
pub fn scan_records(buffer: &[u8], catalog: &RecordCatalog, options: &ScanOptions) -> Vec<Record> {
    if options.parallel {
        catalog
            .entries()
            .par_iter()
            .map(|entry| scan_entry(buffer, entry, options))
            .collect()
    } else {
        catalog
            .iter()
            .map(|entry| scan_entry(buffer, entry, options))
            .collect()
    }
}

pub fn scan_entry(buffer: &[u8], entry: &CatalogEntry, options: &ScanOptions) -> Record {
    let outcome = match read_entry(buffer, entry, options) {
        Ok(outcome) => outcome,
        Err(NvmeError::TagNotFound { tag }) => {
            debug!(name = %entry.name, %tag, "tag not present in image");
            RecordOutcome::TagNotFound
        }
        Err(e) => {
            warn!(name = %entry.name, error = %e, "failed to read record");
            RecordOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    Record {
        name: entry.name.clone(),
        tag: entry.tag.to_hex(),
        hex_len: entry.tag.hex_len(),
        outcome,
    }
}

fn read_entry(buffer: &[u8], entry: &CatalogEntry, options: &ScanOptions) -> Result<RecordOutcome> {
    let offset = find_tag(buffer, &entry.tag)?;
    let tag_bytes = entry.tag.resolve()?;
    let spelling = tag_spelling(&tag_bytes);
    let gap = gap_with_max(&spelling, options.max_gap)?;

    let value = extract_value_with_len(buffer, offset, gap, tag_bytes.len(), options.string_length);
    debug!(name = %entry.name, offset, gap, null = value.is_null(), "located tag");
    Ok(RecordOutcome::Found { offset, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldValue, Tag};

    fn image() -> Vec<u8> {
        let mut data = vec![0u8; 2048];
        data[16..33].copy_from_slice(b"Hisi-NV-Partition");
        data[1000..1002].copy_from_slice(b"SN");
        data[1020..1028].copy_from_slice(b"A1B2C3D4");
        data
    }

    #[test]
    fn test_scan_reads_serial() {
        let catalog = RecordCatalog::new().with_entry(Tag::hex("534E"), "SN");
        let report = scan_image(&image(), &catalog).unwrap();
        assert_eq!(report.header_offset, 16);
        assert_eq!(
            report.records[0].value(),
            Some(&FieldValue::Text("A1B2C3D4".into()))
        );
        assert_eq!(report.records[0].offset(), Some(1000));
    }

    #[test]
    fn test_gap_overflow_is_per_entry() {
        let catalog = RecordCatalog::new()
            .with_entry(Tag::bytes(b"Hisi-NV-Partition-XYZW".to_vec()), "LONG")
            .with_entry(Tag::hex("534E"), "SN");
        let mut data = image();
        data[200..222].copy_from_slice(b"Hisi-NV-Partition-XYZW");

        let report = scan_image(&data, &catalog).unwrap();
        assert!(matches!(report.records[0].outcome, RecordOutcome::Failed { .. }));
        assert!(report.records[1].is_found());
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let catalog = RecordCatalog::builtin();
        let data = image();
        let sequential = ScanOptions {
            parallel: false,
            ..ScanOptions::default()
        };
        assert_eq!(
            scan_records(&data, &catalog, &sequential),
            scan_records(&data, &catalog, &ScanOptions::default())
        );
    }

    #[test]
    fn test_empty_buffer_aborts() {
        let catalog = RecordCatalog::builtin();
        assert!(matches!(scan_image(&[], &catalog), Err(NvmeError::BufferEmpty)));
    }
}
