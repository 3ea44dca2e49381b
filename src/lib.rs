//! Hi-Si NVME partition image parser.
//!
//! Locates the `Hisi-NV-Partition` header, then reads each tagged record
//! (serial number, MAC addresses, board ID, versions) from the image.

pub mod analysis;
pub mod catalog;
pub mod cli;
pub mod error;
pub mod extraction;
pub mod header;
pub mod io;
pub mod scanner;
pub mod types;

pub use analysis::{scan_image, scan_image_with};
pub use catalog::{CatalogEntry, RecordCatalog};
pub use error::{NvmeError, Result};
pub use extraction::{extract_value, gap};
pub use header::locate_header;
pub use io::ImageSource;
pub use scanner::find_tag;
pub use types::{FieldValue, Record, RecordOutcome, ScanOptions, ScanReport, Tag};
