use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{NvmeError, Result};
use crate::types::{Tag, tag_spelling};

/// Tags known to appear in Hi-Si NVME images, in report order.
pub const DEFAULT_ENTRIES: &[(&str, &str)] = &[
    ("53575645525349", "SWVERSI"),
    ("424F4152444944", "BOARDID"),
    ("534E", "SN"),
    ("4D414341444452", "MACADDR"),
    ("4D44415445", "MDATE"),
    ("4553575652", "ESWVR"),
    ("4953575652", "ISWVR"),
    ("4548575652", "EHWVR"),
    ("4948575652", "IHWVR"),
    ("544D4D49", "TMMI"),
    ("4D4143574C414E", "MACWLAN"),
    ("4D41434254", "MACBT"),
    ("57564C4F434B", "WVLOCK"),
    ("57564445564944", "WVDEVID"),
    ("48494D4E544E", "HIMNTN"),
    ("44554D5043544C", "DUMPCTL"),
    // FRP key values are binary and usually come out as a raw dump.
    ("4652504B4559", "FRPKEY"),
    ("53504B5F5041", "SPK_PA"),
    ("4249444241434B", "BIDBACK"),
    ("5450434F4C4F52", "TPCOLOR"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub tag: Tag,
    pub name: String,
}

impl CatalogEntry {
    pub fn new(tag: Tag, name: impl Into<String>) -> Self {
        Self {
            tag,
            name: name.into(),
        }
    }

    pub fn hex(tag: &str, name: &str) -> Self {
        Self::new(Tag::hex(tag), name)
    }
}

/// Ordered tag table. Iteration order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordCatalog {
    entries: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct RawEntry {
    tag: String,
    #[serde(default)]
    name: Option<String>,
}

impl RecordCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        DEFAULT_ENTRIES
            .iter()
            .map(|(tag, name)| CatalogEntry::hex(tag, name))
            .collect()
    }

    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    pub fn with_entry(mut self, tag: Tag, name: impl Into<String>) -> Self {
        self.push(CatalogEntry::new(tag, name));
        self
    }

    /// Parses a JSON array of `{"tag": "<hex>", "name": "<label>"}` objects.
    ///
    /// Tag hex is not validated here; a bad tag is reported on its own record
    /// during the scan. A missing name falls back to the tag's spelling.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: Vec<RawEntry> =
            serde_json::from_str(text).map_err(|e| NvmeError::InvalidCatalog(e.to_string()))?;

        if raw.is_empty() {
            return Err(NvmeError::InvalidCatalog(
                "catalog has no entries".to_string(),
            ));
        }

        Ok(raw
            .into_iter()
            .map(|entry| {
                let tag = Tag::hex(entry.tag);
                let name = entry.name.unwrap_or_else(|| default_name(&tag));
                CatalogEntry::new(tag, name)
            })
            .collect())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn default_name(tag: &Tag) -> String {
    match tag.resolve() {
        Ok(bytes) => tag_spelling(&bytes),
        Err(_) => tag.to_hex(),
    }
}

impl FromIterator<CatalogEntry> for RecordCatalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RecordCatalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
