use std::fs::File;
use std::ops::Deref;
use std::path::Path;

use memmap2::Mmap;
use tracing::debug;

use crate::error::Result;
use crate::types::Offset;

enum Backing {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

/// Read-only view over a whole NVME image.
///
/// Files are memory mapped; zero-length files cannot be mapped and fall back
/// to an empty owned buffer so the scan can report them as empty images.
pub struct ImageSource {
    backing: Backing,
}

impl ImageSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let len = file.metadata()?.len();

        if len == 0 {
            debug!(path = %path.display(), "image file is empty");
            return Ok(Self::from_bytes(Vec::new()));
        }

        let mmap = unsafe { Mmap::map(&file) }?;

        #[cfg(unix)]
        {
            let _ = mmap.advise(memmap2::Advice::WillNeed);
        }

        debug!(path = %path.display(), size = mmap.len(), "mapped image");
        Ok(Self {
            backing: Backing::Mapped(mmap),
        })
    }

    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            backing: Backing::Owned(data.into()),
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match &self.backing {
            Backing::Mapped(mmap) => &mmap[..],
            Backing::Owned(data) => data.as_slice(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Up to `len` bytes from `offset`; short or empty past the end.
    #[inline]
    pub fn slice(&self, offset: Offset, len: usize) -> &[u8] {
        read_window(self.as_bytes(), offset, len)
    }
}

impl Deref for ImageSource {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for ImageSource {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Bounded window into `data`, clamped at the end like a short file read.
#[inline]
pub fn read_window(data: &[u8], offset: Offset, len: usize) -> &[u8] {
    if offset >= data.len() {
        return &[];
    }
    let end = offset.saturating_add(len).min(data.len());
    &data[offset..end]
}
