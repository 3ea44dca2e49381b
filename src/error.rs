use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NvmeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Image buffer is empty")]
    BufferEmpty,

    #[error("Could not interpret tag {tag:?} as bytes or hex: {reason}")]
    InvalidTagEncoding { tag: String, reason: String },

    #[error("Partition header not found (expected magic {magic:?})")]
    HeaderNotFound { magic: String },

    #[error("Expected header {expected:?} but got {actual:?}")]
    HeaderMismatch { expected: String, actual: String },

    #[error("Tag {tag} not found in image")]
    TagNotFound { tag: String },

    #[error("Tag spelling {spelling:?} is longer than the maximum gap of {max}")]
    GapOverflow { spelling: String, max: usize },

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

pub type Result<T> = std::result::Result<T, NvmeError>;
