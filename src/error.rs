//! Error types for compression, decompression and artifact storage.

use thiserror::Error;

use crate::min_heap::HeapErr;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Debug, Error)]
pub enum HuffmanError {
    /// Compress was called with zero bytes.
    #[error("no data: input is empty")]
    EmptyInput,

    /// The blob failed to parse, or its codebook, bitstream and length disagree.
    #[error("artifact unreadable: {message}")]
    CorruptArtifact { message: String },

    /// No artifact is stored under the requested key.
    #[error("no such artifact: {key}")]
    NotFound { key: String },

    /// The encoder saw a byte its codebook has no code for.
    #[error("internal consistency fault: byte {byte:#04x} has no code")]
    MissingCode { byte: u8 },

    /// Symbol counts sum past `usize::MAX`, so node weights cannot be represented.
    #[error("symbol counts overflow the weight type")]
    WeightOverflow,

    #[error("input too large: {len} bytes exceeds limit of {max}")]
    InputTooLarge { len: usize, max: usize },

    #[error("invalid artifact key: {key:?}")]
    InvalidKey { key: String },

    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    #[error("heap error: {0}")]
    Heap(#[from] HeapErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HuffmanError {
    pub fn corrupt<S: Into<String>>(message: S) -> Self {
        Self::CorruptArtifact { message: message.into() }
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn not_found<S: Into<String>>(key: S) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::CorruptArtifact { .. })
    }
}

impl From<bincode::Error> for HuffmanError {
    fn from(e: bincode::Error) -> Self {
        HuffmanError::corrupt(format!("malformed body: {}", e))
    }
}
