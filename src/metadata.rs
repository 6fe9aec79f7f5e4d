use serde::{Deserialize, Serialize};

use crate::error::{HuffmanError, Result};

/// Caller-side shape of the raw bytes, e.g. a single-band image.
/// The codec never interprets it; it travels next to the artifact blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterShape {
    pub width: u32,
    pub height: u32,
}

impl RasterShape {
    pub fn new(width: u32, height: u32) -> Self {
        RasterShape { width, height }
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// True when `len` bytes form a whole number of pixels of this shape.
    pub fn matches_len(&self, len: usize) -> bool {
        let pixels = self.pixel_count();
        pixels != 0 && (len as u64) % pixels == 0
    }
}

/// What a store keeps under one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    #[serde(with = "serde_bytes")]
    pub blob: Vec<u8>,
    pub shape: Option<RasterShape>,
}

impl ArtifactRecord {
    pub fn new(blob: Vec<u8>, shape: Option<RasterShape>) -> Self {
        ArtifactRecord { blob, shape }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| HuffmanError::corrupt(format!("failed to serialize record: {}", e)))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(data)?)
    }
}
