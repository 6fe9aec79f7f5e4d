use tracing::debug;

use crate::artifact::Artifact;
use crate::codebook::Codebook;
use crate::config::CodecConfig;
use crate::decoder;
use crate::encoder;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::HuffmanTree;
use crate::metadata::{ArtifactRecord, RasterShape};
use crate::store::ArtifactStore;

/// Compress and decompress entry points.
///
/// Holds only configuration; every call builds its own table, tree and
/// codebook, so one codec can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct HuffmanCodec {
    config: CodecConfig,
}

impl HuffmanCodec {
    pub fn new(config: CodecConfig) -> Self {
        HuffmanCodec { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn compress(&self, data: &[u8]) -> Result<Artifact> {
        if data.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }
        if data.len() > self.config.max_input_bytes {
            return Err(HuffmanError::InputTooLarge {
                len: data.len(),
                max: self.config.max_input_bytes,
            });
        }

        let frequencies = FrequencyTable::from_bytes(data);
        let tree = HuffmanTree::from_frequencies(&frequencies)?;
        let codebook = Codebook::from_tree(&tree);
        let bits = encoder::encode(data, &codebook)?;

        debug!(
            original_bytes = data.len(),
            distinct_symbols = codebook.len(),
            max_code_len = codebook.max_code_len(),
            packed_bits = bits.bit_count(),
            "compressed"
        );

        Ok(Artifact {
            codebook,
            bits,
            original_length: data.len(),
        })
    }

    pub fn decompress(&self, artifact: &Artifact) -> Result<Vec<u8>> {
        let data = decoder::decode(&artifact.bits, &artifact.codebook, artifact.original_length)?;
        debug!(
            packed_bits = artifact.bits.bit_count(),
            original_bytes = data.len(),
            "decompressed"
        );
        Ok(data)
    }

    pub fn compress_to_blob(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.compress(data)?.to_bytes()
    }

    pub fn decompress_blob(&self, blob: &[u8]) -> Result<Vec<u8>> {
        self.decompress(&Artifact::from_bytes(blob)?)
    }

    /// Compresses `data` and stores it, with `shape`, under `key`.
    pub fn compress_into_store<S: ArtifactStore + ?Sized>(
        &self,
        store: &mut S,
        key: &str,
        data: &[u8],
        shape: Option<RasterShape>,
    ) -> Result<Artifact> {
        let artifact = self.compress(data)?;
        store.put(key, &ArtifactRecord::new(artifact.to_bytes()?, shape))?;
        Ok(artifact)
    }

    /// Looks up `key` and decompresses it, returning the bytes together
    /// with the shape stored at compress time.
    pub fn decompress_from_store<S: ArtifactStore + ?Sized>(
        &self,
        store: &S,
        key: &str,
    ) -> Result<(Vec<u8>, Option<RasterShape>)> {
        let record = store.get(key)?;
        let data = self.decompress_blob(&record.blob)?;
        Ok((data, record.shape))
    }
}
