use std::io::Cursor;

use serde::{Deserialize, Serialize};

use crate::bit_vec::BitVec;
use crate::codebook::{Code, Codebook};
use crate::error::{HuffmanError, Result};

const MAGIC: &[u8; 4] = b"NENH";
const FORMAT_VERSION: u8 = 1;

/// Everything needed to invert one compression: the codebook that drove
/// the encoder, the packed bits, and how many symbols they hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub codebook: Codebook,
    pub bits: BitVec,
    pub original_length: usize,
}

/// On-disk body, written after the magic and version byte.
#[derive(Serialize, Deserialize)]
struct ArtifactBody {
    // (symbol, code length, code bits)
    codes: Vec<(u8, u8, u128)>,
    bit_count: u64,
    #[serde(with = "serde_bytes")]
    packed: Vec<u8>,
    original_length: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    pub original_bytes: usize,
    pub packed_bits: usize,
    pub packed_bytes: usize,
    pub distinct_symbols: usize,
}

impl CompressionStats {
    /// Packed size over original size; below 1.0 means the data shrank.
    pub fn ratio(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        self.packed_bytes as f64 / self.original_bytes as f64
    }
}

impl Artifact {
    pub fn stats(&self) -> CompressionStats {
        CompressionStats {
            original_bytes: self.original_length,
            packed_bits: self.bits.bit_count(),
            packed_bytes: self.bits.as_bytes().len(),
            distinct_symbols: self.codebook.len(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let body = ArtifactBody {
            codes: self.codebook.iter()
                .map(|(byte, code)| (byte, code.len() as u8, code.bits()))
                .collect(),
            bit_count: self.bits.bit_count() as u64,
            packed: self.bits.as_bytes().to_vec(),
            original_length: self.original_length as u64,
        };

        let mut bytes = Vec::with_capacity(MAGIC.len() + 1 + body.packed.len() + 32);
        bytes.extend_from_slice(MAGIC);
        bytes.push(FORMAT_VERSION);
        bincode::serialize_into(&mut bytes, &body)
            .map_err(|e| HuffmanError::corrupt(format!("failed to serialize artifact: {}", e)))?;
        Ok(bytes)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Artifact> {
        let header_len = MAGIC.len() + 1;
        if data.len() < header_len || &data[..MAGIC.len()] != MAGIC {
            return Err(HuffmanError::corrupt("missing artifact magic"));
        }
        let version = data[MAGIC.len()];
        if version != FORMAT_VERSION {
            return Err(HuffmanError::corrupt(format!("unsupported format version {}", version)));
        }

        let mut cursor = Cursor::new(&data[header_len..]);
        let body: ArtifactBody = bincode::deserialize_from(&mut cursor)?;
        if cursor.position() as usize != data.len() - header_len {
            return Err(HuffmanError::corrupt("trailing bytes after artifact body"));
        }

        let mut codes = Vec::with_capacity(body.codes.len());
        for (byte, len, bits) in body.codes {
            let code = Code::new(bits, len)
                .ok_or_else(|| HuffmanError::corrupt(format!("invalid code for byte {}", byte)))?;
            codes.push((byte, code));
        }
        let symbol_count = codes.len();
        let codebook: Codebook = codes.into_iter().collect();
        if codebook.is_empty() {
            return Err(HuffmanError::corrupt("codebook is empty"));
        }
        if codebook.len() != symbol_count {
            return Err(HuffmanError::corrupt("codebook lists a symbol twice"));
        }

        let bit_count = usize::try_from(body.bit_count)
            .map_err(|_| HuffmanError::corrupt("bit count overflows usize"))?;
        let original_length = usize::try_from(body.original_length)
            .map_err(|_| HuffmanError::corrupt("original length overflows usize"))?;
        if original_length == 0 {
            return Err(HuffmanError::corrupt("artifact declares zero symbols"));
        }

        Ok(Artifact {
            codebook,
            bits: BitVec::from_parts(body.packed, bit_count)?,
            original_length,
        })
    }
}
