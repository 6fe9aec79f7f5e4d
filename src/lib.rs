//! # nen
//!
//! Huffman compression for raw byte payloads such as decoded image bands.
//!
//! Compression counts byte frequencies, builds an optimal prefix-free code
//! tree with deterministic tie-breaking, derives a codebook and packs the
//! input into a bitstream. The result is an [`Artifact`] that serializes to
//! an opaque blob; decompression inverts it exactly.
//!
//! ## Quick Start
//!
//! ```rust
//! use nen::{HuffmanCodec, MemoryStore, RasterShape};
//!
//! let codec = HuffmanCodec::default();
//! let pixels = vec![0u8, 0, 0, 7, 7, 255, 0, 0, 0];
//!
//! let blob = codec.compress_to_blob(&pixels)?;
//! assert_eq!(codec.decompress_blob(&blob)?, pixels);
//!
//! // keyed storage with side metadata
//! let mut store = MemoryStore::new();
//! codec.compress_into_store(&mut store, "tile", &pixels, Some(RasterShape::new(3, 3)))?;
//! let (restored, shape) = codec.decompress_from_store(&store, "tile")?;
//! assert_eq!(restored, pixels);
//! assert_eq!(shape, Some(RasterShape::new(3, 3)));
//! # Ok::<(), nen::HuffmanError>(())
//! ```

pub mod artifact;
pub mod batch;
pub mod codebook;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod metadata;
pub mod store;

// Internal modules - not part of public API
mod bit_vec;
mod min_heap;

// Re-export main types for convenience
pub use artifact::{Artifact, CompressionStats};
pub use bit_vec::BitVec;
pub use codebook::{Code, Codebook};
pub use config::CodecConfig;
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::HuffmanCodec;
pub use hufftree::{HuffNode, HuffmanTree};
pub use min_heap::HeapErr;
pub use metadata::{ArtifactRecord, RasterShape};
pub use store::{ArtifactStore, DirStore, MemoryStore};
