use rayon::prelude::*;

use crate::artifact::Artifact;
use crate::error::Result;
use crate::huffman_codec::HuffmanCodec;

/// Compresses each input independently on the rayon pool.
/// Results keep the order of `inputs`; one failure does not affect the others.
pub fn compress_all<T>(codec: &HuffmanCodec, inputs: &[T]) -> Vec<Result<Artifact>>
where
    T: AsRef<[u8]> + Sync,
{
    inputs.par_iter()
        .map(|input| codec.compress(input.as_ref()))
        .collect()
}

/// Decompresses each artifact independently on the rayon pool.
pub fn decompress_all(codec: &HuffmanCodec, artifacts: &[Artifact]) -> Vec<Result<Vec<u8>>> {
    artifacts.par_iter()
        .map(|artifact| codec.decompress(artifact))
        .collect()
}
