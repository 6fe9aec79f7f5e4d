//! Bit-by-bit decoding against the tree shape recorded in a codebook.
//!
//! The decode tree is rebuilt from the stored codes, never from
//! frequencies, so it always matches the tree the encoder used.

use tracing::warn;

use crate::bit_vec::BitVec;
use crate::codebook::Codebook;
use crate::error::{HuffmanError, Result};

const ROOT: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeNode {
    Branch { children: [Option<u32>; 2] },
    Leaf(u8),
}

/// Arena form of the code tree; children are indices into `nodes`.
#[derive(Debug, Clone)]
pub struct DecodeTree {
    nodes: Vec<DecodeNode>,
}

impl DecodeTree {
    /// Fails when the codebook is empty or any code is a prefix of another.
    pub fn from_codebook(codebook: &Codebook) -> Result<Self> {
        if codebook.is_empty() {
            return Err(HuffmanError::corrupt("codebook is empty"));
        }

        let mut nodes = vec![DecodeNode::Branch { children: [None, None] }];

        for (byte, code) in codebook.iter() {
            let mut at = ROOT;
            for (i, bit) in code.iter().enumerate() {
                let last = i + 1 == code.len();
                let existing = match nodes[at] {
                    DecodeNode::Branch { children } => children[bit as usize],
                    DecodeNode::Leaf(other) => {
                        return Err(HuffmanError::corrupt(format!(
                            "code {} for byte {} extends the code of byte {}",
                            code, byte, other
                        )));
                    }
                };
                match (existing, last) {
                    (None, _) => {
                        let index = u32::try_from(nodes.len())
                            .map_err(|_| HuffmanError::corrupt("decode tree too large"))?;
                        nodes.push(if last {
                            DecodeNode::Leaf(byte)
                        } else {
                            DecodeNode::Branch { children: [None, None] }
                        });
                        if let DecodeNode::Branch { children } = &mut nodes[at] {
                            children[bit as usize] = Some(index);
                        }
                        at = index as usize;
                    }
                    (Some(_), true) => {
                        return Err(HuffmanError::corrupt(format!(
                            "code {} for byte {} collides with another code",
                            code, byte
                        )));
                    }
                    (Some(next), false) => at = next as usize,
                }
            }
        }

        Ok(DecodeTree { nodes })
    }

    fn step(&self, at: usize, bit: bool) -> Option<usize> {
        match self.nodes[at] {
            DecodeNode::Branch { children } => children[bit as usize].map(|i| i as usize),
            DecodeNode::Leaf(_) => None,
        }
    }

    fn symbol(&self, at: usize) -> Option<u8> {
        match self.nodes[at] {
            DecodeNode::Leaf(byte) => Some(byte),
            DecodeNode::Branch { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DecodeState {
    Accumulating { node: usize, depth: usize },
    Emitted(u8),
    Done,
    Failed(String),
}

/// Walks `bits` from the root, emitting a symbol at each leaf, and stops
/// after exactly `original_length` symbols. Bits past the declared bit
/// count are padding and never read.
pub fn decode(bits: &BitVec, codebook: &Codebook, original_length: usize) -> Result<Vec<u8>> {
    // every code is at least one bit long
    if original_length > bits.bit_count() {
        return Err(HuffmanError::corrupt(format!(
            "{} bits cannot hold {} symbols",
            bits.bit_count(),
            original_length
        )));
    }

    let tree = DecodeTree::from_codebook(codebook)?;
    let mut output = Vec::with_capacity(original_length);
    let mut cursor = 0usize;

    let mut state = if original_length == 0 {
        DecodeState::Done
    } else {
        DecodeState::Accumulating { node: ROOT, depth: 0 }
    };

    loop {
        state = match state {
            DecodeState::Accumulating { node, depth } => match bits.get(cursor) {
                None => DecodeState::Failed(format!(
                    "bitstream exhausted after {} of {} symbols",
                    output.len(),
                    original_length
                )),
                Some(bit) => {
                    cursor += 1;
                    match tree.step(node, bit) {
                        None => DecodeState::Failed(format!(
                            "bits at offset {} match no code",
                            cursor - depth - 1
                        )),
                        Some(next) => match tree.symbol(next) {
                            Some(byte) => DecodeState::Emitted(byte),
                            None => DecodeState::Accumulating { node: next, depth: depth + 1 },
                        },
                    }
                }
            },
            DecodeState::Emitted(byte) => {
                output.push(byte);
                if output.len() == original_length {
                    DecodeState::Done
                } else {
                    DecodeState::Accumulating { node: ROOT, depth: 0 }
                }
            }
            DecodeState::Done => break,
            DecodeState::Failed(message) => {
                warn!(%message, "decode failed");
                return Err(HuffmanError::corrupt(message));
            }
        };
    }

    if cursor != bits.bit_count() {
        let message = format!(
            "{} declared bits left over after {} symbols",
            bits.bit_count() - cursor,
            original_length
        );
        warn!(%message, "decode failed");
        return Err(HuffmanError::corrupt(message));
    }

    Ok(output)
}
