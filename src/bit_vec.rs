use crate::codebook::Code;
use crate::error::{HuffmanError, Result};

/// Packed bitstream, most significant bit first within each byte.
///
/// `bit_count` is exact; bits of the last byte beyond it are zero padding.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct BitVec {
    bits: Vec<u8>,
    bit_count: usize,
}

impl BitVec {
    pub fn new() -> Self {
        BitVec {
            bits: Vec::new(),
            bit_count: 0,
        }
    }

    pub fn with_capacity(bit_capacity: usize) -> Self {
        BitVec {
            bits: Vec::with_capacity(bit_capacity.div_ceil(8)),
            bit_count: 0,
        }
    }

    /// Rebuilds a bitstream from stored parts, rejecting a byte length
    /// that does not match the bit count.
    pub fn from_parts(bits: Vec<u8>, bit_count: usize) -> Result<Self> {
        if bits.len() != bit_count.div_ceil(8) {
            return Err(HuffmanError::corrupt(format!(
                "{} packed bytes cannot hold exactly {} bits",
                bits.len(),
                bit_count
            )));
        }
        let mut bit_vec = BitVec { bits, bit_count };
        bit_vec.clear_padding();
        Ok(bit_vec)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bits
    }

    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.bit_count {
            return None;
        }
        let byte = self.bits[index / 8];
        Some((byte >> (7 - index % 8)) & 1 == 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_count).filter_map(move |i| self.get(i))
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8; // which byte is target?
        let bit_offset = self.bit_count % 8; // which bit position is target?

        // make a new byte if needed
        if byte_index >= self.bits.len() {
            self.bits.push(0);
        }

        if bit {
            // set bit with OR  and mask
            self.bits[byte_index] |= 1 << (7 - bit_offset);
        }

        self.bit_count += 1;
    }

    pub fn push_code(&mut self, code: &Code) {
        for bit in code.iter() {
            self.push_bit(bit);
        }
    }

    /// Drops trailing bits, keeping the padding invariant.
    pub fn truncate(&mut self, bit_count: usize) {
        if bit_count >= self.bit_count {
            return;
        }
        self.bit_count = bit_count;
        self.bits.truncate(bit_count.div_ceil(8));
        self.clear_padding();
    }

    fn clear_padding(&mut self) {
        let used = self.bit_count % 8;
        if used != 0 {
            if let Some(last) = self.bits.last_mut() {
                *last &= 0xFFu8 << (8 - used);
            }
        }
    }
}
