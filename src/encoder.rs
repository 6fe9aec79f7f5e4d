use tracing::error;

use crate::bit_vec::BitVec;
use crate::codebook::Codebook;
use crate::error::{HuffmanError, Result};

/// Concatenates each byte's code in input order.
///
/// A byte without a code means the codebook was derived from different
/// data; that is reported as `MissingCode`, never skipped.
pub fn encode(data: &[u8], codebook: &Codebook) -> Result<BitVec> {
    let estimate = data.len().saturating_mul(codebook.max_code_len().max(1));
    let mut bit_vec = BitVec::with_capacity(estimate.min(data.len().saturating_mul(8)));

    for &byte in data {
        match codebook.get(byte) {
            Some(code) => bit_vec.push_code(code),
            None => {
                error!(byte, "byte missing from codebook");
                return Err(HuffmanError::MissingCode { byte });
            }
        }
    }

    Ok(bit_vec)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hufftree::HuffmanTree;

    #[test]
    fn test_encodes_in_order() {
        // A=10, B=11, C=0
        let tree = HuffmanTree::from_bytes(b"ABCC").unwrap();
        let book = Codebook::from_tree(&tree);
        let bits = encode(b"CAB", &book).unwrap();
        assert_eq!(bits.bit_count(), 5);
        assert_eq!(bits.as_bytes(), &[0b0101_1000]);
    }

    #[test]
    fn test_missing_code_is_fault() {
        let book = Codebook::from_tree(&HuffmanTree::from_bytes(b"aaab").unwrap());
        let err = encode(b"abc", &book).unwrap_err();
        assert!(matches!(err, HuffmanError::MissingCode { byte: b'c' }));
    }

    #[test]
    fn test_single_symbol_stream() {
        let book = Codebook::from_tree(&HuffmanTree::from_bytes(&[9; 12]).unwrap());
        let bits = encode(&[9; 12], &book).unwrap();
        assert_eq!(bits.bit_count(), 12);
        assert_eq!(bits.as_bytes(), &[0, 0]);
    }
}
