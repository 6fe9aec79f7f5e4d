use std::collections::BTreeMap;
use std::fmt;

use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffNode, HuffmanTree};

/// Longest code a `Code` can hold. Huffman depth over counts below 2^64 stays under 93.
pub const MAX_CODE_LEN: u8 = 128;

/// A variable-length code. The first bit to emit is bit `len - 1` of `bits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u128,
    len: u8,
}

impl Code {
    /// Returns `None` unless `1 <= len <= MAX_CODE_LEN` and `bits` fits in `len` bits.
    pub fn new(bits: u128, len: u8) -> Option<Self> {
        if len == 0 || len > MAX_CODE_LEN {
            return None;
        }
        if len < MAX_CODE_LEN && bits >> len != 0 {
            return None;
        }
        Some(Code { bits, len })
    }

    pub fn bits(&self) -> u128 {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// The `i`th bit in emission order.
    pub fn bit(&self, i: usize) -> bool {
        (self.bits >> (self.len() - 1 - i)) & 1 == 1
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(move |i| self.bit(i))
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }

    fn child(&self, bit: bool) -> Self {
        Code {
            bits: (self.bits << 1) | bit as u128,
            len: self.len + 1,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code mapping derived from a tree's root-to-leaf paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codebook {
    codes: BTreeMap<u8, Code>,
}

impl Codebook {
    /// Left edges append 0, right edges append 1. A tree that is a single
    /// leaf assigns its symbol the one-bit code `0`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();

        if let HuffNode::Leaf { byte, .. } = &tree.root {
            codes.insert(*byte, Code { bits: 0, len: 1 });
            return Codebook { codes };
        }

        let root_code = Code { bits: 0, len: 0 };
        let mut stack = vec![(&tree.root, root_code)];
        while let Some((node, code)) = stack.pop() {
            match node {
                HuffNode::Leaf { byte, .. } => {
                    codes.insert(*byte, code);
                }
                HuffNode::Internal { left, right, .. } => {
                    stack.push((right, code.child(true)));
                    stack.push((left, code.child(false)));
                }
            }
        }

        Codebook { codes }
    }

    pub fn get(&self, byte: u8) -> Option<&Code> {
        self.codes.get(&byte)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&b, c)| (b, c))
    }

    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// Pairwise check; at most 256 entries.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&Code> = self.codes.values().collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes.iter().enumerate().all(|(j, b)| i == j || !a.is_prefix_of(b))
        })
    }

    /// Packed length in bits of an input with these frequencies.
    /// Symbols without a code contribute nothing.
    pub fn encoded_bit_len(&self, frequencies: &FrequencyTable) -> usize {
        frequencies.iter()
            .filter_map(|(byte, count)| self.get(byte).map(|code| count.saturating_mul(code.len())))
            .fold(0usize, usize::saturating_add)
    }
}

impl FromIterator<(u8, Code)> for Codebook {
    fn from_iter<I: IntoIterator<Item = (u8, Code)>>(iter: I) -> Self {
        Codebook { codes: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn codes_as_strings(book: &Codebook) -> Vec<(u8, String)> {
        book.iter().map(|(b, c)| (b, c.to_string())).collect()
    }

    #[test]
    fn test_tie_case_codes() {
        let freq: FrequencyTable = vec![(b'A', 1), (b'B', 1), (b'C', 2)].into_iter().collect();
        let tree = HuffmanTree::from_frequencies(&freq).unwrap();
        let book = Codebook::from_tree(&tree);

        assert_eq!(
            codes_as_strings(&book),
            vec![(b'A', "10".to_string()), (b'B', "11".to_string()), (b'C', "0".to_string())]
        );
        assert_eq!(book, Codebook::from_tree(&HuffmanTree::from_frequencies(&freq).unwrap()));
    }

    #[test]
    fn test_single_leaf_gets_zero() {
        let tree = HuffmanTree::from_bytes(&[7, 7, 7]).unwrap();
        let book = Codebook::from_tree(&tree);
        assert_eq!(book.len(), 1);
        assert_eq!(book.get(7).map(|c| c.to_string()), Some("0".to_string()));
    }

    #[test]
    fn test_prefix_free_and_lengths() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let tree = HuffmanTree::from_bytes(data).unwrap();
        let book = Codebook::from_tree(&tree);
        let freq = FrequencyTable::from_bytes(data);

        assert!(book.is_prefix_free());
        assert_eq!(book.len(), freq.len());
        assert_eq!(book.max_code_len(), tree.depth());
        assert_eq!(book.encoded_bit_len(&freq), tree.weighted_path_length());
    }

    #[test]
    fn test_code_validation() {
        assert!(Code::new(0, 0).is_none());
        assert!(Code::new(0b100, 2).is_none());
        assert!(Code::new(0, 129).is_none());
        assert!(Code::new(u128::MAX, 128).is_some());

        let short = Code::new(0b10, 2).unwrap();
        let long = Code::new(0b101, 3).unwrap();
        assert!(short.is_prefix_of(&long));
        assert!(!long.is_prefix_of(&short));
        assert_eq!(long.to_string(), "101");
    }

    #[test]
    fn test_detects_prefix_violation() {
        let book: Codebook = vec![
            (1, Code::new(0b0, 1).unwrap()),
            (2, Code::new(0b01, 2).unwrap()),
        ].into_iter().collect();
        assert!(!book.is_prefix_free());
    }
}
