use std::cmp::Ordering;

use tracing::trace;

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(bytes))
    }

    /// Builds a minimum weighted-path-length tree.
    ///
    /// Ties on weight are broken by creation order: leaves are numbered in
    /// ascending byte order, each merged node takes the next number. The
    /// first node extracted becomes the left child, so identical tables
    /// always produce identical trees.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }
        // every merged weight is bounded by the total
        if frequencies.checked_total().is_none() {
            return Err(HuffmanError::WeightOverflow);
        }

        let leaves: Vec<Candidate> = frequencies.iter()
            .enumerate()
            .map(|(order, (byte, count))| Candidate {
                order,
                node: HuffNode::new(byte, count),
            })
            .collect();
        let mut next_order = leaves.len();
        let mut heap = MinHeap::build(leaves);

        while heap.heap_size() > 1 {
            let x = heap.extract_min()?;
            let y = heap.extract_min()?;
            trace!(left = x.order, right = y.order, merged = next_order, "merging nodes");

            heap.insert(Candidate {
                order: next_order,
                node: HuffNode::merge(x.node, y.node),
            });
            next_order += 1;
        }

        let root = heap.into_single()?.node;
        Ok(HuffmanTree { root })
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes_with_depth().filter(|(node, _)| node.is_leaf()).count()
    }

    pub fn internal_count(&self) -> usize {
        self.nodes_with_depth().filter(|(node, _)| !node.is_leaf()).count()
    }

    /// Sum over leaves of weight * depth. A lone root leaf has depth 0.
    pub fn weighted_path_length(&self) -> usize {
        self.nodes_with_depth()
            .filter(|(node, _)| node.is_leaf())
            .fold(0usize, |acc, (node, depth)| acc.saturating_add(node.weight().saturating_mul(depth)))
    }

    /// Depth of the deepest leaf.
    pub fn depth(&self) -> usize {
        self.nodes_with_depth().map(|(_, depth)| depth).max().unwrap_or(0)
    }

    fn nodes_with_depth(&self) -> NodeIter<'_> {
        NodeIter { stack: vec![(&self.root, 0)] }
    }
}

/// Pre-order walk without recursion; very skewed trees can be deep.
struct NodeIter<'a> {
    stack: Vec<(&'a HuffNode, usize)>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = (&'a HuffNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        if let HuffNode::Internal { left, right, .. } = node {
            self.stack.push((right, depth + 1));
            self.stack.push((left, depth + 1));
        }
        Some((node, depth))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: usize,
        byte: u8,
    },
    Internal {
        weight: usize,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(b: u8, f: usize) -> Self {
        HuffNode::Leaf {
            weight: f,
            byte: b,
        }
    }

    pub fn weight(&self) -> usize {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    pub fn merge(a: Self, b: Self) -> Self {
        // a is the smaller node; from_frequencies rules out saturation
        let weight = a.weight().saturating_add(b.weight());
        HuffNode::Internal {
            weight,
            left: Box::new(a),
            right: Box::new(b),
        }
    }
}

/// Forest entry ordered by (weight, creation order).
#[derive(Debug)]
struct Candidate {
    order: usize,
    node: HuffNode,
}

impl Candidate {
    fn key(&self) -> (usize, usize) {
        (self.node.weight(), self.order)
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}
