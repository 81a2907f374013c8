//! Breadth-first flat form
//!
//! The canonical wire/storage encoding of a commitment tree: the range bounds
//! plus every node's commitment in level order. Because tree shape is a
//! function of the range alone, nothing else needs to be stored.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use zkbisect_core::{hex_hashes, BlockRange, DisputeError, Hash, Keccak256Hasher, Result};

use crate::builder::expected_node_count;
use crate::node::TreeNode;

/// Commitment tree in breadth-first order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatTree {
    #[serde(rename = "blockRange")]
    range: BlockRange,
    #[serde(rename = "commitmentsBFS", with = "hex_hashes")]
    nodes: Vec<Hash>,
}

/// Position of a node in the breadth-first layout
struct Slot {
    range: BlockRange,
    depth: u32,
    children: Option<(usize, usize)>,
}

impl FlatTree {
    /// Wrap a breadth-first node list, checking its length against the range
    pub fn new(range: BlockRange, nodes: Vec<Hash>) -> Result<Self> {
        check_len(range, nodes.len())?;
        Ok(Self { range, nodes })
    }

    pub(crate) fn from_parts(range: BlockRange, nodes: Vec<Hash>) -> Self {
        Self { range, nodes }
    }

    /// Blocks covered by the tree
    pub const fn range(&self) -> BlockRange {
        self.range
    }

    /// Node commitments in breadth-first order
    pub fn nodes(&self) -> &[Hash] {
        &self.nodes
    }

    /// Root commitment
    pub fn root(&self) -> Option<Hash> {
        self.nodes.first().copied()
    }

    /// Rebuild the hierarchical tree.
    ///
    /// Fails if the node count does not match the range, or if any internal
    /// commitment is not the hash of its two children.
    pub fn to_tree(&self) -> Result<TreeNode> {
        check_len(self.range, self.nodes.len())?;
        let layout = layout(self.range);
        assemble(0, &layout, &self.nodes)
    }
}

fn check_len(range: BlockRange, found: usize) -> Result<()> {
    let expected = expected_node_count(range);
    if found as u64 != expected {
        return Err(DisputeError::MalformedFlatTree { expected, found: found as u64 });
    }
    Ok(())
}

/// Breadth-first shape of the tree over `range`, with child indices.
fn layout(range: BlockRange) -> Vec<Slot> {
    let mut slots = Vec::new();
    let mut queue = VecDeque::from([(range, 0u32)]);
    // Children of the i-th dequeued node are enqueued at positions `next` and `next + 1`.
    let mut next = 1usize;
    while let Some((range, depth)) = queue.pop_front() {
        let children = range.split().map(|(left, right)| {
            queue.push_back((left, depth + 1));
            queue.push_back((right, depth + 1));
            next += 2;
            (next - 2, next - 1)
        });
        slots.push(Slot { range, depth, children });
    }
    slots
}

fn assemble(index: usize, layout: &[Slot], nodes: &[Hash]) -> Result<TreeNode> {
    let slot = &layout[index];
    let commitment = nodes[index];
    match slot.children {
        None => Ok(TreeNode::leaf(slot.range, slot.depth, commitment)),
        Some((l, r)) => {
            let left = assemble(l, layout, nodes)?;
            let right = assemble(r, layout, nodes)?;
            if Keccak256Hasher::hash_pair(&left.commitment(), &right.commitment()) != commitment {
                return Err(DisputeError::CommitmentMismatch {
                    low: slot.range.low(),
                    high: slot.range.high(),
                });
            }
            Ok(TreeNode::internal(slot.range, slot.depth, commitment, left, right))
        }
    }
}

#[cfg(test)]
mod tests {
    use zkbisect_core::BlockCommitment;

    use crate::build;

    use super::*;

    fn flat(low: u64, high: u64) -> FlatTree {
        let range = BlockRange::new(low, high).unwrap();
        let input: Vec<_> = range
            .blocks()
            .map(|b| BlockCommitment::new(b, Keccak256Hasher::hash(&b.to_le_bytes())))
            .collect();
        build(range, &input).unwrap().to_flat()
    }

    #[test]
    fn test_root_first() {
        let range = BlockRange::new(0, 6).unwrap();
        let input: Vec<_> = range.blocks().map(|b| BlockCommitment::new(b, [b as u8; 32])).collect();
        let tree = build(range, &input).unwrap();
        let flat = tree.to_flat();
        assert_eq!(flat.root(), Some(tree.commitment()));
        assert_eq!(flat.nodes().len(), 13);
        // Rightmost leaf of the deepest level comes last
        assert_eq!(flat.nodes()[12], [5u8; 32]);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let range = BlockRange::new(0, 3).unwrap();
        assert_eq!(
            FlatTree::new(range, vec![[0u8; 32]; 6]),
            Err(DisputeError::MalformedFlatTree { expected: 7, found: 6 })
        );
    }

    #[test]
    fn test_tampered_node_rejected() {
        let original = flat(10, 17);
        let mut nodes = original.nodes().to_vec();
        nodes[3] = [0u8; 32];
        let tampered = FlatTree::new(original.range(), nodes).unwrap();
        // Node 3 covers [10, 11] and no longer matches its children
        assert_eq!(
            tampered.to_tree(),
            Err(DisputeError::CommitmentMismatch { low: 10, high: 11 })
        );
    }

    #[test]
    fn test_json_round_trip() {
        let original = flat(3, 9);
        let json = serde_json::to_string(&original).unwrap();
        assert!(json.contains("commitmentsBFS"));
        let decoded: FlatTree = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, original);
        assert!(decoded.to_tree().is_ok());
    }
}
