//! Hierarchical tree view

use std::collections::VecDeque;

use serde::Serialize;
use zkbisect_core::{hex_hash, BlockNumber, BlockRange, Hash};

use crate::flat::FlatTree;

/// A node of the commitment tree.
///
/// Internal nodes always have exactly two children covering `[low, mid]` and
/// `[mid + 1, high]`. Leaves cover a single block and carry that block's
/// commitment unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    #[serde(rename = "blockRange")]
    range: BlockRange,
    depth: u32,
    #[serde(with = "hex_hash")]
    commitment: Hash,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<Box<(TreeNode, TreeNode)>>,
    is_leaf: bool,
}

impl TreeNode {
    pub(crate) const fn leaf(range: BlockRange, depth: u32, commitment: Hash) -> Self {
        Self { range, depth, commitment, children: None, is_leaf: true }
    }

    pub(crate) fn internal(
        range: BlockRange,
        depth: u32,
        commitment: Hash,
        left: Self,
        right: Self,
    ) -> Self {
        Self {
            range,
            depth,
            commitment,
            children: Some(Box::new((left, right))),
            is_leaf: false,
        }
    }

    /// Blocks covered by this node
    pub const fn range(&self) -> BlockRange {
        self.range
    }

    /// Distance from the root (root is 0)
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Commitment for this node's range
    pub const fn commitment(&self) -> Hash {
        self.commitment
    }

    /// True iff the node covers a single block
    pub const fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    /// Left and right children, or `None` for a leaf
    pub fn children(&self) -> Option<(&Self, &Self)> {
        self.children.as_deref().map(|(left, right)| (left, right))
    }

    /// Leaves in block order
    pub fn leaves(&self) -> Vec<&Self> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node.children() {
                Some((left, right)) => {
                    stack.push(right);
                    stack.push(left);
                }
                None => out.push(node),
            }
        }
        out
    }

    /// All nodes in breadth-first order: root, then each level left to right
    pub fn breadth_first(&self) -> Vec<&Self> {
        let mut out = Vec::new();
        let mut queue = VecDeque::from([self]);
        while let Some(node) = queue.pop_front() {
            out.push(node);
            if let Some((left, right)) = node.children() {
                queue.push_back(left);
                queue.push_back(right);
            }
        }
        out
    }

    /// Nodes at `depth`, left to right
    pub fn nodes_at_depth(&self, depth: u32) -> Vec<&Self> {
        self.breadth_first()
            .into_iter()
            .filter(|n| n.depth == depth)
            .collect()
    }

    /// Deepest level in the subtree
    pub fn max_depth(&self) -> u32 {
        self.leaves().iter().map(|l| l.depth).max().unwrap_or(self.depth)
    }

    /// Number of nodes in the subtree
    pub fn node_count(&self) -> usize {
        match self.children() {
            Some((left, right)) => 1 + left.node_count() + right.node_count(),
            None => 1,
        }
    }

    /// Leaf covering `block`, if the block is in range
    pub fn leaf_for(&self, block: BlockNumber) -> Option<&Self> {
        let mut node = self;
        if !node.range.contains(block) {
            return None;
        }
        while let Some((left, right)) = node.children() {
            node = if left.range.contains(block) { left } else { right };
        }
        Some(node)
    }

    /// Canonical breadth-first form
    pub fn to_flat(&self) -> FlatTree {
        let nodes = self.breadth_first().iter().map(|n| n.commitment).collect();
        FlatTree::from_parts(self.range, nodes)
    }

    /// Metadata for display alongside the tree
    pub fn summary(&self) -> TreeSummary {
        TreeSummary {
            block_start: self.range.low(),
            block_end: self.range.high(),
            num_blocks: self.range.width(),
            depth: self.max_depth(),
            total_nodes: self.node_count(),
            root_commitment: self.commitment,
        }
    }
}

/// Tree metadata
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSummary {
    /// First block
    pub block_start: BlockNumber,
    /// Last block
    pub block_end: BlockNumber,
    /// Number of blocks (leaves)
    pub num_blocks: u64,
    /// Maximum depth
    pub depth: u32,
    /// Number of nodes
    pub total_nodes: usize,
    /// Root commitment
    #[serde(with = "hex_hash")]
    pub root_commitment: Hash,
}

#[cfg(test)]
mod tests {
    use zkbisect_core::BlockCommitment;

    use crate::build;

    use super::*;

    fn tree(low: u64, high: u64) -> TreeNode {
        let range = BlockRange::new(low, high).unwrap();
        let input: Vec<_> = range
            .blocks()
            .map(|b| BlockCommitment::new(b, [b as u8; 32]))
            .collect();
        build(range, &input).unwrap()
    }

    #[test]
    fn test_breadth_first_is_level_order() {
        let root = tree(0, 4);
        let depths: Vec<u32> = root.breadth_first().iter().map(|n| n.depth()).collect();
        assert_eq!(depths, vec![0, 1, 1, 2, 2, 2, 2, 3, 3]);

        let level_two: Vec<_> = root.nodes_at_depth(2).iter().map(|n| n.range()).collect();
        assert_eq!(
            level_two,
            vec![
                BlockRange::new(0, 1).unwrap(),
                BlockRange::single(2),
                BlockRange::single(3),
                BlockRange::single(4),
            ]
        );
    }

    #[test]
    fn test_leaf_for() {
        let root = tree(100, 107);
        assert_eq!(root.leaf_for(105).unwrap().range(), BlockRange::single(105));
        assert_eq!(root.leaf_for(105).unwrap().commitment(), [105u8; 32]);
        assert!(root.leaf_for(99).is_none());
    }

    #[test]
    fn test_summary() {
        let root = tree(100, 107);
        let summary = root.summary();
        assert_eq!(summary.num_blocks, 8);
        assert_eq!(summary.depth, 3);
        assert_eq!(summary.total_nodes, 15);
        assert_eq!(summary.root_commitment, root.commitment());
    }

    #[test]
    fn test_hierarchical_json_shape() {
        let root = tree(0, 1);
        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(json["blockRange"], serde_json::json!([0, 1]));
        assert_eq!(json["isLeaf"], false);
        assert_eq!(json["children"][0]["blockRange"], serde_json::json!([0, 0]));
        assert_eq!(json["children"][1]["isLeaf"], true);
        assert!(json["children"][1].get("children").is_none());
    }
}
