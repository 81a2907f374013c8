//! Commitment tree construction

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::debug;
use zkbisect_core::{
    short_hex, BlockCommitment, BlockRange, DisputeError, Hash, Keccak256Hasher, Result,
};

use crate::node::TreeNode;

/// Build the commitment tree over `range`.
///
/// `commitments` may arrive in any order and may include blocks outside the
/// range; those are ignored. Every block inside the range must appear exactly
/// once. Coverage is checked before any hashing, so a failure never yields a
/// partial tree.
pub fn build(range: BlockRange, commitments: &[BlockCommitment]) -> Result<TreeNode> {
    let leaves = collect_leaves(range, commitments)?;
    let root = build_node(range, 0, &leaves);

    debug!(
        range = %range,
        nodes = root.node_count(),
        depth = root.max_depth(),
        root = %short_hex(&root.commitment()),
        "Built commitment tree"
    );
    Ok(root)
}

/// Maximum depth of the tree over `range`: `ceil(log2(width))`
pub const fn expected_depth(range: BlockRange) -> u32 {
    let width = range.width();
    if width <= 1 {
        0
    } else {
        u64::BITS - (width - 1).leading_zeros()
    }
}

/// Number of nodes in the tree over `range`: `2 * width - 1`
pub const fn expected_node_count(range: BlockRange) -> u64 {
    range.width().saturating_mul(2) - 1
}

/// Order the in-range commitments by block number, rejecting gaps and duplicates.
fn collect_leaves(range: BlockRange, commitments: &[BlockCommitment]) -> Result<Vec<Hash>> {
    let mut by_block = BTreeMap::new();
    for c in commitments.iter().filter(|c| range.contains(c.index)) {
        match by_block.entry(c.index) {
            Entry::Vacant(slot) => {
                slot.insert(c.commitment);
            }
            Entry::Occupied(_) => return Err(DisputeError::DuplicateCommitment(c.index)),
        }
    }

    // Keys are sorted and unique, so the first key that is not `low + i` marks a gap.
    let mut expected = range.low();
    for &block in by_block.keys() {
        if block != expected {
            return Err(DisputeError::MissingCommitment(expected));
        }
        expected = expected.wrapping_add(1);
    }
    if (by_block.len() as u64) < range.width() {
        return Err(DisputeError::MissingCommitment(expected));
    }

    Ok(by_block.into_values().collect())
}

/// Recursive divide-and-conquer. Depth is bounded by 64 for `u64` block numbers.
fn build_node(range: BlockRange, depth: u32, leaves: &[Hash]) -> TreeNode {
    match range.split() {
        None => TreeNode::leaf(range, depth, leaves[0]),
        Some((left_range, right_range)) => {
            // Left half is ceil(width / 2), matching the floor midpoint.
            let (left_leaves, right_leaves) = leaves.split_at(leaves.len().div_ceil(2));
            let left = build_node(left_range, depth + 1, left_leaves);
            let right = build_node(right_range, depth + 1, right_leaves);
            let commitment = Keccak256Hasher::hash_pair(&left.commitment(), &right.commitment());
            TreeNode::internal(range, depth, commitment, left, right)
        }
    }
}
