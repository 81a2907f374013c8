//! Locating the disputed block between two parties' trees

use serde::Serialize;
use zkbisect_core::{hex_hash, BlockNumber, DisputeError, Hash, Result};

use crate::node::TreeNode;

/// Outcome of replaying the bisection game over two commitment trees
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Divergence {
    /// Single block where the parties first disagree
    pub block: BlockNumber,
    /// Bisection rounds needed to isolate it
    pub rounds: u32,
    /// Our commitment for the block
    #[serde(with = "hex_hash")]
    pub ours: Hash,
    /// Their commitment for the block
    #[serde(with = "hex_hash")]
    pub theirs: Hash,
}

/// Find the first disagreeing block.
///
/// Each round compares the commitments of the left halves: if they differ the
/// dispute continues on the left, otherwise both parties agree on the left
/// half and the dispute moves right. Returns `None` when the roots match.
pub fn first_divergence(ours: &TreeNode, theirs: &TreeNode) -> Result<Option<Divergence>> {
    if ours.range() != theirs.range() {
        return Err(DisputeError::RangeMismatch {
            ours_low: ours.range().low(),
            ours_high: ours.range().high(),
            theirs_low: theirs.range().low(),
            theirs_high: theirs.range().high(),
        });
    }
    if ours.commitment() == theirs.commitment() {
        return Ok(None);
    }

    let (mut a, mut b) = (ours, theirs);
    let mut rounds = 0;
    // Same range means same shape, so both sides are internal or both are leaves.
    while let (Some((a_left, a_right)), Some((b_left, b_right))) = (a.children(), b.children()) {
        (a, b) = if a_left.commitment() == b_left.commitment() {
            (a_right, b_right)
        } else {
            (a_left, b_left)
        };
        rounds += 1;
    }

    Ok(Some(Divergence {
        block: a.range().low(),
        rounds,
        ours: a.commitment(),
        theirs: b.commitment(),
    }))
}

#[cfg(test)]
mod tests {
    use zkbisect_core::{BlockCommitment, BlockRange};

    use crate::build;

    use super::*;

    fn honest(range: BlockRange) -> Vec<BlockCommitment> {
        range.blocks().map(|b| BlockCommitment::new(b, [b as u8; 32])).collect()
    }

    #[test]
    fn test_agreeing_trees() {
        let range = BlockRange::new(0, 99).unwrap();
        let a = build(range, &honest(range)).unwrap();
        let b = build(range, &honest(range)).unwrap();
        assert_eq!(first_divergence(&a, &b).unwrap(), None);
    }

    #[test]
    fn test_first_of_several_bad_blocks() {
        let range = BlockRange::new(0, 999).unwrap();
        let ours = build(range, &honest(range)).unwrap();

        let mut bad = honest(range);
        for c in bad.iter_mut().filter(|c| c.index >= 700) {
            c.commitment = [0xeeu8; 32];
        }
        let theirs = build(range, &bad).unwrap();

        let found = first_divergence(&ours, &theirs).unwrap().unwrap();
        assert_eq!(found.block, 700);
        assert_eq!(found.ours, [700u64 as u8; 32]);
        assert_eq!(found.theirs, [0xeeu8; 32]);
        // ~10 rounds for 1000 blocks
        assert!(found.rounds <= 10);
    }

    #[test]
    fn test_range_mismatch() {
        let r1 = BlockRange::new(0, 7).unwrap();
        let r2 = BlockRange::new(0, 8).unwrap();
        let a = build(r1, &honest(r1)).unwrap();
        let b = build(r2, &honest(r2)).unwrap();
        assert!(matches!(
            first_divergence(&a, &b),
            Err(DisputeError::RangeMismatch { .. })
        ));
    }
}
