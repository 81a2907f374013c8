//! Bisection commitment tree
//!
//! Recursively halves a disputed block range into a binary tree whose leaves
//! are single blocks. Key properties:
//! - Deterministic shape: depends only on the range bounds
//! - Ordered commitments: `keccak256(left || right)` at every internal node
//! - Two views: hierarchical [`TreeNode`] and breadth-first [`FlatTree`]

mod builder;
mod divergence;
mod flat;
mod node;

pub use builder::{build, expected_depth, expected_node_count};
pub use divergence::{first_divergence, Divergence};
pub use flat::FlatTree;
pub use node::{TreeNode, TreeSummary};
