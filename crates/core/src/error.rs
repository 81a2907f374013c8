//! Error types shared by the tree builder and the cost evaluator

use thiserror::Error;

use crate::types::BlockNumber;

/// Result type alias for dispute analysis operations
pub type Result<T> = std::result::Result<T, DisputeError>;

/// Validation failures. Every variant names the offending value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DisputeError {
    /// A block inside the requested range has no commitment
    #[error("missing commitment for block {0}")]
    MissingCommitment(BlockNumber),

    /// A block inside the requested range has more than one commitment
    #[error("duplicate commitment for block {0}")]
    DuplicateCommitment(BlockNumber),

    /// Range bounds are inverted
    #[error("empty range: high ({high}) is below low ({low})")]
    EmptyRange {
        /// Lower bound as supplied
        low: BlockNumber,
        /// Upper bound as supplied
        high: BlockNumber,
    },

    /// Non-positive PGU, negative fee constant or non-finite input
    #[error("invalid cost input: {field} = {value}")]
    InvalidCostInput {
        /// Name of the rejected input
        field: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Requested bisection depth is past the safe maximum
    #[error("bisection depth {requested} out of range (max {max})")]
    DepthOutOfRange {
        /// Depth asked for
        requested: u32,
        /// Largest depth that is accepted
        max: u32,
    },

    /// Breadth-first node list does not match the shape implied by its range
    #[error("malformed flat tree: expected {expected} nodes, found {found}")]
    MalformedFlatTree {
        /// Node count implied by the range
        expected: u64,
        /// Node count supplied
        found: u64,
    },

    /// An internal node's commitment is not the hash of its children
    #[error("commitment mismatch at node covering [{low}, {high}]")]
    CommitmentMismatch {
        /// Lower bound of the offending node
        low: BlockNumber,
        /// Upper bound of the offending node
        high: BlockNumber,
    },

    /// Two trees compared against each other cover different ranges
    #[error("range mismatch: [{ours_low}, {ours_high}] vs [{theirs_low}, {theirs_high}]")]
    RangeMismatch {
        /// Our lower bound
        ours_low: BlockNumber,
        /// Our upper bound
        ours_high: BlockNumber,
        /// Their lower bound
        theirs_low: BlockNumber,
        /// Their upper bound
        theirs_high: BlockNumber,
    },

    /// Cost-estimator output could not be interpreted
    #[error("cost report parse error: {0}")]
    ReportParse(String),
}
