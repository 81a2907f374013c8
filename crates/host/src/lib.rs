//! Host-side logic for hybrid dispute cost analysis
//!
//! Wires the external collaborators (state-commitment source, proving-cost
//! oracle) to the pure tree builder and cost evaluator.

pub mod analyzer;
pub mod config;
pub mod oracle;
pub mod source;

pub use analyzer::{Analysis, Analyzer};
pub use config::{Config, OracleMode};
pub use oracle::{CostEstimatorOracle, FixedOracle, PguMeasurement, ProvingCostOracle};
pub use source::{CommitmentSource, JsonFileSource, StaticSource};
