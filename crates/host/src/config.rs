//! Configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use zkbisect_core::{BlockNumber, BlockRange, Result};
use zkbisect_cost::CostConstants;

/// Where the total PGU figure comes from
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum OracleMode {
    /// Use the `TOTAL_PGU` value as given
    #[default]
    Fixed,
    /// Run the OP Succinct cost estimator over the range
    CostEstimator,
}

impl From<&str> for OracleMode {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "estimator" | "cost-estimator" => Self::CostEstimator,
            _ => Self::Fixed,
        }
    }
}

/// Analyzer configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// First disputed block
    pub block_start: BlockNumber,
    /// Last disputed block (inclusive)
    pub block_end: BlockNumber,
    /// JSON file with `{"blocks": [{"number", "stateRoot"}]}`
    pub commitments_path: String,
    /// Oracle selection
    pub oracle_mode: OracleMode,
    /// Total PGU for [`OracleMode::Fixed`]
    pub total_pgu: f64,
    /// OP Succinct checkout for [`OracleMode::CostEstimator`]
    pub op_succinct_path: String,
    /// Cost estimator timeout in seconds
    pub oracle_timeout_secs: u64,
    /// Fixed fee of one compressed proof
    pub compressed_base_fee: f64,
    /// Compressed proof price per bPGU
    pub compressed_pgu_price: f64,
    /// PLONK wrapping fee
    pub plonk_fee: f64,
    /// Diminishing-returns threshold
    pub cost_epsilon: f64,
    /// USD per unit of proving fee
    pub prove_price_usd: f64,
    /// Deepest bisection depth to evaluate
    pub max_bisection_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        let constants = CostConstants::default();
        Self {
            block_start: 0,
            block_end: 0,
            commitments_path: "data/tree.json".to_string(),
            oracle_mode: OracleMode::Fixed,
            total_pgu: 1e10,
            op_succinct_path: "~/op-succinct".to_string(),
            oracle_timeout_secs: 600,
            compressed_base_fee: constants.compressed_base_fee,
            compressed_pgu_price: constants.compressed_pgu_price,
            plonk_fee: constants.plonk_fee,
            cost_epsilon: constants.epsilon,
            prove_price_usd: 0.34,
            max_bisection_depth: 11,
        }
    }
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            block_start: parse_env("BLOCK_START").unwrap_or(defaults.block_start),
            block_end: parse_env("BLOCK_END").unwrap_or(defaults.block_end),
            commitments_path: env::var("COMMITMENTS_PATH").unwrap_or(defaults.commitments_path),
            oracle_mode: env::var("PGU_ORACLE")
                .map(|s| OracleMode::from(s.as_str()))
                .unwrap_or_default(),
            total_pgu: parse_env("TOTAL_PGU").unwrap_or(defaults.total_pgu),
            op_succinct_path: env::var("OP_SUCCINCT_PATH").unwrap_or(defaults.op_succinct_path),
            oracle_timeout_secs: parse_env("ORACLE_TIMEOUT_SECS")
                .unwrap_or(defaults.oracle_timeout_secs),
            compressed_base_fee: parse_env("COMPRESSED_BASE_FEE")
                .unwrap_or(defaults.compressed_base_fee),
            compressed_pgu_price: parse_env("COMPRESSED_PGU_PRICE")
                .unwrap_or(defaults.compressed_pgu_price),
            plonk_fee: parse_env("PLONK_FEE").unwrap_or(defaults.plonk_fee),
            cost_epsilon: parse_env("COST_EPSILON").unwrap_or(defaults.cost_epsilon),
            prove_price_usd: parse_env("PROVE_PRICE_USD").unwrap_or(defaults.prove_price_usd),
            max_bisection_depth: parse_env("MAX_BISECTION_DEPTH")
                .unwrap_or(defaults.max_bisection_depth),
        }
    }

    /// Disputed range
    pub fn block_range(&self) -> Result<BlockRange> {
        BlockRange::new(self.block_start, self.block_end)
    }

    /// Fee constants for the evaluator
    pub fn cost_constants(&self) -> CostConstants {
        CostConstants {
            compressed_base_fee: self.compressed_base_fee,
            compressed_pgu_price: self.compressed_pgu_price,
            plonk_fee: self.plonk_fee,
            epsilon: self.cost_epsilon,
        }
    }

    /// Cost estimator timeout
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.oracle_timeout_secs)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_mode_from_str() {
        assert_eq!(OracleMode::from("estimator"), OracleMode::CostEstimator);
        assert_eq!(OracleMode::from("Cost-Estimator"), OracleMode::CostEstimator);
        assert_eq!(OracleMode::from("fixed"), OracleMode::Fixed);
        assert_eq!(OracleMode::from("anything"), OracleMode::Fixed);
    }

    #[test]
    fn test_defaults_match_cost_model() {
        let config = Config::default();
        assert_eq!(config.cost_constants(), CostConstants::default());
        assert_eq!(config.oracle_timeout(), Duration::from_secs(600));
        assert_eq!(config.block_range().unwrap(), BlockRange::single(0));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let config = Config { block_start: 10, block_end: 5, ..Config::default() };
        assert!(config.block_range().is_err());
    }
}
