//! End-to-end analysis of one disputed range

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use zkbisect_core::{short_hex, BlockRange};
use zkbisect_cost::{
    evaluate, scenarios, CostConstants, CostCurve, CostScenario, ProvingReport,
    DEFAULT_SCENARIO_DEPTHS,
};
use zkbisect_tree::{build, FlatTree, TreeNode, TreeSummary};

use crate::config::{Config, OracleMode};
use crate::oracle::{CostEstimatorOracle, FixedOracle, ProvingCostOracle};
use crate::source::{CommitmentSource, JsonFileSource};

/// Everything produced for one range
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Tree metadata
    pub summary: TreeSummary,
    /// Hierarchical tree
    pub tree: TreeNode,
    /// Breadth-first tree
    pub flat: FlatTree,
    /// Oracle figure the curve was computed from
    pub total_pgu: f64,
    /// Cost for every depth
    pub curve: CostCurve,
    /// Labelled rows priced in USD
    pub scenarios: Vec<CostScenario>,
    /// Estimator output, when the oracle ran the estimator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ProvingReport>,
}

/// Runs the tree builder and cost evaluator against injected collaborators
pub struct Analyzer {
    source: Box<dyn CommitmentSource>,
    oracle: Box<dyn ProvingCostOracle>,
    constants: CostConstants,
    max_depth: u32,
    prove_price_usd: f64,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("constants", &self.constants)
            .field("max_depth", &self.max_depth)
            .field("prove_price_usd", &self.prove_price_usd)
            .finish_non_exhaustive()
    }
}

impl Analyzer {
    /// Create an analyzer with explicit collaborators and fee constants
    pub fn new(
        source: Box<dyn CommitmentSource>,
        oracle: Box<dyn ProvingCostOracle>,
        constants: CostConstants,
        max_depth: u32,
        prove_price_usd: f64,
    ) -> Self {
        Self { source, oracle, constants, max_depth, prove_price_usd }
    }

    /// Build collaborators from configuration
    pub fn from_config(config: &Config) -> Self {
        let source = Box::new(JsonFileSource::new(&config.commitments_path));
        let oracle: Box<dyn ProvingCostOracle> = match config.oracle_mode {
            OracleMode::Fixed => Box::new(FixedOracle::new(config.total_pgu)),
            OracleMode::CostEstimator => Box::new(CostEstimatorOracle::new(
                &config.op_succinct_path,
                config.oracle_timeout(),
            )),
        };
        Self::new(
            source,
            oracle,
            config.cost_constants(),
            config.max_bisection_depth,
            config.prove_price_usd,
        )
    }

    /// Analyze `range`.
    ///
    /// The tree is built before the oracle is consulted, so incomplete input
    /// fails without paying for a cost estimate.
    pub async fn analyze(&self, range: BlockRange) -> Result<Analysis> {
        info!("Building tree for blocks {} → {}", range.low(), range.high());
        let commitments = self
            .source
            .commitments(range)
            .await
            .context("Failed to collect state roots")?;
        info!("Collected {} state roots, building tree...", commitments.len());

        let tree = build(range, &commitments)?;
        let summary = tree.summary();
        info!(
            depth = summary.depth,
            nodes = summary.total_nodes,
            root = %short_hex(&summary.root_commitment),
            "Tree built"
        );

        let measurement = self.oracle.measure(range).await.context("Proving-cost oracle failed")?;
        let curve = evaluate(measurement.total_pgu, &self.constants, self.max_depth)?;
        let scenarios = scenarios(&curve, self.prove_price_usd, &DEFAULT_SCENARIO_DEPTHS)?;

        let best = curve.optimal();
        info!(
            "Optimal depth {}: total cost {:.4} (full batch {:.4})",
            best.depth, best.total_cost, curve.points[0].total_cost
        );

        Ok(Analysis {
            summary,
            flat: tree.to_flat(),
            tree,
            total_pgu: measurement.total_pgu,
            curve,
            scenarios,
            report: measurement.report,
        })
    }
}
