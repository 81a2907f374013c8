//! Cost-estimator report parsing
//!
//! The OP Succinct cost estimator prints a markdown table:
//!
//! ```text
//! | Metric                         | Value                     |
//! |--------------------------------|---------------------------|
//! | Total Instruction Count        |               567,566,494 |
//! | Total SP1 Gas                  |               812,345,678 |
//! ```
//!
//! Only the `Total SP1 Gas` row (total PGU) is required.

use std::collections::HashMap;

use serde::Serialize;
use zkbisect_core::{BlockNumber, DisputeError, Result};

/// Table rows we understand, keyed by metric label
const METRICS: [(&str, Metric); 13] = [
    ("Batch Start", Metric::BatchStart),
    ("Batch End", Metric::BatchEnd),
    ("Total Instruction Count", Metric::TotalCycles),
    ("Total SP1 Gas", Metric::TotalPgu),
    ("Number of Blocks", Metric::NumBlocks),
    ("Number of Transactions", Metric::NumTxs),
    ("Ethereum Gas Used", Metric::EthGas),
    ("Oracle Verify Cycles", Metric::OracleCycles),
    ("Derivation Cycles", Metric::DerivationCycles),
    ("Block Execution Cycles", Metric::ExecutionCycles),
    ("Blob Verification Cycles", Metric::BlobCycles),
    ("Cycles per Block", Metric::CyclesPerBlock),
    ("Cycles per Transaction", Metric::CyclesPerTx),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Metric {
    BatchStart,
    BatchEnd,
    TotalCycles,
    TotalPgu,
    NumBlocks,
    NumTxs,
    EthGas,
    OracleCycles,
    DerivationCycles,
    ExecutionCycles,
    BlobCycles,
    CyclesPerBlock,
    CyclesPerTx,
}

/// Cycles spent in one proving phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PhaseCycles {
    /// Cycle count
    pub cycles: u64,
    /// Share of total cycles, percent, one decimal
    pub pct: f64,
}

/// Cycle breakdown by phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleBreakdown {
    /// Blob verification
    pub blob_verification: PhaseCycles,
    /// L2 derivation
    pub derivation: PhaseCycles,
    /// Block execution
    pub execution: PhaseCycles,
    /// Preimage oracle verification
    pub oracle_verify: PhaseCycles,
}

/// Per-block averages
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerBlockStats {
    /// Average cycles per block
    pub avg_cycles: u64,
    /// Ethereum gas used divided by block count
    pub avg_gas: u64,
}

/// Parsed cost-estimator output for one block range
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvingReport {
    /// `[batch_start, batch_end]` as reported
    pub block_range: [BlockNumber; 2],
    /// Blocks in the batch
    pub num_blocks: u64,
    /// Transactions in the batch
    pub num_transactions: u64,
    /// Total instruction count
    pub total_cycles: u64,
    /// Total proving gas units for the range
    pub total_pgu: u64,
    /// L2 gas consumed by the batch
    pub eth_gas_used: u64,
    /// Cycles by phase
    pub breakdown: CycleBreakdown,
    /// Per-block averages
    pub per_block: PerBlockStats,
    /// Cycles per transaction as reported
    pub cycles_per_tx: u64,
}

impl ProvingReport {
    /// Parse the estimator's stdout.
    ///
    /// Unknown metrics and unparsable values are skipped. Fails if no
    /// non-zero `Total SP1 Gas` row is present.
    pub fn parse(output: &str) -> Result<Self> {
        let labels: HashMap<&str, Metric> = METRICS.into_iter().collect();
        let mut values: HashMap<Metric, u64> = HashMap::new();

        for line in output.lines() {
            if !line.contains('|') || line.contains("---") || line.contains("Metric") {
                continue;
            }
            let parts: Vec<&str> = line.split('|').map(str::trim).collect();
            if parts.len() < 3 {
                continue;
            }
            let Some(&metric) = labels.get(parts[1]) else {
                continue;
            };
            if let Ok(value) = parts[2].replace(',', "").parse::<u64>() {
                values.insert(metric, value);
            }
        }

        let get = |m: Metric| values.get(&m).copied().unwrap_or(0);
        let total_pgu = get(Metric::TotalPgu);
        if total_pgu == 0 {
            return Err(DisputeError::ReportParse(
                "no non-zero 'Total SP1 Gas' row in cost-estimator output".to_string(),
            ));
        }

        let total_cycles = get(Metric::TotalCycles);
        let phase = |m: Metric| PhaseCycles {
            cycles: get(m),
            pct: percent(get(m), total_cycles),
        };
        let num_blocks = get(Metric::NumBlocks);

        Ok(Self {
            block_range: [get(Metric::BatchStart), get(Metric::BatchEnd)],
            num_blocks,
            num_transactions: get(Metric::NumTxs),
            total_cycles,
            total_pgu,
            eth_gas_used: get(Metric::EthGas),
            breakdown: CycleBreakdown {
                blob_verification: phase(Metric::BlobCycles),
                derivation: phase(Metric::DerivationCycles),
                execution: phase(Metric::ExecutionCycles),
                oracle_verify: phase(Metric::OracleCycles),
            },
            per_block: PerBlockStats {
                avg_cycles: get(Metric::CyclesPerBlock),
                avg_gas: get(Metric::EthGas) / num_blocks.max(1),
            },
            cycles_per_tx: get(Metric::CyclesPerTx),
        })
    }

    /// Total PGU as the evaluator's input type
    pub fn total_pgu_f64(&self) -> f64 {
        self.total_pgu as f64
    }
}

/// `part / total` in percent, rounded to one decimal; 0 when `total` is 0
fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}
