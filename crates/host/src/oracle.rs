//! Proving-cost oracles
//!
//! The oracle answers one question: how many PGU does proving the whole
//! disputed range take. The analyzer calls it once per analysis.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tokio::process::Command;
use tracing::{debug, info};

use zkbisect_core::BlockRange;
use zkbisect_cost::ProvingReport;

/// Total PGU for a range, plus the estimator report when there is one
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PguMeasurement {
    /// Total proving gas units for the range
    pub total_pgu: f64,
    /// Full estimator output, if the oracle produced one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ProvingReport>,
}

/// Supplies the total proving cost of a block range
#[async_trait]
pub trait ProvingCostOracle: Send + Sync {
    /// Measure `range`
    async fn measure(&self, range: BlockRange) -> Result<PguMeasurement>;
}

/// Oracle returning a preconfigured figure
#[derive(Clone, Copy, Debug)]
pub struct FixedOracle {
    total_pgu: f64,
}

impl FixedOracle {
    /// Always answer `total_pgu`
    pub const fn new(total_pgu: f64) -> Self {
        Self { total_pgu }
    }
}

#[async_trait]
impl ProvingCostOracle for FixedOracle {
    async fn measure(&self, range: BlockRange) -> Result<PguMeasurement> {
        debug!(range = %range, total_pgu = self.total_pgu, "Using fixed PGU");
        Ok(PguMeasurement { total_pgu: self.total_pgu, report: None })
    }
}

/// Oracle running `just cost-estimator --start S --end E` in an OP Succinct checkout
#[derive(Clone, Debug)]
pub struct CostEstimatorOracle {
    workdir: PathBuf,
    program: String,
    timeout: Duration,
}

impl CostEstimatorOracle {
    /// Create an oracle for the checkout at `op_succinct_path` (`~` is expanded)
    pub fn new(op_succinct_path: &str, timeout: Duration) -> Self {
        Self {
            workdir: expand_home(op_succinct_path),
            program: "just".to_string(),
            timeout,
        }
    }

    /// Run `program` instead of `just`
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait]
impl ProvingCostOracle for CostEstimatorOracle {
    async fn measure(&self, range: BlockRange) -> Result<PguMeasurement> {
        info!(
            "Running cost-estimator for blocks {} → {} (this may take several minutes)",
            range.low(),
            range.high()
        );

        let mut cmd = Command::new(&self.program);
        cmd.arg("cost-estimator")
            .arg("--start")
            .arg(range.low().to_string())
            .arg("--end")
            .arg(range.high().to_string())
            .current_dir(&self.workdir)
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Err(_) => bail!("cost-estimator timed out after {}s", self.timeout.as_secs()),
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(anyhow!(e).context(format!(
                    "{} not found, or missing OP Succinct checkout at {}",
                    self.program,
                    self.workdir.display()
                )));
            }
            Ok(result) => result.context("Failed to run cost-estimator")?,
        };

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        debug!(lines = text.lines().count(), status = %output.status, "cost-estimator finished");

        let report = ProvingReport::parse(&text).context("Failed to parse cost-estimator output")?;
        info!(
            "Parsed: PGU={}, Blocks={}",
            report.total_pgu, report.num_blocks
        );
        Ok(PguMeasurement { total_pgu: report.total_pgu_f64(), report: Some(report) })
    }
}

/// Expand a leading `~` using `$HOME`
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix('~'), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => {
            let mut out = PathBuf::from(home);
            out.push(rest.trim_start_matches('/'));
            out
        }
        _ => PathBuf::from(path),
    }
}
