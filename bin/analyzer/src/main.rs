//! Hybrid dispute cost analyzer
//!
//! Builds the bisection commitment tree for a disputed block range, asks the
//! proving-cost oracle for the range's total PGU, and prints the tree and
//! depth-indexed cost curve as JSON on stdout. Logs go to stderr.

use anyhow::Result;
use tracing::info;

use zkbisect_host::{Analyzer, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("===========================================");
    info!("     Hybrid Dispute Cost Analyzer");
    info!("===========================================");

    let config = Config::from_env();
    let range = config.block_range()?;

    info!("");
    info!("Configuration:");
    info!("  Blocks:           {}", range);
    info!("  State roots:      {}", config.commitments_path);
    info!("  PGU oracle:       {:?}", config.oracle_mode);
    info!("  Max depth:        {}", config.max_bisection_depth);
    info!(
        "  Fees:             base {} / bPGU {} / plonk {}",
        config.compressed_base_fee, config.compressed_pgu_price, config.plonk_fee
    );
    info!("");

    let analyzer = Analyzer::from_config(&config);
    let analysis = analyzer.analyze(range).await?;

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
