//! State-commitment sources

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use zkbisect_core::{hex_hash, BlockCommitment, BlockNumber, BlockRange, Hash};

/// Supplies `block -> commitment` for a requested range.
///
/// Implementations return whatever they hold for the range; gaps are
/// reported by the tree builder as `MissingCommitment`.
#[async_trait]
pub trait CommitmentSource: Send + Sync {
    /// Commitments for blocks in `range`
    async fn commitments(&self, range: BlockRange) -> Result<Vec<BlockCommitment>>;
}

/// In-memory source
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    commitments: Vec<BlockCommitment>,
}

impl StaticSource {
    /// Serve `commitments`
    pub const fn new(commitments: Vec<BlockCommitment>) -> Self {
        Self { commitments }
    }
}

#[async_trait]
impl CommitmentSource for StaticSource {
    async fn commitments(&self, range: BlockRange) -> Result<Vec<BlockCommitment>> {
        Ok(self
            .commitments
            .iter()
            .filter(|c| range.contains(c.index))
            .copied()
            .collect())
    }
}

/// Block list as written by the dashboard's tree step
#[derive(Deserialize)]
struct BlockFile {
    blocks: Vec<BlockEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockEntry {
    number: BlockNumber,
    #[serde(with = "hex_hash")]
    state_root: Hash,
}

/// Reads `{"blocks": [{"number": N, "stateRoot": "0x..."}]}` from disk
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Source backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CommitmentSource for JsonFileSource {
    async fn commitments(&self, range: BlockRange) -> Result<Vec<BlockCommitment>> {
        let raw = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let file: BlockFile = serde_json::from_slice(&raw)
            .with_context(|| format!("Invalid block file {}", self.path.display()))?;

        let out: Vec<BlockCommitment> = file
            .blocks
            .into_iter()
            .filter(|b| range.contains(b.number))
            .map(|b| BlockCommitment::new(b.number, b.state_root))
            .collect();
        debug!(path = %self.path.display(), count = out.len(), "Loaded state roots");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_filters_range() {
        let source = StaticSource::new((0..10).map(|b| BlockCommitment::new(b, [b as u8; 32])).collect());
        let got = source.commitments(BlockRange::new(3, 5).unwrap()).await.unwrap();
        assert_eq!(got.iter().map(|c| c.index).collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[tokio::test]
    async fn test_json_file_source() {
        let path = std::env::temp_dir().join(format!("zkbisect-blocks-{}.json", std::process::id()));
        let root = format!("0x{}", "11".repeat(32));
        let body = format!(
            r#"{{"blockStart": 7, "blocks": [{{"number": 7, "stateRoot": "{root}"}}, {{"number": 8, "stateRoot": "{root}"}}]}}"#
        );
        tokio::fs::write(&path, body).await.unwrap();

        let got = JsonFileSource::new(&path)
            .commitments(BlockRange::single(8))
            .await
            .unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(got, vec![BlockCommitment::new(8, [0x11u8; 32])]);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = JsonFileSource::new("/nonexistent/zkbisect/blocks.json")
            .commitments(BlockRange::single(0))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
