//! Common types

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{DisputeError, Result};

/// 32-byte hash type
pub type Hash = [u8; 32];

/// Block number type
pub type BlockNumber = u64;

/// Inclusive block range `[low, high]`
///
/// Serialized as a two-element array, `[low, high]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "[BlockNumber; 2]", try_from = "[BlockNumber; 2]")]
pub struct BlockRange {
    low: BlockNumber,
    high: BlockNumber,
}

impl BlockRange {
    /// Create a range, rejecting `high < low`
    pub fn new(low: BlockNumber, high: BlockNumber) -> Result<Self> {
        if high < low {
            return Err(DisputeError::EmptyRange { low, high });
        }
        Ok(Self { low, high })
    }

    /// Range covering exactly one block
    pub const fn single(block: BlockNumber) -> Self {
        Self { low: block, high: block }
    }

    /// First block in the range
    pub const fn low(&self) -> BlockNumber {
        self.low
    }

    /// Last block in the range
    pub const fn high(&self) -> BlockNumber {
        self.high
    }

    /// Number of blocks covered. Saturates for the full `u64` domain.
    pub const fn width(&self) -> u64 {
        (self.high - self.low).saturating_add(1)
    }

    /// True if the range covers a single block
    pub const fn is_single(&self) -> bool {
        self.low == self.high
    }

    /// Bisection point. Every party replaying the game must compute the
    /// same value, so this is floor division without overflow.
    pub const fn midpoint(&self) -> BlockNumber {
        self.low + (self.high - self.low) / 2
    }

    /// Split into `[low, mid]` and `[mid + 1, high]`, or `None` for a single block
    pub const fn split(&self) -> Option<(Self, Self)> {
        if self.is_single() {
            return None;
        }
        let mid = self.midpoint();
        Some((
            Self { low: self.low, high: mid },
            Self { low: mid + 1, high: self.high },
        ))
    }

    /// Whether `block` lies inside the range
    pub const fn contains(&self, block: BlockNumber) -> bool {
        self.low <= block && block <= self.high
    }

    /// Iterate block numbers in ascending order
    pub fn blocks(&self) -> RangeInclusive<BlockNumber> {
        self.low..=self.high
    }
}

impl From<BlockRange> for [BlockNumber; 2] {
    fn from(range: BlockRange) -> Self {
        [range.low, range.high]
    }
}

impl TryFrom<[BlockNumber; 2]> for BlockRange {
    type Error = DisputeError;

    fn try_from([low, high]: [BlockNumber; 2]) -> Result<Self> {
        Self::new(low, high)
    }
}

impl std::fmt::Display for BlockRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// One disputed unit: a block and its state commitment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockCommitment {
    /// Block number
    pub index: BlockNumber,
    /// State commitment (state root) at that block
    #[serde(with = "hex_hash")]
    pub commitment: Hash,
}

impl BlockCommitment {
    /// Create a new block commitment
    pub const fn new(index: BlockNumber, commitment: Hash) -> Self {
        Self { index, commitment }
    }
}

/// Render a hash as `0x`-prefixed lowercase hex
pub fn to_hex(hash: &Hash) -> String {
    format!("0x{}", hex::encode(hash))
}

/// Shortened hash for log lines, e.g. `0x1234abcd...`
pub fn short_hex(hash: &Hash) -> String {
    format!("0x{}...", hex::encode(&hash[..4]))
}

/// Parse a 32-byte hash from hex, with or without a `0x` prefix
pub fn parse_hash(s: &str) -> std::result::Result<Hash, hex::FromHexError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let mut out = [0u8; 32];
    hex::decode_to_slice(digits, &mut out)?;
    Ok(out)
}

/// Serde adapter encoding a [`Hash`] as a `0x`-prefixed hex string
pub mod hex_hash {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{parse_hash, to_hex, Hash};

    /// Serialize as hex
    pub fn serialize<S: Serializer>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_hex(hash))
    }

    /// Deserialize from hex
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_hash(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter encoding a `Vec<Hash>` as a list of hex strings
pub mod hex_hashes {
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{parse_hash, to_hex, Hash};

    /// Serialize as a list of hex strings
    pub fn serialize<S: Serializer>(hashes: &[Hash], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(hashes.len()))?;
        for hash in hashes {
            seq.serialize_element(&to_hex(hash))?;
        }
        seq.end()
    }

    /// Deserialize from a list of hex strings
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Hash>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter()
            .map(|s| parse_hash(s).map_err(serde::de::Error::custom))
            .collect()
    }
}
