//! Keccak256 hasher for commitment trees

use tiny_keccak::{Hasher, Keccak};

use crate::types::Hash;

/// Keccak256 hasher
#[derive(Debug, Clone, Copy, Default)]
pub struct Keccak256Hasher;

impl Keccak256Hasher {
    /// Combine two child commitments into their parent commitment.
    ///
    /// The digest is `keccak256(left || right)`. Argument order is significant:
    /// swapping the children yields a different parent.
    pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
        let mut hasher = Keccak::v256();
        hasher.update(left);
        hasher.update(right);
        let mut output = [0u8; 32];
        hasher.finalize(&mut output);
        output
    }

    /// Hash a single value
    pub fn hash(data: &[u8]) -> Hash {
        let mut hasher = Keccak::v256();
        hasher.update(data);
        let mut output = [0u8; 32];
        hasher.finalize(&mut output);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_pair_is_ordered() {
        let left = [1u8; 32];
        let right = [2u8; 32];
        let forward = Keccak256Hasher::hash_pair(&left, &right);
        let swapped = Keccak256Hasher::hash_pair(&right, &left);
        assert_ne!(forward, swapped);
    }

    #[test]
    fn test_hash_pair_matches_concatenation() {
        let left = [7u8; 32];
        let right = [9u8; 32];
        let mut joined = Vec::with_capacity(64);
        joined.extend_from_slice(&left);
        joined.extend_from_slice(&right);
        assert_eq!(
            Keccak256Hasher::hash_pair(&left, &right),
            Keccak256Hasher::hash(&joined)
        );
    }

    #[test]
    fn test_empty_input_digest() {
        // keccak256("")
        assert_eq!(
            hex::encode(Keccak256Hasher::hash(&[])),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
