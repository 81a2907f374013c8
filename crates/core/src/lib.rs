//! Shared building blocks for hybrid dispute analysis
//!
//! This crate contains the pieces used by both halves of the analyzer:
//! - Block and commitment types fed into the commitment tree builder
//! - The keccak256 hasher used to combine child commitments
//! - The error taxonomy shared by tree building and cost evaluation

pub mod error;
pub mod hasher;
pub mod types;

pub use error::{DisputeError, Result};
pub use hasher::Keccak256Hasher;
pub use types::*;
