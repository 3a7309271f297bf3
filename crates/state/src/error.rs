//! Error types for tree and entity operations.
//!
//! All failures here are local data-integrity or precondition errors; none
//! are retryable. Duplicate insertion into an indexed tree is the one
//! expected, recoverable condition and carries its own variant so callers can
//! treat repeated revocations as idempotent or reject them per policy.

use thiserror::Error;

/// Errors raised by the Merkle tree family.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// Inserting beyond `2^height` leaves would corrupt heap-slot addressing.
    #[error("tree is full: capacity is {capacity} leaves")]
    TreeFull { capacity: u64 },

    /// Leaf index outside the tree's fixed index space.
    #[error("leaf index {index} out of range for capacity {capacity}")]
    IndexOutOfRange { index: usize, capacity: u64 },

    /// The value is already linked into the indexed tree; nothing was mutated.
    #[error("value is already present in the indexed tree")]
    DuplicateValue,

    /// No live leaf carries the requested public key.
    #[error("public key not found in the auth tree")]
    KeyNotFound,
}

/// Errors raised by entity-level operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Claim operations applied to an entity that owns no claim trees.
    #[error("operation not supported by this entity: {0}")]
    UnsupportedOperation(&'static str),
}
