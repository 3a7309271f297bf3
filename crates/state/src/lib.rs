//! Committed state layer for a privacy-preserving credential protocol.
//!
//! Issuers publish claims and authentication keys into Merkle-committed
//! structures; holders later prove possession of a valid, non-revoked claim
//! without revealing its contents. This crate owns the off-circuit side of
//! that commitment layer:
//!
//! - [`PoseidonHash`]: circomlib-parameter Poseidon over the BN254 scalar field
//! - [`MerkleTree`]: fixed-height, zero-filled sparse binary Merkle tree
//! - [`IndexedMerkleTree`]: sorted linked list over leaves, supporting
//!   non-membership proofs and insertion witnesses
//! - Typed leaf trees: [`AuthMerkleTree`], [`ClaimMerkleTree`],
//!   [`ValueMerkleTree`]
//! - [`Claim`]: eight-slot credential payload with fixed slot-0 packing
//! - [`Entity`] with the [`Holder`] and [`Issuer`] variants, each publishing a
//!   single aggregate `state()` commitment
//!
//! Every node value computed here must match, bit for bit, what the proving
//! circuits recompute from the same inputs; a divergence yields a wrong root
//! with no crash. Hence hashing, leaf serialization, and path ordering are
//! fixed and covered by conformance tests.

pub mod claim;
pub mod entity;
pub mod error;
pub mod poseidon;
pub mod tree;

pub use claim::{Claim, ClaimBuilder, CLAIM_SLOTS};
pub use entity::{AuthProof, Entity, Holder, Issuer, Operation};
pub use error::{StateError, TreeError};
pub use poseidon::{fe_from_biguint, fe_from_le_bytes, PoseidonHash, MAX_HASH_ARITY};
pub use tree::auth::{AuthMerkleTree, AuthPath, PublicKeyType};
pub use tree::claims::ClaimMerkleTree;
pub use tree::indexed::{IndexedLeaf, IndexedMerkleTree, InsertProof, LowLeafProof};
pub use tree::merkle::{MerkleTree, PathProof, TreeLeaf, MAX_TREE_HEIGHT};
pub use tree::value::ValueMerkleTree;

/// Scalar field of BN254; every leaf, node, and hash value lives here.
pub use ark_bn254::Fr;
