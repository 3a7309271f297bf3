//! Merkle tree variants backing entity state commitments.

pub mod auth;
pub mod claims;
pub mod indexed;
pub mod merkle;
pub mod value;

pub use auth::{AuthMerkleTree, AuthPath, PublicKeyType};
pub use claims::ClaimMerkleTree;
pub use indexed::{IndexedLeaf, IndexedMerkleTree, InsertProof, LowLeafProof};
pub use merkle::{MerkleTree, PathProof, TreeLeaf, MAX_TREE_HEIGHT};
pub use value::ValueMerkleTree;
