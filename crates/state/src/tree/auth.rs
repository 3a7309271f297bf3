//! Authorized-key tree.
//!
//! Leaves commit to `{public_key_x, public_key_y, key_type}`. Revocation
//! zeroes the key coordinates in place rather than removing the leaf: the
//! index space is preserved so previously issued auth indices stay
//! addressable, and a zeroed slot simply stops matching lookups.

use ark_bn254::Fr;
use ark_ff::Zero;

use crate::error::TreeError;
use crate::poseidon::PoseidonHash;

use super::merkle::{MerkleTree, PathProof, TreeLeaf};

/// Signature scheme a key pair belongs to. The discriminants are part of the
/// leaf commitment and must match the circuit-side encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublicKeyType {
    Eddsa = 0,
    Ecdsa = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthLeaf {
    pub public_key_x: Fr,
    pub public_key_y: Fr,
    pub key_type: PublicKeyType,
}

impl TreeLeaf for AuthLeaf {
    fn to_node(&self, hasher: &PoseidonHash) -> Fr {
        hasher.hash(&[
            self.public_key_x,
            self.public_key_y,
            Fr::from(self.key_type as u64),
        ])
    }
}

/// Authentication material for one key.
#[derive(Clone, Debug)]
pub struct AuthPath {
    pub public_key_x: Fr,
    pub public_key_y: Fr,
    pub path: Vec<Fr>,
    pub index: usize,
}

#[derive(Clone)]
pub struct AuthMerkleTree {
    tree: MerkleTree<AuthLeaf>,
}

impl AuthMerkleTree {
    pub fn new(height: u32, hasher: PoseidonHash) -> Self {
        Self {
            tree: MerkleTree::new(height, hasher),
        }
    }

    pub fn root(&self) -> Fr {
        self.tree.root()
    }

    pub fn height(&self) -> u32 {
        self.tree.height()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn insert(
        &mut self,
        public_key_x: Fr,
        public_key_y: Fr,
        key_type: PublicKeyType,
    ) -> Result<usize, TreeError> {
        self.tree.push(AuthLeaf {
            public_key_x,
            public_key_y,
            key_type,
        })
    }

    /// Zero out the slot holding `public_key_x` and re-hash its path.
    pub fn revoke(&mut self, public_key_x: Fr) -> Result<(), TreeError> {
        let index = self.find(public_key_x).ok_or(TreeError::KeyNotFound)?;
        self.tree.mutate_leaf(index, |leaf| {
            leaf.public_key_x = Fr::zero();
            leaf.public_key_y = Fr::zero();
        });
        Ok(())
    }

    /// Index of the live leaf holding `public_key_x`, by linear scan.
    /// Zero never matches: it is the revoked-slot marker, not a key.
    pub fn find(&self, public_key_x: Fr) -> Option<usize> {
        if public_key_x.is_zero() {
            return None;
        }
        self.tree
            .leaves()
            .iter()
            .position(|leaf| leaf.public_key_x == public_key_x)
    }

    /// Authentication path plus the key's y coordinate, or `None` when the
    /// key was never added or has been revoked.
    pub fn auth_proof(&self, public_key_x: Fr) -> Option<AuthPath> {
        let index = self.find(public_key_x)?;
        let proof = self.tree.path_proof(index).ok()?;
        Some(AuthPath {
            public_key_x,
            public_key_y: self.tree.leaves()[index].public_key_y,
            path: proof.path,
            index,
        })
    }

    pub fn path_proof(&self, index: usize) -> Result<PathProof, TreeError> {
        self.tree.path_proof(index)
    }
}
