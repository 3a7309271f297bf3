//! Holder and Issuer entities.
//!
//! An entity composes one or more trees and publishes a single field
//! element, its state, committing to all of them. That state is the only value an
//! external verifier or contract trusts; every mutation goes through an
//! explicit [`Operation`] so the state can never drift from the trees.
//!
//! Exclusive `&mut self` receivers serialize all mutations per entity; the
//! indexed tree's linked-list invariant is not safe under interleaved
//! writers.

use ark_bn254::Fr;
use ark_ff::Zero;

use crate::claim::Claim;
use crate::error::StateError;
use crate::poseidon::PoseidonHash;
use crate::tree::auth::{AuthMerkleTree, PublicKeyType};
use crate::tree::claims::ClaimMerkleTree;
use crate::tree::indexed::{IndexedMerkleTree, InsertProof};

/// A state-mutating command, applied sequentially.
#[derive(Clone, Debug)]
pub enum Operation {
    AddAuth {
        public_key_x: Fr,
        public_key_y: Fr,
        key_type: PublicKeyType,
    },
    RevokeAuth {
        public_key_x: Fr,
    },
    IssueClaim(Claim),
    RevokeClaim {
        claim_hash: Fr,
    },
}

/// Authentication and freshness material for one key: the key's path in the
/// auth tree plus the roots and state it is currently committed under, so a
/// circuit can prove "this key belongs to an entity whose published state is
/// S" in one shot. Holders report zero claim roots.
#[derive(Clone, Debug)]
pub struct AuthProof {
    pub public_key_x: Fr,
    pub public_key_y: Fr,
    pub auth_path: Vec<Fr>,
    pub auth_index: usize,
    pub claim_root: Fr,
    pub revoked_claim_root: Fr,
    pub state: Fr,
}

/// Common surface of [`Holder`] and [`Issuer`].
pub trait Entity {
    /// The single committed value aggregating every owned tree root.
    fn state(&self) -> Fr;

    /// Authentication material for a key, or `None` when the key was never
    /// added or has been revoked.
    fn auth_proof(&self, public_key_x: Fr) -> Option<AuthProof>;

    /// Apply one operation; trees and state stay consistent on failure.
    fn apply(&mut self, operation: &Operation) -> Result<(), StateError>;

    /// The hashing context this entity's trees were built with.
    fn hasher(&self) -> &PoseidonHash;
}

/// An identity that owns authentication keys but issues nothing.
#[derive(Clone)]
pub struct Holder {
    auth_tree: AuthMerkleTree,
    hasher: PoseidonHash,
}

impl Holder {
    pub fn new(auth_height: u32, hasher: PoseidonHash) -> Self {
        Self {
            auth_tree: AuthMerkleTree::new(auth_height, hasher),
            hasher,
        }
    }

    pub fn add_auth(
        &mut self,
        public_key_x: Fr,
        public_key_y: Fr,
        key_type: PublicKeyType,
    ) -> Result<usize, StateError> {
        Ok(self.auth_tree.insert(public_key_x, public_key_y, key_type)?)
    }

    pub fn revoke_auth(&mut self, public_key_x: Fr) -> Result<(), StateError> {
        Ok(self.auth_tree.revoke(public_key_x)?)
    }

    pub fn auth_root(&self) -> Fr {
        self.auth_tree.root()
    }

    pub fn auth_tree(&self) -> &AuthMerkleTree {
        &self.auth_tree
    }
}

impl Entity for Holder {
    fn state(&self) -> Fr {
        self.hasher
            .hash(&[self.auth_tree.root(), Fr::zero(), Fr::zero()])
    }

    fn auth_proof(&self, public_key_x: Fr) -> Option<AuthProof> {
        let auth = self.auth_tree.auth_proof(public_key_x)?;
        Some(AuthProof {
            public_key_x: auth.public_key_x,
            public_key_y: auth.public_key_y,
            auth_path: auth.path,
            auth_index: auth.index,
            claim_root: Fr::zero(),
            revoked_claim_root: Fr::zero(),
            state: self.state(),
        })
    }

    fn apply(&mut self, operation: &Operation) -> Result<(), StateError> {
        match operation {
            Operation::AddAuth {
                public_key_x,
                public_key_y,
                key_type,
            } => {
                self.add_auth(*public_key_x, *public_key_y, *key_type)?;
                Ok(())
            }
            Operation::RevokeAuth { public_key_x } => self.revoke_auth(*public_key_x),
            Operation::IssueClaim(_) => Err(StateError::UnsupportedOperation(
                "holders cannot issue claims",
            )),
            Operation::RevokeClaim { .. } => Err(StateError::UnsupportedOperation(
                "holders cannot revoke claims",
            )),
        }
    }

    fn hasher(&self) -> &PoseidonHash {
        &self.hasher
    }
}

/// An identity that additionally issues and revokes claims.
#[derive(Clone)]
pub struct Issuer {
    auth_tree: AuthMerkleTree,
    claim_tree: ClaimMerkleTree,
    revoked_claim_tree: IndexedMerkleTree,
    hasher: PoseidonHash,
}

impl Issuer {
    pub fn new(auth_height: u32, claim_height: u32, hasher: PoseidonHash) -> Self {
        Self {
            auth_tree: AuthMerkleTree::new(auth_height, hasher),
            claim_tree: ClaimMerkleTree::new(claim_height, hasher),
            revoked_claim_tree: IndexedMerkleTree::new(claim_height, hasher),
            hasher,
        }
    }

    pub fn add_auth(
        &mut self,
        public_key_x: Fr,
        public_key_y: Fr,
        key_type: PublicKeyType,
    ) -> Result<usize, StateError> {
        Ok(self.auth_tree.insert(public_key_x, public_key_y, key_type)?)
    }

    pub fn revoke_auth(&mut self, public_key_x: Fr) -> Result<(), StateError> {
        Ok(self.auth_tree.revoke(public_key_x)?)
    }

    pub fn add_claim(&mut self, claim: Claim) -> Result<usize, StateError> {
        Ok(self.claim_tree.insert(claim)?)
    }

    /// Link the claim's hash into the revoked-claims set. Revoking the same
    /// hash twice surfaces as [`crate::TreeError::DuplicateValue`].
    pub fn revoke_claim(&mut self, claim_hash: Fr) -> Result<InsertProof, StateError> {
        Ok(self.revoked_claim_tree.insert(claim_hash)?)
    }

    pub fn auth_root(&self) -> Fr {
        self.auth_tree.root()
    }

    pub fn claim_root(&self) -> Fr {
        self.claim_tree.root()
    }

    pub fn revoked_claim_root(&self) -> Fr {
        self.revoked_claim_tree.root()
    }

    pub fn auth_tree(&self) -> &AuthMerkleTree {
        &self.auth_tree
    }

    pub fn claim_tree(&self) -> &ClaimMerkleTree {
        &self.claim_tree
    }

    pub fn revoked_claim_tree(&self) -> &IndexedMerkleTree {
        &self.revoked_claim_tree
    }
}

impl Entity for Issuer {
    fn state(&self) -> Fr {
        self.hasher.hash(&[
            self.auth_tree.root(),
            self.claim_tree.root(),
            self.revoked_claim_tree.root(),
        ])
    }

    fn auth_proof(&self, public_key_x: Fr) -> Option<AuthProof> {
        let auth = self.auth_tree.auth_proof(public_key_x)?;
        Some(AuthProof {
            public_key_x: auth.public_key_x,
            public_key_y: auth.public_key_y,
            auth_path: auth.path,
            auth_index: auth.index,
            claim_root: self.claim_tree.root(),
            revoked_claim_root: self.revoked_claim_tree.root(),
            state: self.state(),
        })
    }

    fn apply(&mut self, operation: &Operation) -> Result<(), StateError> {
        match operation {
            Operation::AddAuth {
                public_key_x,
                public_key_y,
                key_type,
            } => {
                self.add_auth(*public_key_x, *public_key_y, *key_type)?;
                Ok(())
            }
            Operation::RevokeAuth { public_key_x } => self.revoke_auth(*public_key_x),
            Operation::IssueClaim(claim) => {
                self.add_claim(claim.clone())?;
                Ok(())
            }
            Operation::RevokeClaim { claim_hash } => {
                self.revoke_claim(*claim_hash)?;
                Ok(())
            }
        }
    }

    fn hasher(&self) -> &PoseidonHash {
        &self.hasher
    }
}
