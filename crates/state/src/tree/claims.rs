//! Issued-claims tree: one leaf per claim, node = Poseidon over its slots.

use ark_bn254::Fr;

use crate::claim::Claim;
use crate::error::TreeError;
use crate::poseidon::PoseidonHash;

use super::merkle::{MerkleTree, PathProof, TreeLeaf};

impl TreeLeaf for Claim {
    fn to_node(&self, hasher: &PoseidonHash) -> Fr {
        self.hash(hasher)
    }
}

#[derive(Clone)]
pub struct ClaimMerkleTree {
    tree: MerkleTree<Claim>,
}

impl ClaimMerkleTree {
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

    pub fn insert(&mut self, claim: Claim) -> Result<usize, TreeError> {
        self.tree.push(claim)
    }

    pub fn claim(&self, index: usize) -> Option<&Claim> {
        self.tree.leaf(index)
    }

    /// Index of the claim whose node equals `claim_hash`.
    ///
    /// Absent hashes are `None`, never a sentinel index: a default of 0 would
    /// be indistinguishable from a genuine match at index 0.
    pub fn claim_index(&self, claim_hash: Fr) -> Option<usize> {
        (0..self.tree.len()).find(|&i| self.tree.leaf_node(i) == Some(claim_hash))
    }

    pub fn path_proof(&self, index: usize) -> Result<PathProof, TreeError> {
        self.tree.path_proof(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::ClaimBuilder;

    fn claim(seed: u64) -> Claim {
        ClaimBuilder::new()
            .with_schema_hash(1234)
            .with_sequel(1)
            .with_subject(Fr::from(seed))
            .with_slot_value(2, Fr::from(seed * 7))
            .build()
    }

    #[test]
    fn lookup_by_hash() {
        let hasher = PoseidonHash::new();
        let mut tree = ClaimMerkleTree::new(3, hasher);

        let c0 = claim(1);
        let c1 = claim(2);
        let h0 = c0.hash(&hasher);
        let h1 = c1.hash(&hasher);
        tree.insert(c0).unwrap();
        tree.insert(c1).unwrap();

        assert_eq!(tree.claim_index(h0), Some(0));
        assert_eq!(tree.claim_index(h1), Some(1));
    }

    #[test]
    fn absent_hash_is_none_not_zero() {
        let hasher = PoseidonHash::new();
        let mut tree = ClaimMerkleTree::new(3, hasher);
        tree.insert(claim(1)).unwrap();

        assert_eq!(tree.claim_index(Fr::from(424242u64)), None);
    }

    #[test]
    fn claim_path_verifies() {
        let hasher = PoseidonHash::new();
        let mut tree = ClaimMerkleTree::new(3, hasher);
        let c = claim(5);
        let node = c.hash(&hasher);
        let index = tree.insert(c).unwrap();

        let proof = tree.path_proof(index).unwrap();
        assert_eq!(proof.value, node);
        assert!(proof.verify(tree.root(), &hasher));
    }
}
