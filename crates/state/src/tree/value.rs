//! Plain-value tree: the leaf node is the inserted value verbatim.
//!
//! Used for generic membership sets, where the committed values are already
//! field elements (typically hashes) and need no further leaf serialization.

use ark_bn254::Fr;

use crate::error::TreeError;
use crate::poseidon::PoseidonHash;

use super::merkle::{MerkleTree, PathProof, TreeLeaf};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueLeaf(pub Fr);

impl TreeLeaf for ValueLeaf {
    fn to_node(&self, _hasher: &PoseidonHash) -> Fr {
        self.0
    }
}

#[derive(Clone)]
pub struct ValueMerkleTree {
    tree: MerkleTree<ValueLeaf>,
}

impl ValueMerkleTree {
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

    pub fn insert(&mut self, value: Fr) -> Result<usize, TreeError> {
        self.tree.push(ValueLeaf(value))
    }

    pub fn value(&self, index: usize) -> Option<Fr> {
        self.tree.leaf(index).map(|leaf| leaf.0)
    }

    pub fn path_proof(&self, index: usize) -> Result<PathProof, TreeError> {
        self.tree.path_proof(index)
    }
}
