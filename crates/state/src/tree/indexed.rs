//! Indexed Merkle tree: a sorted singly-linked list embedded in the leaves.
//!
//! Each leaf records `{val, next_val, next_idx}`; leaf 0 is the sentinel
//! `{0, 0, 0}`. Walking from the sentinel via `next_idx` visits leaves in
//! strictly increasing `val` order (leaf *position* is insertion order, not
//! value order) and terminates at the leaf whose `next_val` is 0. For any
//! absent value there is a unique "low leaf" with `val < value` and
//! (`next_val > value` or `next_val == 0`); its record plus authentication
//! path is a non-membership proof.

use ark_bn254::Fr;
use ark_ff::Zero;

use crate::error::TreeError;
use crate::poseidon::PoseidonHash;

use super::merkle::{MerkleTree, PathProof, TreeLeaf};

/// One record of the value-ordered linked list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexedLeaf {
    pub val: Fr,
    pub next_val: Fr,
    pub next_idx: u64,
}

impl IndexedLeaf {
    fn sentinel() -> Self {
        Self {
            val: Fr::zero(),
            next_val: Fr::zero(),
            next_idx: 0,
        }
    }
}

impl TreeLeaf for IndexedLeaf {
    fn to_node(&self, hasher: &PoseidonHash) -> Fr {
        hasher.hash(&[self.val, self.next_val, Fr::from(self.next_idx)])
    }
}

/// Low-leaf material: the non-membership witness for one target value.
#[derive(Clone, Debug)]
pub struct LowLeafProof {
    pub leaf_low: IndexedLeaf,
    pub path_low: Vec<Fr>,
    pub idx_low: usize,
    pub root: Fr,
}

/// Witness bundle for a single insertion, exactly what a one-insertion
/// circuit verifies: the low leaf's pre-mutation path against the old root,
/// then the appended leaf's path against the new root.
///
/// `next_val_low` / `next_idx_low` are the low leaf's successor pointers
/// *before* the insert, i.e. the pointers the new leaf inherits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertProof {
    pub old_root: Fr,
    pub new_root: Fr,
    pub path_low: Vec<Fr>,
    pub idx_low: usize,
    pub val_low: Fr,
    pub next_val_low: Fr,
    pub next_idx_low: u64,
    pub val: Fr,
    pub index: usize,
    pub path_new: Vec<Fr>,
}

/// Merkle tree over [`IndexedLeaf`] records; the sentinel is inserted at
/// construction, so the tree always holds at least one leaf.
#[derive(Clone)]
pub struct IndexedMerkleTree {
    tree: MerkleTree<IndexedLeaf>,
}

impl IndexedMerkleTree {
    pub fn new(height: u32, hasher: PoseidonHash) -> Self {
        let mut tree = MerkleTree::new(height, hasher);
        tree.push(IndexedLeaf::sentinel())
            .expect("a fresh tree always has room for the sentinel");
        Self { tree }
    }

    pub fn root(&self) -> Fr {
        self.tree.root()
    }

    pub fn height(&self) -> u32 {
        self.tree.height()
    }

    pub fn capacity(&self) -> u64 {
        self.tree.capacity()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        // The sentinel is structural; "empty" means no inserted values.
        self.tree.len() <= 1
    }

    pub fn hasher(&self) -> &PoseidonHash {
        self.tree.hasher()
    }

    pub fn leaves(&self) -> &[IndexedLeaf] {
        self.tree.leaves()
    }

    pub fn zero_at(&self, level: usize) -> Fr {
        self.tree.zero_at(level)
    }

    pub fn path_proof(&self, index: usize) -> Result<PathProof, TreeError> {
        self.tree.path_proof(index)
    }

    /// Whether `value` is currently linked into the tree.
    pub fn contains(&self, value: Fr) -> bool {
        let (_, leaf_low) = self.low_leaf(value);
        leaf_low.val == value
    }

    /// The largest leaf with `val < value` (or the leaf equal to `value`,
    /// when present), found by walking the linked list from the sentinel.
    pub fn low_leaf(&self, value: Fr) -> (usize, IndexedLeaf) {
        let leaves = self.tree.leaves();
        let mut idx_low = 0usize;
        let mut leaf_low = leaves[0];
        while !(leaf_low.next_val > value || leaf_low.next_val.is_zero()) {
            idx_low = leaf_low.next_idx as usize;
            leaf_low = leaves[idx_low];
        }
        (idx_low, leaf_low)
    }

    /// Low leaf plus its authentication path, against the current root.
    pub fn path_proof_low(&self, value: Fr) -> LowLeafProof {
        let (idx_low, leaf_low) = self.low_leaf(value);
        let proof = self
            .tree
            .path_proof(idx_low)
            .expect("low leaf index is always inside the index space");
        LowLeafProof {
            leaf_low,
            path_low: proof.path,
            idx_low,
            root: self.root(),
        }
    }

    /// Link `value` into the list and append its leaf.
    ///
    /// A duplicate value fails with [`TreeError::DuplicateValue`] and a full
    /// tree with [`TreeError::TreeFull`]; in both cases nothing has been
    /// mutated, so repeated insertion is observably idempotent.
    pub fn insert(&mut self, value: Fr) -> Result<InsertProof, TreeError> {
        let LowLeafProof {
            leaf_low,
            path_low,
            idx_low,
            root: old_root,
        } = self.path_proof_low(value);

        if leaf_low.val == value {
            return Err(TreeError::DuplicateValue);
        }
        if self.tree.len() as u64 >= self.tree.capacity() {
            return Err(TreeError::TreeFull {
                capacity: self.tree.capacity(),
            });
        }

        // The new leaf inherits the low leaf's successor pointers.
        let leaf_new = IndexedLeaf {
            val: value,
            next_val: leaf_low.next_val,
            next_idx: leaf_low.next_idx,
        };

        let new_index = self.tree.len();
        self.tree.mutate_leaf(idx_low, |leaf| {
            leaf.next_val = value;
            leaf.next_idx = new_index as u64;
        });

        let index = self.tree.push(leaf_new)?;
        let path_new = self.tree.path_proof(index)?.path;

        Ok(InsertProof {
            old_root,
            new_root: self.root(),
            path_low,
            idx_low,
            val_low: leaf_low.val,
            next_val_low: leaf_new.next_val,
            next_idx_low: leaf_new.next_idx,
            val: value,
            index,
            path_new,
        })
    }
}
