//! Fixed-height sparse binary Merkle tree.
//!
//! Nodes are addressed by 1-indexed binary-heap slot: the root is slot 1,
//! leaf index `i` occupies slot `i + 2^height`, a node's sibling is
//! `slot ^ 1` and its parent `slot >> 1`. Only slots touched by a real leaf
//! are materialized; an absent slot at depth `d` implicitly holds
//! `zero[height - d]`, where `zero[0] = 0` and
//! `zero[i] = H(zero[i-1], zero[i-1])`. Memory stays O(leaves × height)
//! regardless of height.

use std::collections::HashMap;

use ark_bn254::Fr;
use ark_ff::Zero;

use crate::error::TreeError;
use crate::poseidon::PoseidonHash;

/// Heights above this would push heap slots past `u64`; nothing in the
/// protocol needs trees this deep anyway.
pub const MAX_TREE_HEIGHT: u32 = 31;

/// A leaf that knows how to serialize itself into a tree node.
pub trait TreeLeaf {
    fn to_node(&self, hasher: &PoseidonHash) -> Fr;
}

/// Authentication path for one leaf: sibling values in leaf-to-root order,
/// exactly `height` entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathProof {
    pub path: Vec<Fr>,
    pub index: usize,
    pub value: Fr,
}

impl PathProof {
    /// Fold the path back up to a root, pairing left/right by the bit
    /// pattern of the leaf index.
    pub fn compute_root(&self, hasher: &PoseidonHash) -> Fr {
        let mut acc = self.value;
        for (level, sibling) in self.path.iter().enumerate() {
            acc = if (self.index >> level) & 1 == 0 {
                hasher.hash(&[acc, *sibling])
            } else {
                hasher.hash(&[*sibling, acc])
            };
        }
        acc
    }

    pub fn verify(&self, root: Fr, hasher: &PoseidonHash) -> bool {
        self.compute_root(hasher) == root
    }
}

/// Sparse Merkle tree over an append-only leaf arena.
///
/// Leaves are appended by index and mutated only through [`mutate_leaf`],
/// which re-hashes the affected path immediately, so the root can never go
/// stale relative to the arena.
///
/// [`mutate_leaf`]: MerkleTree::mutate_leaf
#[derive(Clone)]
pub struct MerkleTree<L: TreeLeaf> {
    height: u32,
    nodes: HashMap<u64, Fr>,
    leaves: Vec<L>,
    zero: Vec<Fr>,
    hasher: PoseidonHash,
}

impl<L: TreeLeaf> MerkleTree<L> {
    /// Create an empty tree of the given height; `O(height)` hash calls for
    /// the zero-subtree table.
    pub fn new(height: u32, hasher: PoseidonHash) -> Self {
        assert!(
            (1..=MAX_TREE_HEIGHT).contains(&height),
            "tree height must be between 1 and {MAX_TREE_HEIGHT}"
        );
        let mut zero = Vec::with_capacity(height as usize + 1);
        zero.push(Fr::zero());
        for i in 1..=height as usize {
            let prev = zero[i - 1];
            zero.push(hasher.hash(&[prev, prev]));
        }

        let mut nodes = HashMap::new();
        nodes.insert(1, zero[height as usize]);

        Self {
            height,
            nodes,
            leaves: Vec::new(),
            zero,
            hasher,
        }
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn capacity(&self) -> u64 {
        1u64 << self.height
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn root(&self) -> Fr {
        self.node_value(1)
    }

    pub fn hasher(&self) -> &PoseidonHash {
        &self.hasher
    }

    pub fn leaves(&self) -> &[L] {
        &self.leaves
    }

    pub fn leaf(&self, index: usize) -> Option<&L> {
        self.leaves.get(index)
    }

    /// Hash of the all-zero subtree at the given level (0 = leaf level).
    pub fn zero_at(&self, level: usize) -> Fr {
        self.zero[level]
    }

    /// Node value of the leaf at `index`, if materialized.
    pub fn leaf_node(&self, index: usize) -> Option<Fr> {
        if index >= self.leaves.len() {
            return None;
        }
        Some(self.node_value(self.heap_slot(index)))
    }

    fn heap_slot(&self, index: usize) -> u64 {
        index as u64 + self.capacity()
    }

    fn node_value(&self, slot: u64) -> Fr {
        if let Some(value) = self.nodes.get(&slot) {
            return *value;
        }
        // Depth of a heap slot is the position of its highest set bit.
        let depth = 63 - slot.leading_zeros();
        self.zero[(self.height - depth) as usize]
    }

    /// Append a leaf and hash its path; fails fast when the index space is
    /// exhausted.
    pub fn push(&mut self, leaf: L) -> Result<usize, TreeError> {
        if self.leaves.len() as u64 >= self.capacity() {
            return Err(TreeError::TreeFull {
                capacity: self.capacity(),
            });
        }
        self.leaves.push(leaf);
        let index = self.leaves.len() - 1;
        self.update(index);
        Ok(index)
    }

    /// Mutate a leaf in place and immediately re-hash its path.
    pub fn mutate_leaf(&mut self, index: usize, f: impl FnOnce(&mut L)) {
        f(&mut self.leaves[index]);
        self.update(index);
    }

    /// Recompute the leaf's node and every ancestor up to the root;
    /// `O(height)` hash calls. Must follow every leaf mutation.
    pub fn update(&mut self, index: usize) {
        let node = self.leaves[index].to_node(&self.hasher);
        let mut slot = self.heap_slot(index);
        self.nodes.insert(slot, node);

        while slot > 1 {
            slot >>= 1;
            let left = self.node_value(slot << 1);
            let right = self.node_value((slot << 1) | 1);
            self.nodes.insert(slot, self.hasher.hash(&[left, right]));
        }
    }

    /// Authentication path for the leaf at `index`. Valid for any index in
    /// the tree's fixed index space, materialized or not.
    pub fn path_proof(&self, index: usize) -> Result<PathProof, TreeError> {
        if index as u64 >= self.capacity() {
            return Err(TreeError::IndexOutOfRange {
                index,
                capacity: self.capacity(),
            });
        }
        let mut slot = self.heap_slot(index);
        let value = self.node_value(slot);
        let mut path = Vec::with_capacity(self.height as usize);
        while slot > 1 {
            path.push(self.node_value(slot ^ 1));
            slot >>= 1;
        }
        Ok(PathProof { path, index, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plainest possible leaf for exercising the base tree.
    struct TestLeaf(Fr);

    impl TreeLeaf for TestLeaf {
        fn to_node(&self, hasher: &PoseidonHash) -> Fr {
            hasher.hash(&[self.0])
        }
    }

    fn tree(height: u32) -> MerkleTree<TestLeaf> {
        MerkleTree::new(height, PoseidonHash::new())
    }

    #[test]
    fn empty_root_is_zero_subtree() {
        let t = tree(4);
        assert_eq!(t.root(), t.zero_at(4));
        assert!(t.is_empty());
    }

    #[test]
    fn root_changes_on_push() {
        let mut t = tree(4);
        let before = t.root();
        t.push(TestLeaf(Fr::from(7u64))).unwrap();
        assert_ne!(t.root(), before);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn capacity_violation_is_typed() {
        let mut t = tree(1);
        t.push(TestLeaf(Fr::from(1u64))).unwrap();
        t.push(TestLeaf(Fr::from(2u64))).unwrap();
        assert_eq!(
            t.push(TestLeaf(Fr::from(3u64))),
            Err(TreeError::TreeFull { capacity: 2 })
        );
    }

    #[test]
    fn path_proofs_verify_for_every_leaf() {
        let mut t = tree(3);
        for i in 0..5u64 {
            t.push(TestLeaf(Fr::from(i * 10 + 1))).unwrap();
        }
        let root = t.root();
        for i in 0..5 {
            let proof = t.path_proof(i).unwrap();
            assert_eq!(proof.path.len(), 3);
            assert!(proof.verify(root, t.hasher()));
        }
    }

    #[test]
    fn path_proof_of_unmaterialized_leaf_verifies() {
        let mut t = tree(3);
        t.push(TestLeaf(Fr::from(9u64))).unwrap();
        let proof = t.path_proof(6).unwrap();
        assert_eq!(proof.value, Fr::zero());
        assert!(proof.verify(t.root(), t.hasher()));
    }

    #[test]
    fn path_proof_out_of_range() {
        let t = tree(2);
        assert!(matches!(
            t.path_proof(4),
            Err(TreeError::IndexOutOfRange { index: 4, capacity: 4 })
        ));
    }

    #[test]
    fn incremental_root_matches_rebuild() {
        use ark_std::UniformRand;

        let mut rng = ark_std::test_rng();
        let values: Vec<Fr> = (0..8).map(|_| Fr::rand(&mut rng)).collect();

        let mut incremental = tree(4);
        for v in &values {
            incremental.push(TestLeaf(*v)).unwrap();
        }

        // Rebuild from scratch by batch-hashing the full leaf level.
        let hasher = PoseidonHash::new();
        let mut level: Vec<Fr> = (0..16)
            .map(|i| match values.get(i) {
                Some(v) => hasher.hash(&[*v]),
                None => Fr::zero(),
            })
            .collect();
        while level.len() > 1 {
            level = level
                .chunks(2)
                .map(|pair| hasher.hash(&[pair[0], pair[1]]))
                .collect();
        }

        assert_eq!(incremental.root(), level[0]);
    }

    #[test]
    fn mutate_leaf_rehashes_path() {
        let mut t = tree(3);
        t.push(TestLeaf(Fr::from(1u64))).unwrap();
        t.push(TestLeaf(Fr::from(2u64))).unwrap();
        let before = t.root();

        t.mutate_leaf(0, |leaf| leaf.0 = Fr::from(99u64));
        assert_ne!(t.root(), before);

        let proof = t.path_proof(0).unwrap();
        assert!(proof.verify(t.root(), t.hasher()));
    }
}
