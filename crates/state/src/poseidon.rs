//! Poseidon hash adapter (circomlib parameter set over BN254).
//!
//! The proving circuits instantiate Poseidon with the circomlib round
//! constants, so the native side must use the exact same parameter set; the
//! arkworks sponge parameters would produce different digests. The adapter is
//! pure and side-effect free, so one context value can be shared read-only
//! across any number of trees.

use ark_bn254::Fr;
use ark_ff::PrimeField;
use light_poseidon::{Poseidon, PoseidonHasher};
use num_bigint::BigUint;

/// Largest input count the circomlib parameter set covers.
pub const MAX_HASH_ARITY: usize = 12;

/// Hashing context passed into every tree and entity constructor.
///
/// Deliberately an explicit value rather than a global: whoever builds the
/// state layer constructs one `PoseidonHash` and threads it through.
#[derive(Clone, Copy, Debug, Default)]
pub struct PoseidonHash;

impl PoseidonHash {
    pub fn new() -> Self {
        Self
    }

    /// Hash a sequence of field elements into one.
    ///
    /// Deterministic and pure. Input count outside `1..=MAX_HASH_ARITY` is a
    /// caller bug, not a runtime condition; internal call sites only use
    /// arities 2, 3, and 8.
    pub fn hash(&self, inputs: &[Fr]) -> Fr {
        assert!(
            !inputs.is_empty() && inputs.len() <= MAX_HASH_ARITY,
            "poseidon arity must be between 1 and {MAX_HASH_ARITY}, got {}",
            inputs.len()
        );
        let mut poseidon = Poseidon::<Fr>::new_circom(inputs.len())
            .expect("circom parameters cover every arity up to MAX_HASH_ARITY");
        poseidon
            .hash(inputs)
            .expect("input length matches the configured arity")
    }
}

/// Reduce an arbitrary-precision integer into the scalar field.
///
/// Upstream numeric values (e.g. secp256k1 coordinates) may exceed the field
/// modulus transiently; they are normalized here rather than rejected.
pub fn fe_from_biguint(value: &BigUint) -> Fr {
    Fr::from_le_bytes_mod_order(&value.to_bytes_le())
}

/// Reduce raw little-endian bytes into the scalar field.
pub fn fe_from_le_bytes(bytes: &[u8]) -> Fr {
    Fr::from_le_bytes_mod_order(bytes)
}
