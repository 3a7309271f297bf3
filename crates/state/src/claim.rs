//! Credential claim: eight 32-byte slots with fixed slot-0 packing.
//!
//! Slot layout (little-endian bytes, matching the circuit-side decoding):
//!
//! - slot 0, bytes 0..16: schema hash (u128)
//! - slot 0, bytes 16..24: expiration time (u64)
//! - slot 0, bytes 24..28: sequel, the revocation-generation counter (u32)
//! - slot 1: subject identifier
//! - slots 2..8: application data
//!
//! A slot read as a field element is its little-endian integer reduced into
//! the field. The claim hash is Poseidon over all eight slot values.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};

use crate::poseidon::PoseidonHash;

pub const CLAIM_SLOTS: usize = 8;

const SLOT_BYTES: usize = 32;
const SCHEMA_OFFSET: usize = 0;
const SCHEMA_BYTES: usize = 16;
const EXPIRATION_OFFSET: usize = 16;
const EXPIRATION_BYTES: usize = 8;
const SEQUEL_OFFSET: usize = 24;
const SEQUEL_BYTES: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Claim {
    slots: [[u8; SLOT_BYTES]; CLAIM_SLOTS],
}

impl Claim {
    pub fn from_slots(slots: [[u8; SLOT_BYTES]; CLAIM_SLOTS]) -> Self {
        Self { slots }
    }

    pub fn schema_hash(&self) -> u128 {
        let mut bytes = [0u8; SCHEMA_BYTES];
        bytes.copy_from_slice(&self.slots[0][SCHEMA_OFFSET..SCHEMA_OFFSET + SCHEMA_BYTES]);
        u128::from_le_bytes(bytes)
    }

    pub fn expiration_time(&self) -> u64 {
        let mut bytes = [0u8; EXPIRATION_BYTES];
        bytes.copy_from_slice(
            &self.slots[0][EXPIRATION_OFFSET..EXPIRATION_OFFSET + EXPIRATION_BYTES],
        );
        u64::from_le_bytes(bytes)
    }

    pub fn sequel(&self) -> u32 {
        let mut bytes = [0u8; SEQUEL_BYTES];
        bytes.copy_from_slice(&self.slots[0][SEQUEL_OFFSET..SEQUEL_OFFSET + SEQUEL_BYTES]);
        u32::from_le_bytes(bytes)
    }

    pub fn subject(&self) -> Fr {
        self.slot_value(1)
    }

    /// Slot content as a field element.
    pub fn slot_value(&self, index: usize) -> Fr {
        assert!(index < CLAIM_SLOTS, "slot index must be 0..8");
        Fr::from_le_bytes_mod_order(&self.slots[index])
    }

    pub fn all_slots(&self) -> [Fr; CLAIM_SLOTS] {
        core::array::from_fn(|i| self.slot_value(i))
    }

    pub fn hash(&self, hasher: &PoseidonHash) -> Fr {
        hasher.hash(&self.all_slots())
    }

    pub fn set_schema_hash(&mut self, schema_hash: u128) {
        self.slots[0][SCHEMA_OFFSET..SCHEMA_OFFSET + SCHEMA_BYTES]
            .copy_from_slice(&schema_hash.to_le_bytes());
    }

    pub fn set_expiration_time(&mut self, expiration_time: u64) {
        self.slots[0][EXPIRATION_OFFSET..EXPIRATION_OFFSET + EXPIRATION_BYTES]
            .copy_from_slice(&expiration_time.to_le_bytes());
    }

    pub fn set_sequel(&mut self, sequel: u32) {
        self.slots[0][SEQUEL_OFFSET..SEQUEL_OFFSET + SEQUEL_BYTES]
            .copy_from_slice(&sequel.to_le_bytes());
    }

    pub fn set_subject(&mut self, subject: Fr) {
        self.set_slot_value(1, subject);
    }

    /// Overwrite a whole slot with the canonical little-endian bytes of a
    /// field element.
    pub fn set_slot_value(&mut self, index: usize, value: Fr) {
        assert!(index < CLAIM_SLOTS, "slot index must be 0..8");
        let bytes = value.into_bigint().to_bytes_le();
        self.slots[index].copy_from_slice(&bytes);
    }
}

impl Default for Claim {
    fn default() -> Self {
        Self {
            slots: [[0u8; SLOT_BYTES]; CLAIM_SLOTS],
        }
    }
}

/// Chained construction of a [`Claim`] starting from all-zero slots.
#[derive(Default)]
pub struct ClaimBuilder {
    claim: Claim,
}

impl ClaimBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema_hash(mut self, schema_hash: u128) -> Self {
        self.claim.set_schema_hash(schema_hash);
        self
    }

    pub fn with_expiration_time(mut self, expiration_time: u64) -> Self {
        self.claim.set_expiration_time(expiration_time);
        self
    }

    pub fn with_sequel(mut self, sequel: u32) -> Self {
        self.claim.set_sequel(sequel);
        self
    }

    pub fn with_subject(mut self, subject: Fr) -> Self {
        self.claim.set_subject(subject);
        self
    }

    pub fn with_slot_value(mut self, index: usize, value: Fr) -> Self {
        self.claim.set_slot_value(index, value);
        self
    }

    pub fn build(self) -> Claim {
        self.claim
    }
}
