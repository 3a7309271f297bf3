//! Field-element encoding for backend consumption.
//!
//! Every public witness value is serialized as a big-endian 32-byte hex
//! string, `0x` followed by exactly 64 lowercase digits; slot numbering is
//! 1-based and dense. The byte-level export uses arkworks' canonical
//! compressed form, 32 bytes per element.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use ark_serialize::CanonicalSerialize;

/// `0x` + 64 hex digits, big-endian.
pub fn fe_hex(value: &Fr) -> String {
    format!("0x{}", hex::encode(value.into_bigint().to_bytes_be()))
}

/// Big-endian 32-byte form, e.g. for byte-oriented signature collaborators.
pub fn fe_to_be_bytes(value: &Fr) -> [u8; 32] {
    let bytes = value.into_bigint().to_bytes_be();
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    out
}

/// Ordered witness inputs for one proof, addressed by 1-based slot number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WitnessMap {
    elements: Vec<Fr>,
}

impl WitnessMap {
    pub fn from_elements(elements: Vec<Fr>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[Fr] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Hex string at the given 1-based slot.
    pub fn hex(&self, slot: usize) -> Option<String> {
        if slot == 0 {
            return None;
        }
        self.elements.get(slot - 1).map(fe_hex)
    }

    /// `(slot, hex)` pairs in slot order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, String)> + '_ {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, fe)| (i + 1, fe_hex(fe)))
    }

    /// JSON array of hex strings; position `i` holds slot `i + 1`.
    pub fn to_json(&self) -> String {
        let hex_values: Vec<String> = self.elements.iter().map(fe_hex).collect();
        serde_json::to_string(&hex_values).expect("a vector of strings always serializes")
    }

    /// Canonical compressed bytes of every element, concatenated.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.elements.len() * 32);
        for element in &self.elements {
            element
                .serialize_compressed(&mut bytes)
                .expect("writing to a Vec cannot fail");
        }
        bytes
    }
}
