//! Signature collaborator seams.
//!
//! Elliptic-curve key material and signatures are opaque values supplied by
//! an external collaborator; these traits are the only coupling point. EdDSA
//! (baby-jubjub style) carries field-element coordinates, ECDSA
//! (secp256k1 style) raw little-endian bytes.

use ark_bn254::Fr;

/// An EdDSA signature over a field-element challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EddsaSignature {
    pub r8x: Fr,
    pub r8y: Fr,
    pub s: Fr,
}

pub trait EddsaSigner {
    /// Public key coordinates `(x, y)`.
    fn public_key(&self) -> (Fr, Fr);

    fn sign(&self, challenge: Fr) -> EddsaSignature;
}

/// ECDSA public key as little-endian coordinate bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EcdsaPublicKey {
    pub x: [u8; 32],
    pub y: [u8; 32],
}

pub trait EcdsaSigner {
    fn public_key(&self) -> EcdsaPublicKey;

    /// Sign the big-endian byte form of the challenge; 64-byte compact
    /// signature.
    fn sign(&self, challenge: &[u8; 32]) -> [u8; 64];
}
