//! Witness assembly for the credential proving backend.
//!
//! This crate packages the state layer's proof material into the flattened,
//! ordered field-element sequences the proving circuits consume. Each proof
//! type (identity ownership, state transition, claim existence, claim
//! non-revocation, set membership / non-membership, full claim query) has a
//! witness struct with a fixed flattening order; a [`WitnessMap`] renders it
//! as 1-based slots of 0x-prefixed, 64-digit big-endian hex strings.
//!
//! Signatures come from an external collaborator through the
//! [`EddsaSigner`] / [`EcdsaSigner`] seams; nothing here implements curve
//! arithmetic.

pub mod claim_query;
pub mod encode;
pub mod id_ownership;
pub mod signer;
pub mod state_transition;

pub use claim_query::{
    claim_existence_proof, claim_non_revocation_proof, membership_set_proof,
    non_membership_set_proof, ClaimExistenceWitness, ClaimNonRevocationWitness,
    ClaimQueryEcdsaWitness, ClaimQueryEddsaWitness, MembershipSetWitness,
    NonMembershipSetWitness,
};
pub use encode::{fe_hex, fe_to_be_bytes, WitnessMap};
pub use id_ownership::{
    id_ownership_by_ecdsa_signature, id_ownership_by_eddsa_signature, IdOwnershipEcdsaWitness,
    IdOwnershipEddsaWitness,
};
pub use signer::{EcdsaPublicKey, EcdsaSigner, EddsaSignature, EddsaSigner};
pub use state_transition::{
    state_transition_by_ecdsa_signature, state_transition_by_eddsa_signature,
    state_transition_challenge, StateTransitionEcdsaWitness, StateTransitionEddsaWitness,
};

use credential_state::{StateError, TreeError};
use thiserror::Error;

/// Errors during witness assembly.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WitnessError {
    /// The claim hash is not in the issuer's claim tree. Surfaced explicitly:
    /// a defaulted index would be indistinguishable from a match at index 0.
    #[error("claim hash not present in the issuer's claim tree")]
    ClaimNotFound,

    /// Non-revocation was requested for a claim that is revoked.
    #[error("claim hash is present in the revoked-claims tree")]
    ClaimRevoked,

    /// Membership was requested for a value outside the set.
    #[error("value is not a member of the set")]
    ValueNotInSet,

    /// Non-membership was requested for a value inside the set.
    #[error("value is a member of the set")]
    ValueInSet,

    /// The signing key is not an authorized, non-revoked key of the entity.
    #[error("signing key is not authorized by the entity")]
    KeyNotAuthorized,

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    State(#[from] StateError),
}
