//! State-transition witnesses: an authorized key signs the challenge
//! `H(old_state, new_state)` after a batch of operations has been applied.

use ark_bn254::Fr;
use ark_ff::Zero;

use credential_state::{fe_from_le_bytes, Entity, Operation, PoseidonHash};

use crate::encode::{fe_to_be_bytes, WitnessMap};
use crate::signer::{EcdsaSigner, EddsaSigner};
use crate::WitnessError;

/// Challenge binding one transition: the hash of the states either side of
/// the applied batch. The circuit recomputes it from its public inputs, so
/// it never travels in the witness itself.
pub fn state_transition_challenge(hasher: &PoseidonHash, old_state: Fr, new_state: Fr) -> Fr {
    hasher.hash(&[old_state, new_state])
}

#[derive(Clone, Debug)]
pub struct StateTransitionEddsaWitness {
    pub public_key_x: Fr,
    pub public_key_y: Fr,
    pub auth_path: Vec<Fr>,
    pub auth_index: usize,
    pub claim_root: Fr,
    pub revoked_claim_root: Fr,
    pub old_state: Fr,
    pub new_state: Fr,
    pub signature_s: Fr,
    pub signature_r8x: Fr,
    pub signature_r8y: Fr,
}

impl StateTransitionEddsaWitness {
    pub fn zeroed(auth_height: u32) -> Self {
        Self {
            public_key_x: Fr::zero(),
            public_key_y: Fr::zero(),
            auth_path: vec![Fr::zero(); auth_height as usize],
            auth_index: 0,
            claim_root: Fr::zero(),
            revoked_claim_root: Fr::zero(),
            old_state: Fr::zero(),
            new_state: Fr::zero(),
            signature_s: Fr::zero(),
            signature_r8x: Fr::zero(),
            signature_r8y: Fr::zero(),
        }
    }

    pub fn to_elements(&self) -> Vec<Fr> {
        let mut elements = vec![self.public_key_x, self.public_key_y];
        elements.extend_from_slice(&self.auth_path);
        elements.extend([
            Fr::from(self.auth_index as u64),
            self.claim_root,
            self.revoked_claim_root,
            self.old_state,
            self.new_state,
            self.signature_s,
            self.signature_r8x,
            self.signature_r8y,
        ]);
        elements
    }

    pub fn witness_map(&self) -> WitnessMap {
        WitnessMap::from_elements(self.to_elements())
    }
}

#[derive(Clone, Debug)]
pub struct StateTransitionEcdsaWitness {
    pub public_key_x: [u8; 32],
    pub public_key_y: [u8; 32],
    pub auth_path: Vec<Fr>,
    pub auth_index: usize,
    pub claim_root: Fr,
    pub revoked_claim_root: Fr,
    pub old_state: Fr,
    pub new_state: Fr,
    pub signature: [u8; 64],
}

impl StateTransitionEcdsaWitness {
    pub fn zeroed(auth_height: u32) -> Self {
        Self {
            public_key_x: [0u8; 32],
            public_key_y: [0u8; 32],
            auth_path: vec![Fr::zero(); auth_height as usize],
            auth_index: 0,
            claim_root: Fr::zero(),
            revoked_claim_root: Fr::zero(),
            old_state: Fr::zero(),
            new_state: Fr::zero(),
            signature: [0u8; 64],
        }
    }

    pub fn to_elements(&self) -> Vec<Fr> {
        let mut elements: Vec<Fr> = Vec::new();
        elements.extend(self.public_key_x.iter().map(|b| Fr::from(*b)));
        elements.extend(self.public_key_y.iter().map(|b| Fr::from(*b)));
        elements.extend_from_slice(&self.auth_path);
        elements.extend([
            Fr::from(self.auth_index as u64),
            self.claim_root,
            self.revoked_claim_root,
            self.old_state,
            self.new_state,
        ]);
        elements.extend(self.signature.iter().map(|b| Fr::from(*b)));
        elements
    }

    pub fn witness_map(&self) -> WitnessMap {
        WitnessMap::from_elements(self.to_elements())
    }
}

/// Apply `operations` to `entity`, then assemble the transition witness
/// signed with an EdDSA key that is authorized in the resulting state.
///
/// Operations are applied before signing, so a batch that revokes the
/// signing key itself cannot be attested by that key.
pub fn state_transition_by_eddsa_signature<E: Entity, S: EddsaSigner>(
    signer: &S,
    entity: &mut E,
    operations: &[Operation],
) -> Result<StateTransitionEddsaWitness, WitnessError> {
    let old_state = entity.state();
    for operation in operations {
        entity.apply(operation)?;
    }
    let new_state = entity.state();
    let challenge = state_transition_challenge(entity.hasher(), old_state, new_state);

    let (public_key_x, _) = signer.public_key();
    let auth = entity
        .auth_proof(public_key_x)
        .ok_or(WitnessError::KeyNotAuthorized)?;
    let signature = signer.sign(challenge);

    Ok(StateTransitionEddsaWitness {
        public_key_x: auth.public_key_x,
        public_key_y: auth.public_key_y,
        auth_path: auth.auth_path,
        auth_index: auth.auth_index,
        claim_root: auth.claim_root,
        revoked_claim_root: auth.revoked_claim_root,
        old_state,
        new_state,
        signature_s: signature.s,
        signature_r8x: signature.r8x,
        signature_r8y: signature.r8y,
    })
}

/// ECDSA variant of [`state_transition_by_eddsa_signature`]; the challenge
/// is signed in its big-endian byte form.
pub fn state_transition_by_ecdsa_signature<E: Entity, S: EcdsaSigner>(
    signer: &S,
    entity: &mut E,
    operations: &[Operation],
) -> Result<StateTransitionEcdsaWitness, WitnessError> {
    let old_state = entity.state();
    for operation in operations {
        entity.apply(operation)?;
    }
    let new_state = entity.state();
    let challenge = state_transition_challenge(entity.hasher(), old_state, new_state);

    let key = signer.public_key();
    let auth = entity
        .auth_proof(fe_from_le_bytes(&key.x))
        .ok_or(WitnessError::KeyNotAuthorized)?;
    let signature = signer.sign(&fe_to_be_bytes(&challenge));

    Ok(StateTransitionEcdsaWitness {
        public_key_x: key.x,
        public_key_y: key.y,
        auth_path: auth.auth_path,
        auth_index: auth.auth_index,
        claim_root: auth.claim_root,
        revoked_claim_root: auth.revoked_claim_root,
        old_state,
        new_state,
        signature,
    })
}
