//! Identity-ownership witnesses: a signed challenge bound to a key that the
//! entity's published state commits to.

use ark_bn254::Fr;
use ark_ff::Zero;

use credential_state::{fe_from_le_bytes, Entity};

use crate::encode::{fe_to_be_bytes, WitnessMap};
use crate::signer::{EcdsaSigner, EddsaSigner};
use crate::WitnessError;

/// Witness for ownership of an EdDSA key. Field order is fixed by the
/// circuit's input layout.
#[derive(Clone, Debug)]
pub struct IdOwnershipEddsaWitness {
    pub public_key_x: Fr,
    pub public_key_y: Fr,
    pub auth_path: Vec<Fr>,
    pub auth_index: usize,
    pub claim_root: Fr,
    pub revoked_claim_root: Fr,
    pub state: Fr,
    pub signature_s: Fr,
    pub signature_r8x: Fr,
    pub signature_r8y: Fr,
    pub challenge: Fr,
}

impl IdOwnershipEddsaWitness {
    /// All-zero witness with an auth path sized for the given tree height.
    pub fn zeroed(auth_height: u32) -> Self {
        Self {
            public_key_x: Fr::zero(),
            public_key_y: Fr::zero(),
            auth_path: vec![Fr::zero(); auth_height as usize],
            auth_index: 0,
            claim_root: Fr::zero(),
            revoked_claim_root: Fr::zero(),
            state: Fr::zero(),
            signature_s: Fr::zero(),
            signature_r8x: Fr::zero(),
            signature_r8y: Fr::zero(),
            challenge: Fr::zero(),
        }
    }

    pub fn to_elements(&self) -> Vec<Fr> {
        let mut elements = vec![self.public_key_x, self.public_key_y];
        elements.extend_from_slice(&self.auth_path);
        elements.extend([
            Fr::from(self.auth_index as u64),
            self.claim_root,
            self.revoked_claim_root,
            self.state,
            self.signature_s,
            self.signature_r8x,
            self.signature_r8y,
            self.challenge,
        ]);
        elements
    }

    pub fn witness_map(&self) -> WitnessMap {
        WitnessMap::from_elements(self.to_elements())
    }
}

/// Witness for ownership of an ECDSA key; coordinates and signature travel
/// as one byte per witness slot, little-endian.
#[derive(Clone, Debug)]
pub struct IdOwnershipEcdsaWitness {
    pub public_key_x: [u8; 32],
    pub public_key_y: [u8; 32],
    pub auth_path: Vec<Fr>,
    pub auth_index: usize,
    pub claim_root: Fr,
    pub revoked_claim_root: Fr,
    pub state: Fr,
    pub signature: [u8; 64],
    pub challenge: Fr,
}

impl IdOwnershipEcdsaWitness {
    pub fn zeroed(auth_height: u32) -> Self {
        Self {
            public_key_x: [0u8; 32],
            public_key_y: [0u8; 32],
            auth_path: vec![Fr::zero(); auth_height as usize],
            auth_index: 0,
            claim_root: Fr::zero(),
            revoked_claim_root: Fr::zero(),
            state: Fr::zero(),
            signature: [0u8; 64],
            challenge: Fr::zero(),
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
            self.state,
        ]);
        elements.extend(self.signature.iter().map(|b| Fr::from(*b)));
        elements.push(self.challenge);
        elements
    }

    pub fn witness_map(&self) -> WitnessMap {
        WitnessMap::from_elements(self.to_elements())
    }
}

/// Prove ownership of an EdDSA key authorized by `entity`, over `challenge`.
pub fn id_ownership_by_eddsa_signature<E: Entity, S: EddsaSigner>(
    signer: &S,
    entity: &E,
    challenge: Fr,
) -> Result<IdOwnershipEddsaWitness, WitnessError> {
    let (public_key_x, _) = signer.public_key();
    let auth = entity
        .auth_proof(public_key_x)
        .ok_or(WitnessError::KeyNotAuthorized)?;
    let signature = signer.sign(challenge);

    Ok(IdOwnershipEddsaWitness {
        public_key_x: auth.public_key_x,
        public_key_y: auth.public_key_y,
        auth_path: auth.auth_path,
        auth_index: auth.auth_index,
        claim_root: auth.claim_root,
        revoked_claim_root: auth.revoked_claim_root,
        state: auth.state,
        signature_s: signature.s,
        signature_r8x: signature.r8x,
        signature_r8y: signature.r8y,
        challenge,
    })
}

/// Prove ownership of an ECDSA key authorized by `entity`, over `challenge`.
///
/// The key's x coordinate is reduced into the field for the auth-tree
/// lookup, matching how it was committed at `add_auth` time.
pub fn id_ownership_by_ecdsa_signature<E: Entity, S: EcdsaSigner>(
    signer: &S,
    entity: &E,
    challenge: Fr,
) -> Result<IdOwnershipEcdsaWitness, WitnessError> {
    let key = signer.public_key();
    let auth = entity
        .auth_proof(fe_from_le_bytes(&key.x))
        .ok_or(WitnessError::KeyNotAuthorized)?;
    let signature = signer.sign(&fe_to_be_bytes(&challenge));

    Ok(IdOwnershipEcdsaWitness {
        public_key_x: key.x,
        public_key_y: key.y,
        auth_path: auth.auth_path,
        auth_index: auth.auth_index,
        claim_root: auth.claim_root,
        revoked_claim_root: auth.revoked_claim_root,
        state: auth.state,
        signature,
        challenge,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use credential_state::{Holder, PoseidonHash, PublicKeyType};

    struct StubEddsa {
        x: Fr,
        y: Fr,
    }

    impl EddsaSigner for StubEddsa {
        fn public_key(&self) -> (Fr, Fr) {
            (self.x, self.y)
        }

        fn sign(&self, challenge: Fr) -> crate::EddsaSignature {
            crate::EddsaSignature {
                r8x: self.x,
                r8y: self.y,
                s: challenge,
            }
        }
    }

    #[test]
    fn eddsa_witness_carries_entity_material() {
        let hasher = PoseidonHash::new();
        let mut holder = Holder::new(3, hasher);
        let signer = StubEddsa {
            x: Fr::from(11u64),
            y: Fr::from(22u64),
        };
        holder
            .add_auth(signer.x, signer.y, PublicKeyType::Eddsa)
            .unwrap();

        let witness =
            id_ownership_by_eddsa_signature(&signer, &holder, Fr::from(123u64)).unwrap();
        assert_eq!(witness.state, holder.state());
        assert_eq!(witness.claim_root, Fr::zero());
        assert_eq!(witness.auth_path.len(), 3);
        assert_eq!(witness.challenge, Fr::from(123u64));

        // 2 key coords + 3 path + index + 3 roots/state + 3 signature + challenge
        assert_eq!(witness.to_elements().len(), 2 + 3 + 1 + 3 + 3 + 1);
    }

    #[test]
    fn unauthorized_key_is_rejected() {
        let hasher = PoseidonHash::new();
        let holder = Holder::new(3, hasher);
        let signer = StubEddsa {
            x: Fr::from(11u64),
            y: Fr::from(22u64),
        };

        assert_eq!(
            id_ownership_by_eddsa_signature(&signer, &holder, Fr::from(1u64)).unwrap_err(),
            WitnessError::KeyNotAuthorized
        );
    }

    struct StubEcdsa {
        key: crate::EcdsaPublicKey,
    }

    impl EcdsaSigner for StubEcdsa {
        fn public_key(&self) -> crate::EcdsaPublicKey {
            self.key
        }

        fn sign(&self, challenge: &[u8; 32]) -> [u8; 64] {
            let mut signature = [0u8; 64];
            signature[..32].copy_from_slice(challenge);
            signature
        }
    }

    #[test]
    fn ecdsa_witness_flattens_bytes_individually() {
        let hasher = PoseidonHash::new();
        let mut holder = Holder::new(3, hasher);
        let mut x = [0u8; 32];
        x[0] = 5;
        let signer = StubEcdsa {
            key: crate::EcdsaPublicKey { x, y: [7u8; 32] },
        };
        holder
            .add_auth(
                fe_from_le_bytes(&x),
                fe_from_le_bytes(&signer.key.y),
                PublicKeyType::Ecdsa,
            )
            .unwrap();

        let witness =
            id_ownership_by_ecdsa_signature(&signer, &holder, Fr::from(9u64)).unwrap();
        let elements = witness.to_elements();
        // 32 + 32 key bytes + 3 path + index + 3 roots/state + 64 sig + challenge
        assert_eq!(elements.len(), 32 + 32 + 3 + 1 + 3 + 64 + 1);
        assert_eq!(elements[0], Fr::from(5u64));
        assert_eq!(elements[32], Fr::from(7u64));
    }
}
