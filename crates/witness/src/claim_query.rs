//! Claim-query witnesses: existence, non-revocation, set membership and
//! non-membership, and the full composite query the disclosure circuit
//! consumes.

use ark_bn254::Fr;
use ark_ff::Zero;

use credential_state::{
    Claim, Entity, IndexedMerkleTree, Issuer, PoseidonHash, ValueMerkleTree, CLAIM_SLOTS,
};

use crate::encode::WitnessMap;
use crate::id_ownership::{IdOwnershipEcdsaWitness, IdOwnershipEddsaWitness};
use crate::WitnessError;

/// Inclusion of one claim in an issuer's claim tree, tied to the issuer's
/// published state through all three roots.
#[derive(Clone, Debug)]
pub struct ClaimExistenceWitness {
    pub claim_path: Vec<Fr>,
    pub claim_index: usize,
    pub claim_root: Fr,
    pub auth_root: Fr,
    pub revoked_claim_root: Fr,
    pub issuer_state: Fr,
}

impl ClaimExistenceWitness {
    pub fn zeroed(claim_height: u32) -> Self {
        Self {
            claim_path: vec![Fr::zero(); claim_height as usize],
            claim_index: 0,
            claim_root: Fr::zero(),
            auth_root: Fr::zero(),
            revoked_claim_root: Fr::zero(),
            issuer_state: Fr::zero(),
        }
    }

    pub fn to_elements(&self) -> Vec<Fr> {
        let mut elements = self.claim_path.clone();
        elements.extend([
            Fr::from(self.claim_index as u64),
            self.claim_root,
            self.auth_root,
            self.revoked_claim_root,
            self.issuer_state,
        ]);
        elements
    }

    pub fn witness_map(&self) -> WitnessMap {
        WitnessMap::from_elements(self.to_elements())
    }
}

/// Absence of one claim hash from an issuer's revoked-claims tree, expressed
/// as a low-leaf proof against the revoked root.
#[derive(Clone, Debug)]
pub struct ClaimNonRevocationWitness {
    pub path_low: Vec<Fr>,
    pub val_low: Fr,
    pub next_val: Fr,
    pub next_idx: u64,
    pub index_low: usize,
    pub revoked_claim_root: Fr,
    pub auth_root: Fr,
    pub claim_root: Fr,
    pub issuer_state: Fr,
}

impl ClaimNonRevocationWitness {
    pub fn zeroed(claim_height: u32) -> Self {
        Self {
            path_low: vec![Fr::zero(); claim_height as usize],
            val_low: Fr::zero(),
            next_val: Fr::zero(),
            next_idx: 0,
            index_low: 0,
            revoked_claim_root: Fr::zero(),
            auth_root: Fr::zero(),
            claim_root: Fr::zero(),
            issuer_state: Fr::zero(),
        }
    }

    pub fn to_elements(&self) -> Vec<Fr> {
        let mut elements = self.path_low.clone();
        elements.extend([
            self.val_low,
            self.next_val,
            Fr::from(self.next_idx),
            Fr::from(self.index_low as u64),
            self.revoked_claim_root,
            self.auth_root,
            self.claim_root,
            self.issuer_state,
        ]);
        elements
    }

    pub fn witness_map(&self) -> WitnessMap {
        WitnessMap::from_elements(self.to_elements())
    }
}

/// Inclusion of a value in an ad-hoc committed set.
#[derive(Clone, Debug)]
pub struct MembershipSetWitness {
    pub set_root: Fr,
    pub set_index: usize,
    pub set_path: Vec<Fr>,
}

impl MembershipSetWitness {
    pub fn zeroed(set_height: u32) -> Self {
        Self {
            set_root: Fr::zero(),
            set_index: 0,
            set_path: vec![Fr::zero(); set_height as usize],
        }
    }

    pub fn to_elements(&self) -> Vec<Fr> {
        let mut elements = vec![self.set_root, Fr::from(self.set_index as u64)];
        elements.extend_from_slice(&self.set_path);
        elements
    }

    pub fn witness_map(&self) -> WitnessMap {
        WitnessMap::from_elements(self.to_elements())
    }
}

/// Exclusion of a value from an ad-hoc committed set, as a low-leaf proof.
#[derive(Clone, Debug)]
pub struct NonMembershipSetWitness {
    pub path_low: Vec<Fr>,
    pub val_low: Fr,
    pub next_val: Fr,
    pub next_idx: u64,
    pub index_low: usize,
    pub root: Fr,
}

impl NonMembershipSetWitness {
    pub fn zeroed(set_height: u32) -> Self {
        Self {
            path_low: vec![Fr::zero(); set_height as usize],
            val_low: Fr::zero(),
            next_val: Fr::zero(),
            next_idx: 0,
            index_low: 0,
            root: Fr::zero(),
        }
    }

    pub fn to_elements(&self) -> Vec<Fr> {
        let mut elements = self.path_low.clone();
        elements.extend([
            self.val_low,
            self.next_val,
            Fr::from(self.next_idx),
            Fr::from(self.index_low as u64),
            self.root,
        ]);
        elements
    }

    pub fn witness_map(&self) -> WitnessMap {
        WitnessMap::from_elements(self.to_elements())
    }
}

/// Inclusion witness for `claim_hash` in `issuer`'s claim tree.
pub fn claim_existence_proof(
    issuer: &Issuer,
    claim_hash: Fr,
) -> Result<ClaimExistenceWitness, WitnessError> {
    let claim_index = issuer
        .claim_tree()
        .claim_index(claim_hash)
        .ok_or(WitnessError::ClaimNotFound)?;
    let proof = issuer.claim_tree().path_proof(claim_index)?;

    Ok(ClaimExistenceWitness {
        claim_path: proof.path,
        claim_index,
        claim_root: issuer.claim_root(),
        auth_root: issuer.auth_root(),
        revoked_claim_root: issuer.revoked_claim_root(),
        issuer_state: issuer.state(),
    })
}

/// Non-revocation witness for `claim_hash` against `issuer`'s revoked set.
pub fn claim_non_revocation_proof(
    issuer: &Issuer,
    claim_hash: Fr,
) -> Result<ClaimNonRevocationWitness, WitnessError> {
    let low = issuer.revoked_claim_tree().path_proof_low(claim_hash);
    if low.leaf_low.val == claim_hash {
        return Err(WitnessError::ClaimRevoked);
    }

    Ok(ClaimNonRevocationWitness {
        path_low: low.path_low,
        val_low: low.leaf_low.val,
        next_val: low.leaf_low.next_val,
        next_idx: low.leaf_low.next_idx,
        index_low: low.idx_low,
        revoked_claim_root: issuer.revoked_claim_root(),
        auth_root: issuer.auth_root(),
        claim_root: issuer.claim_root(),
        issuer_state: issuer.state(),
    })
}

/// Commit `values` into a plain-value tree of the given height and prove
/// that `member` sits in it.
pub fn membership_set_proof(
    set_height: u32,
    hasher: PoseidonHash,
    values: &[Fr],
    member: Fr,
) -> Result<MembershipSetWitness, WitnessError> {
    let mut tree = ValueMerkleTree::new(set_height, hasher);
    let mut set_index = None;
    for value in values {
        let index = tree.insert(*value)?;
        if *value == member {
            set_index = Some(index);
        }
    }
    let set_index = set_index.ok_or(WitnessError::ValueNotInSet)?;
    let proof = tree.path_proof(set_index)?;

    Ok(MembershipSetWitness {
        set_root: tree.root(),
        set_index,
        set_path: proof.path,
    })
}

/// Commit `values` into an indexed tree of the given height and prove that
/// `target` is absent from it.
pub fn non_membership_set_proof(
    set_height: u32,
    hasher: PoseidonHash,
    values: &[Fr],
    target: Fr,
) -> Result<NonMembershipSetWitness, WitnessError> {
    let mut tree = IndexedMerkleTree::new(set_height, hasher);
    for value in values {
        tree.insert(*value)?;
    }
    if tree.contains(target) {
        return Err(WitnessError::ValueInSet);
    }
    let low = tree.path_proof_low(target);

    Ok(NonMembershipSetWitness {
        path_low: low.path_low,
        val_low: low.leaf_low.val,
        next_val: low.leaf_low.next_val,
        next_idx: low.leaf_low.next_idx,
        index_low: low.idx_low,
        root: tree.root(),
    })
}

/// Everything the full claim-query circuit takes: the disclosed claim's
/// slots, the holder's key ownership, the issuer-side existence and
/// non-revocation material, the query predicate, and the optional set
/// proofs. Unused parts stay zeroed.
#[derive(Clone, Debug)]
pub struct ClaimQueryEddsaWitness {
    pub claim: Claim,
    pub id_ownership: IdOwnershipEddsaWitness,
    pub claim_existence: ClaimExistenceWitness,
    pub claim_non_revocation: ClaimNonRevocationWitness,
    pub schema_hash: u128,
    pub valid_until: u64,
    pub sequel: u32,
    pub subject: Fr,
    pub query_type: u64,
    pub slot_index_0: usize,
    pub slot_index_1: usize,
    pub attesting_value: Fr,
    pub operator: u64,
    pub membership: MembershipSetWitness,
    pub non_membership: NonMembershipSetWitness,
}

impl ClaimQueryEddsaWitness {
    pub fn new(
        claim: Claim,
        id_ownership: IdOwnershipEddsaWitness,
        claim_existence: ClaimExistenceWitness,
        claim_non_revocation: ClaimNonRevocationWitness,
        set_height: u32,
    ) -> Self {
        let schema_hash = claim.schema_hash();
        let valid_until = claim.expiration_time();
        let sequel = claim.sequel();
        let subject = claim.subject();
        Self {
            claim,
            id_ownership,
            claim_existence,
            claim_non_revocation,
            schema_hash,
            valid_until,
            sequel,
            subject,
            query_type: 0,
            slot_index_0: 0,
            slot_index_1: 0,
            attesting_value: Fr::zero(),
            operator: 0,
            membership: MembershipSetWitness::zeroed(set_height),
            non_membership: NonMembershipSetWitness::zeroed(set_height),
        }
    }

    pub fn with_query(mut self, query_type: u64, operator: u64) -> Self {
        self.query_type = query_type;
        self.operator = operator;
        self
    }

    pub fn with_slot_indices(mut self, slot_index_0: usize, slot_index_1: usize) -> Self {
        self.slot_index_0 = slot_index_0;
        self.slot_index_1 = slot_index_1;
        self
    }

    pub fn with_attesting_value(mut self, attesting_value: Fr) -> Self {
        self.attesting_value = attesting_value;
        self
    }

    pub fn with_membership(mut self, membership: MembershipSetWitness) -> Self {
        self.membership = membership;
        self
    }

    pub fn with_non_membership(mut self, non_membership: NonMembershipSetWitness) -> Self {
        self.non_membership = non_membership;
        self
    }

    pub fn to_elements(&self) -> Vec<Fr> {
        let mut elements: Vec<Fr> = (0..CLAIM_SLOTS)
            .map(|i| self.claim.slot_value(i))
            .collect();
        elements.extend(self.id_ownership.to_elements());
        elements.extend(self.claim_existence.to_elements());
        elements.extend(self.claim_non_revocation.to_elements());
        elements.extend([
            Fr::from(self.schema_hash),
            Fr::from(self.valid_until),
            Fr::from(self.sequel),
            self.subject,
            Fr::from(self.query_type),
            Fr::from(self.slot_index_0 as u64),
            Fr::from(self.slot_index_1 as u64),
            self.attesting_value,
            Fr::from(self.operator),
        ]);
        elements.extend(self.membership.to_elements());
        elements.extend(self.non_membership.to_elements());
        elements
    }

    pub fn witness_map(&self) -> WitnessMap {
        WitnessMap::from_elements(self.to_elements())
    }
}

/// ECDSA-keyed variant of [`ClaimQueryEddsaWitness`].
#[derive(Clone, Debug)]
pub struct ClaimQueryEcdsaWitness {
    pub claim: Claim,
    pub id_ownership: IdOwnershipEcdsaWitness,
    pub claim_existence: ClaimExistenceWitness,
    pub claim_non_revocation: ClaimNonRevocationWitness,
    pub schema_hash: u128,
    pub valid_until: u64,
    pub sequel: u32,
    pub subject: Fr,
    pub query_type: u64,
    pub slot_index_0: usize,
    pub slot_index_1: usize,
    pub attesting_value: Fr,
    pub operator: u64,
    pub membership: MembershipSetWitness,
    pub non_membership: NonMembershipSetWitness,
}

impl ClaimQueryEcdsaWitness {
    pub fn new(
        claim: Claim,
        id_ownership: IdOwnershipEcdsaWitness,
        claim_existence: ClaimExistenceWitness,
        claim_non_revocation: ClaimNonRevocationWitness,
        set_height: u32,
    ) -> Self {
        let schema_hash = claim.schema_hash();
        let valid_until = claim.expiration_time();
        let sequel = claim.sequel();
        let subject = claim.subject();
        Self {
            claim,
            id_ownership,
            claim_existence,
            claim_non_revocation,
            schema_hash,
            valid_until,
            sequel,
            subject,
            query_type: 0,
            slot_index_0: 0,
            slot_index_1: 0,
            attesting_value: Fr::zero(),
            operator: 0,
            membership: MembershipSetWitness::zeroed(set_height),
            non_membership: NonMembershipSetWitness::zeroed(set_height),
        }
    }

    pub fn with_query(mut self, query_type: u64, operator: u64) -> Self {
        self.query_type = query_type;
        self.operator = operator;
        self
    }

    pub fn with_slot_indices(mut self, slot_index_0: usize, slot_index_1: usize) -> Self {
        self.slot_index_0 = slot_index_0;
        self.slot_index_1 = slot_index_1;
        self
    }

    pub fn with_attesting_value(mut self, attesting_value: Fr) -> Self {
        self.attesting_value = attesting_value;
        self
    }

    pub fn with_membership(mut self, membership: MembershipSetWitness) -> Self {
        self.membership = membership;
        self
    }

    pub fn with_non_membership(mut self, non_membership: NonMembershipSetWitness) -> Self {
        self.non_membership = non_membership;
        self
    }

    pub fn to_elements(&self) -> Vec<Fr> {
        let mut elements: Vec<Fr> = (0..CLAIM_SLOTS)
            .map(|i| self.claim.slot_value(i))
            .collect();
        elements.extend(self.id_ownership.to_elements());
        elements.extend(self.claim_existence.to_elements());
        elements.extend(self.claim_non_revocation.to_elements());
        elements.extend([
            Fr::from(self.schema_hash),
            Fr::from(self.valid_until),
            Fr::from(self.sequel),
            self.subject,
            Fr::from(self.query_type),
            Fr::from(self.slot_index_0 as u64),
            Fr::from(self.slot_index_1 as u64),
            self.attesting_value,
            Fr::from(self.operator),
        ]);
        elements.extend(self.membership.to_elements());
        elements.extend(self.non_membership.to_elements());
        elements
    }

    pub fn witness_map(&self) -> WitnessMap {
        WitnessMap::from_elements(self.to_elements())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id_ownership::id_ownership_by_eddsa_signature;
    use crate::signer::EddsaSigner;
    use credential_state::{ClaimBuilder, Holder, PathProof, PublicKeyType};

    fn hasher() -> PoseidonHash {
        PoseidonHash::new()
    }

    fn sample_claim(seed: u64) -> Claim {
        ClaimBuilder::new()
            .with_schema_hash(1234)
            .with_expiration_time(1_900_000_000)
            .with_sequel(1)
            .with_subject(Fr::from(seed))
            .with_slot_value(2, Fr::from(seed * 7))
            .build()
    }

    #[test]
    fn existence_proof_verifies_against_claim_root() {
        let h = hasher();
        let mut issuer = Issuer::new(3, 3, h);
        let claim = sample_claim(5);
        let claim_hash = claim.hash(&h);
        issuer.add_claim(claim).unwrap();

        let witness = claim_existence_proof(&issuer, claim_hash).unwrap();
        assert_eq!(witness.issuer_state, issuer.state());
        let proof = PathProof {
            path: witness.claim_path.clone(),
            index: witness.claim_index,
            value: claim_hash,
        };
        assert!(proof.verify(witness.claim_root, &h));
    }

    #[test]
    fn missing_claim_is_reported() {
        let issuer = Issuer::new(3, 3, hasher());
        assert_eq!(
            claim_existence_proof(&issuer, Fr::from(99u64)).unwrap_err(),
            WitnessError::ClaimNotFound
        );
    }

    #[test]
    fn non_revocation_rejects_revoked_claims() {
        let h = hasher();
        let mut issuer = Issuer::new(3, 3, h);
        let claim = sample_claim(5);
        let claim_hash = claim.hash(&h);
        issuer.add_claim(claim).unwrap();

        let witness = claim_non_revocation_proof(&issuer, claim_hash).unwrap();
        assert_eq!(witness.revoked_claim_root, issuer.revoked_claim_root());
        assert!(witness.val_low < claim_hash || witness.val_low.is_zero());

        issuer.revoke_claim(claim_hash).unwrap();
        assert_eq!(
            claim_non_revocation_proof(&issuer, claim_hash).unwrap_err(),
            WitnessError::ClaimRevoked
        );
    }

    #[test]
    fn membership_set_round_trip() {
        let h = hasher();
        let values = [Fr::from(10u64), Fr::from(20u64), Fr::from(30u64)];

        let witness = membership_set_proof(3, h, &values, Fr::from(20u64)).unwrap();
        assert_eq!(witness.set_index, 1);
        let proof = PathProof {
            path: witness.set_path.clone(),
            index: witness.set_index,
            value: Fr::from(20u64),
        };
        assert!(proof.verify(witness.set_root, &h));

        assert_eq!(
            membership_set_proof(3, h, &values, Fr::from(25u64)).unwrap_err(),
            WitnessError::ValueNotInSet
        );
    }

    #[test]
    fn non_membership_set_round_trip() {
        let h = hasher();
        let values = [Fr::from(10u64), Fr::from(20u64), Fr::from(30u64)];

        let witness = non_membership_set_proof(3, h, &values, Fr::from(25u64)).unwrap();
        assert_eq!(witness.val_low, Fr::from(20u64));
        assert_eq!(witness.next_val, Fr::from(30u64));

        assert_eq!(
            non_membership_set_proof(3, h, &values, Fr::from(20u64)).unwrap_err(),
            WitnessError::ValueInSet
        );
    }

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
    fn composite_query_assembles_end_to_end() {
        let h = hasher();
        let mut issuer = Issuer::new(3, 3, h);
        issuer
            .add_auth(Fr::from(100u64), Fr::from(200u64), PublicKeyType::Eddsa)
            .unwrap();

        let mut holder = Holder::new(3, h);
        let signer = StubEddsa {
            x: Fr::from(1u64),
            y: Fr::from(2u64),
        };
        holder
            .add_auth(signer.x, signer.y, PublicKeyType::Eddsa)
            .unwrap();

        let claim = sample_claim(7);
        let claim_hash = claim.hash(&h);
        issuer.add_claim(claim.clone()).unwrap();

        let id_ownership =
            id_ownership_by_eddsa_signature(&signer, &holder, Fr::from(55u64)).unwrap();
        let existence = claim_existence_proof(&issuer, claim_hash).unwrap();
        let non_revocation = claim_non_revocation_proof(&issuer, claim_hash).unwrap();

        let witness = ClaimQueryEddsaWitness::new(
            claim.clone(),
            id_ownership,
            existence,
            non_revocation,
            3,
        )
        .with_query(1, 2)
        .with_slot_indices(2, 3)
        .with_attesting_value(Fr::from(49u64));

        assert_eq!(witness.schema_hash, 1234);
        assert_eq!(witness.sequel, 1);
        assert_eq!(witness.subject, Fr::from(7u64));

        let elements = witness.to_elements();
        // 8 slots + iop(13) + cep(8) + cnp(11) + 9 predicate + mp(5) + nmp(8)
        assert_eq!(elements.len(), 8 + 13 + 8 + 11 + 9 + 5 + 8);
        assert_eq!(elements[0], claim.slot_value(0));

        let map = witness.witness_map();
        assert_eq!(map.len(), elements.len());
        assert_eq!(map.hex(1).unwrap().len(), 66);
    }
}
