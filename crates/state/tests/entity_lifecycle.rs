//! End-to-end entity lifecycle through the public API only.

use ark_bn254::Fr;
use ark_ff::Zero;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use credential_state::{
    ClaimBuilder, Entity, Holder, Issuer, Operation, PathProof, PoseidonHash, PublicKeyType,
    TreeError, TreeLeaf,
};

#[test]
fn issuer_full_lifecycle() {
    let mut rng = StdRng::seed_from_u64(42);
    let hasher = PoseidonHash::new();
    let mut issuer = Issuer::new(4, 4, hasher);

    // Authorize two keys, one of each scheme.
    let keys: Vec<(Fr, Fr)> = (0..2)
        .map(|_| (Fr::from(rng.gen::<u64>()), Fr::from(rng.gen::<u64>())))
        .collect();
    issuer
        .add_auth(keys[0].0, keys[0].1, PublicKeyType::Eddsa)
        .unwrap();
    issuer
        .add_auth(keys[1].0, keys[1].1, PublicKeyType::Ecdsa)
        .unwrap();

    // Issue a claim and check its committed path.
    let claim = ClaimBuilder::new()
        .with_schema_hash(777)
        .with_expiration_time(2_000_000_000)
        .with_sequel(1)
        .with_subject(Fr::from(rng.gen::<u64>()))
        .build();
    let claim_hash = claim.hash(&hasher);
    let index = issuer.add_claim(claim).unwrap();

    let proof = issuer.claim_tree().path_proof(index).unwrap();
    assert_eq!(proof.value, claim_hash);
    assert!(proof.verify(issuer.claim_root(), &hasher));

    // Revoke it; the insert proof must bridge the two revoked roots.
    let state_before_revoke = issuer.state();
    let insert_proof = issuer.revoke_claim(claim_hash).unwrap();
    assert_eq!(insert_proof.new_root, issuer.revoked_claim_root());
    assert!(issuer.revoked_claim_tree().contains(claim_hash));
    assert_ne!(issuer.state(), state_before_revoke);

    // Revoke one auth key; the other keeps working.
    issuer.revoke_auth(keys[0].0).unwrap();
    assert!(issuer.auth_proof(keys[0].0).is_none());
    let auth = issuer.auth_proof(keys[1].0).unwrap();
    assert_eq!(auth.state, issuer.state());

    let auth_path = PathProof {
        path: auth.auth_path.clone(),
        index: auth.auth_index,
        value: hasher.hash(&[auth.public_key_x, auth.public_key_y, Fr::from(1u64)]),
    };
    assert!(auth_path.verify(issuer.auth_root(), &hasher));
}

#[test]
fn holder_rejects_claim_operations_but_tracks_keys() {
    let hasher = PoseidonHash::new();
    let mut holder = Holder::new(3, hasher);

    holder
        .apply(&Operation::AddAuth {
            public_key_x: Fr::from(5u64),
            public_key_y: Fr::from(6u64),
            key_type: PublicKeyType::Eddsa,
        })
        .unwrap();
    assert!(holder
        .apply(&Operation::RevokeClaim {
            claim_hash: Fr::from(1u64)
        })
        .is_err());

    let auth = holder.auth_proof(Fr::from(5u64)).unwrap();
    assert_eq!(auth.claim_root, Fr::zero());
    assert_eq!(auth.state, hasher.hash(&[holder.auth_root(), Fr::zero(), Fr::zero()]));
}

#[test]
fn revoked_set_stays_sound_under_random_insertions() {
    let mut rng = StdRng::seed_from_u64(42);
    let hasher = PoseidonHash::new();
    let mut issuer = Issuer::new(3, 5, hasher);

    let mut inserted = Vec::new();
    for _ in 0..12 {
        let value = Fr::from(rng.gen::<u64>());
        match issuer.revoke_claim(value) {
            Ok(_) => inserted.push(value),
            Err(err) => assert_eq!(
                err,
                credential_state::StateError::Tree(TreeError::DuplicateValue)
            ),
        }
    }

    let tree = issuer.revoked_claim_tree();
    for value in &inserted {
        assert!(tree.contains(*value));
    }
    // A value never inserted gets a verifying low-leaf proof.
    let absent = Fr::from(3u64);
    assert!(!tree.contains(absent));
    let low = tree.path_proof_low(absent);
    let proof = PathProof {
        path: low.path_low.clone(),
        index: low.idx_low,
        value: low.leaf_low.to_node(&hasher),
    };
    assert!(proof.verify(tree.root(), &hasher));
}
