//! # Transition Identity and Co-Signatures
//!
//! Both parties hash and sign the same canonical bytes, so a transition
//! keeps its id and its signatures through any JSON round-trip, and the
//! order signatures arrive in does not matter.

use pactum_contract::{validate, SignatureError, SignedTransition, Transition, TransitionBuilder};
use pactum_core::{LinearId, PartyName};
use pactum_crypto::{LocalSigner, SignatureService};
use pactum_state::{Agreement, AgreementStatus, AgreementType, Party};

fn signer(seed: u8) -> LocalSigner {
    LocalSigner::from_seed(&[seed; 32])
}

fn transition() -> Transition {
    let party = |org: &str, seed| {
        Party::new(
            PartyName::new(org, "Rotterdam", "NL").unwrap(),
            signer(seed).public_key(),
        )
    };
    TransitionBuilder::create_agreement(Agreement {
        agreement_number: "AG-500".into(),
        agreement_name: "Warehousing".into(),
        agreement_hash: "a665a45920422f9d417e4867efdc4fb8".into(),
        status: AgreementStatus::Request,
        agreement_type: AgreementType::Sow,
        total_value: 9_000,
        party: party("Alice Corp", 1),
        counterparty: party("Bob Ltd", 2),
        start_date: "2026-05-01".into(),
        end_date: "2026-10-31".into(),
        linear_id: LinearId::new(),
    })
}

#[test]
fn id_survives_json_round_trip() {
    let tx = transition();
    let json = serde_json::to_string(&tx).unwrap();
    let back: Transition = serde_json::from_str(&json).unwrap();
    assert_eq!(back.id().unwrap(), tx.id().unwrap());
    validate(&back).unwrap();
}

#[test]
fn signature_order_does_not_matter() {
    let tx = transition();

    let mut first = SignedTransition::new(tx.clone());
    first.sign_with(&signer(1)).unwrap();
    first.sign_with(&signer(2)).unwrap();

    let mut second = SignedTransition::new(tx);
    second.sign_with(&signer(2)).unwrap();
    second.sign_with(&signer(1)).unwrap();

    assert_eq!(first, second);
    first.verify_required_signatures().unwrap();
}

#[test]
fn signatures_survive_json_round_trip_but_not_tampering() {
    let mut signed = SignedTransition::new(transition());
    signed.sign_with(&signer(1)).unwrap();
    signed.sign_with(&signer(2)).unwrap();

    let json = serde_json::to_string(&signed).unwrap();
    let back: SignedTransition = serde_json::from_str(&json).unwrap();
    back.verify_required_signatures().unwrap();

    let mut tampered = back;
    if let pactum_state::LedgerState::Agreement(a) = &mut tampered.transition.outputs[0] {
        a.total_value += 1;
    }
    assert!(matches!(
        tampered.verify_required_signatures(),
        Err(SignatureError::Invalid(_))
    ));
}

#[test]
fn outsider_signature_is_unexpected() {
    let mut signed = SignedTransition::new(transition());
    signed.sign_with(&signer(1)).unwrap();
    signed.sign_with(&signer(7)).unwrap();
    assert_eq!(
        signed.verify_signatures(),
        Err(SignatureError::Unexpected(signer(7).public_key()))
    );
}
