use pactum_core::{sha256_digest, CanonicalBytes, LinearId, PartyName, Timestamp, TransitionId};
use pactum_crypto::Ed25519KeyPair;
use pactum_state::{Agreement, AgreementStatus, AgreementType, Invoice, Party};

pub(crate) fn party_at(org: &str, locality: &str, seed: u8) -> Party {
    Party::new(
        PartyName::new(org, locality, "GB").unwrap(),
        Ed25519KeyPair::from_seed(&[seed; 32]).public_key(),
    )
}

pub(crate) fn tid(n: u8) -> TransitionId {
    let bytes = CanonicalBytes::new(&serde_json::json!({ "transition": n })).unwrap();
    TransitionId::from_digest(sha256_digest(&bytes))
}

pub(crate) fn agreement(total_value: u64) -> Agreement {
    Agreement {
        agreement_number: "AG-7".into(),
        agreement_name: "Consulting".into(),
        agreement_hash: "e3b0c44298fc1c14".into(),
        status: AgreementStatus::Request,
        agreement_type: AgreementType::Sow,
        total_value,
        party: party_at("Alice Corp", "London", 1),
        counterparty: party_at("Bob Ltd", "London", 2),
        start_date: "2026-04-01".into(),
        end_date: "2026-09-30".into(),
        linear_id: LinearId::new(),
    }
}

pub(crate) fn invoice(total: u64) -> Invoice {
    let at = Timestamp::parse("2026-04-30T09:00:00Z").unwrap();
    Invoice {
        invoice_number: "INV-7".into(),
        invoice_name: "April".into(),
        billing_reason: "manual".into(),
        amount_due: total,
        amount_paid: 0,
        amount_remaining: total,
        subtotal: total,
        total,
        party: party_at("Alice Corp", "London", 1),
        counterparty: party_at("Bob Ltd", "London", 2),
        due_date: "2026-05-31".into(),
        period_start_date: "2026-04-01".into(),
        period_end_date: "2026-04-30".into(),
        paid: false,
        active: true,
        created_at: at,
        last_updated: at,
        agreement_reference: None,
        linear_id: LinearId::new(),
    }
}
