//! Fixtures shared by the unit tests of this crate.

use pactum_core::{LinearId, PartyName, Timestamp};
use pactum_crypto::Ed25519KeyPair;
use pactum_state::{
    Agreement, AgreementStatus, AgreementType, Attachment, Invoice, LedgerState, Message, Party,
    StateAndRef, StateRef,
};

pub(crate) fn party(org: &str, seed: u8) -> Party {
    Party::new(
        PartyName::new(org, "London", "GB").unwrap(),
        Ed25519KeyPair::from_seed(&[seed; 32]).public_key(),
    )
}

pub(crate) fn agreement(total_value: u64) -> Agreement {
    Agreement {
        agreement_number: "AG-42".into(),
        agreement_name: "Supply of widgets".into(),
        agreement_hash: "3a7bd3e2360a3d29eea436fcfb7e44c7".into(),
        status: AgreementStatus::Request,
        agreement_type: AgreementType::Msa,
        total_value,
        party: party("Alice Corp", 1),
        counterparty: party("Bob Ltd", 2),
        start_date: "2026-01-01".into(),
        end_date: "2026-12-31".into(),
        linear_id: LinearId::new(),
    }
}

pub(crate) fn earlier() -> Timestamp {
    Timestamp::parse("2026-02-01T10:00:00Z").unwrap()
}

pub(crate) fn later() -> Timestamp {
    Timestamp::parse("2026-02-15T16:30:00Z").unwrap()
}

pub(crate) fn invoice(total: u64) -> Invoice {
    Invoice {
        invoice_number: "INV-1001".into(),
        invoice_name: "Widgets, February".into(),
        billing_reason: "subscription_cycle".into(),
        amount_due: total,
        amount_paid: 0,
        amount_remaining: total,
        subtotal: total,
        total,
        party: party("Alice Corp", 1),
        counterparty: party("Bob Ltd", 2),
        due_date: "2026-03-01".into(),
        period_start_date: "2026-02-01".into(),
        period_end_date: "2026-02-28".into(),
        paid: false,
        active: true,
        created_at: earlier(),
        last_updated: earlier(),
        agreement_reference: None,
        linear_id: LinearId::new(),
    }
}

pub(crate) fn message() -> Message {
    Message {
        id: LinearId::new(),
        body: "Draft attached, please review clause 4.".into(),
        from_user_id: "alice".into(),
        to_user_id: "bob".into(),
        from: party("Alice Corp", 1),
        to: party("Bob Ltd", 2),
        sent_receipt: true,
        delivered_receipt: false,
        from_me: true,
        time: earlier(),
        message_number: 1,
    }
}

pub(crate) fn attachment() -> Attachment {
    Attachment {
        attachment_id: LinearId::new(),
        attachment: "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9".into(),
        from: party("Alice Corp", 1),
        to: party("Bob Ltd", 2),
        sent_receipt: true,
        delivered_receipt: false,
        from_me: true,
        time: earlier(),
    }
}

pub(crate) fn ledger_ref(state: LedgerState, version: u64) -> StateAndRef {
    let reference = StateRef::new(state.linear_id(), version);
    StateAndRef::new(state, reference)
}
