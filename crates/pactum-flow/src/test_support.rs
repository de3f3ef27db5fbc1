//! Fixtures shared by the unit tests of this crate.

use std::sync::Arc;
use std::time::Duration;

use pactum_core::{LinearId, PartyName};
use pactum_crypto::{Ed25519KeyPair, LocalSigner};
use pactum_state::{Agreement, AgreementStatus, AgreementType, Party};

use crate::config::FlowConfig;
use crate::local::{LocalNetwork, NodeSpec};
use crate::node::{NewAgreement, NewInvoice};

pub(crate) fn name(org: &str) -> PartyName {
    PartyName::new(org, "London", "GB").unwrap()
}

pub(crate) fn party(org: &str, seed: u8) -> Party {
    Party::new(name(org), Ed25519KeyPair::from_seed(&[seed; 32]).public_key())
}

pub(crate) fn signer(seed: u8) -> Arc<LocalSigner> {
    Arc::new(LocalSigner::from_seed(&[seed; 32]))
}

pub(crate) fn spec(org: &str, seed: u8, opening_balance: u64) -> NodeSpec {
    NodeSpec {
        name: name(org),
        key: Ed25519KeyPair::from_seed(&[seed; 32]),
        opening_balance,
    }
}

pub(crate) fn quick() -> FlowConfig {
    FlowConfig {
        counterparty_timeout: Duration::from_millis(200),
        notify_timeout: Duration::from_millis(200),
    }
}

/// Alice Corp (seed 1, no funds) and Bob Ltd (seed 2, 1000 in funds).
pub(crate) fn alice_and_bob() -> LocalNetwork {
    LocalNetwork::start(
        vec![spec("Alice Corp", 1, 0), spec("Bob Ltd", 2, 1_000)],
        quick(),
    )
    .unwrap()
}

pub(crate) fn new_agreement(number: &str, total_value: u64) -> NewAgreement {
    NewAgreement {
        agreement_number: number.into(),
        agreement_name: "Supply of widgets".into(),
        agreement_hash: "3a7bd3e2360a3d29eea436fcfb7e44c7".into(),
        agreement_type: AgreementType::Msa,
        total_value,
        counterparty: "Bob Ltd".into(),
        start_date: "2026-01-01".into(),
        end_date: "2026-12-31".into(),
    }
}

pub(crate) fn new_invoice(number: &str, total: u64) -> NewInvoice {
    NewInvoice {
        invoice_number: number.into(),
        invoice_name: "Widgets, February".into(),
        billing_reason: "subscription_cycle".into(),
        total,
        counterparty: "Bob Ltd".into(),
        due_date: "2026-03-01".into(),
        period_start_date: "2026-02-01".into(),
        period_end_date: "2026-02-28".into(),
        agreement_number: None,
    }
}

pub(crate) fn agreement(total_value: u64) -> Agreement {
    Agreement {
        agreement_number: "AG-7".into(),
        agreement_name: "Consulting".into(),
        agreement_hash: "9f86d081884c7d65".into(),
        status: AgreementStatus::Request,
        agreement_type: AgreementType::Sow,
        total_value,
        party: party("Alice Corp", 1),
        counterparty: party("Bob Ltd", 2),
        start_date: "2026-04-01".into(),
        end_date: "2026-09-30".into(),
        linear_id: LinearId::new(),
    }
}
