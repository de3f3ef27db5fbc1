//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use pactum_core::PartyName;
use pactum_crypto::Ed25519KeyPair;
use pactum_flow::{FlowConfig, LocalNetwork, NewAgreement, NewInvoice, Node, NodeSpec};
use pactum_state::AgreementType;

pub const ALICE: &str = "O=Alice Corp, L=London, C=GB";
pub const BOB: &str = "O=Bob Ltd, L=New York, C=US";

pub fn config() -> FlowConfig {
    FlowConfig {
        counterparty_timeout: Duration::from_secs(2),
        notify_timeout: Duration::from_millis(500),
    }
}

/// Alice Corp invoices; Bob Ltd pays and holds `bob_balance`.
pub fn network(bob_balance: u64) -> (LocalNetwork, Arc<Node>, Arc<Node>) {
    let net = LocalNetwork::start(
        vec![
            NodeSpec {
                name: PartyName::parse(ALICE).unwrap(),
                key: Ed25519KeyPair::from_seed(&[0xA1; 32]),
                opening_balance: 0,
            },
            NodeSpec {
                name: PartyName::parse(BOB).unwrap(),
                key: Ed25519KeyPair::from_seed(&[0xB0; 32]),
                opening_balance: bob_balance,
            },
        ],
        config(),
    )
    .unwrap();
    let alice = net.node("Alice Corp").unwrap();
    let bob = net.node("Bob Ltd").unwrap();
    (net, alice, bob)
}

pub fn agreement(number: &str, total_value: u64) -> NewAgreement {
    NewAgreement {
        agreement_number: number.into(),
        agreement_name: "Logistics framework".into(),
        agreement_hash: "2c26b46b68ffc68ff99b453c1d304134".into(),
        agreement_type: AgreementType::Msa,
        total_value,
        counterparty: BOB.into(),
        start_date: "2026-03-01".into(),
        end_date: "2027-02-28".into(),
    }
}

pub fn invoice(number: &str, total: u64) -> NewInvoice {
    NewInvoice {
        invoice_number: number.into(),
        invoice_name: "Freight, March".into(),
        billing_reason: "subscription_cycle".into(),
        total,
        counterparty: "bob ltd".into(),
        due_date: "2026-04-15".into(),
        period_start_date: "2026-03-01".into(),
        period_end_date: "2026-03-31".into(),
        agreement_number: None,
    }
}
