//! # Messages and Attachments
//!
//! Written once, signed by both parties, never superseded.

mod common;

use pactum_flow::{FlowError, NewMessage};
use pactum_ledger::LedgerStore;

fn hello(to: &str) -> NewMessage {
    NewMessage {
        to: to.into(),
        body: "Pallets ship Thursday.".into(),
        from_user_id: "ops@alice".into(),
        to_user_id: "ops@bob".into(),
    }
}

#[tokio::test]
async fn message_is_visible_to_sender_and_recipient() {
    let (net, alice, bob) = common::network(0);
    let sent = alice.send_message(hello(common::BOB)).await.unwrap();

    assert_eq!(alice.sent_messages(), vec![sent.clone()]);
    assert_eq!(bob.received_messages(), vec![sent.clone()]);
    let history = net.store().history(&sent.reference.linear_id).unwrap();
    assert_eq!(history.len(), 1);
    assert!(!history[0].is_consumed());
}

#[tokio::test]
async fn replies_flow_the_other_way() {
    let (_net, alice, bob) = common::network(0);
    alice.send_message(hello("Bob Ltd")).await.unwrap();
    bob.send_message(hello("alice corp")).await.unwrap();
    assert_eq!(alice.received_messages().len(), 1);
    assert_eq!(bob.sent_messages().len(), 1);
}

#[tokio::test]
async fn message_to_self_is_refused() {
    let (_net, alice, _bob) = common::network(0);
    let err = alice.send_message(hello(common::ALICE)).await.unwrap_err();
    assert!(matches!(err, FlowError::Validation(_)), "{err}");
}

#[tokio::test]
async fn attachment_records_the_file_handle() {
    let (_net, alice, _bob) = common::network(0);
    let handle = "sha256:9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";
    let sent = alice.send_attachment("Bob Ltd", handle).await.unwrap();
    assert_eq!(sent.state.as_attachment().unwrap().attachment, handle);
}
