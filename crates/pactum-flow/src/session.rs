//! # Counterparty Sessions
//!
//! The initiator reaches the other participant through a
//! [`CounterpartySession`]. Each call is one request/response round-trip;
//! the initiator suspends until the answer arrives or its timeout fires.
//!
//! The messages are plain serde types so any transport can carry them.

use async_trait::async_trait;
use pactum_contract::{SignedTransition, TransitionSignature};
use pactum_ledger::CommitReceipt;
use pactum_state::{Party, StateAndRef};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// A transition carrying the initiator's signature, sent for countersigning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub proposer: Party,
    pub transition: SignedTransition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalResponse {
    Signed(TransitionSignature),
    Rejected { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceResponse {
    Confirmed,
    Rejected { reason: String },
}

/// Sent once a transition is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalityNotice {
    pub receipt: CommitReceipt,
}

/// Everything one node asks another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMessage {
    SyncReferences { references: Vec<StateAndRef> },
    Propose(Proposal),
    Committed(FinalityNotice),
}

/// Everything one node answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionReply {
    References(ReferenceResponse),
    Proposal(ProposalResponse),
    Acknowledged,
    Malformed { error: String },
}

/// Request/response channel to one counterparty.
#[async_trait]
pub trait CounterpartySession: Send + Sync {
    /// The party on the other end.
    fn counterparty(&self) -> &Party;

    /// Ask the counterparty to confirm it sees the same current versions of
    /// the reference states.
    async fn sync_references(
        &self,
        references: Vec<StateAndRef>,
    ) -> Result<ReferenceResponse, SessionError>;

    /// Ask the counterparty to validate and countersign.
    async fn propose(&self, proposal: Proposal) -> Result<ProposalResponse, SessionError>;

    /// Tell the counterparty the transition is final. One-way.
    async fn notify_committed(&self, notice: FinalityNotice) -> Result<(), SessionError>;
}
