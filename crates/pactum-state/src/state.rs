//! # Ledger States and Version Handles
//!
//! `LedgerState` is the closed set of objects the ledger tracks. A
//! `StateRef` names one immutable snapshot of a linear object: version 0
//! is the snapshot published by the creating transition, and every
//! superseding commit publishes the next version.

use pactum_core::LinearId;
use serde::{Deserialize, Serialize};

use crate::agreement::Agreement;
use crate::error::StateError;
use crate::invoice::Invoice;
use crate::message::{Attachment, Message};
use crate::party::Party;

// ─── State Kind ─────────────────────────────────────────────────────

/// Discriminant of [`LedgerState`], used for store queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    Agreement,
    Invoice,
    Message,
    Attachment,
}

impl std::fmt::Display for StateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Agreement => "Agreement",
            Self::Invoice => "Invoice",
            Self::Message => "Message",
            Self::Attachment => "Attachment",
        };
        f.write_str(s)
    }
}

// ─── Ledger State ───────────────────────────────────────────────────

/// Any object the ledger stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerState {
    Agreement(Agreement),
    Invoice(Invoice),
    Message(Message),
    Attachment(Attachment),
}

impl LedgerState {
    pub fn kind(&self) -> StateKind {
        match self {
            Self::Agreement(_) => StateKind::Agreement,
            Self::Invoice(_) => StateKind::Invoice,
            Self::Message(_) => StateKind::Message,
            Self::Attachment(_) => StateKind::Attachment,
        }
    }

    /// Stable identity across versions. Messages and attachments use
    /// their own ids.
    pub fn linear_id(&self) -> LinearId {
        match self {
            Self::Agreement(a) => a.linear_id,
            Self::Invoice(i) => i.linear_id,
            Self::Message(m) => m.id,
            Self::Attachment(a) => a.attachment_id,
        }
    }

    pub fn participants(&self) -> [&Party; 2] {
        match self {
            Self::Agreement(a) => a.participants(),
            Self::Invoice(i) => i.participants(),
            Self::Message(m) => m.participants(),
            Self::Attachment(a) => a.participants(),
        }
    }

    pub fn is_participant(&self, party: &Party) -> bool {
        self.participants().contains(&party)
    }

    pub fn as_agreement(&self) -> Result<&Agreement, StateError> {
        match self {
            Self::Agreement(a) => Ok(a),
            other => Err(StateError::WrongKind {
                expected: StateKind::Agreement,
                found: other.kind(),
            }),
        }
    }

    pub fn as_invoice(&self) -> Result<&Invoice, StateError> {
        match self {
            Self::Invoice(i) => Ok(i),
            other => Err(StateError::WrongKind {
                expected: StateKind::Invoice,
                found: other.kind(),
            }),
        }
    }

    pub fn as_message(&self) -> Result<&Message, StateError> {
        match self {
            Self::Message(m) => Ok(m),
            other => Err(StateError::WrongKind {
                expected: StateKind::Message,
                found: other.kind(),
            }),
        }
    }

    pub fn as_attachment(&self) -> Result<&Attachment, StateError> {
        match self {
            Self::Attachment(a) => Ok(a),
            other => Err(StateError::WrongKind {
                expected: StateKind::Attachment,
                found: other.kind(),
            }),
        }
    }
}

impl From<Agreement> for LedgerState {
    fn from(a: Agreement) -> Self {
        Self::Agreement(a)
    }
}

impl From<Invoice> for LedgerState {
    fn from(i: Invoice) -> Self {
        Self::Invoice(i)
    }
}

impl From<Message> for LedgerState {
    fn from(m: Message) -> Self {
        Self::Message(m)
    }
}

impl From<Attachment> for LedgerState {
    fn from(a: Attachment) -> Self {
        Self::Attachment(a)
    }
}

// ─── Version Handles ────────────────────────────────────────────────

/// Handle of one immutable snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateRef {
    pub linear_id: LinearId,
    pub version: u64,
}

impl StateRef {
    pub fn new(linear_id: LinearId, version: u64) -> Self {
        Self { linear_id, version }
    }

    /// Handle the superseding commit will publish under.
    pub fn next(&self) -> Self {
        Self::new(self.linear_id, self.version + 1)
    }
}

impl std::fmt::Display for StateRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.linear_id, self.version)
    }
}

/// A snapshot together with its handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateAndRef {
    pub state: LedgerState,
    pub reference: StateRef,
}

impl StateAndRef {
    pub fn new(state: LedgerState, reference: StateRef) -> Self {
        Self { state, reference }
    }
}
