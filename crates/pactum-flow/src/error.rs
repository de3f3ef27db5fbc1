//! # Flow Errors
//!
//! Every way a node operation can fail. No variant implies a partial
//! write: the store is touched only by the final atomic commit.

use std::time::Duration;

use pactum_contract::{BuildError, SignatureError, Violation};
use pactum_core::{CanonicalizationError, CryptoError, PartyName};
use pactum_ledger::{FundsError, IdentityError, LedgerError};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum FlowError {
    /// The local rule engine rejected the transition.
    #[error("transition rejected: {0}")]
    Validation(#[from] Violation),

    /// The transition could not be shaped.
    #[error("cannot build transition: {0}")]
    Construction(#[from] BuildError),

    /// The counterparty reference did not resolve to exactly one party.
    #[error("identity: {0}")]
    Identity(#[from] IdentityError),

    /// The counterparty refused to sign. `reason` is its own words.
    #[error("{counterparty} rejected the transition: {reason}")]
    CounterpartyRejected {
        counterparty: PartyName,
        reason: String,
    },

    /// Another transition consumed a version first.
    #[error("commit conflict: {0}")]
    Conflict(LedgerError),

    /// The counterparty did not answer in time. Nothing was written.
    #[error("{counterparty} did not respond within {after:?}")]
    Timeout {
        counterparty: PartyName,
        after: Duration,
    },

    /// This node may not start the operation, e.g. paying an invoice it
    /// is not the payer of.
    #[error("not permitted: {0}")]
    NotPermitted(String),

    /// No current version for the requested business key.
    #[error("not found: {0}")]
    NotFound(String),

    /// A signature is missing or invalid.
    #[error("signature check failed: {0}")]
    Signature(#[from] SignatureError),

    /// This node could not sign.
    #[error("signing failed: {0}")]
    Signing(#[from] CryptoError),

    /// The payer cannot cover the payment.
    #[error("insufficient funds: {0}")]
    Funds(#[from] FundsError),

    /// Transport failure talking to the counterparty.
    #[error("session: {0}")]
    Session(#[from] SessionError),

    /// Store failure other than a conflict.
    #[error("ledger: {0}")]
    Ledger(LedgerError),

    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("canonicalization: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

impl From<LedgerError> for FlowError {
    fn from(e: LedgerError) -> Self {
        if e.is_conflict() {
            Self::Conflict(e)
        } else {
            Self::Ledger(e)
        }
    }
}

impl FlowError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Human-readable reason for rule-engine or counterparty rejections.
    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            Self::Validation(v) => Some(&v.reason),
            Self::CounterpartyRejected { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Transport failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No session is registered for this counterparty.
    #[error("no session with {0}")]
    NoSession(PartyName),

    /// The peer went away before answering.
    #[error("session with {0} closed")]
    Closed(PartyName),

    /// A message could not be encoded or decoded.
    #[error("malformed session message: {0}")]
    Codec(String),

    /// The peer answered with a reply of the wrong type.
    #[error("unexpected reply: {0}")]
    UnexpectedReply(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(e: serde_json::Error) -> Self {
        Self::Codec(e.to_string())
    }
}
