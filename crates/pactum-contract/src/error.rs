//! Error types of the rule engine, builder and signature checks.

use pactum_core::CanonicalizationError;
use pactum_crypto::Ed25519PublicKey;
use pactum_state::{StateError, StateKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The first requirement a transition failed. Never retried: the same
/// transition always fails the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{command} failed requirement: {reason}")]
pub struct Violation {
    /// Command whose checklist was being evaluated.
    pub command: String,
    /// Human-readable statement of the unmet requirement.
    pub reason: String,
}

impl Violation {
    pub fn new(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            reason: reason.into(),
        }
    }
}

/// The builder could not shape the requested transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The command does not apply to the state it was given.
    #[error("{command} does not apply to a {kind} state")]
    NotApplicable {
        command: &'static str,
        kind: StateKind,
    },

    /// A parameter the command needs was not supplied.
    #[error("{command} requires {parameter}")]
    MissingParameter {
        command: &'static str,
        parameter: &'static str,
    },

    /// A data-model helper refused the change.
    #[error(transparent)]
    State(#[from] StateError),
}

/// A co-signature is missing or does not verify.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// Required signers with no signature attached.
    #[error("missing signatures from {}", render_keys(.0))]
    Missing(Vec<Ed25519PublicKey>),

    /// A signature attached under this key does not verify.
    #[error("invalid signature from {0}")]
    Invalid(Ed25519PublicKey),

    /// A signature from a key that is not a required signer.
    #[error("unexpected signature from {0}")]
    Unexpected(Ed25519PublicKey),

    /// The transition could not be canonicalized.
    #[error("transition is not canonicalizable: {0}")]
    Canonicalization(String),
}

impl From<CanonicalizationError> for SignatureError {
    fn from(e: CanonicalizationError) -> Self {
        Self::Canonicalization(e.to_string())
    }
}

fn render_keys(keys: &[Ed25519PublicKey]) -> String {
    keys.iter()
        .map(|k| k.to_hex())
        .collect::<Vec<_>>()
        .join(", ")
}
