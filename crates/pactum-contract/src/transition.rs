//! # Transitions and Co-Signatures
//!
//! ## Security Invariant
//!
//! The transition id and every signature are computed over the same
//! `CanonicalBytes` of the [`Transition`]. Signatures are not part of the
//! signed bytes, so signatures can be collected in any order without
//! changing the id.

use pactum_core::{sha256_digest, CanonicalBytes, CanonicalizationError, CryptoError, TransitionId};
use pactum_crypto::{verify_with_public_key, Ed25519PublicKey, Ed25519Signature, SignatureService};
use pactum_state::{LedgerState, Party, StateAndRef};
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::error::SignatureError;

// ─── Transition ─────────────────────────────────────────────────────

/// A proposed change to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Versions consumed.
    pub inputs: Vec<StateAndRef>,
    /// Versions published. Handles are assigned by the store at commit.
    pub outputs: Vec<LedgerState>,
    /// Versions read but not consumed.
    #[serde(default)]
    pub references: Vec<StateAndRef>,
    pub command: Command,
    /// Keys that must sign. Sorted, no duplicates.
    pub required_signers: Vec<Ed25519PublicKey>,
}

impl Transition {
    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(self)
    }

    pub fn id(&self) -> Result<TransitionId, CanonicalizationError> {
        Ok(TransitionId::from_digest(sha256_digest(&self.canonical_bytes()?)))
    }

    pub fn is_required_signer(&self, key: &Ed25519PublicKey) -> bool {
        self.required_signers.binary_search(key).is_ok()
    }

    /// Whether every listed key is a required signer.
    pub fn requires_all<'a>(&self, keys: impl IntoIterator<Item = &'a Ed25519PublicKey>) -> bool {
        keys.into_iter().all(|k| self.is_required_signer(k))
    }

    /// Participants of the first output, or of the first input when the
    /// transition publishes nothing.
    pub fn participants(&self) -> Option<[&Party; 2]> {
        self.outputs
            .first()
            .or_else(|| self.inputs.first().map(|i| &i.state))
            .map(LedgerState::participants)
    }
}

// ─── Signed Transition ──────────────────────────────────────────────

/// One co-signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSignature {
    pub by: Ed25519PublicKey,
    pub signature: Ed25519Signature,
}

/// A transition plus the signatures collected so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransition {
    pub transition: Transition,
    pub signatures: Vec<TransitionSignature>,
}

impl SignedTransition {
    pub fn new(transition: Transition) -> Self {
        Self {
            transition,
            signatures: Vec::new(),
        }
    }

    pub fn id(&self) -> Result<TransitionId, CanonicalizationError> {
        self.transition.id()
    }

    /// Sign with the given service and attach the signature.
    pub fn sign_with(&mut self, signer: &dyn SignatureService) -> Result<(), CryptoError> {
        let signature = self.countersign(signer)?;
        self.add_signature(signature);
        Ok(())
    }

    /// Produce a signature without attaching it, as the counterparty does
    /// before sending it back.
    pub fn countersign(
        &self,
        signer: &dyn SignatureService,
    ) -> Result<TransitionSignature, CryptoError> {
        let bytes = self.transition.canonical_bytes()?;
        Ok(TransitionSignature {
            by: signer.public_key(),
            signature: signer.sign(&bytes)?,
        })
    }

    /// Attach a signature, replacing any earlier one from the same key.
    pub fn add_signature(&mut self, signature: TransitionSignature) {
        self.signatures.retain(|s| s.by != signature.by);
        self.signatures.push(signature);
        self.signatures.sort_by(|a, b| a.by.cmp(&b.by));
    }

    pub fn is_signed_by(&self, key: &Ed25519PublicKey) -> bool {
        self.signatures.iter().any(|s| s.by == *key)
    }

    /// Every attached signature verifies and comes from a required signer.
    pub fn verify_signatures(&self) -> Result<(), SignatureError> {
        let bytes = self.transition.canonical_bytes()?;
        for sig in &self.signatures {
            if !self.transition.is_required_signer(&sig.by) {
                return Err(SignatureError::Unexpected(sig.by));
            }
            verify_with_public_key(&bytes, &sig.signature, &sig.by)
                .map_err(|_| SignatureError::Invalid(sig.by))?;
        }
        Ok(())
    }

    /// As [`Self::verify_signatures`], and no required signer is missing.
    pub fn verify_required_signatures(&self) -> Result<(), SignatureError> {
        self.verify_signatures()?;
        let missing: Vec<_> = self
            .transition
            .required_signers
            .iter()
            .filter(|k| !self.is_signed_by(k))
            .copied()
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SignatureError::Missing(missing))
        }
    }
}
