//! A ledger participant: legal name plus the key it signs with.

use pactum_core::PartyName;
use pactum_crypto::Ed25519PublicKey;
use serde::{Deserialize, Serialize};

/// A named participant and its owning key.
///
/// Equality covers both fields: the same organisation under a rotated key
/// is a different party.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Party {
    pub name: PartyName,
    pub owning_key: Ed25519PublicKey,
}

impl Party {
    pub fn new(name: PartyName, owning_key: Ed25519PublicKey) -> Self {
        Self { name, owning_key }
    }

    pub fn organisation(&self) -> &str {
        self.name.organisation()
    }
}

impl std::fmt::Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
