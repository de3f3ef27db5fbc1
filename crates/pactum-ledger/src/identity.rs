//! # Identity Service
//!
//! Resolves how a caller names a counterparty to a registered [`Party`].
//!
//! - A full legal name (`O=Bob Ltd, L=London, C=GB`) must match exactly.
//! - A bare organisation (`bob ltd`) matches case-insensitively.
//!
//! Zero matches is `NotFound`; more than one is `Ambiguous`. Resolution
//! never guesses.

use pactum_core::PartyName;
use pactum_crypto::Ed25519PublicKey;
use pactum_state::Party;
use parking_lot::RwLock;

use crate::error::IdentityError;

/// Maps party references to parties.
pub trait IdentityService: Send + Sync {
    /// Resolve a full legal name or a bare organisation.
    fn resolve(&self, query: &str) -> Result<Party, IdentityError>;

    /// The party that owns `key`, if registered.
    fn party_from_key(&self, key: &Ed25519PublicKey) -> Option<Party>;

    /// Every registered party.
    fn parties(&self) -> Vec<Party>;
}

/// In-memory network map.
#[derive(Debug, Default)]
pub struct IdentityDirectory {
    parties: RwLock<Vec<Party>>,
}

impl IdentityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a party. Names and keys must both be unique.
    pub fn register(&self, party: Party) -> Result<(), IdentityError> {
        let mut parties = self.parties.write();
        if parties
            .iter()
            .any(|p| p.name == party.name || p.owning_key == party.owning_key)
        {
            return Err(IdentityError::AlreadyRegistered(party.name));
        }
        tracing::debug!(party = %party.name, "party registered");
        parties.push(party);
        Ok(())
    }
}

impl IdentityService for IdentityDirectory {
    fn resolve(&self, query: &str) -> Result<Party, IdentityError> {
        let parties = self.parties.read();

        if PartyName::looks_qualified(query) {
            let name = PartyName::parse(query)
                .map_err(|_| IdentityError::NotFound(query.to_string()))?;
            return parties
                .iter()
                .find(|p| p.name == name)
                .cloned()
                .ok_or_else(|| IdentityError::NotFound(query.to_string()));
        }

        let matches: Vec<&Party> = parties
            .iter()
            .filter(|p| p.name.matches_organisation(query))
            .collect();
        match matches.as_slice() {
            [] => Err(IdentityError::NotFound(query.to_string())),
            [only] => Ok((*only).clone()),
            many => Err(IdentityError::Ambiguous {
                query: query.to_string(),
                matches: many.iter().map(|p| p.name.clone()).collect(),
            }),
        }
    }

    fn party_from_key(&self, key: &Ed25519PublicKey) -> Option<Party> {
        self.parties
            .read()
            .iter()
            .find(|p| p.owning_key == *key)
            .cloned()
    }

    fn parties(&self) -> Vec<Party> {
        self.parties.read().clone()
    }
}
