//! # Signature Service
//!
//! A node signs transitions through a [`SignatureService`]; the private key
//! stays inside the service. `Send + Sync` so one service can be shared by
//! every flow a node runs concurrently.

use pactum_core::{CanonicalBytes, CryptoError};

use crate::ed25519::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

/// Signing backend for a ledger node.
pub trait SignatureService: Send + Sync {
    /// Sign canonical transition bytes with the node's key.
    fn sign(&self, payload: &CanonicalBytes) -> Result<Ed25519Signature, CryptoError>;

    /// The public half of the node's key.
    fn public_key(&self) -> Ed25519PublicKey;

    /// Short name for log lines.
    fn service_name(&self) -> &str;
}

// ─── LocalSigner ────────────────────────────────────────────────────

/// In-process signer holding an Ed25519 key pair in memory.
#[derive(Debug)]
pub struct LocalSigner {
    key: Ed25519KeyPair,
}

impl LocalSigner {
    pub fn new(key: Ed25519KeyPair) -> Self {
        Self { key }
    }

    pub fn generate() -> Self {
        Self::new(Ed25519KeyPair::generate())
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::new(Ed25519KeyPair::from_seed(seed))
    }
}

impl SignatureService for LocalSigner {
    fn sign(&self, payload: &CanonicalBytes) -> Result<Ed25519Signature, CryptoError> {
        Ok(self.key.sign(payload))
    }

    fn public_key(&self) -> Ed25519PublicKey {
        self.key.public_key()
    }

    fn service_name(&self) -> &str {
        "local"
    }
}
