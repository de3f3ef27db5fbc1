//! # pactum-crypto — Signing for Ledger Transitions
//!
//! - **Ed25519** keys and signatures. Signing and verification take
//!   `&CanonicalBytes` only, so both parties of a transition always sign
//!   the same byte sequence.
//! - **[`SignatureService`]**: the node-side signing collaborator. It holds
//!   the node's private key; callers never see key material.
//!
//! ## Crate Policy
//!
//! - Depends only on `pactum-core` internally.
//! - Tests use real Ed25519; no mocked signatures.

pub mod ed25519;
pub mod signer;

pub use ed25519::{
    verify, verify_with_public_key, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature,
};
pub use signer::{LocalSigner, SignatureService};
