//! # pactum-core — Foundational Types for the Pactum Ledger
//!
//! Every other crate in the workspace depends on `pactum-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype identifiers.** `LinearId`, `TransitionId` and `PartyName`
//!    are distinct types. A linear id can never be passed where a
//!    transition id is expected.
//!
//! 2. **`CanonicalBytes` newtype.** Every digest and every signature in the
//!    ledger is computed over `CanonicalBytes` (RFC 8785 JCS). Two parties
//!    that serialize the same transition always hash and sign the same
//!    bytes.
//!
//! 3. **UTC-only timestamps.** `Timestamp` is UTC with a `Z` suffix and
//!    seconds precision so it canonicalizes deterministically.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pactum-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest};
pub use error::{CanonicalizationError, CryptoError, PactumError};
pub use identity::{LinearId, PartyName, TransitionId};
pub use temporal::Timestamp;
