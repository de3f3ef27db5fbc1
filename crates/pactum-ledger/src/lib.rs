//! # pactum-ledger — Ledger Store and Node Services
//!
//! The collaborators a ledger node consults but does not own:
//!
//! - **[`LedgerStore`]**: current and historical versions of every linear
//!   object. [`LedgerStore::commit`] is the single point where racing
//!   transitions on the same linear id serialize. Exactly one consumes a
//!   given version; every other gets [`LedgerError::Conflict`].
//! - **[`IdentityService`]**: resolves a counterparty reference (full legal
//!   name or bare organisation) to a [`pactum_state::Party`].
//! - **[`FundsService`]**: answers whether a payer can cover a payment.
//!
//! [`InMemoryLedger`], [`IdentityDirectory`] and [`InMemoryFunds`] are
//! in-process implementations. Locks are `parking_lot` and are never held
//! across an `.await`.

pub mod error;
pub mod funds;
pub mod identity;
pub mod store;

#[cfg(test)]
mod test_support;

pub use error::{FundsError, IdentityError, LedgerError};
pub use funds::{FundsService, InMemoryFunds};
pub use identity::{IdentityDirectory, IdentityService};
pub use store::{CommitReceipt, CommitRequest, InMemoryLedger, LedgerStore, VersionRecord};
