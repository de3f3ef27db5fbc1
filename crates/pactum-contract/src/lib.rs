//! # pactum-contract — Rule Engine and Transition Builder
//!
//! A [`Transition`] is the unit both parties validate and sign: the
//! versions it consumes, the versions it publishes, the versions it only
//! reads, the [`Command`] that states its intent, and the keys that must
//! sign it.
//!
//! - [`validate`] is the rule engine. It is pure and deterministic; the
//!   initiator and the counterparty run the same function over the same
//!   canonical transition and reach the same verdict. The first unmet
//!   requirement is returned as a [`Violation`].
//! - [`TransitionBuilder`] derives the exact next version from the current
//!   one. It never decides whether a change is allowed; shape problems
//!   surface as [`BuildError`].
//! - [`SignedTransition`] carries the collected Ed25519 co-signatures over
//!   the transition's canonical bytes.
//!
//! Nothing in this crate performs I/O or logs.

pub mod builder;
pub mod command;
pub mod error;
pub mod requirements;
pub mod rules;
pub mod transition;

#[cfg(test)]
mod test_support;

pub use builder::TransitionBuilder;
pub use command::Command;
pub use error::{BuildError, SignatureError, Violation};
pub use requirements::Requirements;
pub use rules::{validate, MIN_ACTIVATION_VALUE};
pub use transition::{SignedTransition, Transition, TransitionSignature};
