//! # pactum-state — Ledger Data Model
//!
//! The objects two parties hold jointly on the ledger.
//!
//! - **Agreement** (`agreement.rs`): a legal agreement with a status
//!   lifecycle. `REQUEST` is the only legal initial status; `INEFFECT` is
//!   the only status from which it can be renewed, terminated, expired or
//!   amended.
//!
//! - **Invoice** (`invoice.rs`): an amount owed by the counterparty to the
//!   party, paid down in one or more payments.
//!
//! - **Message / Attachment** (`message.rs`): immutable once created.
//!
//! - **Version handles** (`state.rs`): `StateRef` names one immutable
//!   snapshot of a linear object; `LedgerState` is the union the ledger
//!   stores.
//!
//! Nothing here decides whether a change is allowed. That is the rule
//! engine's job in `pactum-contract`.

pub mod agreement;
pub mod error;
pub mod invoice;
pub mod message;
pub mod party;
pub mod state;

pub use agreement::{Agreement, AgreementStatus, AgreementType};
pub use error::StateError;
pub use invoice::Invoice;
pub use message::{Attachment, Message};
pub use party::Party;
pub use state::{LedgerState, StateAndRef, StateKind, StateRef};
