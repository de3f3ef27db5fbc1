//! # pactum-flow — Multi-Party Commit Protocol
//!
//! Turns a requested business operation into a jointly signed, atomically
//! committed ledger entry.
//!
//! - **[`Initiator`]**: builds, validates, signs and proposes a transition,
//!   collects the counterparty signature and commits.
//! - **[`Responder`]**: the counterparty side. Re-validates with the same
//!   rule engine and countersigns or refuses with a reason.
//! - **[`CounterpartySession`]**: request/response channel between the
//!   two. [`ChannelSession`] is the in-process transport.
//! - **[`Node`]**: the command surface (create, activate, pay, send ...)
//!   and read-side queries for one party.
//! - **[`LocalNetwork`]**: several nodes wired together in one process.
//!
//! Every operation runs inside a `transition` tracing span. Stage changes
//! are logged at `debug`, commits at `info`, refusals and conflicts at
//! `warn`.

pub mod config;
pub mod error;
pub mod initiator;
pub mod local;
pub mod node;
pub mod progress;
pub mod responder;
pub mod session;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, FlowConfig};
pub use error::{FlowError, SessionError};
pub use initiator::{FlowOutcome, Initiator};
pub use local::{LocalNetwork, NodeSpec};
pub use node::{NewAgreement, NewInvoice, NewMessage, Node, NodeServices};
pub use progress::{FlowProgress, FlowStage};
pub use responder::Responder;
pub use session::{
    CounterpartySession, FinalityNotice, Proposal, ProposalResponse, ReferenceResponse,
    SessionMessage, SessionReply,
};
pub use transport::{serve, ChannelSession, Envelope};
