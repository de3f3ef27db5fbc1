use thiserror::Error;

use crate::state::StateKind;

/// Errors raised by data-model helpers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A status string did not name a known agreement status.
    #[error("unknown agreement status {0:?}")]
    UnknownStatus(String),

    /// A type string did not name a known agreement type.
    #[error("unknown agreement type {0:?}")]
    UnknownType(String),

    /// A ledger state was not of the kind the caller needed.
    #[error("expected {expected} state, found {found}")]
    WrongKind {
        /// Kind the caller asked for.
        expected: StateKind,
        /// Kind actually held.
        found: StateKind,
    },

    /// Payments must move a positive amount.
    #[error("payment amount must be greater than 0")]
    ZeroPayment,

    /// Payment larger than what is left to pay.
    #[error("payment of {amount} exceeds the remaining {remaining}")]
    Overpayment {
        /// Requested amount.
        amount: u64,
        /// Amount still owed.
        remaining: u64,
    },
}
