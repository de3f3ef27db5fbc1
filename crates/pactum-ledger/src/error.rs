use pactum_core::{LinearId, PartyName};
use pactum_state::StateKind;
use thiserror::Error;

/// Ledger store failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Optimistic-concurrency failure: a version to consume or reference is
    /// no longer current, or a new linear id is already taken.
    #[error("conflict on {linear_id}: {detail}")]
    Conflict { linear_id: LinearId, detail: String },

    /// No object with this linear id has ever been committed.
    #[error("no ledger history for {0}")]
    UnknownLinearId(LinearId),

    /// A single-result query matched several unconsumed states.
    #[error("{count} unconsumed {kind} states match the query, expected at most one")]
    MultipleMatches { kind: StateKind, count: usize },

    /// The commit request itself is malformed.
    #[error("malformed commit request: {0}")]
    InvalidCommit(String),
}

impl LedgerError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Identity resolution failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("no party matches {0:?}")]
    NotFound(String),

    #[error("{query:?} matches several parties: {}", render(.matches))]
    Ambiguous {
        query: String,
        matches: Vec<PartyName>,
    },

    #[error("party {0} is already registered")]
    AlreadyRegistered(PartyName),
}

fn render(names: &[PartyName]) -> String {
    names
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Funds check failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FundsError {
    #[error("{party} has a balance of {balance}, which cannot cover {required}")]
    Insufficient {
        party: PartyName,
        balance: u64,
        required: u64,
    },
}
