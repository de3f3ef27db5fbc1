//! # Ledger State Store
//!
//! An arena of versions: each linear id maps to an ordered list of
//! immutable snapshots. The current version is the last one, as long as it
//! has not been consumed. Consumed snapshots stay in the arena as history.
//!
//! ## Commit
//!
//! [`LedgerStore::commit`] validates the whole request under one write
//! lock before changing anything:
//!
//! 1. every state to consume is the current, unconsumed version and equals
//!    the stored snapshot;
//! 2. every reference state is still the current, unconsumed version;
//! 3. every published state either supersedes one of the consumed states
//!    (same linear id, next version) or introduces a linear id the ledger
//!    has never seen.
//!
//! Any failure leaves the arena untouched.

use std::collections::HashMap;

use pactum_core::{LinearId, Timestamp, TransitionId};
use pactum_state::{LedgerState, StateAndRef, StateKind, StateRef};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

// ─── Records ────────────────────────────────────────────────────────

/// One snapshot in a linear object's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub state: LedgerState,
    pub reference: StateRef,
    /// Transition that published this snapshot.
    pub published_by: TransitionId,
    /// Transition that consumed it, if any.
    pub consumed_by: Option<TransitionId>,
}

impl VersionRecord {
    pub fn is_consumed(&self) -> bool {
        self.consumed_by.is_some()
    }

    pub fn state_and_ref(&self) -> StateAndRef {
        StateAndRef::new(self.state.clone(), self.reference)
    }
}

/// Everything a finalized transition changes in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRequest {
    pub transition_id: TransitionId,
    pub consume: Vec<StateAndRef>,
    pub reference: Vec<StateRef>,
    pub publish: Vec<LedgerState>,
}

/// Proof of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    pub transition_id: TransitionId,
    pub consumed: Vec<StateRef>,
    pub published: Vec<StateAndRef>,
    pub committed_at: Timestamp,
}

// ─── Trait ──────────────────────────────────────────────────────────

/// Versioned store of ledger objects.
pub trait LedgerStore: Send + Sync {
    /// The single unconsumed state of `kind` matching `predicate`.
    ///
    /// `Ok(None)` when nothing matches; `MultipleMatches` when more than
    /// one does.
    fn query_unconsumed(
        &self,
        kind: StateKind,
        predicate: &dyn Fn(&LedgerState) -> bool,
    ) -> Result<Option<StateAndRef>, LedgerError>;

    /// All unconsumed states of `kind`, in creation order.
    fn list_unconsumed(&self, kind: StateKind) -> Vec<StateAndRef>;

    /// Current unconsumed version of a linear object.
    fn current(&self, linear_id: &LinearId) -> Option<StateAndRef>;

    /// Every snapshot of a linear object, oldest first.
    fn history(&self, linear_id: &LinearId) -> Result<Vec<VersionRecord>, LedgerError>;

    /// Atomically consume and publish.
    fn commit(&self, request: CommitRequest) -> Result<CommitReceipt, LedgerError>;

    /// Receipt of an earlier commit.
    fn receipt(&self, transition_id: &TransitionId) -> Option<CommitReceipt>;
}

// ─── In-memory implementation ───────────────────────────────────────

#[derive(Debug, Default)]
struct Arena {
    versions: HashMap<LinearId, Vec<VersionRecord>>,
    /// Linear ids in creation order.
    order: Vec<LinearId>,
    receipts: HashMap<TransitionId, CommitReceipt>,
}

impl Arena {
    fn current(&self, linear_id: &LinearId) -> Option<&VersionRecord> {
        self.versions
            .get(linear_id)
            .and_then(|v| v.last())
            .filter(|r| !r.is_consumed())
    }

    fn unconsumed(&self, kind: StateKind) -> impl Iterator<Item = &VersionRecord> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.current(id))
            .filter(move |r| r.state.kind() == kind)
    }

    fn check_current(&self, wanted: &StateRef, role: &str) -> Result<&VersionRecord, LedgerError> {
        let conflict = |detail: String| LedgerError::Conflict {
            linear_id: wanted.linear_id,
            detail,
        };
        let history = self
            .versions
            .get(&wanted.linear_id)
            .ok_or_else(|| conflict(format!("{role} state {wanted} is not on the ledger")))?;
        let record = history
            .get(wanted.version as usize)
            .ok_or_else(|| conflict(format!("{role} state {wanted} was never published")))?;
        if let Some(by) = &record.consumed_by {
            return Err(conflict(format!(
                "{role} state {wanted} was already consumed by {}",
                by.short()
            )));
        }
        Ok(record)
    }

    /// Check the request and work out the handle of every published state.
    fn plan(&self, request: &CommitRequest) -> Result<Vec<StateRef>, LedgerError> {
        let mut consumed_ids = Vec::with_capacity(request.consume.len());
        for input in &request.consume {
            if input.state.linear_id() != input.reference.linear_id {
                return Err(LedgerError::InvalidCommit(format!(
                    "input {} carries a state with linear id {}",
                    input.reference,
                    input.state.linear_id()
                )));
            }
            if consumed_ids.contains(&input.reference.linear_id) {
                return Err(LedgerError::InvalidCommit(format!(
                    "{} is consumed twice",
                    input.reference.linear_id
                )));
            }
            let record = self.check_current(&input.reference, "input")?;
            if record.state != input.state {
                return Err(LedgerError::Conflict {
                    linear_id: input.reference.linear_id,
                    detail: format!("input {} does not match the stored snapshot", input.reference),
                });
            }
            consumed_ids.push(input.reference.linear_id);
        }

        for reference in &request.reference {
            self.check_current(reference, "reference")?;
        }

        let mut handles: Vec<StateRef> = Vec::with_capacity(request.publish.len());
        for state in &request.publish {
            let linear_id = state.linear_id();
            if handles.iter().any(|h| h.linear_id == linear_id) {
                return Err(LedgerError::InvalidCommit(format!(
                    "{linear_id} is published twice"
                )));
            }
            let handle = match request.consume.iter().find(|i| i.reference.linear_id == linear_id) {
                Some(input) => input.reference.next(),
                None if self.versions.contains_key(&linear_id) => {
                    return Err(LedgerError::Conflict {
                        linear_id,
                        detail: "linear id already exists on the ledger".into(),
                    })
                }
                None => StateRef::new(linear_id, 0),
            };
            handles.push(handle);
        }
        Ok(handles)
    }
}

/// In-process [`LedgerStore`]. Cheap to clone; clones share the arena.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    arena: std::sync::Arc<RwLock<Arena>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for InMemoryLedger {
    fn query_unconsumed(
        &self,
        kind: StateKind,
        predicate: &dyn Fn(&LedgerState) -> bool,
    ) -> Result<Option<StateAndRef>, LedgerError> {
        let arena = self.arena.read();
        let matches: Vec<&VersionRecord> =
            arena.unconsumed(kind).filter(|r| predicate(&r.state)).collect();
        match matches.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(only.state_and_ref())),
            many => Err(LedgerError::MultipleMatches {
                kind,
                count: many.len(),
            }),
        }
    }

    fn list_unconsumed(&self, kind: StateKind) -> Vec<StateAndRef> {
        self.arena
            .read()
            .unconsumed(kind)
            .map(VersionRecord::state_and_ref)
            .collect()
    }

    fn current(&self, linear_id: &LinearId) -> Option<StateAndRef> {
        self.arena
            .read()
            .current(linear_id)
            .map(VersionRecord::state_and_ref)
    }

    fn history(&self, linear_id: &LinearId) -> Result<Vec<VersionRecord>, LedgerError> {
        self.arena
            .read()
            .versions
            .get(linear_id)
            .cloned()
            .ok_or(LedgerError::UnknownLinearId(*linear_id))
    }

    fn commit(&self, request: CommitRequest) -> Result<CommitReceipt, LedgerError> {
        let mut arena = self.arena.write();

        let handles = match arena.plan(&request) {
            Ok(handles) => handles,
            Err(e) => {
                tracing::warn!(
                    transition_id = %request.transition_id.short(),
                    error = %e,
                    "commit refused"
                );
                return Err(e);
            }
        };

        let consumed: Vec<StateRef> = request.consume.iter().map(|i| i.reference).collect();
        for r in &consumed {
            if let Some(record) = arena
                .versions
                .get_mut(&r.linear_id)
                .and_then(|h| h.get_mut(r.version as usize))
            {
                record.consumed_by = Some(request.transition_id.clone());
            }
        }

        let mut published = Vec::with_capacity(handles.len());
        for (state, handle) in request.publish.into_iter().zip(handles) {
            if handle.version == 0 {
                arena.order.push(handle.linear_id);
            }
            published.push(StateAndRef::new(state.clone(), handle));
            arena
                .versions
                .entry(handle.linear_id)
                .or_default()
                .push(VersionRecord {
                    state,
                    reference: handle,
                    published_by: request.transition_id.clone(),
                    consumed_by: None,
                });
        }

        let receipt = CommitReceipt {
            transition_id: request.transition_id,
            consumed,
            published,
            committed_at: Timestamp::now(),
        };
        arena
            .receipts
            .insert(receipt.transition_id.clone(), receipt.clone());

        tracing::info!(
            transition_id = %receipt.transition_id.short(),
            consumed = receipt.consumed.len(),
            published = receipt.published.len(),
            "transition committed"
        );
        Ok(receipt)
    }

    fn receipt(&self, transition_id: &TransitionId) -> Option<CommitReceipt> {
        self.arena.read().receipts.get(transition_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{agreement, invoice, tid};
    use pactum_state::AgreementStatus;

    fn create(ledger: &InMemoryLedger, state: LedgerState, n: u8) -> StateAndRef {
        let receipt = ledger
            .commit(CommitRequest {
                transition_id: tid(n),
                consume: vec![],
                reference: vec![],
                publish: vec![state],
            })
            .unwrap();
        receipt.published[0].clone()
    }

    fn supersede(
        ledger: &InMemoryLedger,
        input: &StateAndRef,
        next: LedgerState,
        n: u8,
    ) -> Result<CommitReceipt, LedgerError> {
        ledger.commit(CommitRequest {
            transition_id: tid(n),
            consume: vec![input.clone()],
            reference: vec![],
            publish: vec![next],
        })
    }

    #[test]
    fn test_create_publishes_version_zero() {
        let ledger = InMemoryLedger::new();
        let a = agreement(500);
        let published = create(&ledger, a.clone().into(), 1);
        assert_eq!(published.reference, StateRef::new(a.linear_id, 0));
        assert_eq!(ledger.current(&a.linear_id), Some(published));
    }

    #[test]
    fn test_supersede_increments_version_and_keeps_history() {
        let ledger = InMemoryLedger::new();
        let a = agreement(500);
        let v0 = create(&ledger, a.clone().into(), 1);
        let receipt = supersede(&ledger, &v0, a.with_status(AgreementStatus::Ineffect).into(), 2)
            .unwrap();
        assert_eq!(receipt.published[0].reference.version, 1);
        assert_eq!(receipt.consumed, vec![v0.reference]);

        let history = ledger.history(&a.linear_id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].consumed_by, Some(tid(2)));
        assert_eq!(history[1].published_by, tid(2));
        assert!(!history[1].is_consumed());
    }

    #[test]
    fn test_double_consume_conflicts() {
        let ledger = InMemoryLedger::new();
        let a = agreement(500);
        let v0 = create(&ledger, a.clone().into(), 1);
        supersede(&ledger, &v0, a.with_status(AgreementStatus::Ineffect).into(), 2).unwrap();
        let err = supersede(&ledger, &v0, a.with_status(AgreementStatus::Ineffect).into(), 3)
            .unwrap_err();
        assert!(err.is_conflict(), "{err}");
        assert_eq!(ledger.history(&a.linear_id).unwrap().len(), 2);
    }

    #[test]
    fn test_recreate_existing_linear_id_conflicts() {
        let ledger = InMemoryLedger::new();
        let a = agreement(500);
        create(&ledger, a.clone().into(), 1);
        let err = ledger
            .commit(CommitRequest {
                transition_id: tid(1),
                consume: vec![],
                reference: vec![],
                publish: vec![a.into()],
            })
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_tampered_input_conflicts() {
        let ledger = InMemoryLedger::new();
        let a = agreement(500);
        let mut v0 = create(&ledger, a.clone().into(), 1);
        v0.state = a.with_status(AgreementStatus::InReview).into();
        let err = supersede(&ledger, &v0, a.into(), 2).unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_stale_reference_conflicts_and_writes_nothing() {
        let ledger = InMemoryLedger::new();
        let a = agreement(500);
        let v0 = create(&ledger, a.clone().into(), 1);
        supersede(&ledger, &v0, a.with_status(AgreementStatus::Ineffect).into(), 2).unwrap();

        let inv = invoice(100);
        let err = ledger
            .commit(CommitRequest {
                transition_id: tid(3),
                consume: vec![],
                reference: vec![v0.reference],
                publish: vec![inv.clone().into()],
            })
            .unwrap_err();
        assert!(err.is_conflict());
        assert!(ledger.current(&inv.linear_id).is_none());
        assert!(ledger.receipt(&tid(3)).is_none());
    }

    #[test]
    fn test_consume_without_output_retires_linear_id() {
        let ledger = InMemoryLedger::new();
        let inv = invoice(100);
        let v0 = create(&ledger, inv.clone().into(), 1);
        ledger
            .commit(CommitRequest {
                transition_id: tid(2),
                consume: vec![v0],
                reference: vec![],
                publish: vec![],
            })
            .unwrap();
        assert!(ledger.current(&inv.linear_id).is_none());
        assert!(ledger.list_unconsumed(StateKind::Invoice).is_empty());
        assert_eq!(ledger.history(&inv.linear_id).unwrap().len(), 1);
    }

    #[test]
    fn test_query_unconsumed_single_and_multiple() {
        let ledger = InMemoryLedger::new();
        let mut a = agreement(500);
        create(&ledger, a.clone().into(), 1);
        a.linear_id = LinearId::new();
        create(&ledger, a.clone().into(), 2);

        let by_id = ledger
            .query_unconsumed(StateKind::Agreement, &|s| s.linear_id() == a.linear_id)
            .unwrap();
        assert!(by_id.is_some());

        let none = ledger
            .query_unconsumed(StateKind::Invoice, &|_| true)
            .unwrap();
        assert!(none.is_none());

        let err = ledger
            .query_unconsumed(StateKind::Agreement, &|_| true)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::MultipleMatches {
                kind: StateKind::Agreement,
                count: 2
            }
        );
    }

    #[test]
    fn test_list_in_creation_order() {
        let ledger = InMemoryLedger::new();
        let ids: Vec<_> = (1..=4)
            .map(|n| {
                let inv = invoice(100 * n as u64);
                create(&ledger, inv.clone().into(), n);
                inv.linear_id
            })
            .collect();
        let listed: Vec<_> = ledger
            .list_unconsumed(StateKind::Invoice)
            .into_iter()
            .map(|s| s.reference.linear_id)
            .collect();
        assert_eq!(listed, ids);
    }

    #[test]
    fn test_unknown_history() {
        let ledger = InMemoryLedger::new();
        let id = LinearId::new();
        assert_eq!(ledger.history(&id), Err(LedgerError::UnknownLinearId(id)));
    }

    #[test]
    fn test_concurrent_supersede_has_one_winner() {
        let ledger = InMemoryLedger::new();
        let a = agreement(500);
        let v0 = create(&ledger, a.clone().into(), 1);

        let handles: Vec<_> = (0..8u8)
            .map(|n| {
                let ledger = ledger.clone();
                let v0 = v0.clone();
                let next: LedgerState = a.with_status(AgreementStatus::Ineffect).into();
                std::thread::spawn(move || supersede(&ledger, &v0, next, 10 + n))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(LedgerError::is_conflict));
    }
}
