//! # Initiator Pipeline
//!
//! Drives one transition from draft to commit:
//!
//! 1. validate locally; a violation ends the flow before anything is sent;
//! 2. if the transition reads reference states, ask the counterparty to
//!    confirm it sees the same current versions;
//! 3. sign and propose; the counterparty re-validates and countersigns or
//!    refuses with a reason;
//! 4. verify every required signer has signed;
//! 5. commit atomically; a stale input surfaces as a conflict;
//! 6. send a one-way finality notice.
//!
//! Each counterparty round-trip runs under `FlowConfig::counterparty_timeout`.
//! A timeout abandons the transition with nothing written.

use std::future::Future;
use std::sync::Arc;

use pactum_contract::{validate, SignatureError, SignedTransition, Transition};
use pactum_core::TransitionId;
use pactum_crypto::SignatureService;
use pactum_ledger::{CommitReceipt, CommitRequest, LedgerStore};
use pactum_state::{Party, StateAndRef};
use serde::Serialize;
use tracing::Instrument;

use crate::config::FlowConfig;
use crate::error::{FlowError, SessionError};
use crate::progress::{FlowProgress, FlowStage};
use crate::session::{
    CounterpartySession, FinalityNotice, Proposal, ProposalResponse, ReferenceResponse,
};

/// Result of a committed transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowOutcome {
    pub transition_id: TransitionId,
    pub receipt: CommitReceipt,
    pub stages: Vec<FlowStage>,
}

impl FlowOutcome {
    /// Versions the transition published, with their assigned handles.
    pub fn published(&self) -> &[StateAndRef] {
        &self.receipt.published
    }
}

/// The proposing side of the commit protocol.
pub struct Initiator {
    identity: Party,
    signer: Arc<dyn SignatureService>,
    store: Arc<dyn LedgerStore>,
    config: FlowConfig,
}

impl Initiator {
    pub fn new(
        identity: Party,
        signer: Arc<dyn SignatureService>,
        store: Arc<dyn LedgerStore>,
        config: FlowConfig,
    ) -> Self {
        Self {
            identity,
            signer,
            store,
            config,
        }
    }

    /// Run `tx` to commit with the party on the other end of `session`.
    pub async fn run(
        &self,
        tx: Transition,
        session: &dyn CounterpartySession,
    ) -> Result<FlowOutcome, FlowError> {
        let transition_id = tx.id()?;
        let span = tracing::info_span!(
            "transition",
            command = %tx.command,
            transition_id = %transition_id.short(),
            initiator = %self.identity.name,
        );
        let result = self
            .drive(tx, transition_id, session)
            .instrument(span.clone())
            .await;
        if let Err(e) = &result {
            let _entered = span.enter();
            if e.is_conflict() {
                tracing::warn!(error = %e, "transition lost a commit race");
            } else {
                tracing::warn!(error = %e, "transition abandoned");
            }
        }
        result
    }

    async fn drive(
        &self,
        tx: Transition,
        transition_id: TransitionId,
        session: &dyn CounterpartySession,
    ) -> Result<FlowOutcome, FlowError> {
        let mut progress = FlowProgress::new();

        if let Err(violation) = validate(&tx) {
            progress.reject(&violation.reason);
            return Err(violation.into());
        }
        progress.advance(FlowStage::LocalValidated);

        if !tx.references.is_empty() {
            let response = self
                .round_trip(session, session.sync_references(tx.references.clone()))
                .await?;
            if let ReferenceResponse::Rejected { reason } = response {
                progress.reject(&reason);
                return Err(rejected(session, reason));
            }
        }

        let mut signed = SignedTransition::new(tx);
        signed.sign_with(self.signer.as_ref())?;
        progress.advance(FlowStage::Proposed);

        let proposal = Proposal {
            proposer: self.identity.clone(),
            transition: signed.clone(),
        };
        progress.advance(FlowStage::CounterpartyValidating);
        match self.round_trip(session, session.propose(proposal)).await? {
            ProposalResponse::Signed(signature) => {
                if signature.by != session.counterparty().owning_key {
                    return Err(SignatureError::Unexpected(signature.by).into());
                }
                signed.add_signature(signature);
            }
            ProposalResponse::Rejected { reason } => {
                progress.reject(&reason);
                return Err(rejected(session, reason));
            }
        }
        signed.verify_required_signatures()?;
        progress.advance(FlowStage::Countersigned);

        progress.advance(FlowStage::Finalizing);
        let tx = signed.transition;
        let receipt = self.store.commit(CommitRequest {
            transition_id: transition_id.clone(),
            consume: tx.inputs,
            reference: tx.references.iter().map(|r| r.reference).collect(),
            publish: tx.outputs,
        })?;
        progress.advance(FlowStage::Committed);

        self.notify(session, &receipt).await;

        Ok(FlowOutcome {
            transition_id,
            receipt,
            stages: progress.stages().to_vec(),
        })
    }

    async fn round_trip<T>(
        &self,
        session: &dyn CounterpartySession,
        call: impl Future<Output = Result<T, SessionError>>,
    ) -> Result<T, FlowError> {
        let after = self.config.counterparty_timeout;
        match tokio::time::timeout(after, call).await {
            Ok(answer) => Ok(answer?),
            Err(_) => Err(FlowError::Timeout {
                counterparty: session.counterparty().name.clone(),
                after,
            }),
        }
    }

    async fn notify(&self, session: &dyn CounterpartySession, receipt: &CommitReceipt) {
        let notice = FinalityNotice {
            receipt: receipt.clone(),
        };
        match tokio::time::timeout(self.config.notify_timeout, session.notify_committed(notice))
            .await
        {
            Ok(Ok(())) => tracing::debug!("counterparty acknowledged finality"),
            Ok(Err(e)) => tracing::warn!(error = %e, "finality notice not delivered"),
            Err(_) => tracing::warn!(
                after = ?self.config.notify_timeout,
                "finality notice not acknowledged in time"
            ),
        }
    }
}

fn rejected(session: &dyn CounterpartySession, reason: String) -> FlowError {
    FlowError::CounterpartyRejected {
        counterparty: session.counterparty().name.clone(),
        reason,
    }
}
