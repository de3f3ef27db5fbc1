//! # Responder Pipeline
//!
//! The counterparty side of a transition. The responder trusts nothing the
//! initiator sends: it re-runs the rule engine over the same canonical
//! transition, checks every signature already attached, and signs only
//! when all of the following hold.
//!
//! 1. The rule engine accepts the transition.
//! 2. Every attached signature verifies against a required signer.
//! 3. The proposer's own signature is attached.
//! 4. The proposer is the registered owner of the key it claims.
//! 5. This node is itself a required signer.
//! 6. The transition is between the proposer and this node.
//! 7. For messages and attachments, the sender is the proposer and not
//!    this node.
//!
//! The responder never checks whether the inputs are still current. The
//! store does that at commit, where a stale input becomes a conflict.

use std::sync::Arc;

use pactum_contract::{validate, Command, SignedTransition, TransitionSignature};
use pactum_crypto::SignatureService;
use pactum_ledger::{IdentityService, LedgerStore};
use pactum_state::{LedgerState, Party, StateAndRef};

use crate::session::{
    FinalityNotice, Proposal, ProposalResponse, ReferenceResponse, SessionMessage, SessionReply,
};

pub struct Responder {
    identity: Party,
    signer: Arc<dyn SignatureService>,
    store: Arc<dyn LedgerStore>,
    identities: Arc<dyn IdentityService>,
}

impl std::fmt::Debug for Responder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Responder")
            .field("identity", &self.identity)
            .field("signer", &self.signer.service_name())
            .finish_non_exhaustive()
    }
}

impl Responder {
    pub fn new(
        identity: Party,
        signer: Arc<dyn SignatureService>,
        store: Arc<dyn LedgerStore>,
        identities: Arc<dyn IdentityService>,
    ) -> Self {
        Self {
            identity,
            signer,
            store,
            identities,
        }
    }

    pub fn identity(&self) -> &Party {
        &self.identity
    }

    /// Answer one session request.
    pub fn handle(&self, message: SessionMessage) -> SessionReply {
        match message {
            SessionMessage::SyncReferences { references } => {
                SessionReply::References(self.confirm_references(&references))
            }
            SessionMessage::Propose(proposal) => SessionReply::Proposal(self.review(&proposal)),
            SessionMessage::Committed(notice) => {
                self.record_finality(&notice);
                SessionReply::Acknowledged
            }
        }
    }

    fn confirm_references(&self, references: &[StateAndRef]) -> ReferenceResponse {
        for wanted in references {
            match self.store.current(&wanted.reference.linear_id) {
                Some(current) if current == *wanted => {}
                Some(current) => {
                    return ReferenceResponse::Rejected {
                        reason: format!(
                            "reference {} is not current; the current version is {}",
                            wanted.reference, current.reference
                        ),
                    }
                }
                None => {
                    return ReferenceResponse::Rejected {
                        reason: format!("reference {} has no current version", wanted.reference),
                    }
                }
            }
        }
        ReferenceResponse::Confirmed
    }

    fn review(&self, proposal: &Proposal) -> ProposalResponse {
        let command = proposal.transition.transition.command;
        match self.check(proposal) {
            Ok(signature) => {
                tracing::info!(
                    node = %self.identity.name,
                    proposer = %proposal.proposer.name,
                    command = %command,
                    "transition countersigned"
                );
                ProposalResponse::Signed(signature)
            }
            Err(reason) => {
                tracing::warn!(
                    node = %self.identity.name,
                    proposer = %proposal.proposer.name,
                    command = %command,
                    reason = %reason,
                    "refused to countersign"
                );
                ProposalResponse::Rejected { reason }
            }
        }
    }

    fn check(&self, proposal: &Proposal) -> Result<TransitionSignature, String> {
        let signed: &SignedTransition = &proposal.transition;
        let tx = &signed.transition;
        let proposer = &proposal.proposer;
        let me = &self.identity;

        validate(tx).map_err(|v| v.reason)?;
        signed.verify_signatures().map_err(|e| e.to_string())?;

        if !signed.is_signed_by(&proposer.owning_key) {
            return Err("the proposer has not signed the transaction".into());
        }
        match self.identities.party_from_key(&proposer.owning_key) {
            Some(known) if known == *proposer => {}
            _ => return Err(format!("{} is not a known party", proposer.name)),
        }
        if !tx.is_required_signer(&me.owning_key) {
            return Err("I am not a required signer of this transaction".into());
        }
        let between_us = tx
            .participants()
            .map_or(false, |ps| ps.contains(&proposer) && ps.contains(&me));
        if !between_us {
            return Err("the transaction must be between the proposer and me".into());
        }

        if matches!(tx.command, Command::SendMessage | Command::SendAttachment) {
            let sender = tx.outputs.first().and_then(sender_of);
            if sender != Some(proposer) {
                return Err("the sender must be the party creating this transaction".into());
            }
            if sender == Some(me) {
                return Err("The sender of the new message cannot have my identity".into());
            }
        }

        signed.countersign(self.signer.as_ref()).map_err(|e| e.to_string())
    }

    fn record_finality(&self, notice: &FinalityNotice) {
        let id = &notice.receipt.transition_id;
        match self.store.receipt(id) {
            Some(_) => tracing::info!(
                node = %self.identity.name,
                transition_id = %id.short(),
                published = notice.receipt.published.len(),
                "finality notice received"
            ),
            None => tracing::warn!(
                node = %self.identity.name,
                transition_id = %id.short(),
                "finality notice for a transition the ledger has no receipt for"
            ),
        }
    }
}

fn sender_of(state: &LedgerState) -> Option<&Party> {
    match state {
        LedgerState::Message(m) => Some(&m.from),
        LedgerState::Attachment(a) => Some(&a.from),
        _ => None,
    }
}
