//! # Node Command Surface
//!
//! A [`Node`] is one party's view of the ledger. Every business operation
//! loads the current version through the store, derives the next version
//! with the transition builder and runs the initiator pipeline against the
//! other participant. Operations return the committed version or a typed
//! [`FlowError`]; none of them leaves a partial write behind.
//!
//! `Node` is `Send + Sync`; share it across tasks behind an `Arc`. The
//! session map lock is released before any `.await`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use pactum_contract::{validate, Command, Transition, TransitionBuilder};
use pactum_core::{LinearId, PartyName, Timestamp};
use pactum_crypto::SignatureService;
use pactum_ledger::{FundsService, IdentityService, LedgerError, LedgerStore, VersionRecord};
use pactum_state::{
    Agreement, AgreementStatus, AgreementType, Attachment, Invoice, LedgerState, Message, Party,
    StateAndRef, StateKind,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, FlowConfig};
use crate::error::{FlowError, SessionError};
use crate::initiator::{FlowOutcome, Initiator};
use crate::responder::Responder;
use crate::session::CounterpartySession;

/// Collaborators a node consults but does not own.
#[derive(Clone)]
pub struct NodeServices {
    pub store: Arc<dyn LedgerStore>,
    pub identities: Arc<dyn IdentityService>,
    pub funds: Arc<dyn FundsService>,
}

// ─── Requests ───────────────────────────────────────────────────────

/// Business fields of a new agreement. `counterparty` is a full legal name
/// or a bare organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAgreement {
    pub agreement_number: String,
    pub agreement_name: String,
    pub agreement_hash: String,
    pub agreement_type: AgreementType,
    pub total_value: u64,
    pub counterparty: String,
    pub start_date: String,
    pub end_date: String,
}

/// Business fields of a new invoice. The counterparty is the payer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub invoice_name: String,
    pub billing_reason: String,
    pub total: u64,
    pub counterparty: String,
    pub due_date: String,
    pub period_start_date: String,
    pub period_end_date: String,
    /// Agreement the invoice is raised under.
    #[serde(default)]
    pub agreement_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub to: String,
    pub body: String,
    pub from_user_id: String,
    pub to_user_id: String,
}

// ─── Node ───────────────────────────────────────────────────────────

pub struct Node {
    identity: Party,
    signer: Arc<dyn SignatureService>,
    services: NodeServices,
    initiator: Initiator,
    sessions: RwLock<HashMap<PartyName, Arc<dyn CounterpartySession>>>,
    message_counter: AtomicU64,
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("identity", &self.identity)
            .field("sessions", &self.sessions.read().len())
            .finish_non_exhaustive()
    }
}

impl Node {
    /// Fails if `signer` does not hold the key `identity` claims.
    pub fn new(
        identity: Party,
        signer: Arc<dyn SignatureService>,
        services: NodeServices,
        config: FlowConfig,
    ) -> Result<Self, ConfigError> {
        if signer.public_key() != identity.owning_key {
            return Err(ConfigError::KeyMismatch {
                identity: identity.owning_key.to_hex(),
                signer: signer.public_key().to_hex(),
            });
        }
        let initiator = Initiator::new(
            identity.clone(),
            Arc::clone(&signer),
            Arc::clone(&services.store),
            config,
        );
        Ok(Self {
            identity,
            signer,
            services,
            initiator,
            sessions: RwLock::new(HashMap::new()),
            message_counter: AtomicU64::new(0),
        })
    }

    pub fn identity(&self) -> &Party {
        &self.identity
    }

    /// The counterparty-side pipeline, for serving incoming sessions.
    pub fn responder(&self) -> Responder {
        Responder::new(
            self.identity.clone(),
            Arc::clone(&self.signer),
            Arc::clone(&self.services.store),
            Arc::clone(&self.services.identities),
        )
    }

    /// Register the session used to reach `session.counterparty()`.
    pub fn connect(&self, session: Arc<dyn CounterpartySession>) {
        let name = session.counterparty().name.clone();
        tracing::debug!(node = %self.identity.name, counterparty = %name, "session registered");
        self.sessions.write().insert(name, session);
    }

    // ─── Agreements ─────────────────────────────────────────────────

    pub async fn create_agreement(&self, request: NewAgreement) -> Result<StateAndRef, FlowError> {
        let counterparty = self.services.identities.resolve(&request.counterparty)?;
        let agreement = Agreement {
            agreement_number: request.agreement_number,
            agreement_name: request.agreement_name,
            agreement_hash: request.agreement_hash,
            status: AgreementStatus::Request,
            agreement_type: request.agreement_type,
            total_value: request.total_value,
            party: self.identity.clone(),
            counterparty,
            start_date: request.start_date,
            end_date: request.end_date,
            linear_id: LinearId::new(),
        };
        let outcome = self.submit(TransitionBuilder::create_agreement(agreement)).await?;
        single_output(outcome)
    }

    pub async fn review_agreement(&self, agreement_number: &str) -> Result<StateAndRef, FlowError> {
        self.change_status(Command::ReviewAgreement, agreement_number).await
    }

    pub async fn activate_agreement(
        &self,
        agreement_number: &str,
    ) -> Result<StateAndRef, FlowError> {
        self.change_status(Command::ActivateAgreement, agreement_number).await
    }

    pub async fn renew_agreement(&self, agreement_number: &str) -> Result<StateAndRef, FlowError> {
        self.change_status(Command::RenewAgreement, agreement_number).await
    }

    pub async fn terminate_agreement(
        &self,
        agreement_number: &str,
    ) -> Result<StateAndRef, FlowError> {
        self.change_status(Command::TerminateAgreement, agreement_number).await
    }

    pub async fn expire_agreement(&self, agreement_number: &str) -> Result<StateAndRef, FlowError> {
        self.change_status(Command::ExpireAgreement, agreement_number).await
    }

    pub async fn amend_agreement(&self, agreement_number: &str) -> Result<StateAndRef, FlowError> {
        self.change_status(Command::AmendAgreement, agreement_number).await
    }

    async fn change_status(
        &self,
        command: Command,
        agreement_number: &str,
    ) -> Result<StateAndRef, FlowError> {
        let current = self.agreement(agreement_number)?;
        let tx = TransitionBuilder::change_agreement_status(command, &current)?;
        single_output(self.submit(tx).await?)
    }

    // ─── Invoices ───────────────────────────────────────────────────

    pub async fn create_invoice(&self, request: NewInvoice) -> Result<StateAndRef, FlowError> {
        let counterparty = self.services.identities.resolve(&request.counterparty)?;
        let agreement = request
            .agreement_number
            .as_deref()
            .map(|number| self.agreement(number))
            .transpose()?;

        let now = Timestamp::now();
        let invoice = Invoice {
            invoice_number: request.invoice_number,
            invoice_name: request.invoice_name,
            billing_reason: request.billing_reason,
            amount_due: request.total,
            amount_paid: 0,
            amount_remaining: request.total,
            subtotal: request.total,
            total: request.total,
            party: self.identity.clone(),
            counterparty,
            due_date: request.due_date,
            period_start_date: request.period_start_date,
            period_end_date: request.period_end_date,
            paid: false,
            active: true,
            created_at: now,
            last_updated: now,
            agreement_reference: agreement.as_ref().map(|a| a.reference.linear_id),
            linear_id: LinearId::new(),
        };
        let tx = TransitionBuilder::create_invoice(invoice, agreement.as_ref())?;
        single_output(self.submit(tx).await?)
    }

    /// Pay `amount` off an invoice this node owes. Returns the next version,
    /// or `None` once the invoice is fully paid and leaves the ledger's
    /// unconsumed set.
    pub async fn pay_invoice(
        &self,
        invoice_number: &str,
        amount: u64,
    ) -> Result<Option<StateAndRef>, FlowError> {
        let current = self.invoice(invoice_number)?;
        let invoice = current
            .state
            .as_invoice()
            .map_err(|e| FlowError::NotFound(e.to_string()))?;
        if invoice.counterparty != self.identity {
            return Err(FlowError::NotPermitted(format!(
                "invoice {invoice_number} can only be paid by its counterparty {}",
                invoice.counterparty.name
            )));
        }
        self.services.funds.ensure_can_pay(&self.identity, amount)?;
        let payee = invoice.party.clone();

        let tx = TransitionBuilder::pay_invoice(&current, amount, Timestamp::now())?;
        let outcome = self.submit(tx).await?;
        // The payment is on the ledger; a balance that no longer covers it
        // was spent by a concurrent payment since the check above.
        if let Err(e) = self
            .services
            .funds
            .record_payment(&self.identity, &payee, amount)
        {
            tracing::warn!(
                error = %e,
                invoice = invoice_number,
                "payment committed but not debited"
            );
        }
        Ok(outcome.published().first().cloned())
    }

    // ─── Messages ───────────────────────────────────────────────────

    pub async fn send_message(&self, request: NewMessage) -> Result<StateAndRef, FlowError> {
        let to = self.services.identities.resolve(&request.to)?;
        let message = Message {
            id: LinearId::new(),
            body: request.body,
            from_user_id: request.from_user_id,
            to_user_id: request.to_user_id,
            from: self.identity.clone(),
            to,
            sent_receipt: true,
            delivered_receipt: false,
            from_me: true,
            time: Timestamp::now(),
            message_number: self.message_counter.fetch_add(1, Ordering::Relaxed) + 1,
        };
        single_output(self.submit(TransitionBuilder::send_message(message)).await?)
    }

    /// Record a file handed to `to`. `handle` is the content hash or
    /// storage key of the file, which itself stays off the ledger.
    pub async fn send_attachment(&self, to: &str, handle: &str) -> Result<StateAndRef, FlowError> {
        let to = self.services.identities.resolve(to)?;
        let attachment = Attachment {
            attachment_id: LinearId::new(),
            attachment: handle.to_string(),
            from: self.identity.clone(),
            to,
            sent_receipt: true,
            delivered_receipt: false,
            from_me: true,
            time: Timestamp::now(),
        };
        single_output(self.submit(TransitionBuilder::send_attachment(attachment)).await?)
    }

    // ─── Lower level ────────────────────────────────────────────────

    /// Run an already-built transition through the commit protocol with
    /// its other participant.
    pub async fn submit(&self, tx: Transition) -> Result<FlowOutcome, FlowError> {
        let session = match self.session_for(&tx) {
            Ok(session) => session,
            Err(e) => {
                // A transition with no reachable counterparty may still be
                // one the rules reject; report that first.
                validate(&tx)?;
                return Err(e);
            }
        };
        self.initiator.run(tx, session.as_ref()).await
    }

    fn session_for(&self, tx: &Transition) -> Result<Arc<dyn CounterpartySession>, FlowError> {
        let counterparty = tx
            .participants()
            .and_then(|ps| ps.into_iter().find(|p| **p != self.identity).cloned())
            .ok_or_else(|| {
                FlowError::NotPermitted("the transaction has no other participant".into())
            })?;
        self.sessions
            .read()
            .get(&counterparty.name)
            .cloned()
            .ok_or_else(|| SessionError::NoSession(counterparty.name).into())
    }

    // ─── Queries ────────────────────────────────────────────────────

    /// Current agreements this node is party to.
    pub fn agreements(&self) -> Vec<StateAndRef> {
        self.mine(StateKind::Agreement)
    }

    /// Current version of the agreement with this business key.
    pub fn agreement(&self, agreement_number: &str) -> Result<StateAndRef, FlowError> {
        self.find(StateKind::Agreement, &format!("agreement {agreement_number}"), |s| {
            s.as_agreement()
                .map_or(false, |a| a.agreement_number == agreement_number)
        })
    }

    /// Invoices this node is party to that are not yet fully paid.
    pub fn invoices(&self) -> Vec<StateAndRef> {
        self.mine(StateKind::Invoice)
    }

    pub fn invoice(&self, invoice_number: &str) -> Result<StateAndRef, FlowError> {
        self.find(StateKind::Invoice, &format!("invoice {invoice_number}"), |s| {
            s.as_invoice()
                .map_or(false, |i| i.invoice_number == invoice_number)
        })
    }

    pub fn sent_messages(&self) -> Vec<StateAndRef> {
        self.messages(|m| m.from == self.identity)
    }

    pub fn received_messages(&self) -> Vec<StateAndRef> {
        self.messages(|m| m.to == self.identity)
    }

    /// Every version of a linear object, oldest first.
    pub fn history(&self, linear_id: &LinearId) -> Result<Vec<VersionRecord>, FlowError> {
        Ok(self.services.store.history(linear_id)?)
    }

    fn mine(&self, kind: StateKind) -> Vec<StateAndRef> {
        self.services
            .store
            .list_unconsumed(kind)
            .into_iter()
            .filter(|s| s.state.is_participant(&self.identity))
            .collect()
    }

    fn messages(&self, keep: impl Fn(&Message) -> bool) -> Vec<StateAndRef> {
        self.mine(StateKind::Message)
            .into_iter()
            .filter(|s| s.state.as_message().map_or(false, &keep))
            .collect()
    }

    fn find(
        &self,
        kind: StateKind,
        what: &str,
        matches: impl Fn(&LedgerState) -> bool,
    ) -> Result<StateAndRef, FlowError> {
        let predicate = |s: &LedgerState| s.is_participant(&self.identity) && matches(s);
        self.services
            .store
            .query_unconsumed(kind, &predicate)?
            .ok_or_else(|| FlowError::NotFound(what.to_string()))
    }
}

fn single_output(outcome: FlowOutcome) -> Result<StateAndRef, FlowError> {
    outcome.receipt.published.into_iter().next().ok_or_else(|| {
        FlowError::Ledger(LedgerError::InvalidCommit(format!(
            "transition {} published nothing",
            outcome.transition_id.short()
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        alice_and_bob, new_agreement, new_invoice, party, quick, signer,
    };
    use pactum_ledger::{IdentityDirectory, InMemoryFunds, InMemoryLedger};

    #[tokio::test]
    async fn test_agreement_lifecycle() {
        let net = alice_and_bob();
        let alice = net.node("Alice Corp").unwrap();
        let bob = net.node("bob ltd").unwrap();

        let created = alice.create_agreement(new_agreement("AG-1", 500)).await.unwrap();
        assert_eq!(created.reference.version, 0);
        assert_eq!(
            created.state.as_agreement().unwrap().status,
            AgreementStatus::Request
        );

        let active = bob.activate_agreement("AG-1").await.unwrap();
        assert_eq!(active.reference, created.reference.next());
        assert_eq!(
            active.state.as_agreement().unwrap().status,
            AgreementStatus::Ineffect
        );

        let ended = alice.terminate_agreement("AG-1").await.unwrap();
        assert_eq!(ended.reference.version, 2);
        assert_eq!(
            ended.state.as_agreement().unwrap().status,
            AgreementStatus::Terminated
        );

        let history = alice.history(&created.reference.linear_id).unwrap();
        assert_eq!(history.len(), 3);
        assert!(history[0].is_consumed() && history[1].is_consumed());
        assert!(!history[2].is_consumed());
    }

    #[tokio::test]
    async fn test_second_terminate_by_number_fails_validation() {
        let net = alice_and_bob();
        let alice = net.node("Alice Corp").unwrap();
        alice.create_agreement(new_agreement("AG-2", 500)).await.unwrap();
        alice.activate_agreement("AG-2").await.unwrap();
        alice.terminate_agreement("AG-2").await.unwrap();

        let err = alice.terminate_agreement("AG-2").await.unwrap_err();
        assert_eq!(
            err.rejection_reason(),
            Some("only an agreement in effect can be terminated")
        );
    }

    #[tokio::test]
    async fn test_low_value_activation_rejected_and_nothing_written() {
        let net = alice_and_bob();
        let alice = net.node("Alice Corp").unwrap();
        let created = alice.create_agreement(new_agreement("AG-3", 50)).await.unwrap();

        let err = alice.activate_agreement("AG-3").await.unwrap_err();
        assert!(matches!(err, FlowError::Validation(_)));
        assert!(err.rejection_reason().unwrap().contains("value under 100"));

        let current = alice.agreement("AG-3").unwrap();
        assert_eq!(current, created);
    }

    #[tokio::test]
    async fn test_unknown_agreement_not_found() {
        let net = alice_and_bob();
        let alice = net.node("Alice Corp").unwrap();
        assert!(matches!(
            alice.activate_agreement("AG-404").await,
            Err(FlowError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_counterparty_rejected() {
        let net = alice_and_bob();
        let alice = net.node("Alice Corp").unwrap();
        let mut request = new_agreement("AG-4", 500);
        request.counterparty = "Carol plc".into();
        assert!(matches!(
            alice.create_agreement(request).await,
            Err(FlowError::Identity(_))
        ));
        assert!(alice.agreements().is_empty());
    }

    #[tokio::test]
    async fn test_invoice_paid_in_two_payments() {
        let net = alice_and_bob();
        let alice = net.node("Alice Corp").unwrap();
        let bob = net.node("Bob Ltd").unwrap();

        let created = alice.create_invoice(new_invoice("INV-1", 300)).await.unwrap();
        let linear_id = created.reference.linear_id;

        let partial = bob.pay_invoice("INV-1", 100).await.unwrap().unwrap();
        let invoice = partial.state.as_invoice().unwrap();
        assert_eq!(
            (invoice.amount_paid, invoice.amount_remaining, invoice.paid),
            (100, 200, false)
        );
        assert_eq!(invoice.amount_remaining, invoice.amount_due - invoice.amount_paid);

        assert_eq!(bob.pay_invoice("INV-1", 200).await.unwrap(), None);
        assert!(bob.invoices().is_empty());
        assert!(matches!(alice.invoice("INV-1"), Err(FlowError::NotFound(_))));

        let history = alice.history(&linear_id).unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|r| r.is_consumed()));
    }

    #[tokio::test]
    async fn test_only_the_payer_pays() {
        let net = alice_and_bob();
        let alice = net.node("Alice Corp").unwrap();
        alice.create_invoice(new_invoice("INV-2", 300)).await.unwrap();
        assert!(matches!(
            alice.pay_invoice("INV-2", 100).await,
            Err(FlowError::NotPermitted(_))
        ));
    }

    #[tokio::test]
    async fn test_payment_needs_funds() {
        let net = alice_and_bob();
        let alice = net.node("Alice Corp").unwrap();
        let bob = net.node("Bob Ltd").unwrap();
        let created = alice.create_invoice(new_invoice("INV-3", 5_000)).await.unwrap();

        assert!(matches!(
            bob.pay_invoice("INV-3", 2_000).await,
            Err(FlowError::Funds(_))
        ));
        assert_eq!(bob.invoice("INV-3").unwrap(), created);
    }

    #[tokio::test]
    async fn test_payments_draw_down_the_payer_balance() {
        let net = alice_and_bob();
        let alice = net.node("Alice Corp").unwrap();
        let bob = net.node("Bob Ltd").unwrap();
        alice.create_invoice(new_invoice("INV-6", 600)).await.unwrap();
        let second = alice.create_invoice(new_invoice("INV-7", 600)).await.unwrap();

        assert_eq!(bob.pay_invoice("INV-6", 600).await.unwrap(), None);
        assert_eq!(net.funds().balance(bob.identity()), 400);
        assert_eq!(net.funds().balance(alice.identity()), 600);

        assert!(matches!(
            bob.pay_invoice("INV-7", 600).await,
            Err(FlowError::Funds(_))
        ));
        assert_eq!(bob.invoice("INV-7").unwrap(), second);
    }

    #[tokio::test]
    async fn test_overpayment_cannot_be_built() {
        let net = alice_and_bob();
        let alice = net.node("Alice Corp").unwrap();
        let bob = net.node("Bob Ltd").unwrap();
        alice.create_invoice(new_invoice("INV-4", 100)).await.unwrap();
        assert!(matches!(
            bob.pay_invoice("INV-4", 150).await,
            Err(FlowError::Construction(_))
        ));
    }

    #[tokio::test]
    async fn test_invoice_under_agreement_reads_without_consuming() {
        let net = alice_and_bob();
        let alice = net.node("Alice Corp").unwrap();
        let agreement = alice.create_agreement(new_agreement("AG-5", 500)).await.unwrap();

        let mut request = new_invoice("INV-5", 250);
        request.agreement_number = Some("AG-5".into());
        let invoice = alice.create_invoice(request).await.unwrap();

        assert_eq!(
            invoice.state.as_invoice().unwrap().agreement_reference,
            Some(agreement.reference.linear_id)
        );
        assert_eq!(alice.agreement("AG-5").unwrap(), agreement);

        let mut orphan = new_invoice("INV-6", 250);
        orphan.agreement_number = Some("AG-404".into());
        assert!(matches!(
            alice.create_invoice(orphan).await,
            Err(FlowError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_total_invoice_rejected() {
        let net = alice_and_bob();
        let alice = net.node("Alice Corp").unwrap();
        assert!(matches!(
            alice.create_invoice(new_invoice("INV-0", 0)).await,
            Err(FlowError::Validation(_))
        ));
        assert!(alice.invoices().is_empty());
    }

    #[tokio::test]
    async fn test_messages_are_numbered_and_visible_to_both() {
        let net = alice_and_bob();
        let alice = net.node("Alice Corp").unwrap();
        let bob = net.node("Bob Ltd").unwrap();

        for body in ["hello", "see attached"] {
            alice
                .send_message(NewMessage {
                    to: "Bob Ltd".into(),
                    body: body.into(),
                    from_user_id: "alice".into(),
                    to_user_id: "bob".into(),
                })
                .await
                .unwrap();
        }

        let numbers: Vec<u64> = alice
            .sent_messages()
            .iter()
            .map(|m| m.state.as_message().unwrap().message_number)
            .collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(bob.received_messages().len(), 2);
        assert!(bob.sent_messages().is_empty());
    }

    #[tokio::test]
    async fn test_attachment_needs_handle() {
        let net = alice_and_bob();
        let alice = net.node("Alice Corp").unwrap();
        let sent = alice.send_attachment("Bob Ltd", "sha256:b94d27b9").await.unwrap();
        assert_eq!(sent.state.kind(), StateKind::Attachment);
        assert!(matches!(
            alice.send_attachment("Bob Ltd", "  ").await,
            Err(FlowError::Validation(_))
        ));
    }

    fn standalone_services() -> NodeServices {
        let identities = IdentityDirectory::new();
        identities.register(party("Alice Corp", 1)).unwrap();
        identities.register(party("Bob Ltd", 2)).unwrap();
        NodeServices {
            store: Arc::new(InMemoryLedger::new()),
            identities: Arc::new(identities),
            funds: Arc::new(InMemoryFunds::new()),
        }
    }

    #[test]
    fn test_signer_must_hold_identity_key() {
        let err = Node::new(party("Alice Corp", 1), signer(2), standalone_services(), quick())
            .unwrap_err();
        assert!(matches!(err, ConfigError::KeyMismatch { .. }));
    }

    #[tokio::test]
    async fn test_no_session_with_counterparty() {
        let node =
            Node::new(party("Alice Corp", 1), signer(1), standalone_services(), quick()).unwrap();
        let err = node.create_agreement(new_agreement("AG-6", 500)).await.unwrap_err();
        assert!(matches!(err, FlowError::Session(SessionError::NoSession(_))));
    }
}
