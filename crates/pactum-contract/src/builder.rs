//! # Transition Builder
//!
//! Derives the exact next version for a command and wraps it in a
//! [`Transition`]. Every field the command does not own is copied from the
//! current version, and the linear id is always kept.
//!
//! The builder does not check whether the change is allowed: asking it to
//! terminate an agreement that is still in `REQUEST` yields a transition
//! the rule engine will reject. It fails only when it cannot shape the
//! transition at all.

use pactum_core::Timestamp;
use pactum_crypto::Ed25519PublicKey;
use pactum_state::{
    Agreement, Attachment, Invoice, LedgerState, Message, StateAndRef, StateKind,
};

use crate::command::Command;
use crate::error::BuildError;
use crate::transition::Transition;

/// Incremental builder for a [`Transition`].
#[derive(Debug, Clone)]
pub struct TransitionBuilder {
    command: Command,
    inputs: Vec<StateAndRef>,
    outputs: Vec<LedgerState>,
    references: Vec<StateAndRef>,
}

impl TransitionBuilder {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            inputs: Vec::new(),
            outputs: Vec::new(),
            references: Vec::new(),
        }
    }

    pub fn input(mut self, state: StateAndRef) -> Self {
        self.inputs.push(state);
        self
    }

    pub fn output(mut self, state: impl Into<LedgerState>) -> Self {
        self.outputs.push(state.into());
        self
    }

    pub fn reference(mut self, state: StateAndRef) -> Self {
        self.references.push(state);
        self
    }

    /// Finish the transition. Required signers are the owning keys of the
    /// outputs' participants, or of the inputs' when nothing is published.
    pub fn build(self) -> Transition {
        let signing_states: Vec<&LedgerState> = if self.outputs.is_empty() {
            self.inputs.iter().map(|i| &i.state).collect()
        } else {
            self.outputs.iter().collect()
        };
        let mut required_signers: Vec<Ed25519PublicKey> = signing_states
            .into_iter()
            .flat_map(|s| s.participants().map(|p| p.owning_key))
            .collect();
        required_signers.sort();
        required_signers.dedup();

        Transition {
            inputs: self.inputs,
            outputs: self.outputs,
            references: self.references,
            command: self.command,
            required_signers,
        }
    }

    // ─── Per-command constructors ───────────────────────────────────

    pub fn create_agreement(agreement: Agreement) -> Transition {
        Self::new(Command::CreateAgreement).output(agreement).build()
    }

    /// Review, activate, renew, terminate, expire or amend `current`.
    pub fn change_agreement_status(
        command: Command,
        current: &StateAndRef,
    ) -> Result<Transition, BuildError> {
        let status = match command.output_status() {
            Some(status) if !command.is_creation() => status,
            _ => {
                return Err(BuildError::NotApplicable {
                    command: command.name(),
                    kind: current.state.kind(),
                })
            }
        };
        let agreement = current
            .state
            .as_agreement()
            .map_err(|_| not_applicable(command, current))?;

        Ok(Self::new(command)
            .input(current.clone())
            .output(agreement.with_status(status))
            .build())
    }

    /// Raise an invoice, attaching `agreement` as a reference state when
    /// the invoice names one.
    pub fn create_invoice(
        invoice: Invoice,
        agreement: Option<&StateAndRef>,
    ) -> Result<Transition, BuildError> {
        let command = Command::CreateInvoice;
        let mut builder = Self::new(command);
        match (invoice.agreement_reference, agreement) {
            (Some(_), Some(agreement)) => {
                if agreement.state.kind() != StateKind::Agreement {
                    return Err(not_applicable(command, agreement));
                }
                builder = builder.reference(agreement.clone());
            }
            (Some(_), None) => {
                return Err(BuildError::MissingParameter {
                    command: command.name(),
                    parameter: "the referenced agreement",
                })
            }
            (None, _) => {}
        }
        Ok(builder.output(invoice).build())
    }

    /// Pay `amount` off `current`. A payment clearing the invoice publishes
    /// no output.
    pub fn pay_invoice(
        current: &StateAndRef,
        amount: u64,
        at: Timestamp,
    ) -> Result<Transition, BuildError> {
        let command = Command::PayInvoice { amount };
        let invoice = current
            .state
            .as_invoice()
            .map_err(|_| not_applicable(command, current))?;

        let builder = Self::new(command).input(current.clone());
        Ok(match invoice.pay(amount, at)? {
            Some(next) => builder.output(next),
            None => builder,
        }
        .build())
    }

    pub fn send_message(message: Message) -> Transition {
        Self::new(Command::SendMessage).output(message).build()
    }

    pub fn send_attachment(attachment: Attachment) -> Transition {
        Self::new(Command::SendAttachment).output(attachment).build()
    }
}

fn not_applicable(command: Command, state: &StateAndRef) -> BuildError {
    BuildError::NotApplicable {
        command: command.name(),
        kind: state.state.kind(),
    }
}
