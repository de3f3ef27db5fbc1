//! # Contract Rule Engine
//!
//! `validate` dispatches on the command and runs that command's checklist
//! in order. It reads only the transition: no store lookups, no clocks, no
//! signature verification (see [`crate::SignedTransition`]). Both sides of
//! a commit therefore reach the same verdict on the same bytes.

mod agreement;
mod invoice;
mod message;

use pactum_state::{LedgerState, StateKind};

use crate::command::Command;
use crate::error::Violation;
use crate::requirements::Requirements;
use crate::transition::Transition;

pub use agreement::MIN_ACTIVATION_VALUE;

/// Accept the transition or return the first unmet requirement.
pub fn validate(tx: &Transition) -> Result<(), Violation> {
    let req = Requirements::new(&tx.command);
    req.require(
        "required signers must be sorted and unique",
        tx.required_signers.windows(2).all(|w| w[0] < w[1]),
    )?;

    match tx.command {
        Command::CreateAgreement => agreement::create(tx, &req),
        Command::ReviewAgreement
        | Command::ActivateAgreement
        | Command::RenewAgreement
        | Command::TerminateAgreement
        | Command::ExpireAgreement
        | Command::AmendAgreement => agreement::change_status(tx, &req),
        Command::CreateInvoice => invoice::create(tx, &req),
        Command::PayInvoice { amount } => invoice::pay(tx, &req, amount),
        Command::SendMessage => message::send_message(tx, &req),
        Command::SendAttachment => message::send_attachment(tx, &req),
    }
}

/// Every input and output holds the kind of state the command governs.
fn require_governed_kind(tx: &Transition, req: &Requirements) -> Result<(), Violation> {
    let kind = tx.command.governs();
    req.require(
        &format!("this must be {} {kind} transaction", article(kind)),
        tx.inputs.iter().map(|i| &i.state).chain(tx.outputs.iter()).all(|s| s.kind() == kind),
    )
}

fn article(kind: StateKind) -> &'static str {
    match kind {
        StateKind::Message => "a",
        StateKind::Agreement | StateKind::Invoice | StateKind::Attachment => "an",
    }
}

fn single_input<'a>(
    tx: &'a Transition,
    req: &Requirements,
    reason: &str,
) -> Result<&'a LedgerState, Violation> {
    req.single(reason, &tx.inputs).map(|i| &i.state)
}
