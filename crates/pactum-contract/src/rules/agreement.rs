//! Agreement checklists.
//!
//! | Command   | In | Out | Input status | Output status |
//! |-----------|----|-----|--------------|---------------|
//! | Create    | 0  | 1   | -            | REQUEST       |
//! | Review    | 1  | 1   | not IN_REVIEW| REQUEST       |
//! | Activate  | 1  | 1   | REQUEST      | INEFFECT      |
//! | Renew     | 1  | 1   | INEFFECT     | RENEWED       |
//! | Terminate | 1  | 1   | INEFFECT     | TERMINATED    |
//! | Expire    | 1  | 1   | INEFFECT     | EXPIRED       |
//! | Amend     | 1  | 1   | INEFFECT     | AMENDED       |
//!
//! Every status change keeps all other fields, dates included, and needs
//! both parties' signatures.

use pactum_state::AgreementStatus;

use super::{require_governed_kind, single_input};
use crate::command::Command;
use crate::error::Violation;
use crate::requirements::Requirements;
use crate::transition::Transition;

/// Agreements below this value are refused at activation.
pub const MIN_ACTIVATION_VALUE: u64 = 100;

pub(super) fn create(tx: &Transition, req: &Requirements) -> Result<(), Violation> {
    require_governed_kind(tx, req)?;
    req.require("no inputs should be consumed when creating an agreement", tx.inputs.is_empty())?;
    req.require("no reference states are used when creating an agreement", tx.references.is_empty())?;
    let out = req
        .single("only one output state should be created", &tx.outputs)?
        .as_agreement()
        .map_err(|e| req.violation(&e.to_string()))?;

    req.require(
        "the party and the counterparty cannot be the same identity",
        out.party != out.counterparty,
    )?;
    req.require(
        "a new agreement must have the status REQUEST",
        out.status.is_initial(),
    )?;
    req.require(
        "the party and counterparty are required signers",
        tx.requires_all([&out.party.owning_key, &out.counterparty.owning_key]),
    )
}

pub(super) fn change_status(tx: &Transition, req: &Requirements) -> Result<(), Violation> {
    require_governed_kind(tx, req)?;
    let input = single_input(tx, req, "exactly one input should be consumed")?
        .as_agreement()
        .map_err(|e| req.violation(&e.to_string()))?;
    let out = req
        .single("exactly one output should be produced", &tx.outputs)?
        .as_agreement()
        .map_err(|e| req.violation(&e.to_string()))?;
    req.require("no reference states are used for a status change", tx.references.is_empty())?;

    req.require(
        "the linear id must not change",
        input.linear_id == out.linear_id,
    )?;
    require_input_status(tx.command, input.status, req)?;

    let expected = req.present(
        "the command does not change an agreement status",
        tx.command.output_status(),
    )?;
    req.require(
        &format!("the output status must be {expected}"),
        out.status == expected,
    )?;
    req.require(
        "the agreement is unchanged apart from the status field",
        input.same_apart_from_status(out),
    )?;

    if tx.command == Command::ActivateAgreement {
        req.require(
            "I won't accept agreements with a value under 100.",
            out.total_value >= MIN_ACTIVATION_VALUE,
        )?;
    }

    req.require(
        "the party and counterparty are required signers",
        tx.requires_all([&out.party.owning_key, &out.counterparty.owning_key]),
    )
}

fn require_input_status(
    command: Command,
    status: AgreementStatus,
    req: &Requirements,
) -> Result<(), Violation> {
    match command {
        Command::ReviewAgreement => {
            req.require(
                "a terminal agreement cannot be reviewed",
                !status.is_terminal(),
            )?;
            req.require(
                "an agreement in effect cannot be sent back for review",
                !status.is_in_effect(),
            )?;
            req.require(
                "an agreement already in review cannot be sent for review",
                status != AgreementStatus::InReview,
            )
        }
        Command::ActivateAgreement => req.require(
            "only an agreement with the status REQUEST can be activated",
            status.is_initial(),
        ),
        _ => req.require(
            &format!(
                "only an agreement in effect can be {}",
                past_tense(command)
            ),
            status.is_in_effect(),
        ),
    }
}

fn past_tense(command: Command) -> &'static str {
    match command {
        Command::RenewAgreement => "renewed",
        Command::TerminateAgreement => "terminated",
        Command::ExpireAgreement => "expired",
        Command::AmendAgreement => "amended",
        _ => "changed",
    }
}
