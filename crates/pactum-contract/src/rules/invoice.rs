//! Invoice checklists.
//!
//! CreateInvoice publishes one balanced, unpaid invoice whose amount due is
//! its positive total. An
//! invoice raised under an agreement carries that agreement as a reference
//! state.
//!
//! PayInvoice `{ amount }` consumes the current version. A payment that
//! clears the remaining amount publishes nothing; any other payment
//! publishes the next version with `amount_paid` raised by exactly
//! `amount`.

use super::{require_governed_kind, single_input};
use crate::error::Violation;
use crate::requirements::Requirements;
use crate::transition::Transition;

pub(super) fn create(tx: &Transition, req: &Requirements) -> Result<(), Violation> {
    require_governed_kind(tx, req)?;
    req.require("no inputs should be consumed", tx.inputs.is_empty())?;
    let out = req
        .single("one output should be produced", &tx.outputs)?
        .as_invoice()
        .map_err(|e| req.violation(&e.to_string()))?;

    req.require(
        "the party should be different to the counterparty",
        out.party != out.counterparty,
    )?;
    req.require("the total should be greater than 0", out.total > 0)?;
    req.require(
        "the amount due must equal the total",
        out.amount_due == out.total,
    )?;
    req.require("nothing is paid on a new invoice", out.amount_paid == 0)?;
    req.require(
        "the amount remaining must equal the amount due less the amount paid",
        out.is_balanced(),
    )?;
    req.require(
        "the paid flag must be set exactly when nothing remains to pay",
        out.paid == (out.amount_remaining == 0),
    )?;

    match out.agreement_reference {
        Some(agreement_id) => {
            let referenced = req
                .single(
                    "the referenced agreement must be attached as the only reference state",
                    &tx.references,
                )?
                .state
                .as_agreement()
                .map_err(|e| req.violation(&e.to_string()))?;
            req.require(
                "the reference state must be the agreement the invoice names",
                referenced.linear_id == agreement_id,
            )?;
            req.require(
                "the referenced agreement must be between the invoice parties",
                referenced.between_same_parties(&out.party, &out.counterparty),
            )?;
        }
        None => req.require(
            "no reference states without an agreement reference",
            tx.references.is_empty(),
        )?,
    }

    req.require(
        "the party and counterparty are required signers",
        tx.requires_all([&out.party.owning_key, &out.counterparty.owning_key]),
    )
}

pub(super) fn pay(tx: &Transition, req: &Requirements, amount: u64) -> Result<(), Violation> {
    require_governed_kind(tx, req)?;
    let input = single_input(tx, req, "one input should be consumed")?
        .as_invoice()
        .map_err(|e| req.violation(&e.to_string()))?;
    req.require("at most one output should be produced", tx.outputs.len() <= 1)?;
    req.require("no reference states are used for a payment", tx.references.is_empty())?;

    req.require("the payment amount must be greater than 0", amount > 0)?;
    req.require(
        "the payment cannot exceed the amount remaining",
        amount <= input.amount_remaining,
    )?;

    if amount == input.amount_remaining {
        req.require(
            "a fully paid invoice produces no output",
            tx.outputs.is_empty(),
        )?;
    } else {
        let out = req
            .present(
                "a partially paid invoice must produce an output",
                tx.outputs.first(),
            )?
            .as_invoice()
            .map_err(|e| req.violation(&e.to_string()))?;
        req.require(
            "the linear id must not change",
            out.linear_id == input.linear_id,
        )?;
        req.require(
            "the amount paid must increase by the payment amount",
            input.amount_paid.checked_add(amount) == Some(out.amount_paid),
        )?;
        req.require(
            "the amount remaining must equal the amount due less the amount paid",
            out.is_balanced(),
        )?;
        req.require(
            "the output paid should be FALSE while an amount remains",
            !out.paid,
        )?;
        req.require(
            "only the payment fields may change",
            input.same_apart_from_payment(out),
        )?;
    }

    req.require(
        "the party and counterparty are required signers",
        tx.requires_all([&input.party.owning_key, &input.counterparty.owning_key]),
    )
}
