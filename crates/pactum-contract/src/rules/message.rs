//! Message and attachment checklists. Both publish exactly one immutable
//! state and must carry the sender's signature.

use super::require_governed_kind;
use crate::error::Violation;
use crate::requirements::Requirements;
use crate::transition::Transition;

pub(super) fn send_message(tx: &Transition, req: &Requirements) -> Result<(), Violation> {
    require_governed_kind(tx, req)?;
    req.require("no inputs should be consumed when sending a message", tx.inputs.is_empty())?;
    req.require("no reference states are used when sending a message", tx.references.is_empty())?;
    let msg = req
        .single("only one output state should be created", &tx.outputs)?
        .as_message()
        .map_err(|e| req.violation(&e.to_string()))?;
    req.require(
        "the sender and the recipient cannot be the same identity",
        msg.from != msg.to,
    )?;
    req.require(
        "the message is signed by the claimed sender",
        tx.is_required_signer(&msg.from.owning_key),
    )
}

pub(super) fn send_attachment(tx: &Transition, req: &Requirements) -> Result<(), Violation> {
    require_governed_kind(tx, req)?;
    req.require("no inputs should be consumed when sending a file", tx.inputs.is_empty())?;
    req.require("no reference states are used when sending a file", tx.references.is_empty())?;
    let file = req
        .single("only one output state should be created", &tx.outputs)?
        .as_attachment()
        .map_err(|e| req.violation(&e.to_string()))?;
    req.require(
        "the sender and the recipient cannot be the same identity",
        file.from != file.to,
    )?;
    req.require("the file handle must not be empty", !file.attachment.trim().is_empty())?;
    req.require(
        "the file is signed by the claimed sender",
        tx.is_required_signer(&file.from.owning_key),
    )
}
