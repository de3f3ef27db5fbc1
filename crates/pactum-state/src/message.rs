//! Chat messages and file attachments exchanged between two parties.
//! Both are written once and never superseded.

use pactum_core::{LinearId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::party::Party;

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: LinearId,
    pub body: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub from: Party,
    pub to: Party,
    pub sent_receipt: bool,
    pub delivered_receipt: bool,
    pub from_me: bool,
    pub time: Timestamp,
    /// Sender-side sequence number.
    pub message_number: u64,
}

impl Message {
    pub fn participants(&self) -> [&Party; 2] {
        [&self.from, &self.to]
    }
}

/// A file sent between parties. The file itself lives outside the ledger;
/// `attachment` is its content hash or storage handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub attachment_id: LinearId,
    pub attachment: String,
    pub from: Party,
    pub to: Party,
    pub sent_receipt: bool,
    pub delivered_receipt: bool,
    pub from_me: bool,
    pub time: Timestamp,
}

impl Attachment {
    pub fn participants(&self) -> [&Party; 2] {
        [&self.from, &self.to]
    }
}
