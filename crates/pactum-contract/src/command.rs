//! The declared intent of a transition.

use pactum_state::{AgreementStatus, StateKind};
use serde::{Deserialize, Serialize};

/// What a transition means to do. Each variant carries only its own
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    CreateAgreement,
    ReviewAgreement,
    ActivateAgreement,
    RenewAgreement,
    TerminateAgreement,
    ExpireAgreement,
    AmendAgreement,
    CreateInvoice,
    PayInvoice { amount: u64 },
    SendMessage,
    SendAttachment,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateAgreement => "CreateAgreement",
            Self::ReviewAgreement => "ReviewAgreement",
            Self::ActivateAgreement => "ActivateAgreement",
            Self::RenewAgreement => "RenewAgreement",
            Self::TerminateAgreement => "TerminateAgreement",
            Self::ExpireAgreement => "ExpireAgreement",
            Self::AmendAgreement => "AmendAgreement",
            Self::CreateInvoice => "CreateInvoice",
            Self::PayInvoice { .. } => "PayInvoice",
            Self::SendMessage => "SendMessage",
            Self::SendAttachment => "SendAttachment",
        }
    }

    /// Kind of state this command consumes and publishes.
    pub fn governs(&self) -> StateKind {
        match self {
            Self::CreateAgreement
            | Self::ReviewAgreement
            | Self::ActivateAgreement
            | Self::RenewAgreement
            | Self::TerminateAgreement
            | Self::ExpireAgreement
            | Self::AmendAgreement => StateKind::Agreement,
            Self::CreateInvoice | Self::PayInvoice { .. } => StateKind::Invoice,
            Self::SendMessage => StateKind::Message,
            Self::SendAttachment => StateKind::Attachment,
        }
    }

    /// Whether the command creates a new linear object rather than
    /// superseding one.
    pub fn is_creation(&self) -> bool {
        matches!(
            self,
            Self::CreateAgreement | Self::CreateInvoice | Self::SendMessage | Self::SendAttachment
        )
    }

    /// Status an agreement status-change command publishes.
    pub fn output_status(&self) -> Option<AgreementStatus> {
        match self {
            Self::CreateAgreement | Self::ReviewAgreement => Some(AgreementStatus::Request),
            Self::ActivateAgreement => Some(AgreementStatus::Ineffect),
            Self::RenewAgreement => Some(AgreementStatus::Renewed),
            Self::TerminateAgreement => Some(AgreementStatus::Terminated),
            Self::ExpireAgreement => Some(AgreementStatus::Expired),
            Self::AmendAgreement => Some(AgreementStatus::Amended),
            _ => None,
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PayInvoice { amount } => write!(f, "PayInvoice({amount})"),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_tagged_form() {
        let json = serde_json::to_string(&Command::PayInvoice { amount: 40 }).unwrap();
        assert_eq!(json, r#"{"command":"pay_invoice","amount":40}"#);
        let back: Command = serde_json::from_str(r#"{"command":"terminate_agreement"}"#).unwrap();
        assert_eq!(back, Command::TerminateAgreement);
    }

    #[test]
    fn test_governed_kinds() {
        assert_eq!(Command::AmendAgreement.governs(), StateKind::Agreement);
        assert_eq!(Command::PayInvoice { amount: 1 }.governs(), StateKind::Invoice);
        assert_eq!(Command::SendAttachment.governs(), StateKind::Attachment);
    }

    #[test]
    fn test_output_status() {
        assert_eq!(
            Command::ActivateAgreement.output_status(),
            Some(AgreementStatus::Ineffect)
        );
        assert_eq!(Command::CreateInvoice.output_status(), None);
        assert!(Command::CreateInvoice.is_creation());
        assert!(!Command::PayInvoice { amount: 1 }.is_creation());
    }

    #[test]
    fn test_display() {
        assert_eq!(Command::PayInvoice { amount: 7 }.to_string(), "PayInvoice(7)");
        assert_eq!(Command::RenewAgreement.to_string(), "RenewAgreement");
    }
}
