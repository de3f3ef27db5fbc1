//! # Agreement State
//!
//! ```text
//! REQUEST ──▶ (review: REQUEST) ──▶ INEFFECT ──▶ RENEWED     (terminal)
//!                                      ├──────▶ TERMINATED  (terminal)
//!                                      ├──────▶ EXPIRED     (terminal)
//!                                      └──────▶ AMENDED     (terminal)
//! ```
//!
//! A terminal agreement is never re-opened. Continuing a relationship
//! means creating a new agreement with a fresh linear id.
//!
//! The remaining statuses (`APPROVAL_REQUIRED`, `APPROVED`, `IN_REVIEW`,
//! `DELEGATED`, `ACTIVATED`, `REJECTED`, `SUPERSEDED`) are part of the
//! vocabulary so records written by other tooling deserialize, but no
//! command produces them.

use std::str::FromStr;

use pactum_core::LinearId;
use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::party::Party;

// ─── Agreement Status ───────────────────────────────────────────────

/// Lifecycle status of an agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgreementStatus {
    Request,
    ApprovalRequired,
    Approved,
    InReview,
    Delegated,
    Activated,
    Ineffect,
    Rejected,
    Renewed,
    Terminated,
    Amended,
    Superseded,
    Expired,
}

impl AgreementStatus {
    pub const ALL: [AgreementStatus; 13] = [
        Self::Request,
        Self::ApprovalRequired,
        Self::Approved,
        Self::InReview,
        Self::Delegated,
        Self::Activated,
        Self::Ineffect,
        Self::Rejected,
        Self::Renewed,
        Self::Terminated,
        Self::Amended,
        Self::Superseded,
        Self::Expired,
    ];

    /// The only status a new agreement may carry.
    pub fn is_initial(&self) -> bool {
        matches!(self, Self::Request)
    }

    /// Renew, terminate, expire and amend are legal only from here.
    pub fn is_in_effect(&self) -> bool {
        matches!(self, Self::Ineffect)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Renewed
                | Self::Terminated
                | Self::Amended
                | Self::Expired
                | Self::Rejected
                | Self::Superseded
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "REQUEST",
            Self::ApprovalRequired => "APPROVAL_REQUIRED",
            Self::Approved => "APPROVED",
            Self::InReview => "IN_REVIEW",
            Self::Delegated => "DELEGATED",
            Self::Activated => "ACTIVATED",
            Self::Ineffect => "INEFFECT",
            Self::Rejected => "REJECTED",
            Self::Renewed => "RENEWED",
            Self::Terminated => "TERMINATED",
            Self::Amended => "AMENDED",
            Self::Superseded => "SUPERSEDED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl std::fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgreementStatus {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| StateError::UnknownStatus(s.to_string()))
    }
}

// ─── Agreement Type ─────────────────────────────────────────────────

/// Kind of legal agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AgreementType {
    /// Non-disclosure agreement.
    Nda,
    /// Master services agreement.
    Msa,
    /// Service level agreement.
    Sla,
    /// Statement of work.
    Sow,
}

impl std::fmt::Display for AgreementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Nda => "NDA",
            Self::Msa => "MSA",
            Self::Sla => "SLA",
            Self::Sow => "SOW",
        };
        f.write_str(s)
    }
}

impl FromStr for AgreementType {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NDA" => Ok(Self::Nda),
            "MSA" => Ok(Self::Msa),
            "SLA" => Ok(Self::Sla),
            "SOW" => Ok(Self::Sow),
            _ => Err(StateError::UnknownType(s.to_string())),
        }
    }
}

// ─── Agreement ──────────────────────────────────────────────────────

/// One version of an agreement between two parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    /// Stable business key.
    pub agreement_number: String,
    pub agreement_name: String,
    /// Fingerprint of the backing document.
    pub agreement_hash: String,
    pub status: AgreementStatus,
    pub agreement_type: AgreementType,
    pub total_value: u64,
    pub party: Party,
    pub counterparty: Party,
    pub start_date: String,
    pub end_date: String,
    pub linear_id: LinearId,
}

impl Agreement {
    pub fn participants(&self) -> [&Party; 2] {
        [&self.party, &self.counterparty]
    }

    /// A copy of this version with only the status replaced.
    pub fn with_status(&self, status: AgreementStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Whether `other` equals `self` once both statuses are normalized.
    pub fn same_apart_from_status(&self, other: &Agreement) -> bool {
        self.with_status(AgreementStatus::Request) == other.with_status(AgreementStatus::Request)
    }

    /// Whether the two agreements are between the same pair of parties,
    /// in either orientation.
    pub fn between_same_parties(&self, a: &Party, b: &Party) -> bool {
        (self.party == *a && self.counterparty == *b)
            || (self.party == *b && self.counterparty == *a)
    }
}

impl std::fmt::Display for Agreement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Agreement {} ({}): {} with {} for {} is {}",
            self.agreement_number,
            self.linear_id,
            self.party.organisation(),
            self.counterparty.organisation(),
            self.total_value,
            self.status
        )
    }
}
