//! Per-transition progress tracking.
//!
//! ```text
//! DRAFTING ─▶ LOCAL_VALIDATED ─▶ PROPOSED ─▶ COUNTERPARTY_VALIDATING
//!          ─▶ COUNTERSIGNED ─▶ FINALIZING ─▶ COMMITTED
//! ```
//!
//! Any validation step may end the transition in `REJECTED` instead.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowStage {
    Drafting,
    LocalValidated,
    Proposed,
    CounterpartyValidating,
    Countersigned,
    Finalizing,
    Committed,
    Rejected,
}

impl FlowStage {
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Committed | Self::Rejected)
    }
}

impl std::fmt::Display for FlowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Drafting => "DRAFTING",
            Self::LocalValidated => "LOCAL_VALIDATED",
            Self::Proposed => "PROPOSED",
            Self::CounterpartyValidating => "COUNTERPARTY_VALIDATING",
            Self::Countersigned => "COUNTERSIGNED",
            Self::Finalizing => "FINALIZING",
            Self::Committed => "COMMITTED",
            Self::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// Ordered record of the stages one transition passed through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlowProgress {
    stages: Vec<FlowStage>,
}

impl FlowProgress {
    pub fn new() -> Self {
        Self {
            stages: vec![FlowStage::Drafting],
        }
    }

    /// Move to `stage`. Stages only move forward; once final, further
    /// calls are ignored.
    pub fn advance(&mut self, stage: FlowStage) {
        match self.current() {
            Some(current) if current.is_final() || stage <= current => {
                tracing::debug!(from = %current, to = %stage, "ignored stage change");
            }
            _ => {
                tracing::debug!(stage = %stage, "flow stage");
                self.stages.push(stage);
            }
        }
    }

    pub fn reject(&mut self, reason: &str) {
        if self.current().map_or(false, |s| s.is_final()) {
            return;
        }
        tracing::debug!(stage = ?self.current(), reason, "flow stage REJECTED");
        self.stages.push(FlowStage::Rejected);
    }

    pub fn current(&self) -> Option<FlowStage> {
        self.stages.last().copied()
    }

    pub fn stages(&self) -> &[FlowStage] {
        &self.stages
    }
}
