//! How the audit loop ended

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// No constraints were extracted
    Skipped,
    /// Sufficiency score or flag reached
    Accepted,
    /// Only minor or no changes requested
    DiminishingReturns,
    MaxIterations,
    /// Wall-clock budget ran out; output returned as-is
    TimedOut,
}

/// Audit marker attached to the cycle report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub outcome: AuditOutcome,
    pub iterations: u32,
    pub last_score: Option<f64>,
}

impl AuditSummary {
    pub fn skipped() -> Self {
        Self {
            outcome: AuditOutcome::Skipped,
            iterations: 0,
            last_score: None,
        }
    }

    /// The returned output was not confirmed sufficient
    pub fn is_degraded(&self) -> bool {
        matches!(
            self.outcome,
            AuditOutcome::TimedOut | AuditOutcome::MaxIterations
        )
    }
}
