//! Engine parameters: reasoning-cycle loop control.
//!
//! These are application-layer concerns, not domain policy.

use autologic_domain::AuditBudget;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Loop bounds and thresholds for
/// [`ReasoningEngine`](crate::use_cases::run_cycle::ReasoningEngine).
///
/// | Field | Controls |
/// |-------|----------|
/// | `max_retries` | total EXECUTE attempts, restructures included |
/// | `acceptance_threshold` | critic score that ends the execute loop |
/// | `phase_attempts` | call-and-parse attempts per model-calling phase |
/// | `audit_timeout` | base wall-clock budget of the audit loop |
/// | `audit_max_iterations` | audit rounds before forced acceptance |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineParams {
    pub max_retries: u32,
    pub acceptance_threshold: f64,
    pub phase_attempts: u32,
    pub audit_timeout: Duration,
    pub audit_max_iterations: u32,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            max_retries: 3,
            acceptance_threshold: 0.8,
            phase_attempts: 3,
            audit_timeout: Duration::from_secs(30),
            audit_max_iterations: 3,
        }
    }
}

impl EngineParams {
    // ==================== Builder Methods ====================

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_acceptance_threshold(mut self, threshold: f64) -> Self {
        self.acceptance_threshold = threshold;
        self
    }

    pub fn with_phase_attempts(mut self, attempts: u32) -> Self {
        self.phase_attempts = attempts;
        self
    }

    pub fn with_audit_timeout(mut self, timeout: Duration) -> Self {
        self.audit_timeout = timeout;
        self
    }

    pub fn with_audit_max_iterations(mut self, max: u32) -> Self {
        self.audit_max_iterations = max;
        self
    }

    // ==================== Derived Values ====================

    /// EXECUTE attempts, at least one
    pub fn execution_attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Call-and-parse attempts, at least one
    pub fn parse_attempts(&self) -> u32 {
        self.phase_attempts.max(1)
    }

    pub fn audit_budget(&self) -> AuditBudget {
        AuditBudget::new(self.audit_timeout, self.audit_max_iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = EngineParams::default();
        assert_eq!(params.max_retries, 3);
        assert_eq!(params.acceptance_threshold, 0.8);
        assert_eq!(params.audit_budget().base_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_zero_budgets_still_run_once() {
        let params = EngineParams::default()
            .with_max_retries(0)
            .with_phase_attempts(0);
        assert_eq!(params.execution_attempts(), 1);
        assert_eq!(params.parse_attempts(), 1);
    }
}
