//! Audit wall-clock budget

use std::time::Duration;

use crate::plan::entities::{Complexity, Plan};

const PER_STEP: Duration = Duration::from_secs(5);
const CAP_FACTOR: u32 = 4;
/// Upper bound on any scaled timeout, so deadlines stay representable
pub const MAX_AUDIT_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Limits for the audit loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditBudget {
    pub base_timeout: Duration,
    pub max_iterations: u32,
}

impl Default for AuditBudget {
    fn default() -> Self {
        Self {
            base_timeout: Duration::from_secs(30),
            max_iterations: 3,
        }
    }
}

impl AuditBudget {
    pub fn new(base_timeout: Duration, max_iterations: u32) -> Self {
        Self {
            base_timeout,
            max_iterations,
        }
    }

    /// Scaled timeout: `base × complexity + 5s per step`, capped at `4 × base`
    /// and at [`MAX_AUDIT_TIMEOUT`]
    pub fn timeout_for(&self, plan: &Plan) -> Duration {
        let base = self.base_timeout.min(MAX_AUDIT_TIMEOUT);
        let factor = match plan.complexity() {
            Complexity::Low | Complexity::Unknown => 1.0,
            Complexity::Medium => 1.5,
            Complexity::High => 2.0,
        };
        let steps = u32::try_from(plan.len()).unwrap_or(u32::MAX);
        let scaled = base
            .mul_f64(factor)
            .saturating_add(PER_STEP.saturating_mul(steps));
        scaled
            .min(base.saturating_mul(CAP_FACTOR))
            .min(MAX_AUDIT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::entities::PlanStep;

    fn plan(steps: usize, complexity: Complexity) -> Plan {
        Plan::new(
            (0..steps)
                .map(|i| PlanStep::new(format!("s{i}"), "S", "act", ""))
                .collect(),
            complexity,
        )
    }

    #[test]
    fn test_scales_with_complexity_and_steps() {
        let budget = AuditBudget::new(Duration::from_secs(30), 3);
        assert_eq!(budget.timeout_for(&plan(2, Complexity::Low)), Duration::from_secs(40));
        assert_eq!(budget.timeout_for(&plan(2, Complexity::Medium)), Duration::from_secs(55));
        assert_eq!(budget.timeout_for(&plan(0, Complexity::Unknown)), Duration::from_secs(30));
    }

    #[test]
    fn test_capped_at_four_times_base() {
        let budget = AuditBudget::new(Duration::from_secs(10), 3);
        assert_eq!(budget.timeout_for(&plan(20, Complexity::High)), Duration::from_secs(40));
    }

    #[test]
    fn test_huge_base_timeout_is_bounded() {
        let budget = AuditBudget::new(Duration::from_secs(u64::MAX), 3);
        assert_eq!(budget.timeout_for(&plan(3, Complexity::High)), MAX_AUDIT_TIMEOUT);
        assert_eq!(budget.timeout_for(&plan(0, Complexity::Low)), MAX_AUDIT_TIMEOUT);
    }
}
