//! Plan entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Estimated complexity of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
    Unknown,
}

impl Complexity {
    /// Lenient parse of a model-provided label; unrecognised labels are `Unknown`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "low" | "simple" => Complexity::Low,
            "medium" | "moderate" => Complexity::Medium,
            "high" | "complex" => Complexity::High,
            _ => Complexity::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
            Complexity::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    /// 1-based position in the plan
    #[serde(rename = "step_number", default)]
    pub index: usize,
    #[serde(rename = "strategy_id", alias = "module_id", default)]
    pub strategy_id: String,
    #[serde(rename = "strategy_name", alias = "module_name", default)]
    pub strategy_name: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub expected_output: String,
}

impl PlanStep {
    pub fn new(
        strategy_id: impl Into<String>,
        strategy_name: impl Into<String>,
        action: impl Into<String>,
        expected_output: impl Into<String>,
    ) -> Self {
        Self {
            index: 0,
            strategy_id: strategy_id.into(),
            strategy_name: strategy_name.into(),
            action: action.into(),
            expected_output: expected_output.into(),
        }
    }
}

/// An ordered plan.
///
/// Steps are always numbered `1..=n` in order. A plan is built whole and
/// replaced whole; there are no in-place step mutators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPlan")]
pub struct Plan {
    steps: Vec<PlanStep>,
    #[serde(rename = "estimated_complexity")]
    complexity: Complexity,
}

#[derive(Deserialize)]
struct RawPlan {
    #[serde(default)]
    steps: Vec<PlanStep>,
    #[serde(default, alias = "complexity")]
    estimated_complexity: Complexity,
}

impl From<RawPlan> for Plan {
    fn from(raw: RawPlan) -> Self {
        Plan::new(raw.steps, raw.estimated_complexity)
    }
}

impl Plan {
    /// Build a plan, renumbering steps contiguously in the given order
    pub fn new(steps: Vec<PlanStep>, complexity: Complexity) -> Self {
        let steps = steps
            .into_iter()
            .enumerate()
            .map(|(i, mut step)| {
                step.index = i + 1;
                step
            })
            .collect();
        Self { steps, complexity }
    }

    /// The plan STRUCTURE falls back to when it cannot produce one
    pub fn empty() -> Self {
        Self {
            steps: Vec::new(),
            complexity: Complexity::Unknown,
        }
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn complexity(&self) -> Complexity {
        self.complexity
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Pretty JSON used inside prompts
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Markdown rendering for human-facing output
    pub fn to_markdown(&self) -> String {
        let mut out = format!(
            "**Complexity:** {} ({} steps)\n\n",
            self.complexity,
            self.steps.len()
        );
        for step in &self.steps {
            out.push_str(&format!(
                "{}. **{}**: {}\n",
                step.index, step.strategy_name, step.action
            ));
            if !step.expected_output.is_empty() {
                out.push_str(&format!("   -> {}\n", step.expected_output));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: &str) -> PlanStep {
        PlanStep::new(id, id.to_uppercase(), format!("do {id}"), "notes")
    }

    #[test]
    fn test_new_numbers_contiguously() {
        let plan = Plan::new(vec![step("a"), step("b"), step("c")], Complexity::Low);
        let indices: Vec<_> = plan.steps().iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_indices_follow_input_order() {
        let json = r#"{
            "steps": [
                {"module_id": "x", "module_name": "X", "action": "first"},
                {"module_id": "y", "module_name": "Y", "action": "second"}
            ],
            "estimated_complexity": "high"
        }"#;
        let plan: Plan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.steps()[0].index, 1);
        assert_eq!(plan.steps()[1].action, "second");
        assert_eq!(plan.steps()[1].index, 2);
        assert_eq!(plan.complexity(), Complexity::High);
    }

    #[test]
    fn test_serde_round_trip_is_idempotent() {
        let plan = Plan::new(vec![step("a"), step("b")], Complexity::Medium);
        let json = serde_json::to_string(&plan).unwrap();
        let back: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
        assert_eq!(serde_json::to_string(&back).unwrap(), json);
    }

    #[test]
    fn test_deserialize_renumbers_gaps() {
        let json = r#"{"steps": [
            {"step_number": 4, "strategy_id": "a", "strategy_name": "A", "action": "x", "expected_output": ""},
            {"step_number": 9, "strategy_id": "b", "strategy_name": "B", "action": "y", "expected_output": ""}
        ], "estimated_complexity": "low"}"#;
        let plan: Plan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.steps()[1].index, 2);
    }

    #[test]
    fn test_complexity_labels() {
        assert_eq!(Complexity::from_label("HIGH"), Complexity::High);
        assert_eq!(Complexity::from_label("moderate"), Complexity::Medium);
        assert_eq!(Complexity::from_label("n/a"), Complexity::Unknown);
    }

    #[test]
    fn test_markdown_lists_steps() {
        let plan = Plan::new(vec![step("a")], Complexity::Low);
        let md = plan.to_markdown();
        assert!(md.contains("1. **A**: do a"));
        assert!(md.contains("-> notes"));
    }
}
