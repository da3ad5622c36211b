//! Cycle stages and their progress statuses

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stage of the reasoning cycle, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Analyze,
    Select,
    Adapt,
    Structure,
    Verify,
    Execute,
    Critique,
    Synthesize,
    Audit,
    Done,
}

impl Stage {
    pub const ALL: [Stage; 10] = [
        Stage::Analyze,
        Stage::Select,
        Stage::Adapt,
        Stage::Structure,
        Stage::Verify,
        Stage::Execute,
        Stage::Critique,
        Stage::Synthesize,
        Stage::Audit,
        Stage::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Analyze => "analyze",
            Stage::Select => "select",
            Stage::Adapt => "adapt",
            Stage::Structure => "structure",
            Stage::Verify => "verify",
            Stage::Execute => "execute",
            Stage::Critique => "critique",
            Stage::Synthesize => "synthesize",
            Stage::Audit => "audit",
            Stage::Done => "done",
        }
    }

    /// Human-readable label for progress displays
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Analyze => "Analyzing task",
            Stage::Select => "Selecting strategies",
            Stage::Adapt => "Adapting strategies",
            Stage::Structure => "Structuring plan",
            Stage::Verify => "Verifying plan",
            Stage::Execute => "Executing plan",
            Stage::Critique => "Critiquing answer",
            Stage::Synthesize => "Synthesizing answer",
            Stage::Audit => "Auditing constraints",
            Stage::Done => "Done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status carried by a progress event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Active,
    Completed,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order_matches_cycle() {
        let mut sorted = Stage::ALL;
        sorted.sort();
        assert_eq!(sorted, Stage::ALL);
        assert!(Stage::Execute < Stage::Critique);
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_string(&Stage::Synthesize).unwrap(), "\"synthesize\"");
        assert_eq!(serde_json::to_string(&StageStatus::Completed).unwrap(), "\"completed\"");
    }
}
