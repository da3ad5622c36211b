//! Task analysis produced by the ANALYZE phase.
//!
//! Advisory only: an unusable analysis degrades to [`TaskAnalysis::default`],
//! which carries no constraints and therefore skips the audit.

use serde::{Deserialize, Serialize};

use crate::parsing::parse_json;

/// What the task is asking for and under which constraints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskAnalysis {
    pub intent: String,
    pub constraints: Vec<String>,
    pub domain: String,
    pub priority: String,
}

impl TaskAnalysis {
    /// Parse an ANALYZE response; blank constraints are dropped
    pub fn parse(response: &str) -> Option<Self> {
        let mut analysis: TaskAnalysis = parse_json(response)?;
        analysis.constraints.retain(|c| !c.trim().is_empty());
        Some(analysis)
    }

    pub fn has_constraints(&self) -> bool {
        !self.constraints.is_empty()
    }

    /// Bullet list for prompts, or a placeholder when empty
    pub fn constraints_block(&self) -> String {
        if self.constraints.is_empty() {
            return "(no explicit constraints)".to_string();
        }
        self.constraints
            .iter()
            .map(|c| format!("- {c}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_analysis() {
        let response = r#"{"intent": "write a haiku", "constraints": ["17 syllables", " "],
                           "domain": "poetry", "priority": "form"}"#;
        let analysis = TaskAnalysis::parse(response).unwrap();
        assert_eq!(analysis.intent, "write a haiku");
        assert_eq!(analysis.constraints, vec!["17 syllables"]);
        assert!(analysis.has_constraints());
    }

    #[test]
    fn test_parse_partial_analysis_defaults() {
        let analysis = TaskAnalysis::parse(r#"{"intent": "x"}"#).unwrap();
        assert!(!analysis.has_constraints());
        assert_eq!(analysis.domain, "");
    }

    #[test]
    fn test_parse_failure() {
        assert!(TaskAnalysis::parse("the task is about poetry").is_none());
    }

    #[test]
    fn test_constraints_block() {
        assert_eq!(TaskAnalysis::default().constraints_block(), "(no explicit constraints)");
        let analysis = TaskAnalysis {
            constraints: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        assert_eq!(analysis.constraints_block(), "- a\n- b");
    }
}
