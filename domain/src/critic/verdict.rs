//! Critic verdicts

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parsing::parse_json_object;

/// Outcome class of an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerdictStatus {
    Valid,
    Reject,
    /// The judge could not be reached or understood
    Error,
}

impl VerdictStatus {
    /// Lenient parse; anything unrecognised is a rejection
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "VALID" | "ACCEPT" | "ACCEPTED" => VerdictStatus::Valid,
            "ERROR" => VerdictStatus::Error,
            _ => VerdictStatus::Reject,
        }
    }
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VerdictStatus::Valid => "VALID",
            VerdictStatus::Reject => "REJECT",
            VerdictStatus::Error => "ERROR",
        })
    }
}

/// One evaluation of a candidate answer. Produced fresh every time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticVerdict {
    /// Quality in `[0, 1]`
    pub score: f64,
    pub status: VerdictStatus,
    pub reason: String,
    pub feedback: String,
    /// The judge attributes the failure to the plan rather than the execution
    #[serde(default)]
    pub plan_issue: bool,
}

impl CriticVerdict {
    pub fn reject(score: f64, reason: impl Into<String>, feedback: impl Into<String>) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
            status: VerdictStatus::Reject,
            reason: reason.into(),
            feedback: feedback.into(),
            plan_issue: false,
        }
    }

    /// Fail-closed verdict for an unreachable or unparseable judge
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            status: VerdictStatus::Error,
            reason: reason.into(),
            feedback: "The evaluation failed. Check the answer format and try again.".to_string(),
            plan_issue: false,
        }
    }

    pub fn is_accepted(&self, threshold: f64) -> bool {
        self.score >= threshold
    }

    /// Parse a judge response.
    ///
    /// `score` (or `score_h2`) is clamped to `[0, 1]`; a missing status is a
    /// rejection; a missing reason falls back to the feedback. Returns `None`
    /// when no JSON object or no numeric score is present.
    pub fn parse(response: &str) -> Option<Self> {
        let json = parse_json_object(response)?;
        let score = json
            .get("score")
            .or_else(|| json.get("score_h2"))
            .and_then(number_like)?;
        let status = json
            .get("status")
            .and_then(|v| v.as_str())
            .map(VerdictStatus::from_label)
            .unwrap_or(VerdictStatus::Reject);
        let feedback = json
            .get("feedback")
            .and_then(|v| v.as_str())
            .unwrap_or("Redo the answer, addressing every part of the task.")
            .to_string();
        let reason = json
            .get("reason")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| feedback.clone());
        let plan_issue = json
            .get("plan_issue")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        Some(Self {
            score: score.clamp(0.0, 1.0),
            status,
            reason,
            feedback,
            plan_issue,
        })
    }
}

fn number_like(value: &serde_json::Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .filter(|n: &f64| n.is_finite())
}
