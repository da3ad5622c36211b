//! Heuristic gate run before the judge model

use super::verdict::CriticVerdict;

/// Candidates shorter than this (trimmed, in characters) are rejected outright
pub const MIN_CANDIDATE_LENGTH: usize = 50;

const SHORT_SCORE: f64 = 0.2;
const FABRICATION_SCORE: f64 = 0.1;

/// Hallmarks of invented APIs, lowercase
const FABRICATED_TERMS: [&str; 3] = ["google.physics", "import antigravity", "setgravity("];

/// Task framings under which the fabricated terms are legitimate
const FICTION_FRAMINGS: [&str; 3] = ["easter egg", "google gravity", "game"];

/// Cheap rule-based rejection
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicGate;

impl HeuristicGate {
    /// Returns a rejection verdict, or `None` to defer to the judge
    pub fn check(&self, task: &str, candidate: &str) -> Option<CriticVerdict> {
        let task_lower = task.to_lowercase();
        let candidate_lower = candidate.to_lowercase();

        if !FICTION_FRAMINGS.iter().any(|f| task_lower.contains(f))
            && let Some(term) = FABRICATED_TERMS.iter().find(|t| candidate_lower.contains(*t))
        {
            return Some(CriticVerdict::reject(
                FABRICATION_SCORE,
                format!("Heuristic: suspicious term '{term}' suggests a fabricated API"),
                "Do not invent code, imports or APIs. Check whether the request is about a \
                 simulation or a known easter egg.",
            ));
        }

        if candidate.trim().chars().count() < MIN_CANDIDATE_LENGTH {
            return Some(CriticVerdict::reject(
                SHORT_SCORE,
                "Answer too short or empty",
                "The answer is insufficient. Develop the content to address every step of \
                 the plan.",
            ));
        }

        None
    }
}
