//! Plan-deficiency signal in critic feedback.
//!
//! Decides whether a rejection is blamed on the plan (replan) or on the
//! execution (retry with the same plan).

/// Whole words pointing at the plan
const PLAN_WORDS: [&str; 7] = [
    "plan",
    "plans",
    "planning",
    "restructure",
    "reorder",
    "étape",
    "étapes",
];

/// Phrases pointing at the plan, lowercase
const PLAN_PHRASES: [&str; 6] = [
    "missing step",
    "wrong approach",
    "wrong strategy",
    "approach is flawed",
    "strategy is flawed",
    "steps are out of order",
];

/// Whether the text attributes a failure to the plan
pub fn mentions_plan_deficiency(text: &str) -> bool {
    let lower = text.to_lowercase();
    if PLAN_PHRASES.iter().any(|p| lower.contains(p)) {
        return true;
    }
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| PLAN_WORDS.contains(&word))
}
