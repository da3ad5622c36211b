//! Plan parsing from model responses.
//!
//! Accepts the plan wrapped as `{"reasoning_plan": {...}}` or bare, with or
//! without markdown fences and reasoning traces. Step numbers may be missing
//! or out of order: steps are ordered by their explicit number when given
//! (input order otherwise) and renumbered `1..=n`.

use serde_json::Value;

use super::entities::{Complexity, Plan, PlanStep};
use crate::parsing::parse_json_object;

/// Parse a plan from model response text.
///
/// Returns `None` if no plan object is found or the plan has no steps.
pub fn parse_plan(response: &str) -> Option<Plan> {
    let json = parse_json_object(response)?;
    parse_plan_json(&json)
}

/// Parse a plan from a JSON value.
///
/// Expected schema:
/// ```json
/// {
///   "reasoning_plan": {
///     "steps": [
///       {
///         "step_number": 1,
///         "strategy_id": "string",
///         "strategy_name": "string",
///         "action": "string",
///         "expected_output": "string"
///       }
///     ],
///     "estimated_complexity": "low|medium|high"
///   }
/// }
/// ```
pub fn parse_plan_json(json: &Value) -> Option<Plan> {
    let root = json.get("reasoning_plan").unwrap_or(json);
    let steps = root.get("steps").and_then(|v| v.as_array())?;

    let mut numbered: Vec<(usize, PlanStep)> = steps
        .iter()
        .enumerate()
        .filter_map(|(i, step_json)| {
            if !step_json.is_object() {
                return None;
            }
            let order = step_json
                .get("step_number")
                .and_then(json_to_index)
                .unwrap_or(i + 1);
            let step = PlanStep::new(
                text_field(step_json, &["strategy_id", "module_id"]),
                text_field(step_json, &["strategy_name", "module_name"]),
                text_field(step_json, &["action", "description"]),
                text_field(step_json, &["expected_output"]),
            );
            Some((order, step))
        })
        .collect();

    if numbered.is_empty() {
        return None;
    }

    // Stable: ties keep input order
    numbered.sort_by_key(|(order, _)| *order);

    let complexity = root
        .get("estimated_complexity")
        .or_else(|| root.get("complexity"))
        .and_then(|v| v.as_str())
        .map(Complexity::from_label)
        .unwrap_or_default();

    Some(Plan::new(
        numbered.into_iter().map(|(_, step)| step).collect(),
        complexity,
    ))
}

fn json_to_index(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text_field(value: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| value.get(*k).and_then(|v| v.as_str()))
        .unwrap_or_default()
        .to_string()
}
