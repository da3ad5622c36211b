//! Cleanup of structured model output before JSON parsing.
//!
//! Models wrap JSON in reasoning traces, markdown fences and prose. These
//! helpers are pure text manipulation; callers still own the parse.

use serde::de::DeserializeOwned;

/// Strip `<think>` blocks and markdown fences, then cut to the outermost
/// `{...}` object if one exists.
pub fn clean_json_response(response: &str) -> String {
    let without_think = strip_think_blocks(response);
    let without_fences = without_think
        .replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "");
    let trimmed = without_fences.trim();

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => trimmed[start..=end].to_string(),
        _ => trimmed.to_string(),
    }
}

/// Clean and deserialize in one step
pub fn parse_json<T: DeserializeOwned>(response: &str) -> Option<T> {
    serde_json::from_str(&clean_json_response(response)).ok()
}

/// Clean and parse into a generic JSON value, objects only
pub fn parse_json_object(response: &str) -> Option<serde_json::Value> {
    parse_json::<serde_json::Value>(response).filter(|v| v.is_object())
}

fn strip_think_blocks(text: &str) -> String {
    const OPEN: &str = "<think>";
    const CLOSE: &str = "</think>";

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        match rest[start..].find(CLOSE) {
            Some(end) => rest = &rest[start + end + CLOSE.len()..],
            // Unterminated trace: nothing after it is usable
            None => return out,
        }
    }
    out.push_str(rest);
    out
}
