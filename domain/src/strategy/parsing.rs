//! Parsing of SELECT and ADAPT responses

use serde::Deserialize;

use super::entities::{ContextualizedStrategy, ReasoningStrategy};
use crate::parsing::parse_json;

#[derive(Deserialize)]
struct SelectionResponse {
    #[serde(alias = "selected_modules", alias = "selected")]
    selected_strategies: Vec<String>,
}

#[derive(Deserialize)]
struct AdaptationResponse {
    #[serde(alias = "adapted_modules")]
    adapted_strategies: Vec<AdaptedItem>,
}

#[derive(Deserialize)]
struct AdaptedItem {
    id: String,
    adapted_description: String,
    #[serde(default, alias = "specific_actions")]
    actions: Vec<String>,
}

/// Extract the selected strategy ids.
///
/// `None` means the response was not usable; an empty list is a valid answer.
pub fn parse_selection(response: &str) -> Option<Vec<String>> {
    parse_json::<SelectionResponse>(response).map(|r| r.selected_strategies)
}

/// Extract task-specific rewrites for the selected strategies.
///
/// The result follows the selection order. Selected strategies the response
/// skips keep their generic description; items naming strategies that were
/// not selected are ignored. Returns `None` if the response is malformed or
/// adapts none of the selection.
pub fn parse_adaptation(
    response: &str,
    selected: &[ReasoningStrategy],
) -> Option<Vec<ContextualizedStrategy>> {
    let parsed = parse_json::<AdaptationResponse>(response)?;
    let mut matched = 0;
    let adapted: Vec<ContextualizedStrategy> = selected
        .iter()
        .map(|base| {
            match parsed.adapted_strategies.iter().find(|item| item.id == base.id) {
                Some(item) => {
                    matched += 1;
                    ContextualizedStrategy::new(
                        base,
                        item.adapted_description.clone(),
                        item.actions.clone(),
                    )
                }
                None => ContextualizedStrategy::unadapted(base),
            }
        })
        .collect();

    if matched == 0 { None } else { Some(adapted) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected() -> Vec<ReasoningStrategy> {
        vec![
            ReasoningStrategy::new("simplify", "Simplify", "Make it simpler", "decomposition"),
            ReasoningStrategy::new("critical_thinking", "Critique", "Question it", "analysis"),
        ]
    }

    #[test]
    fn test_parse_selection_accepts_legacy_key() {
        let ids = parse_selection(r#"{"selected_modules": ["a", "b"], "reasoning": "x"}"#).unwrap();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_selection_rejects_garbage() {
        assert!(parse_selection("I think you should simplify").is_none());
        assert!(parse_selection(r#"{"reasoning": "no ids"}"#).is_none());
    }

    #[test]
    fn test_parse_adaptation_follows_selection() {
        let response = r#"```json
        {"adapted_strategies": [
            {"id": "unknown", "adapted_description": "ignored"},
            {"id": "simplify", "adapted_description": "Isolate the x² term", "actions": ["factor"]}
        ]}
        ```"#;
        let adapted = parse_adaptation(response, &selected()).unwrap();
        assert_eq!(adapted.len(), 2);
        assert_eq!(adapted[0].name, "Simplify");
        assert_eq!(adapted[0].actions, vec!["factor"]);
        // Skipped by the model: generic description, no actions
        assert_eq!(adapted[1].adapted_description, "Question it");
        assert!(adapted[1].actions.is_empty());
    }

    #[test]
    fn test_parse_adaptation_none_when_nothing_matches() {
        let response = r#"{"adapted_modules": [{"id": "zzz", "adapted_description": "d"}]}"#;
        assert!(parse_adaptation(response, &selected()).is_none());
    }
}
