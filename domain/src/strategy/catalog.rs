//! Reasoning catalog.
//!
//! Loaded once and then only read, so it is shared as a plain value behind
//! an `Arc` without any locking.

use serde::Deserialize;

use super::entities::ReasoningStrategy;
use crate::core::error::DomainError;

/// Ids used when selection yields nothing usable
pub const DEFAULT_STRATEGY_IDS: [&str; 3] =
    ["decompose_problem", "critical_thinking", "step_by_step"];

/// Immutable library of reasoning strategies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReasoningCatalog {
    strategies: Vec<ReasoningStrategy>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { modules: Vec<ReasoningStrategy> },
    Bare(Vec<ReasoningStrategy>),
}

impl ReasoningCatalog {
    pub fn new(strategies: Vec<ReasoningStrategy>) -> Self {
        Self { strategies }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a catalog document.
    ///
    /// Accepts either `{"modules": [...]}` or a bare array. Duplicate ids keep
    /// the first occurrence.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let file: CatalogFile =
            serde_json::from_str(json).map_err(|e| DomainError::InvalidCatalog(e.to_string()))?;
        let raw = match file {
            CatalogFile::Wrapped { modules } => modules,
            CatalogFile::Bare(list) => list,
        };

        let mut strategies: Vec<ReasoningStrategy> = Vec::with_capacity(raw.len());
        for strategy in raw {
            if strategy.id.trim().is_empty() {
                return Err(DomainError::InvalidCatalog(format!(
                    "strategy '{}' has an empty id",
                    strategy.name
                )));
            }
            if !strategies.iter().any(|s| s.id == strategy.id) {
                strategies.push(strategy);
            }
        }
        Ok(Self { strategies })
    }

    pub fn strategies(&self) -> &[ReasoningStrategy] {
        &self.strategies
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ReasoningStrategy> {
        self.strategies.iter().find(|s| s.id == id)
    }

    /// Resolve ids against the catalog, in the order given, dropping unknown
    /// and repeated ids.
    pub fn select(&self, ids: &[String]) -> Vec<ReasoningStrategy> {
        let mut selected: Vec<ReasoningStrategy> = Vec::new();
        for id in ids {
            if let Some(strategy) = self.get(id.trim())
                && !selected.iter().any(|s| s.id == strategy.id)
            {
                selected.push(strategy.clone());
            }
        }
        selected
    }

    /// The fixed fallback subset. Never empty.
    ///
    /// Catalog definitions win; ids the catalog lacks use built-in definitions.
    pub fn default_selection(&self) -> Vec<ReasoningStrategy> {
        DEFAULT_STRATEGY_IDS
            .iter()
            .map(|id| {
                self.get(id)
                    .cloned()
                    .unwrap_or_else(|| builtin_default(id))
            })
            .collect()
    }

    /// Compact JSON listing used in the selection prompt
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(&self.strategies).unwrap_or_else(|_| "[]".to_string())
    }
}

fn builtin_default(id: &str) -> ReasoningStrategy {
    match id {
        "decompose_problem" => ReasoningStrategy::new(
            id,
            "Decompose the problem",
            "How can I break down this problem into smaller, more manageable parts?",
            "decomposition",
        ),
        "critical_thinking" => ReasoningStrategy::new(
            id,
            "Critical thinking",
            "Analyze the problem from different perspectives, question assumptions, and evaluate \
             the evidence available.",
            "analysis",
        ),
        _ => ReasoningStrategy::new(
            id,
            "Step by step",
            "Let's think step by step and make a plan with clear notation and explanation.",
            "planning",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"modules": [
        {"id": "simplify", "name": "Simplify", "description": "Make it simpler", "category": "decomposition"},
        {"id": "critical_thinking", "name": "Critique", "description": "Custom critique", "category": "analysis"},
        {"id": "simplify", "name": "Dup", "description": "dup", "category": "x"}
    ]}"#;

    #[test]
    fn test_wrapped_document() {
        let catalog = ReasoningCatalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("simplify").unwrap().name, "Simplify");
    }

    #[test]
    fn test_bare_array_document() {
        let catalog =
            ReasoningCatalog::from_json(r#"[{"id": "a", "name": "A", "description": "d"}]"#)
                .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("a").unwrap().category, "");
    }

    #[test]
    fn test_invalid_document() {
        assert!(ReasoningCatalog::from_json("{\"modules\": 3}").is_err());
        assert!(
            ReasoningCatalog::from_json(r#"[{"id": " ", "name": "A", "description": "d"}]"#)
                .is_err()
        );
    }

    #[test]
    fn test_select_preserves_order_and_drops_unknown() {
        let catalog = ReasoningCatalog::from_json(SAMPLE).unwrap();
        let ids = vec![
            "critical_thinking".to_string(),
            "nope".to_string(),
            "simplify".to_string(),
            "critical_thinking".to_string(),
        ];
        let selected: Vec<_> = catalog.select(&ids).into_iter().map(|s| s.id).collect();
        assert_eq!(selected, vec!["critical_thinking", "simplify"]);
    }

    #[test]
    fn test_default_selection_prefers_catalog() {
        let catalog = ReasoningCatalog::from_json(SAMPLE).unwrap();
        let defaults = catalog.default_selection();
        assert_eq!(defaults.len(), 3);
        assert_eq!(defaults[1].description, "Custom critique");
        assert_eq!(defaults[0].id, "decompose_problem");
    }

    #[test]
    fn test_default_selection_on_empty_catalog() {
        let defaults = ReasoningCatalog::empty().default_selection();
        let ids: Vec<_> = defaults.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, DEFAULT_STRATEGY_IDS);
    }
}
