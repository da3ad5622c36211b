//! Strategy entities

use serde::{Deserialize, Serialize};

/// A named, reusable reasoning heuristic from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningStrategy {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub category: String,
}

impl ReasoningStrategy {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category: category.into(),
        }
    }
}

/// A strategy narrowed to one task during the adapt phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextualizedStrategy {
    pub id: String,
    pub name: String,
    pub adapted_description: String,
    #[serde(default)]
    pub actions: Vec<String>,
}

impl ContextualizedStrategy {
    pub fn new(
        base: &ReasoningStrategy,
        adapted_description: impl Into<String>,
        actions: Vec<String>,
    ) -> Self {
        Self {
            id: base.id.clone(),
            name: base.name.clone(),
            adapted_description: adapted_description.into(),
            actions,
        }
    }

    /// Keep the generic description with no task-specific actions
    pub fn unadapted(base: &ReasoningStrategy) -> Self {
        Self::new(base, base.description.clone(), Vec::new())
    }
}
