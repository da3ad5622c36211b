//! Task value object

use serde::{Deserialize, Serialize};

/// A natural-language task to reason about (Value Object)
///
/// Always non-empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Task {
    content: String,
}

impl Task {
    /// Try to create a new task, returning None if it is blank
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self { content })
        }
    }

    /// Get the task content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Short single-line preview for log lines
    pub fn preview(&self) -> String {
        super::string::truncate(&self.content.replace('\n', " "), 100)
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<&str> for Task {
    type Error = crate::DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Task::try_new(s).ok_or(crate::DomainError::EmptyTask)
    }
}
