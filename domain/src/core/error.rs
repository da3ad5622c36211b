//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Task cannot be empty")]
    EmptyTask,

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Unknown model role: {0}")]
    UnknownRole(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_display() {
        let error = DomainError::UnknownProvider("bedrock".to_string());
        assert_eq!(error.to_string(), "Unknown provider: bedrock");
    }

    #[test]
    fn test_is_cancelled_check() {
        assert!(DomainError::Cancelled.is_cancelled());
        assert!(!DomainError::EmptyTask.is_cancelled());
    }
}
