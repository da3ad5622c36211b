//! Reasoning strategies: the static catalog and its per-task adaptations.

pub mod catalog;
pub mod entities;
pub mod parsing;
