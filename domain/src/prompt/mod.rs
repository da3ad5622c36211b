//! Prompt domain
//!
//! Templates for every model-calling stage of the reasoning cycle.

mod template;

pub use template::ReasoningPromptTemplate;
