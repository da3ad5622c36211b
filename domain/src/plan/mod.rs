//! Reasoning plans: ordered strategy-derived steps and their parsing.

pub mod entities;
pub mod parser;
pub mod verification;
