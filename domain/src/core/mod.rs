//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ProviderKind`] / [`model::ModelRole`]: who serves a call and for what
//! - [`task::Task`]: a validated natural-language task
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod string;
pub mod task;
