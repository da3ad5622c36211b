//! Resilience policy: per-key throttling/retry profiles and failure classification.

pub mod classification;
pub mod profile;
