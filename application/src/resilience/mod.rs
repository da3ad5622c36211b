//! Resilience layer: per-key throttling, retry with backoff, and fallback.
//!
//! [`ResilienceRegistry`](registry::ResilienceRegistry) is the process-scoped
//! store of limiters and profiles; it is passed to model clients explicitly.

pub mod caller;
pub mod rate_limiter;
pub mod registry;
