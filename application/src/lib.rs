//! Application layer for autologic
//!
//! This crate contains the reasoning-cycle use case, the resilience layer
//! (rate limiting, retry, fallback), and the ports the infrastructure layer
//! implements. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod resilience;
pub mod use_cases;

// Re-export commonly used types
pub use config::EngineParams;
pub use ports::{
    model_client::{GatewayError, InvokeOptions, ModelClient, ModelRoster},
    progress::{
        ChannelProgressSink, CompositeProgressSink, NoProgress, ProgressEvent, ProgressSink,
    },
};
pub use resilience::{
    caller::ResilientCaller, rate_limiter::RateLimiter, registry::ResilienceRegistry,
};
pub use use_cases::critic::CriticAgent;
pub use use_cases::run_cycle::{
    CycleOptions, CycleReport, CycleResponse, CycleStream, ModelNames, ReasoningEngine,
    RunCycleError,
};
