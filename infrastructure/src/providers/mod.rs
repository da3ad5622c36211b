//! Model provider adapters
//!
//! Every adapter implements [`ModelClient`](autologic_application::ModelClient)
//! and routes its network calls through the
//! [`ResilienceRegistry`](autologic_application::ResilienceRegistry) under a
//! role-scoped key, so root, worker and audit traffic throttle independently
//! even when they share an upstream.
//!
//! | Provider      | Transport                         | Credential        |
//! |---------------|-----------------------------------|-------------------|
//! | `openrouter`  | OpenAI-compatible, hosted gateway | required          |
//! | `openai`      | OpenAI-compatible, vendor         | required          |
//! | `ollama`      | OpenAI-compatible, local server   | soft default      |
//! | `vllm`        | OpenAI-compatible, self-hosted    | soft default      |
//! | `huggingface` | Inference API payload             | required          |

pub mod factory;
pub mod free_models;
pub mod huggingface;
pub mod openai_compat;
pub mod openrouter;
pub mod types;

use std::time::Duration;

pub use factory::{FactoryError, ModelFactory};
pub use free_models::FreeModelCache;
pub use huggingface::HuggingFaceClient;
pub use openai_compat::{ChatTransport, OpenAiCompatClient};
pub use openrouter::OpenRouterClient;

/// Sampling and transport settings for one role
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    /// Per-request network timeout; an expired request is retryable
    pub timeout: Duration,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4096,
            top_p: 1.0,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Build the shared HTTP client for one adapter
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("autologic/", env!("CARGO_PKG_VERSION")))
        .build()
}
