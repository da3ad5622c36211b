//! Model client port
//!
//! Defines the uniform contract over heterogeneous model backends. Adapters
//! (hosted gateway, vendor endpoint, local and remote inference servers) live
//! in the infrastructure layer and route every network call through a
//! [`ResilientCaller`](crate::resilience::caller::ResilientCaller).

use async_trait::async_trait;
use autologic_domain::{FailureClass, ProviderKind, ResilienceProfile, classify_failure};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while invoking a model
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The primary call failed and so did its fallback.
    ///
    /// Displays as the original error; the fallback's error is the source.
    #[error("{original}")]
    FallbackFailed {
        original: Box<GatewayError>,
        #[source]
        fallback: Box<GatewayError>,
    },

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        GatewayError::Http {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of the underlying failure, if it came from one
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Http { status, .. } => Some(*status),
            GatewayError::FallbackFailed { original, .. } => original.status(),
            _ => None,
        }
    }

    /// How the resilience layer should react
    pub fn classify(&self) -> FailureClass {
        match self {
            GatewayError::Timeout | GatewayError::ConnectionError(_) => FailureClass::Transient,
            GatewayError::ModelNotAvailable(_) => FailureClass::Unavailable,
            GatewayError::Authentication(_) | GatewayError::Configuration(_) => {
                FailureClass::Terminal
            }
            GatewayError::Http { status, message } => classify_failure(Some(*status), message),
            GatewayError::FallbackFailed { original, .. } => original.classify(),
            other => classify_failure(None, &other.to_string()),
        }
    }

    /// The error as first raised, unwrapping a failed fallback
    pub fn original(&self) -> &GatewayError {
        match self {
            GatewayError::FallbackFailed { original, .. } => original.original(),
            other => other,
        }
    }
}

/// Per-call options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvokeOptions {
    /// Ask the upstream for a JSON object response
    pub json_output: bool,
    /// Replaces the registered profile for this call only
    pub resilience: Option<ResilienceProfile>,
}

impl InvokeOptions {
    /// Options for a structured (JSON) call
    pub fn json() -> Self {
        Self {
            json_output: true,
            resilience: None,
        }
    }

    pub fn with_resilience(mut self, profile: ResilienceProfile) -> Self {
        self.resilience = Some(profile);
        self
    }
}

/// A model behind some transport
///
/// Implementations must contain transport failures: callers see either the
/// text or the error left after retry and fallback are exhausted.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Model identifier sent upstream
    fn model_name(&self) -> &str;

    fn provider(&self) -> ProviderKind;

    /// Send a prompt and return the completion text
    async fn invoke(&self, prompt: &str, options: &InvokeOptions) -> Result<String, GatewayError>;

    /// Models the upstream offers
    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        Ok(vec![self.model_name().to_string()])
    }
}

/// The three role-bound clients a cycle runs with
#[derive(Clone)]
pub struct ModelRoster {
    /// Strategic: analysis, selection, planning, synthesis
    pub root: Arc<dyn ModelClient>,
    /// Tactical: execution
    pub worker: Arc<dyn ModelClient>,
    /// Evaluator: critique and audit
    pub audit: Arc<dyn ModelClient>,
}

impl ModelRoster {
    pub fn new(
        root: Arc<dyn ModelClient>,
        worker: Arc<dyn ModelClient>,
        audit: Arc<dyn ModelClient>,
    ) -> Self {
        Self {
            root,
            worker,
            audit,
        }
    }

    /// One client for every role
    pub fn single(client: Arc<dyn ModelClient>) -> Self {
        Self {
            root: Arc::clone(&client),
            worker: Arc::clone(&client),
            audit: client,
        }
    }
}

impl std::fmt::Debug for ModelRoster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRoster")
            .field("root", &self.root.model_name())
            .field("worker", &self.worker.model_name())
            .field("audit", &self.audit.model_name())
            .finish()
    }
}
