//! Input, output and error types of the reasoning cycle

use crate::ports::model_client::ModelRoster;
use crate::ports::progress::ProgressEvent;
use autologic_domain::{AuditSummary, Plan, TaskAnalysis};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Errors that end a cycle without a result.
///
/// Everything else degrades to an annotated result instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunCycleError {
    #[error("Failed to select reasoning strategies")]
    NoStrategies,

    #[error("Failed to structure a reasoning plan")]
    EmptyPlan,

    #[error("Cycle cancelled")]
    Cancelled,
}

/// Per-cycle overrides
#[derive(Debug, Clone, Default)]
pub struct CycleOptions {
    /// Replaces the engine's models for this cycle only
    pub models: Option<ModelRoster>,
    pub max_retries: Option<u32>,
    pub audit_timeout: Option<Duration>,
    pub cancellation: Option<CancellationToken>,
}

impl CycleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_models(mut self, models: ModelRoster) -> Self {
        self.models = Some(models);
        self
    }

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = Some(max);
        self
    }

    pub fn with_audit_timeout(mut self, timeout: Duration) -> Self {
        self.audit_timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Models that served each role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelNames {
    pub root: String,
    pub worker: String,
    pub audit: String,
}

impl From<&ModelRoster> for ModelNames {
    fn from(roster: &ModelRoster) -> Self {
        Self {
            root: roster.root.model_name().to_string(),
            worker: roster.worker.model_name().to_string(),
            audit: roster.audit.model_name().to_string(),
        }
    }
}

/// Result of a completed cycle
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub task: String,
    /// The plan the final candidate was produced with
    pub plan: Plan,
    pub final_output: String,
    /// Last critic score, in `[0, 1]`
    pub critic_score: f64,
    /// EXECUTE attempts made
    pub attempts: u32,
    /// Times the plan was regenerated from critic feedback
    pub restructures: u32,
    pub analysis: TaskAnalysis,
    /// Ids of the strategies the plan was built from
    pub strategies: Vec<String>,
    pub audit: AuditSummary,
    pub models: ModelNames,
}

/// Wire envelope: the report, or `{"error": "..."}`
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CycleResponse {
    Success(Box<CycleReport>),
    Failure { error: String },
}

impl From<Result<CycleReport, RunCycleError>> for CycleResponse {
    fn from(result: Result<CycleReport, RunCycleError>) -> Self {
        match result {
            Ok(report) => CycleResponse::Success(Box::new(report)),
            Err(e) => CycleResponse::Failure {
                error: e.to_string(),
            },
        }
    }
}

/// A cycle running on its own task
pub struct CycleStream {
    /// Stage transitions, closed when the cycle ends
    pub events: mpsc::UnboundedReceiver<ProgressEvent>,
    pub handle: JoinHandle<Result<CycleReport, RunCycleError>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_envelope() {
        let response = CycleResponse::from(Err(RunCycleError::EmptyPlan));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": "Failed to structure a reasoning plan"})
        );
    }
}
