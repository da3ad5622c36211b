//! Run Cycle use case
//!
//! Orchestrates the phased reasoning cycle:
//!
//! ```text
//! ANALYZE → SELECT → ADAPT → STRUCTURE → VERIFY → EXECUTE ⇄ CRITIQUE
//!         → SYNTHESIZE → AUDIT → DONE
//! ```
//!
//! Phases run strictly in order within one cycle. Every model-calling phase
//! has a small call-and-parse budget and a non-failing fallback; only an
//! empty selection or an empty plan ends the cycle with an error.

mod execution;
mod phases;
mod synthesis;
mod types;

pub use types::{CycleOptions, CycleReport, CycleResponse, CycleStream, ModelNames, RunCycleError};

use crate::config::EngineParams;
use crate::ports::model_client::ModelRoster;
use crate::ports::progress::{ChannelProgressSink, NoProgress, ProgressEvent, ProgressSink};
use crate::use_cases::critic::CriticAgent;
use execution::annotate_with_score;
use autologic_domain::{
    ConfusionDetector, KeywordConfusionDetector, ReasoningCatalog, Stage, StageStatus, Task,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Use case for running reasoning cycles
///
/// Holds only immutable state, so one engine can run many cycles
/// concurrently; the resilience registry behind the model clients is the
/// only state they share.
pub struct ReasoningEngine {
    models: ModelRoster,
    catalog: Arc<ReasoningCatalog>,
    confusion: Arc<dyn ConfusionDetector>,
    params: EngineParams,
}

impl ReasoningEngine {
    pub fn new(models: ModelRoster, catalog: Arc<ReasoningCatalog>, params: EngineParams) -> Self {
        info!(
            strategies = catalog.len(),
            root = models.root.model_name(),
            worker = models.worker.model_name(),
            audit = models.audit.model_name(),
            "Reasoning engine ready"
        );
        Self {
            models,
            catalog,
            confusion: Arc::new(KeywordConfusionDetector::default()),
            params,
        }
    }

    /// Replace the keyword heuristic guarding synthesis and refinement
    pub fn with_confusion_detector(mut self, detector: Arc<dyn ConfusionDetector>) -> Self {
        self.confusion = detector;
        self
    }

    pub fn catalog(&self) -> &ReasoningCatalog {
        &self.catalog
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Run a cycle with default (no-op) progress
    pub async fn run_cycle(
        &self,
        task: &Task,
        options: &CycleOptions,
    ) -> Result<CycleReport, RunCycleError> {
        self.run_cycle_with_progress(task, options, &NoProgress).await
    }

    /// Run a cycle, reporting every stage transition to `progress`
    pub async fn run_cycle_with_progress(
        &self,
        task: &Task,
        options: &CycleOptions,
        progress: &dyn ProgressSink,
    ) -> Result<CycleReport, RunCycleError> {
        let models = options.models.as_ref().unwrap_or(&self.models);
        let mut params = self.params.clone();
        if let Some(max) = options.max_retries {
            params.max_retries = max;
        }
        if let Some(timeout) = options.audit_timeout {
            params.audit_timeout = timeout;
        }

        let cycle = Cycle {
            task,
            models,
            catalog: &self.catalog,
            critic: CriticAgent::new(Arc::clone(&models.audit))
                .with_attempts(params.parse_attempts()),
            confusion: self.confusion.as_ref(),
            params,
            progress,
            cancellation: options.cancellation.as_ref(),
        };

        let result = cycle.run().await;
        if let Err(e) = &result {
            warn!("Cycle ended without a result: {}", e);
        }
        result
    }

    /// Run a cycle on its own task, streaming progress events
    pub fn run_cycle_streamed(self: &Arc<Self>, task: Task, options: CycleOptions) -> CycleStream {
        let (sink, events) = ChannelProgressSink::channel();
        let engine = Arc::clone(self);
        let handle = tokio::spawn(async move {
            engine
                .run_cycle_with_progress(&task, &options, &sink)
                .await
        });
        CycleStream { events, handle }
    }
}

/// State of one running cycle
pub(super) struct Cycle<'a> {
    task: &'a Task,
    models: &'a ModelRoster,
    catalog: &'a ReasoningCatalog,
    critic: CriticAgent,
    confusion: &'a dyn ConfusionDetector,
    params: EngineParams,
    progress: &'a dyn ProgressSink,
    cancellation: Option<&'a CancellationToken>,
}

impl Cycle<'_> {
    async fn run(&self) -> Result<CycleReport, RunCycleError> {
        info!("Starting reasoning cycle: {}", self.task.preview());

        let analysis = self.analyze().await?;

        let selected = self.select().await?;
        if selected.is_empty() {
            self.emit(Stage::Select, StageStatus::Error, "No strategies selected", None);
            return Err(RunCycleError::NoStrategies);
        }

        let adapted = self.adapt(&selected).await?;

        let plan = self.structure(&adapted, None).await?;
        if plan.is_empty() {
            self.emit(Stage::Structure, StageStatus::Error, "No plan could be built", None);
            return Err(RunCycleError::EmptyPlan);
        }

        self.verify(&plan).await?;

        let execution = self.execute_and_critique(plan, &adapted).await?;

        let synthesized = self.synthesize(&analysis, &execution.candidate).await?;

        let (mut final_output, audit) = self
            .audit(&analysis, &execution.plan, synthesized)
            .await?;

        let threshold = self.params.acceptance_threshold;
        if !execution.verdict.is_accepted(threshold) {
            final_output = annotate_with_score(
                final_output,
                &execution.verdict,
                threshold,
                execution.attempts,
            );
        }

        self.emit(Stage::Done, StageStatus::Completed, "Cycle complete", None);
        info!(
            attempts = execution.attempts,
            restructures = execution.restructures,
            score = execution.verdict.score,
            "Reasoning cycle complete"
        );

        Ok(CycleReport {
            task: self.task.content().to_string(),
            strategies: adapted.iter().map(|s| s.id.clone()).collect(),
            plan: execution.plan,
            final_output,
            critic_score: execution.verdict.score,
            attempts: execution.attempts,
            restructures: execution.restructures,
            analysis,
            audit,
            models: ModelNames::from(self.models),
        })
    }

    fn emit(
        &self,
        stage: Stage,
        status: StageStatus,
        message: impl Into<String>,
        model: Option<&str>,
    ) {
        let mut event = ProgressEvent::new(stage, status, message);
        if let Some(model) = model {
            event = event.with_model(model);
        }
        self.progress.emit(event);
    }

    /// Phase boundary: stop if the caller cancelled
    fn checkpoint(&self) -> Result<(), RunCycleError> {
        match self.cancellation {
            Some(token) if token.is_cancelled() => {
                info!("Cycle cancelled");
                Err(RunCycleError::Cancelled)
            }
            _ => Ok(()),
        }
    }
}
