//! Planning phases: ANALYZE, SELECT, ADAPT, STRUCTURE, VERIFY

use super::{Cycle, RunCycleError};
use crate::ports::model_client::{InvokeOptions, ModelClient};
use autologic_domain::{
    ContextualizedStrategy, Plan, PlanVerification, ReasoningPromptTemplate, ReasoningStrategy,
    Stage, StageStatus, TaskAnalysis, parse_adaptation, parse_plan, parse_selection,
};
use tracing::{debug, info, warn};

impl Cycle<'_> {
    /// Call a model and parse its answer, retrying both within the phase's
    /// budget. `None` once the budget is spent.
    pub(super) async fn call_and_parse<T>(
        &self,
        stage: Stage,
        client: &dyn ModelClient,
        prompt: &str,
        options: &InvokeOptions,
        parse: impl Fn(&str) -> Option<T> + Send + Sync,
    ) -> Option<T> {
        let attempts = self.params.parse_attempts();
        for attempt in 1..=attempts {
            match client.invoke(prompt, options).await {
                Ok(response) => match parse(&response) {
                    Some(value) => return Some(value),
                    None => warn!(%stage, attempt, attempts, "Unusable model response"),
                },
                Err(e) => warn!(%stage, attempt, attempts, error = %e, "Model call failed"),
            }
        }
        None
    }

    /// Phase 1: extract intent and constraints (advisory)
    pub(super) async fn analyze(&self) -> Result<TaskAnalysis, RunCycleError> {
        self.checkpoint()?;
        info!("Phase 1: Analyze");
        let root = self.models.root.as_ref();
        self.emit(Stage::Analyze, StageStatus::Active, "Analyzing task", Some(root.model_name()));

        let prompt = ReasoningPromptTemplate::analysis(self.task.content());
        let json = InvokeOptions::json();
        let analysis = match self
            .call_and_parse(Stage::Analyze, root, &prompt, &json, TaskAnalysis::parse)
            .await
        {
            Some(analysis) => analysis,
            None => {
                warn!("Analysis unavailable, continuing without constraints");
                TaskAnalysis::default()
            }
        };

        debug!(
            constraints = analysis.constraints.len(),
            intent = %analysis.intent,
            "Task analyzed"
        );
        self.emit(
            Stage::Analyze,
            StageStatus::Completed,
            format!("{} constraint(s) found", analysis.constraints.len()),
            Some(root.model_name()),
        );
        Ok(analysis)
    }

    /// Phase 2: pick strategies from the catalog
    pub(super) async fn select(&self) -> Result<Vec<ReasoningStrategy>, RunCycleError> {
        self.checkpoint()?;
        info!("Phase 2: Select");
        let root = self.models.root.as_ref();
        let model = Some(root.model_name());
        self.emit(Stage::Select, StageStatus::Active, "Selecting strategies", model);

        let selected = if self.catalog.is_empty() {
            warn!("Reasoning catalog is empty, using default strategies");
            self.catalog.default_selection()
        } else {
            let catalog_json = self.catalog.to_prompt_json();
            let prompt = ReasoningPromptTemplate::selection(&catalog_json, self.task.content());
            let catalog = self.catalog;
            let json = InvokeOptions::json();
            let parsed = self
                .call_and_parse(Stage::Select, root, &prompt, &json, |response| {
                    let ids = parse_selection(response)?;
                    let selected = catalog.select(&ids);
                    if selected.is_empty() { None } else { Some(selected) }
                })
                .await;
            match parsed {
                Some(selected) => selected,
                None => {
                    warn!("Selection failed, using default strategies");
                    self.catalog.default_selection()
                }
            }
        };

        let ids: Vec<&str> = selected.iter().map(|s| s.id.as_str()).collect();
        info!("Selected {} strategies: {:?}", selected.len(), ids);
        self.emit(
            Stage::Select,
            StageStatus::Completed,
            format!("Selected: {}", ids.join(", ")),
            model,
        );
        Ok(selected)
    }

    /// Phase 3: rewrite the selection for this task
    pub(super) async fn adapt(
        &self,
        selected: &[ReasoningStrategy],
    ) -> Result<Vec<ContextualizedStrategy>, RunCycleError> {
        self.checkpoint()?;
        info!("Phase 3: Adapt");
        let root = self.models.root.as_ref();
        let model = Some(root.model_name());
        self.emit(Stage::Adapt, StageStatus::Active, "Adapting strategies", model);

        let prompt = ReasoningPromptTemplate::adaptation(selected, self.task.content());
        let json = InvokeOptions::json();
        let adapted = match self
            .call_and_parse(Stage::Adapt, root, &prompt, &json, |response| {
                parse_adaptation(response, selected)
            })
            .await
        {
            Some(adapted) => adapted,
            None => {
                warn!("Adaptation failed, keeping generic descriptions");
                selected.iter().map(ContextualizedStrategy::unadapted).collect()
            }
        };

        info!("Adapted {} strategies", adapted.len());
        self.emit(
            Stage::Adapt,
            StageStatus::Completed,
            format!("{} strategies adapted", adapted.len()),
            model,
        );
        Ok(adapted)
    }

    /// Phase 4: assemble a plan; with `feedback` this is a restructure.
    /// An empty plan means the phase failed.
    pub(super) async fn structure(
        &self,
        adapted: &[ContextualizedStrategy],
        feedback: Option<&str>,
    ) -> Result<Plan, RunCycleError> {
        self.checkpoint()?;
        let root = self.models.root.as_ref();
        let label = if feedback.is_some() {
            info!("Phase 4: Restructure with feedback");
            "Restructuring plan from critic feedback"
        } else {
            info!("Phase 4: Structure");
            "Structuring plan"
        };
        self.emit(Stage::Structure, StageStatus::Active, label, Some(root.model_name()));

        let prompt = ReasoningPromptTemplate::structure(adapted, self.task.content(), feedback);
        let json = InvokeOptions::json();
        let plan = self
            .call_and_parse(Stage::Structure, root, &prompt, &json, parse_plan)
            .await
            .unwrap_or_else(Plan::empty);

        if plan.is_empty() {
            warn!("Structuring produced no plan");
        } else {
            info!("Plan created with {} steps, complexity: {}", plan.len(), plan.complexity());
            self.emit(
                Stage::Structure,
                StageStatus::Completed,
                format!("{} steps, {} complexity", plan.len(), plan.complexity()),
                Some(root.model_name()),
            );
        }
        Ok(plan)
    }

    /// Phase 5: sanity-check the plan. Findings are logged, never enforced.
    pub(super) async fn verify(&self, plan: &Plan) -> Result<(), RunCycleError> {
        self.checkpoint()?;
        info!("Phase 5: Verify");
        let root = self.models.root.as_ref();
        self.emit(Stage::Verify, StageStatus::Active, "Verifying plan", Some(root.model_name()));

        let prompt = ReasoningPromptTemplate::verification(plan, self.task.content());
        let json = InvokeOptions::json();
        let message = match self
            .call_and_parse(Stage::Verify, root, &prompt, &json, PlanVerification::parse)
            .await
        {
            Some(v) if v.is_valid => "Plan looks sound".to_string(),
            Some(v) => {
                warn!("Plan verification raised issues: {:?}", v.issues);
                format!("{} issue(s) noted", v.issues.len())
            }
            None => {
                warn!("Plan verification unavailable");
                "Verification skipped".to_string()
            }
        };

        self.emit(Stage::Verify, StageStatus::Completed, message, Some(root.model_name()));
        Ok(())
    }
}
