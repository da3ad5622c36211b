//! EXECUTE ⇄ CRITIQUE loop with double backtracking.
//!
//! A rejected candidate is blamed either on the execution (retry with the
//! same plan plus feedback) or on the plan (regenerate the plan from the
//! feedback, then retry). Both paths share one attempt budget.

use super::{Cycle, RunCycleError};
use crate::ports::model_client::InvokeOptions;
use autologic_domain::{
    ContextualizedStrategy, CriticVerdict, Plan, ReasoningPromptTemplate, Stage, StageStatus,
    mentions_plan_deficiency,
};
use tracing::{info, warn};

/// What the loop settled on
pub(super) struct ExecutionOutcome {
    pub plan: Plan,
    pub candidate: String,
    pub verdict: CriticVerdict,
    pub attempts: u32,
    pub restructures: u32,
}

impl Cycle<'_> {
    pub(super) async fn execute_and_critique(
        &self,
        initial_plan: Plan,
        adapted: &[ContextualizedStrategy],
    ) -> Result<ExecutionOutcome, RunCycleError> {
        let max_attempts = self.params.execution_attempts();
        let threshold = self.params.acceptance_threshold;
        let worker = self.models.worker.as_ref();
        let judge = self.critic.judge_name();
        let plain = InvokeOptions::default();

        let mut plan = initial_plan;
        let mut feedback: Vec<String> = Vec::new();
        let mut restructures = 0;
        let mut attempts = 0;

        loop {
            self.checkpoint()?;
            attempts += 1;
            info!("Phase 6: Execute (attempt {}/{})", attempts, max_attempts);
            self.emit(
                Stage::Execute,
                StageStatus::Active,
                format!("Attempt {attempts}/{max_attempts}"),
                Some(worker.model_name()),
            );

            let prompt = ReasoningPromptTemplate::execution(&plan, self.task.content(), &feedback);
            let candidate = match self
                .call_and_parse(Stage::Execute, worker, &prompt, &plain, |r| {
                    (!r.trim().is_empty()).then(|| r.to_string())
                })
                .await
            {
                Some(candidate) => {
                    let model = Some(worker.model_name());
                    self.emit(Stage::Execute, StageStatus::Completed, "Candidate produced", model);
                    candidate
                }
                None => {
                    warn!("Execution produced no candidate");
                    let model = Some(worker.model_name());
                    self.emit(Stage::Execute, StageStatus::Error, "No candidate produced", model);
                    String::new()
                }
            };

            self.checkpoint()?;
            info!("Phase 7: Critique");
            self.emit(Stage::Critique, StageStatus::Active, "Evaluating candidate", Some(judge));
            let verdict = self.critic.evaluate(self.task.content(), &plan, &candidate).await;
            info!(
                score = verdict.score,
                status = %verdict.status,
                "Critic verdict: {}",
                verdict.reason
            );
            self.emit(
                Stage::Critique,
                StageStatus::Completed,
                format!("Score {:.2} ({})", verdict.score, verdict.status),
                Some(judge),
            );

            if verdict.is_accepted(threshold) {
                return Ok(ExecutionOutcome {
                    plan,
                    candidate,
                    verdict,
                    attempts,
                    restructures,
                });
            }

            if attempts >= max_attempts {
                warn!(
                    "Retry budget exhausted, continuing with last candidate (score {:.2})",
                    verdict.score
                );
                return Ok(ExecutionOutcome {
                    plan,
                    candidate,
                    verdict,
                    attempts,
                    restructures,
                });
            }

            // Feedback is an instruction for the next attempt and routinely
            // names the plan, so only the diagnosis decides the blame
            let blames_plan = verdict.plan_issue || mentions_plan_deficiency(&verdict.reason);
            feedback.push(feedback_line(&verdict));

            if blames_plan {
                info!("Critic blames the plan, restructuring");
                let new_plan = self.structure(adapted, Some(&feedback.join("\n"))).await?;
                if new_plan.is_empty() {
                    warn!("Restructure produced no plan, keeping the current one");
                } else {
                    restructures += 1;
                    plan = new_plan;
                }
            }
        }
    }
}

fn feedback_line(verdict: &CriticVerdict) -> String {
    match (verdict.reason.trim(), verdict.feedback.trim()) {
        (reason, "") => reason.to_string(),
        (reason, feedback) if reason == feedback || reason.is_empty() => feedback.to_string(),
        (reason, feedback) => format!("{reason}: {feedback}"),
    }
}

/// Mark a final answer whose candidate never reached the acceptance threshold
pub(super) fn annotate_with_score(
    output: String,
    verdict: &CriticVerdict,
    threshold: f64,
    attempts: u32,
) -> String {
    format!(
        "{}\n\n---\n_Critic score {:.2} is below the {:.2} acceptance threshold \
         after {} attempt(s)._",
        output.trim_end(),
        verdict.score,
        threshold,
        attempts
    )
}
