//! SYNTHESIZE and AUDIT: polish the accepted candidate, then check it
//! against the extracted constraints under a wall-clock budget.

use super::{Cycle, RunCycleError};
use crate::ports::model_client::InvokeOptions;
use autologic_domain::{
    AuditOutcome, AuditReport, AuditSummary, Plan, ReasoningPromptTemplate, Stage, StageStatus,
    TaskAnalysis,
};
use tokio::time::{Instant, timeout};
use tracing::{debug, info, warn};

impl Cycle<'_> {
    /// Phase 8: rewrite the candidate as the final answer.
    ///
    /// Never degrades its input: failures and confused output fall back to
    /// the candidate unchanged.
    pub(super) async fn synthesize(
        &self,
        analysis: &TaskAnalysis,
        candidate: &str,
    ) -> Result<String, RunCycleError> {
        self.checkpoint()?;
        info!("Phase 8: Synthesize");
        let root = self.models.root.as_ref();
        self.emit(
            Stage::Synthesize,
            StageStatus::Active,
            "Synthesizing answer",
            Some(root.model_name()),
        );

        let prompt = ReasoningPromptTemplate::synthesis(self.task.content(), analysis, candidate);
        let (output, message) = match root.invoke(&prompt, &InvokeOptions::default()).await {
            Ok(text) if !self.confusion.is_confused(&text) => (text, "Answer synthesized"),
            Ok(_) => {
                warn!("Synthesis output looks confused, keeping the candidate");
                (candidate.to_string(), "Kept candidate")
            }
            Err(e) => {
                warn!("Synthesis failed, keeping the candidate: {}", e);
                (candidate.to_string(), "Kept candidate")
            }
        };

        self.emit(Stage::Synthesize, StageStatus::Completed, message, Some(root.model_name()));
        Ok(output)
    }

    /// Phase 9: constraint audit loop.
    ///
    /// Each round checks, in order: budget expired, rounds exhausted, output
    /// accepted, only minor changes requested. Otherwise it asks for a
    /// targeted refinement. Expiry of the budget always returns the current
    /// output; it never fails the cycle.
    pub(super) async fn audit(
        &self,
        analysis: &TaskAnalysis,
        plan: &Plan,
        output: String,
    ) -> Result<(String, AuditSummary), RunCycleError> {
        self.checkpoint()?;
        if !analysis.has_constraints() {
            debug!("No constraints extracted, skipping audit");
            return Ok((output, AuditSummary::skipped()));
        }

        let budget = self.params.audit_budget();
        // Bounded by MAX_AUDIT_TIMEOUT, so the deadline cannot overflow
        let limit = budget.timeout_for(plan);
        let deadline = Instant::now() + limit;
        info!("Phase 9: Audit (budget {:?}, {} rounds)", limit, budget.max_iterations);

        let auditor = self.models.audit.as_ref();
        let root = self.models.root.as_ref();
        self.emit(
            Stage::Audit,
            StageStatus::Active,
            "Auditing constraints",
            Some(auditor.model_name()),
        );

        let json = InvokeOptions::json();
        let plain = InvokeOptions::default();

        let mut current = output;
        let mut iterations = 0;
        let mut last_score = None;

        let outcome = loop {
            self.checkpoint()?;
            let now = Instant::now();
            if now >= deadline {
                break AuditOutcome::TimedOut;
            }
            if iterations >= budget.max_iterations {
                break AuditOutcome::MaxIterations;
            }
            iterations += 1;

            let prompt = ReasoningPromptTemplate::audit(self.task.content(), analysis, &current);
            let report = self.call_and_parse(
                Stage::Audit,
                auditor,
                &prompt,
                &json,
                AuditReport::parse,
            );
            let report = match timeout(deadline - now, report).await {
                Err(_) => break AuditOutcome::TimedOut,
                Ok(None) => {
                    warn!("Audit round {} produced no usable report", iterations);
                    continue;
                }
                Ok(Some(report)) => report,
            };

            debug!(score = report.score, change = ?report.required_change, "Audit report");
            last_score = Some(report.score);
            if report.is_accepted() {
                break AuditOutcome::Accepted;
            }
            if report.required_change.is_diminishing() {
                break AuditOutcome::DiminishingReturns;
            }

            self.emit(
                Stage::Audit,
                StageStatus::Active,
                format!("Refining (round {iterations}, score {:.0})", report.score),
                Some(root.model_name()),
            );
            let prompt = ReasoningPromptTemplate::refinement(
                self.task.content(),
                analysis,
                &current,
                &report.instructions,
            );
            let remaining = deadline.saturating_duration_since(Instant::now());
            match timeout(remaining, root.invoke(&prompt, &plain)).await {
                Err(_) => break AuditOutcome::TimedOut,
                Ok(Ok(refined)) if !self.confusion.is_confused(&refined) => current = refined,
                Ok(Ok(_)) => warn!("Refinement looks confused, keeping the previous version"),
                Ok(Err(e)) => warn!("Refinement failed, keeping the previous version: {}", e),
            }
        };

        match outcome {
            AuditOutcome::TimedOut => {
                warn!("Audit budget of {:?} exhausted, returning current output", limit)
            }
            AuditOutcome::MaxIterations => {
                warn!("Audit rounds exhausted, returning current output")
            }
            _ => info!("Audit finished: {:?}", outcome),
        }
        self.emit(
            Stage::Audit,
            StageStatus::Completed,
            format!("{outcome:?} after {iterations} round(s)"),
            Some(auditor.model_name()),
        );

        Ok((
            current,
            AuditSummary {
                outcome,
                iterations,
                last_score,
            },
        ))
    }
}
