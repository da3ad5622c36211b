//! Critic agent: heuristic gate plus model judge.
//!
//! The judge gets a bounded number of attempts per evaluation. Fails closed:
//! if it still cannot be reached or understood the verdict is score 0 /
//! `ERROR`, never a silent pass.

use crate::ports::model_client::{InvokeOptions, ModelClient};
use autologic_domain::{CriticVerdict, HeuristicGate, Plan, ReasoningPromptTemplate};
use std::sync::Arc;
use tracing::{debug, error, warn};

const DEFAULT_JUDGE_ATTEMPTS: u32 = 3;

pub struct CriticAgent {
    judge: Arc<dyn ModelClient>,
    gate: HeuristicGate,
    attempts: u32,
}

impl CriticAgent {
    pub fn new(judge: Arc<dyn ModelClient>) -> Self {
        Self {
            judge,
            gate: HeuristicGate,
            attempts: DEFAULT_JUDGE_ATTEMPTS,
        }
    }

    /// Judge calls per evaluation, at least one
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn judge_name(&self) -> &str {
        self.judge.model_name()
    }

    /// Score a candidate answer against the task and plan
    pub async fn evaluate(&self, task: &str, plan: &Plan, candidate: &str) -> CriticVerdict {
        if let Some(verdict) = self.gate.check(task, candidate) {
            warn!("Heuristic reject: {}", verdict.reason);
            return verdict;
        }

        let prompt =
            ReasoningPromptTemplate::critic_evaluation(task, &plan.to_prompt_json(), candidate);
        let options = InvokeOptions::json();
        let attempts = self.attempts;
        let mut failure = String::new();
        for attempt in 1..=attempts {
            match self.judge.invoke(&prompt, &options).await {
                Ok(response) => match CriticVerdict::parse(&response) {
                    Some(verdict) => {
                        debug!(score = verdict.score, status = %verdict.status, "Judge verdict");
                        return verdict;
                    }
                    None => {
                        warn!(attempt, attempts, "Judge response could not be parsed");
                        failure = "Judge response could not be parsed".to_string();
                    }
                },
                Err(e) => {
                    warn!(attempt, attempts, error = %e, "Judge call failed");
                    failure = format!("Judge call failed: {e}");
                }
            }
        }

        error!("No usable judge verdict after {} attempt(s): {}", attempts, failure);
        CriticVerdict::error(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{Reply, ScriptedClient, text};
    use autologic_domain::{Complexity, PlanStep, VerdictStatus};

    const JUDGE: &str = "### ANSWER EVALUATION";
    const ANSWER: &str = "The moon's gravity pulls the oceans, producing two tidal bulges daily.";

    fn plan() -> Plan {
        Plan::new(vec![PlanStep::new("explain", "Explain", "Explain tides", "")], Complexity::Low)
    }

    #[tokio::test]
    async fn test_short_answer_never_reaches_judge() {
        let judge = Arc::new(ScriptedClient::new("judge").on(JUDGE, [text(r#"{"score": 1.0}"#)]));
        let critic = CriticAgent::new(judge.clone());

        let verdict = critic.evaluate("Explain tides", &plan(), "Moon.").await;

        assert_eq!(verdict.score, 0.2);
        assert_eq!(verdict.status, VerdictStatus::Reject);
        assert_eq!(judge.calls_matching(JUDGE), 0);
    }

    #[tokio::test]
    async fn test_judge_verdict_is_returned() {
        let judge = Arc::new(ScriptedClient::new("judge").on(
            JUDGE,
            [text(r#"{"score": 0.9, "status": "VALID", "reason": "ok", "feedback": ""}"#)],
        ));
        let critic = CriticAgent::new(judge.clone());

        let verdict = critic.evaluate("Explain tides", &plan(), ANSWER).await;

        assert_eq!(verdict.score, 0.9);
        assert_eq!(verdict.status, VerdictStatus::Valid);
        assert_eq!(judge.calls_matching(JUDGE), 1);
    }

    #[tokio::test]
    async fn test_judge_failure_fails_closed() {
        let judge =
            Arc::new(ScriptedClient::new("judge").on(JUDGE, [Reply::Fail(500, "down".into())]));
        let critic = CriticAgent::new(judge);

        let verdict = critic.evaluate("Explain tides", &plan(), ANSWER).await;

        assert_eq!(verdict.score, 0.0);
        assert_eq!(verdict.status, VerdictStatus::Error);
    }

    #[tokio::test]
    async fn test_unparseable_judge_fails_closed() {
        let judge = Arc::new(ScriptedClient::new("judge").on(JUDGE, [text("Looks great!")]));
        let critic = CriticAgent::new(judge);

        let verdict = critic.evaluate("Explain tides", &plan(), ANSWER).await;

        assert_eq!(verdict.status, VerdictStatus::Error);
        assert!(!verdict.is_accepted(0.8));
    }

    #[tokio::test]
    async fn test_malformed_judge_reply_is_retried() {
        let judge = Arc::new(ScriptedClient::new("judge").on(
            JUDGE,
            [
                text("Looks great!"),
                text(r#"{"score": 0.9, "status": "VALID", "reason": "ok", "feedback": ""}"#),
            ],
        ));
        let critic = CriticAgent::new(judge.clone());

        let verdict = critic.evaluate("Explain tides", &plan(), ANSWER).await;

        assert_eq!(verdict.status, VerdictStatus::Valid);
        assert_eq!(verdict.score, 0.9);
        assert_eq!(judge.calls_matching(JUDGE), 2);
    }

    #[tokio::test]
    async fn test_judge_attempts_are_bounded() {
        let judge = Arc::new(ScriptedClient::new("judge").on(JUDGE, [text("Looks great!")]));
        let critic = CriticAgent::new(judge.clone()).with_attempts(2);

        let verdict = critic.evaluate("Explain tides", &plan(), ANSWER).await;

        assert_eq!(verdict.status, VerdictStatus::Error);
        assert_eq!(judge.calls_matching(JUDGE), 2);
    }
}
