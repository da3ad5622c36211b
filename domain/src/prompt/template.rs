//! Prompt templates for the reasoning cycle.
//!
//! Every template opens with a `### <STAGE>` heading so transcripts (and test
//! doubles) can tell the stages apart.

use crate::analysis::TaskAnalysis;
use crate::plan::entities::Plan;
use crate::strategy::entities::{ContextualizedStrategy, ReasoningStrategy};

/// Templates for generating prompts at each stage
pub struct ReasoningPromptTemplate;

impl ReasoningPromptTemplate {
    /// ANALYZE: intent, constraints, domain, priority
    pub fn analysis(task: &str) -> String {
        format!(
            r#"### TASK ANALYSIS
You are an expert requirements analyst.

TASK:
{task}

Identify what is really being asked. List only constraints that are explicit
or unambiguously implied (length, format, audience, language, mandatory
elements). Do not invent constraints.

RETURN STRICT JSON (no markdown):
{{
  "intent": "one sentence describing the goal",
  "constraints": ["constraint 1", "constraint 2"],
  "domain": "field of knowledge",
  "priority": "what matters most in the answer"
}}"#
        )
    }

    /// SELECT: pick a subset of the catalog
    pub fn selection(catalog_json: &str, task: &str) -> String {
        format!(
            r#"### STRATEGY SELECTION
You are an expert in metacognition and reasoning strategies.

LIBRARY OF REASONING STRATEGIES:
{catalog_json}

TASK:
{task}

Select ONLY the strategies that are relevant and necessary to solve this task.
- Relevance: does the strategy add real value?
- Complementarity: do the selected strategies combine well?
- Parsimony: avoid over-engineering (at most 7 strategies)

RETURN STRICT JSON (no markdown):
{{
  "selected_strategies": ["id1", "id2", "id3"],
  "reasoning": "short justification"
}}"#
        )
    }

    /// ADAPT: rewrite generic strategies for this task
    pub fn adaptation(selected: &[ReasoningStrategy], task: &str) -> String {
        let selected_json =
            serde_json::to_string_pretty(selected).unwrap_or_else(|_| "[]".to_string());
        format!(
            r#"### STRATEGY ADAPTATION
You are an expert in adapting cognitive strategies.

TASK:
{task}

SELECTED STRATEGIES (currently generic):
{selected_json}

Rewrite each strategy so it is SPECIFIC to this task, then list 2-3 concrete
actions for it.

Example:
- Generic: "Simplify the problem"
- Adapted for "Solve a quadratic equation": "Isolate the x² term first, then
  factor or use the discriminant"

RETURN STRICT JSON:
{{
  "adapted_strategies": [
    {{
      "id": "strategy id",
      "adapted_description": "task-specific description",
      "actions": ["concrete action 1", "concrete action 2"]
    }}
  ]
}}"#
        )
    }

    /// STRUCTURE: assemble an ordered plan; `feedback` turns it into a restructure
    pub fn structure(
        adapted: &[ContextualizedStrategy],
        task: &str,
        feedback: Option<&str>,
    ) -> String {
        let adapted_json =
            serde_json::to_string_pretty(adapted).unwrap_or_else(|_| "[]".to_string());
        let mut prompt = format!(
            r#"### PLAN STRUCTURE
You are an expert in strategic planning and task ordering.

TASK:
{task}

ADAPTED STRATEGIES:
{adapted_json}

Assemble these strategies into a coherent, ordered, executable REASONING PLAN.
Each step must be actionable, respect dependencies, and name its expected
output. Start with foundations (simplification, framing), progress to deep
analysis, finish with validation and synthesis.
"#
        );

        if let Some(feedback) = feedback {
            prompt.push_str(&format!(
                r#"
A PREVIOUS PLAN FAILED REVIEW. Fix the plan itself, do not just reword it.
REVIEWER FEEDBACK:
{feedback}
"#
            ));
        }

        prompt.push_str(
            r#"
RETURN STRICT JSON:
{
  "reasoning_plan": {
    "steps": [
      {
        "step_number": 1,
        "strategy_id": "simplify",
        "strategy_name": "Simplification",
        "action": "precise, actionable description of the step",
        "expected_output": "kind of result expected"
      }
    ],
    "estimated_complexity": "low|medium|high"
  }
}"#,
        );
        prompt
    }

    /// VERIFY: sanity-check a plan
    pub fn verification(plan: &Plan, task: &str) -> String {
        format!(
            r#"### PLAN VERIFICATION
You are a meticulous plan reviewer.

TASK:
{task}

PLAN:
{plan}

Check that the plan covers the task, that steps are in a sensible order, and
that no step is impossible.

RETURN STRICT JSON:
{{
  "is_valid": true,
  "issues": ["issue 1"]
}}"#,
            plan = plan.to_prompt_json()
        )
    }

    /// EXECUTE: follow the plan, with feedback from earlier attempts
    pub fn execution(plan: &Plan, task: &str, feedback: &[String]) -> String {
        let mut prompt = format!(
            r#"### EXECUTION
You are a rigorous execution agent.

TASK:
{task}

REASONING PLAN TO FOLLOW STRICTLY:
{plan}

Execute the plan to produce a complete final answer. For each step:
1. Restate the step
2. Carry out the reasoning or action
3. Give the result

End with a CLEAR FINAL CONCLUSION."#,
            plan = plan.to_prompt_json()
        );

        if !feedback.is_empty() {
            prompt.push_str("\n\nPREVIOUS ATTEMPTS WERE REJECTED. Address this feedback:\n");
            for (i, item) in feedback.iter().enumerate() {
                prompt.push_str(&format!("{}. {}\n", i + 1, item));
            }
        }
        prompt
    }

    /// CRITIQUE: judge a candidate answer
    pub fn critic_evaluation(task: &str, plan_json: &str, candidate: &str) -> String {
        format!(
            r#"### ANSWER EVALUATION
You are a strict evaluator. Judge whether the answer solves the task by
following the plan, is factually sound, and invents nothing.

Examples:
- Answer invents a library function that does not exist
  -> {{"score": 0.1, "status": "REJECT", "reason": "Fabricated API", "feedback": "Use only real APIs", "plan_issue": false}}
- Answer is correct but skips a required part because the plan has no step for it
  -> {{"score": 0.4, "status": "REJECT", "reason": "Plan is missing a step for X", "feedback": "Add a step for X", "plan_issue": true}}
- Answer is complete and correct
  -> {{"score": 0.95, "status": "VALID", "reason": "Complete", "feedback": "", "plan_issue": false}}

TASK:
{task}

PLAN:
{plan_json}

ANSWER:
{candidate}

RETURN STRICT JSON:
{{
  "score": 0.0,
  "status": "VALID|REJECT",
  "reason": "main reason",
  "feedback": "what to change",
  "plan_issue": false
}}"#
        )
    }

    /// SYNTHESIZE: polish into the final answer
    pub fn synthesis(task: &str, analysis: &TaskAnalysis, candidate: &str) -> String {
        format!(
            r#"### SYNTHESIS
You are an expert editor.

TASK:
{task}

CONSTRAINTS TO HONOR:
{constraints}

DRAFT ANSWER:
{candidate}

Rewrite the draft into a polished final answer for the user. Keep every correct
fact, remove the step-by-step scaffolding, and honor all constraints. Output
only the final answer."#,
            constraints = analysis.constraints_block()
        )
    }

    /// AUDIT: score structural sufficiency against constraints
    pub fn audit(task: &str, analysis: &TaskAnalysis, output: &str) -> String {
        format!(
            r#"### CONSTRAINT AUDIT
You audit answers against explicit constraints.

TASK:
{task}

CONSTRAINTS:
{constraints}

ANSWER:
{output}

RETURN STRICT JSON:
{{
  "score": 0,
  "is_sufficient": false,
  "required_change": "NONE|MINOR|MAJOR|CRITICAL",
  "instructions": "targeted changes needed, empty if none"
}}
The score is 0-100."#,
            constraints = analysis.constraints_block()
        )
    }

    /// Targeted refinement requested by the audit
    pub fn refinement(
        task: &str,
        analysis: &TaskAnalysis,
        output: &str,
        instructions: &str,
    ) -> String {
        format!(
            r#"### REFINEMENT
TASK:
{task}

CONSTRAINTS:
{constraints}

CURRENT ANSWER:
{output}

REQUIRED CHANGES:
{instructions}

Apply only the required changes and return the complete revised answer."#,
            constraints = analysis.constraints_block()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::entities::{Complexity, PlanStep};

    #[test]
    fn test_structure_includes_feedback_only_on_restructure() {
        let fresh = ReasoningPromptTemplate::structure(&[], "task", None);
        assert!(fresh.starts_with("### PLAN STRUCTURE"));
        assert!(!fresh.contains("REVIEWER FEEDBACK"));

        let again = ReasoningPromptTemplate::structure(&[], "task", Some("missing step"));
        assert!(again.contains("REVIEWER FEEDBACK:\nmissing step"));
    }

    #[test]
    fn test_execution_lists_feedback() {
        let plan = Plan::new(vec![PlanStep::new("a", "A", "act", "out")], Complexity::Low);
        let prompt = ReasoningPromptTemplate::execution(
            &plan,
            "task",
            &["too short".to_string(), "cite sources".to_string()],
        );
        assert!(prompt.contains("1. too short\n2. cite sources"));
        assert!(prompt.contains("\"strategy_id\": \"a\""));
    }

    #[test]
    fn test_audit_lists_constraints() {
        let analysis = TaskAnalysis {
            constraints: vec!["under 100 words".into()],
            ..Default::default()
        };
        let prompt = ReasoningPromptTemplate::audit("task", &analysis, "answer");
        assert!(prompt.contains("- under 100 words"));
    }
}
