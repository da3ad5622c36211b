//! Domain layer for autologic
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure, networking or an async runtime.
//!
//! # Core Concepts
//!
//! ## Reasoning cycle
//!
//! A task is turned into a plan built from named reasoning strategies, executed
//! by a worker model, judged by a critic, and polished until it satisfies the
//! constraints extracted from the task:
//!
//! `ANALYZE → SELECT → ADAPT → STRUCTURE → VERIFY → EXECUTE ⇄ CRITIQUE →
//! SYNTHESIZE → AUDIT → DONE`
//!
//! ## Roles
//!
//! - **Root**: strategic model (analysis, selection, planning, synthesis)
//! - **Worker**: tactical model (execution)
//! - **Audit**: evaluator model (critique and constraint audit)
//!
//! ## Resilience policy
//!
//! [`ResilienceProfile`] and [`classify_failure`] describe *what* to do when an
//! upstream fails; the machinery that does it lives in the application layer.

pub mod analysis;
pub mod audit;
pub mod core;
pub mod critic;
pub mod cycle;
pub mod parsing;
pub mod plan;
pub mod prompt;
pub mod quality;
pub mod resilience;
pub mod strategy;

// Re-export commonly used types
pub use analysis::TaskAnalysis;
pub use audit::{
    budget::{AuditBudget, MAX_AUDIT_TIMEOUT},
    report::{AuditReport, RequiredChange},
    summary::{AuditOutcome, AuditSummary},
};
pub use core::{
    error::DomainError,
    string::truncate,
    model::{ModelRole, ModelSpec, ProviderKind},
    task::Task,
};
pub use critic::{
    heuristics::{HeuristicGate, MIN_CANDIDATE_LENGTH},
    verdict::{CriticVerdict, VerdictStatus},
};
pub use cycle::{Stage, StageStatus};
pub use parsing::clean_json_response;
pub use plan::{
    entities::{Complexity, Plan, PlanStep},
    parser::{parse_plan, parse_plan_json},
    verification::PlanVerification,
};
pub use prompt::ReasoningPromptTemplate;
pub use quality::{
    confusion::{ConfusionDetector, KeywordConfusionDetector},
    deficiency::mentions_plan_deficiency,
};
pub use resilience::{
    classification::{FailureClass, classify_failure},
    profile::{MIN_RATE_LIMIT, ResilienceKey, ResilienceProfile, clamp_rate},
};
pub use strategy::{
    catalog::{DEFAULT_STRATEGY_IDS, ReasoningCatalog},
    entities::{ContextualizedStrategy, ReasoningStrategy},
    parsing::{parse_adaptation, parse_selection},
};
