//! Console output formatter for cycle results

use crate::output::formatter::OutputFormatter;
use autologic_application::{CycleReport, CycleResponse};
use autologic_domain::{AuditOutcome, AuditSummary, ReasoningCatalog};
use colored::Colorize;

/// Formats cycle results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report
    pub fn format(report: &CycleReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Reasoning Cycle Results"));
        output.push('\n');

        output.push_str(&format!("{} {}\n\n", "Task:".cyan().bold(), report.task));

        output.push_str(&format!(
            "{} root={} worker={} audit={}\n",
            "Models:".cyan().bold(),
            report.models.root,
            report.models.worker,
            report.models.audit
        ));

        // Analysis
        output.push_str(&Self::section_header("Analysis"));
        let analysis = &report.analysis;
        if !analysis.intent.is_empty() {
            output.push_str(&format!("{} {}\n", "Intent:".bold(), analysis.intent));
        }
        if !analysis.domain.is_empty() {
            output.push_str(&format!("{} {}\n", "Domain:".bold(), analysis.domain));
        }
        if analysis.constraints.is_empty() {
            output.push_str(&format!("{}\n", "No explicit constraints".dimmed()));
        } else {
            output.push_str(&format!("{}\n", "Constraints:".bold()));
            for constraint in &analysis.constraints {
                output.push_str(&format!("  * {constraint}\n"));
            }
        }

        // Plan
        output.push_str(&Self::section_header("Plan"));
        output.push_str(&format!(
            "{} {}\n\n",
            "Strategies:".bold(),
            report.strategies.join(", ")
        ));
        output.push_str(&report.plan.to_markdown());

        // Answer
        output.push_str(&Self::section_header("Answer"));
        output.push('\n');
        output.push_str(&report.final_output);
        output.push('\n');

        // Quality
        output.push_str(&Self::section_header("Quality"));
        output.push_str(&format!(
            "{} {:.2}\n",
            "Critic score:".bold(),
            report.critic_score
        ));
        output.push_str(&format!(
            "{} {} ({} restructure{})\n",
            "Attempts:".bold(),
            report.attempts,
            report.restructures,
            if report.restructures == 1 { "" } else { "s" }
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Audit:".bold(),
            Self::audit_line(&report.audit)
        ));

        output.push_str(&Self::footer());

        output
    }

    /// Format the response envelope as JSON
    pub fn format_json(response: &CycleResponse) -> String {
        serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final answer only (concise output)
    pub fn format_answer_only(report: &CycleReport) -> String {
        let mut output = report.final_output.trim_end().to_string();
        output.push('\n');

        if report.audit.is_degraded() {
            output.push_str(&format!(
                "\n{} {}\n",
                "note:".yellow().bold(),
                Self::audit_line(&report.audit)
            ));
        }

        output
    }

    /// Format a cycle that ended without a result
    pub fn format_error(message: &str) -> String {
        format!("{} {}\n", "Error:".red().bold(), message)
    }

    /// List the strategies of a catalog
    pub fn format_catalog(catalog: &ReasoningCatalog) -> String {
        let mut output = Self::section_header(&format!("Reasoning strategies ({})", catalog.len()));
        for strategy in catalog.strategies() {
            output.push_str(&format!(
                "{} {}\n{}\n",
                strategy.id.yellow().bold(),
                format!("({})", strategy.name).dimmed(),
                Self::indent(&strategy.description, "    ")
            ));
        }
        output
    }

    /// List model ids offered by a provider
    pub fn format_models(provider: &str, models: &[String]) -> String {
        let mut output = Self::section_header(&format!("Models on {provider} ({})", models.len()));
        for model in models {
            output.push_str(&format!("  {model}\n"));
        }
        output
    }

    fn audit_line(audit: &AuditSummary) -> String {
        let score = audit
            .last_score
            .map(|s| format!(", last score {s:.0}"))
            .unwrap_or_default();
        let outcome = match audit.outcome {
            AuditOutcome::Skipped => return "skipped (no constraints)".to_string(),
            AuditOutcome::Accepted => "accepted".green().to_string(),
            AuditOutcome::DiminishingReturns => {
                "accepted (diminishing returns)".green().to_string()
            }
            AuditOutcome::MaxIterations => {
                "unconfirmed (iteration limit reached)".yellow().to_string()
            }
            AuditOutcome::TimedOut => "unconfirmed (timed out)".yellow().to_string(),
        };
        format!(
            "{outcome} after {} iteration{}{score}",
            audit.iterations,
            if audit.iterations == 1 { "" } else { "s" }
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &CycleReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, response: &CycleResponse) -> String {
        Self::format_json(response)
    }

    fn format_answer_only(&self, report: &CycleReport) -> String {
        Self::format_answer_only(report)
    }
}
