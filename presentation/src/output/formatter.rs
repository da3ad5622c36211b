//! Output formatter trait

use autologic_application::{CycleReport, CycleResponse};

/// Trait for formatting cycle results
pub trait OutputFormatter {
    /// Format the complete report
    fn format(&self, report: &CycleReport) -> String;

    /// Format the response envelope as JSON
    fn format_json(&self, response: &CycleResponse) -> String;

    /// Format the final answer only (concise output)
    fn format_answer_only(&self, report: &CycleReport) -> String;
}
