//! Audit model reports

use serde::{Deserialize, Serialize};

use crate::parsing::parse_json_object;

/// Sufficiency score at or above which the output is accepted
pub const SUFFICIENCY_THRESHOLD: f64 = 90.0;

/// How much the output still needs to change
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequiredChange {
    None,
    Minor,
    Major,
    Critical,
}

impl RequiredChange {
    /// Lenient parse; unknown labels are treated as `Major`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "NONE" => RequiredChange::None,
            "MINOR" => RequiredChange::Minor,
            "CRITICAL" => RequiredChange::Critical,
            _ => RequiredChange::Major,
        }
    }

    /// Further refinement is not worth another round trip
    pub fn is_diminishing(&self) -> bool {
        matches!(self, RequiredChange::None | RequiredChange::Minor)
    }
}

/// One audit iteration's assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Sufficiency in `[0, 100]`
    pub score: f64,
    pub is_sufficient: bool,
    pub required_change: RequiredChange,
    pub instructions: String,
}

impl AuditReport {
    pub fn parse(response: &str) -> Option<Self> {
        let json = parse_json_object(response)?;
        let score = json.get("score").and_then(|v| {
            v.as_f64()
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        })?;
        let is_sufficient = json
            .get("is_sufficient")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let required_change = json
            .get("required_change")
            .and_then(|v| v.as_str())
            .map(RequiredChange::from_label)
            .unwrap_or(RequiredChange::Major);
        let instructions = json
            .get("instructions")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        Some(Self {
            score: if score.is_finite() { score.clamp(0.0, 100.0) } else { 0.0 },
            is_sufficient,
            required_change,
            instructions,
        })
    }

    pub fn is_accepted(&self) -> bool {
        self.is_sufficient || self.score >= SUFFICIENCY_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report() {
        let report = AuditReport::parse(
            r#"{"score": 72, "is_sufficient": false, "required_change": "major",
                "instructions": "Add the missing budget table"}"#,
        )
        .unwrap();
        assert_eq!(report.score, 72.0);
        assert_eq!(report.required_change, RequiredChange::Major);
        assert!(!report.is_accepted());
        assert!(!report.required_change.is_diminishing());
    }

    #[test]
    fn test_acceptance_rules() {
        let high = AuditReport::parse(r#"{"score": 95}"#).unwrap();
        assert!(high.is_accepted());
        let flagged = AuditReport::parse(r#"{"score": 10, "is_sufficient": true}"#).unwrap();
        assert!(flagged.is_accepted());
    }

    #[test]
    fn test_defaults_and_clamping() {
        let report = AuditReport::parse(r#"{"score": "140"}"#).unwrap();
        assert_eq!(report.score, 100.0);
        assert_eq!(report.required_change, RequiredChange::Major);
        assert!(AuditReport::parse(r#"{"instructions": "x"}"#).is_none());
    }

    #[test]
    fn test_diminishing_changes() {
        assert!(RequiredChange::from_label("none").is_diminishing());
        assert!(RequiredChange::Minor.is_diminishing());
        assert!(!RequiredChange::Critical.is_diminishing());
    }
}
