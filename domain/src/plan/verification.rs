//! VERIFY phase result. Advisory: it is logged, never enforced.

use serde::Deserialize;

use crate::parsing::parse_json;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlanVerification {
    pub is_valid: bool,
    pub issues: Vec<String>,
}

impl PlanVerification {
    /// `None` if the response carries no `is_valid` verdict
    pub fn parse(response: &str) -> Option<Self> {
        let json: serde_json::Value = parse_json(response)?;
        json.get("is_valid")?.as_bool()?;
        serde_json::from_value(json).ok()
    }
}
