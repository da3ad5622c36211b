//! Upstream failure classification.
//!
//! | Class | Retried in place | Triggers fallback |
//! |-------|------------------|-------------------|
//! | [`FailureClass::Transient`] | yes | yes |
//! | [`FailureClass::Unavailable`] | no | yes |
//! | [`FailureClass::Terminal`] | no | no |

use serde::{Deserialize, Serialize};

const RETRYABLE_STATUS: [u16; 6] = [408, 429, 500, 502, 503, 504];

const RETRYABLE_SIGNATURES: [&str; 8] = [
    "rate limit",
    "too many requests",
    "service unavailable",
    "timeout",
    "timed out",
    "connection",
    "overloaded",
    "capacity",
];

const UNAVAILABLE_SIGNATURES: [&str; 5] = [
    "no endpoints found",
    "data policy",
    "model not available",
    "model unavailable",
    "model is currently overloaded",
];

/// How the resilience layer should react to a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// Timeouts, connection drops, 429 and 5xx: retry, then substitute
    Transient,
    /// Retired model, policy block, missing endpoint: substitute only
    Unavailable,
    /// Bad credentials, malformed request: raise immediately
    Terminal,
}

impl FailureClass {
    pub fn is_retryable(&self) -> bool {
        matches!(self, FailureClass::Transient)
    }

    pub fn is_fallback_eligible(&self) -> bool {
        matches!(self, FailureClass::Transient | FailureClass::Unavailable)
    }
}

/// Classify a failure from its HTTP status (if any) and message text
pub fn classify_failure(status: Option<u16>, message: &str) -> FailureClass {
    let lower = message.to_lowercase();

    let retryable = status.is_some_and(|s| RETRYABLE_STATUS.contains(&s))
        || RETRYABLE_SIGNATURES.iter().any(|sig| lower.contains(sig));
    if retryable {
        return FailureClass::Transient;
    }

    let unavailable = status.is_some_and(|s| s == 404 || (500..600).contains(&s))
        || UNAVAILABLE_SIGNATURES.iter().any(|sig| lower.contains(sig));
    if unavailable {
        FailureClass::Unavailable
    } else {
        FailureClass::Terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_status_codes() {
        for code in [408, 429, 500, 502, 503, 504] {
            assert_eq!(classify_failure(Some(code), ""), FailureClass::Transient);
        }
    }

    #[test]
    fn test_retryable_signatures() {
        assert_eq!(
            classify_failure(None, "Connection reset by peer"),
            FailureClass::Transient
        );
        assert_eq!(
            classify_failure(None, "request timed out after 30s"),
            FailureClass::Transient
        );
        assert_eq!(
            classify_failure(Some(400), "Provider at capacity"),
            FailureClass::Transient
        );
    }

    #[test]
    fn test_unavailable_is_fallback_only() {
        let class = classify_failure(Some(404), "No endpoints found for model x");
        assert_eq!(class, FailureClass::Unavailable);
        assert!(!class.is_retryable());
        assert!(class.is_fallback_eligible());

        assert_eq!(
            classify_failure(Some(403), "blocked by your data policy"),
            FailureClass::Unavailable
        );
        assert_eq!(classify_failure(Some(501), ""), FailureClass::Unavailable);
    }

    #[test]
    fn test_terminal_failures() {
        let class = classify_failure(Some(401), "invalid api key");
        assert_eq!(class, FailureClass::Terminal);
        assert!(!class.is_fallback_eligible());
        assert_eq!(classify_failure(Some(400), "bad request"), FailureClass::Terminal);
    }
}
