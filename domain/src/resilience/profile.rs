//! Resilience profiles and the keys they are registered under

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::core::model::{ModelRole, ProviderKind};

/// Lowest rate a limiter will accept, in requests per second
pub const MIN_RATE_LIMIT: f64 = 0.1;

/// Throttle/retry/fallback policy for one resilience key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceProfile {
    /// Requests per second (also the burst size)
    pub rate_limit: f64,
    pub retry_enabled: bool,
    pub max_retries: u32,
    /// First backoff delay in seconds, doubled on each attempt
    pub retry_base_delay: f64,
    pub fallback_enabled: bool,
}

impl Default for ResilienceProfile {
    fn default() -> Self {
        Self {
            rate_limit: 5.0,
            retry_enabled: false,
            max_retries: 3,
            retry_base_delay: 1.0,
            fallback_enabled: false,
        }
    }
}

impl ResilienceProfile {
    pub fn with_rate_limit(mut self, rate: f64) -> Self {
        self.rate_limit = rate;
        self
    }

    pub fn with_retry(mut self, max_retries: u32, base_delay: f64) -> Self {
        self.retry_enabled = true;
        self.max_retries = max_retries;
        self.retry_base_delay = base_delay;
        self
    }

    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_enabled = enabled;
        self
    }

    /// Rate clamped to the accepted minimum
    pub fn effective_rate(&self) -> f64 {
        clamp_rate(self.rate_limit)
    }

    /// Total invocations of the primary operation
    pub fn max_attempts(&self) -> u32 {
        if self.retry_enabled {
            self.max_retries.saturating_add(1)
        } else {
            1
        }
    }

    /// Sleep before retrying after the given zero-based failed attempt
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2f64.powi(attempt.min(30) as i32);
        Duration::from_secs_f64((self.retry_base_delay.max(0.0) * factor).min(3600.0))
    }
}

/// Clamp a requested rate to the accepted minimum (NaN included)
pub fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() || rate < MIN_RATE_LIMIT {
        MIN_RATE_LIMIT
    } else {
        rate
    }
}

/// Identifier of a rate limiter / profile pair
///
/// Root traffic uses `"<provider>"`, the other roles `"<provider>_<role>"`, so
/// the three roles throttle independently against one upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResilienceKey(String);

impl ResilienceKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn for_role(provider: ProviderKind, role: ModelRole) -> Self {
        match role {
            ModelRole::Root => Self(provider.as_str().to_string()),
            other => Self(format!("{}_{}", provider.as_str(), other.as_str())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResilienceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
