//! Model configuration from TOML (`[llm]` section)
//!
//! ```toml
//! [llm]
//! active_provider = "openrouter"
//! active_model = "meta-llama/llama-3.3-70b-instruct:free"
//!
//! [llm.resilience]
//! rate_limit = 5.0
//!
//! [llm.worker]
//! model = "qwen/qwen-2.5-72b-instruct:free"
//! rate_limit = 2.0
//! ```
//!
//! The `[llm]` table itself describes the root role. `[llm.worker]` and
//! `[llm.audit]` only override what they set.

use autologic_domain::{ModelRole, ResilienceProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use super::providers::FileProviderConfig;

pub const DEFAULT_PROVIDER: &str = "openrouter";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct:free";

/// Raw `[llm]` configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    pub active_provider: String,
    pub active_model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub timeout_seconds: u64,
    /// Root role resilience; the other roles start from it
    pub resilience: ResilienceProfile,
    pub worker: FileRoleConfig,
    pub audit: FileRoleConfig,
    /// Per-provider settings keyed by provider id
    pub providers: HashMap<String, FileProviderConfig>,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            active_provider: DEFAULT_PROVIDER.to_string(),
            active_model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 4096,
            top_p: 1.0,
            timeout_seconds: 120,
            resilience: ResilienceProfile::default(),
            worker: FileRoleConfig::default(),
            audit: FileRoleConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Overrides for the worker or audit role; unset fields inherit root's
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoleConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f64>,
    pub timeout_seconds: Option<u64>,
    pub rate_limit: Option<f64>,
    pub retry_enabled: Option<bool>,
    pub max_retries: Option<u32>,
    pub retry_base_delay: Option<f64>,
    pub fallback_enabled: Option<bool>,
}

/// Fully resolved settings for one role
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSettings {
    pub role: ModelRole,
    pub provider: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub timeout: Duration,
    pub resilience: ResilienceProfile,
}

impl FileLlmConfig {
    /// Overrides for a role; root has none
    pub fn role_overrides(&self, role: ModelRole) -> Option<&FileRoleConfig> {
        match role {
            ModelRole::Root => None,
            ModelRole::Worker => Some(&self.worker),
            ModelRole::Audit => Some(&self.audit),
        }
    }

    /// Settings for a role after inheritance.
    ///
    /// A role that names a different provider but no model uses that
    /// provider's `default_model` when configured, root's model otherwise.
    pub fn resolve(&self, role: ModelRole) -> RoleSettings {
        let empty = FileRoleConfig::default();
        let overrides = self.role_overrides(role).unwrap_or(&empty);

        let provider = overrides
            .provider
            .clone()
            .unwrap_or_else(|| self.active_provider.clone());
        let model = overrides.model.clone().unwrap_or_else(|| {
            if provider != self.active_provider
                && let Some(default_model) = self
                    .providers
                    .get(&provider)
                    .and_then(|p| p.default_model.clone())
            {
                return default_model;
            }
            self.active_model.clone()
        });

        let timeout_seconds = overrides
            .timeout_seconds
            .or_else(|| {
                self.providers
                    .get(&provider)
                    .and_then(|p| p.timeout_seconds)
            })
            .unwrap_or(self.timeout_seconds);

        let base = &self.resilience;
        let resilience = ResilienceProfile {
            rate_limit: overrides.rate_limit.unwrap_or(base.rate_limit),
            retry_enabled: overrides.retry_enabled.unwrap_or(base.retry_enabled),
            max_retries: overrides.max_retries.unwrap_or(base.max_retries),
            retry_base_delay: overrides.retry_base_delay.unwrap_or(base.retry_base_delay),
            fallback_enabled: overrides.fallback_enabled.unwrap_or(base.fallback_enabled),
        };

        RoleSettings {
            role,
            provider,
            model,
            temperature: overrides.temperature.unwrap_or(self.temperature),
            max_tokens: overrides.max_tokens.unwrap_or(self.max_tokens),
            top_p: overrides.top_p.unwrap_or(self.top_p),
            timeout: Duration::from_secs(timeout_seconds),
            resilience,
        }
    }
}
