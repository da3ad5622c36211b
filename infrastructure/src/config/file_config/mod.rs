//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod engine;
mod llm;
mod output;
mod providers;

pub use engine::{FileCatalogConfig, FileEngineConfig};
pub use llm::{DEFAULT_MODEL, DEFAULT_PROVIDER, FileLlmConfig, FileRoleConfig, RoleSettings};
pub use output::FileOutputConfig;
pub use providers::FileProviderConfig;

use autologic_domain::{MAX_AUDIT_TIMEOUT, ModelRole, ProviderKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("{0}: timeout cannot be 0")]
    InvalidTimeout(String),

    #[error("{0}: model name cannot be empty")]
    EmptyModelName(String),

    #[error("{field}: rate limit must be positive (got {value})")]
    InvalidRateLimit { field: String, value: f64 },

    #[error("engine.audit_timeout_seconds cannot exceed {max} (got {value})")]
    AuditTimeoutTooLarge { value: u64, max: u64 },

    #[error("engine.acceptance_threshold must be within [0, 1] (got {0})")]
    InvalidThreshold(f64),

    #[error("{field}: unknown provider '{value}'")]
    UnknownProvider { field: String, value: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Models, providers and resilience
    pub llm: FileLlmConfig,
    /// Reasoning-cycle loop bounds
    pub engine: FileEngineConfig,
    /// Strategy catalog source
    pub catalog: FileCatalogConfig,
    /// Terminal output
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let llm = &self.llm;

        if llm.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout("llm".into()));
        }
        if self.engine.audit_timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout("engine.audit".into()));
        }
        if self.engine.audit_timeout_seconds > MAX_AUDIT_TIMEOUT.as_secs() {
            return Err(ConfigValidationError::AuditTimeoutTooLarge {
                value: self.engine.audit_timeout_seconds,
                max: MAX_AUDIT_TIMEOUT.as_secs(),
            });
        }
        for (id, provider) in &llm.providers {
            if provider.timeout_seconds == Some(0) {
                return Err(ConfigValidationError::InvalidTimeout(format!(
                    "llm.providers.{id}"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.engine.acceptance_threshold) {
            return Err(ConfigValidationError::InvalidThreshold(
                self.engine.acceptance_threshold,
            ));
        }

        check_rate("llm.resilience", Some(llm.resilience.rate_limit))?;

        if llm.active_model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName("llm".into()));
        }
        check_provider("llm.active_provider", &llm.active_provider)?;

        for role in [ModelRole::Worker, ModelRole::Audit] {
            let Some(overrides) = llm.role_overrides(role) else {
                continue;
            };
            let section = format!("llm.{}", role.as_str());

            if overrides.timeout_seconds == Some(0) {
                return Err(ConfigValidationError::InvalidTimeout(section));
            }
            if let Some(model) = &overrides.model
                && model.trim().is_empty()
            {
                return Err(ConfigValidationError::EmptyModelName(section));
            }
            if let Some(provider) = &overrides.provider {
                check_provider(&format!("{section}.provider"), provider)?;
            }
            check_rate(&section, overrides.rate_limit)?;
        }

        Ok(())
    }
}

fn check_rate(field: &str, rate: Option<f64>) -> Result<(), ConfigValidationError> {
    match rate {
        Some(value) if value.is_nan() || value <= 0.0 => {
            Err(ConfigValidationError::InvalidRateLimit {
                field: field.to_string(),
                value,
            })
        }
        _ => Ok(()),
    }
}

fn check_provider(field: &str, value: &str) -> Result<(), ConfigValidationError> {
    value
        .parse::<ProviderKind>()
        .map(|_| ())
        .map_err(|_| ConfigValidationError::UnknownProvider {
            field: field.to_string(),
            value: value.to_string(),
        })
}
