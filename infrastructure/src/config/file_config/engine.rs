//! Reasoning-cycle configuration from TOML (`[engine]` and `[catalog]`)

use autologic_application::EngineParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Raw `[engine]` configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEngineConfig {
    /// Execute attempts, restructures included
    pub max_retries: u32,
    /// Critic score that ends the execute loop
    pub acceptance_threshold: f64,
    /// Call-and-parse attempts per phase
    pub phase_attempts: u32,
    pub audit_timeout_seconds: u64,
    pub audit_max_iterations: u32,
}

impl Default for FileEngineConfig {
    fn default() -> Self {
        let params = EngineParams::default();
        Self {
            max_retries: params.max_retries,
            acceptance_threshold: params.acceptance_threshold,
            phase_attempts: params.phase_attempts,
            audit_timeout_seconds: params.audit_timeout.as_secs(),
            audit_max_iterations: params.audit_max_iterations,
        }
    }
}

impl FileEngineConfig {
    pub fn to_params(&self) -> EngineParams {
        EngineParams::default()
            .with_max_retries(self.max_retries)
            .with_acceptance_threshold(self.acceptance_threshold)
            .with_phase_attempts(self.phase_attempts)
            .with_audit_timeout(Duration::from_secs(self.audit_timeout_seconds))
            .with_audit_max_iterations(self.audit_max_iterations)
    }
}

/// Raw `[catalog]` configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    /// Strategy catalog file; the built-in catalog is used when unset
    pub path: Option<PathBuf>,
}
