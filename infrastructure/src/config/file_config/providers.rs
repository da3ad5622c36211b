//! Provider configuration from TOML (`[llm.providers.<id>]` sections)

use serde::{Deserialize, Serialize};

/// Settings for one provider.
///
/// A provider without a section is enabled with built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    pub enabled: bool,
    /// Overrides the built-in endpoint (and `OLLAMA_HOST` / `VLLM_HOST`)
    pub base_url: Option<String>,
    /// Model used when a role switches to this provider without naming one
    pub default_model: Option<String>,
    pub timeout_seconds: Option<u64>,
    /// Direct API key (prefer the environment)
    pub api_key: Option<String>,
    /// Models offered to users of this provider
    pub models: Vec<String>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
            default_model: None,
            timeout_seconds: None,
            api_key: None,
            models: Vec::new(),
        }
    }
}
