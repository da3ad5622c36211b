//! Provider, role and model identity value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

/// Upstream transport family serving a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Hosted multi-model gateway (supports dynamic model fallback)
    OpenRouter,
    /// Direct vendor endpoint
    OpenAi,
    /// Local inference server (OpenAI-compatible)
    Ollama,
    /// Self-hosted inference server (OpenAI-compatible)
    Vllm,
    /// Remote inference API with its own payload shape
    HuggingFace,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::OpenRouter,
        ProviderKind::OpenAi,
        ProviderKind::Ollama,
        ProviderKind::Vllm,
        ProviderKind::HuggingFace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Vllm => "vllm",
            ProviderKind::HuggingFace => "huggingface",
        }
    }

    /// Whether a missing credential is a construction failure.
    ///
    /// Local servers get a soft default instead.
    pub fn requires_credential(&self) -> bool {
        matches!(
            self,
            ProviderKind::OpenRouter | ProviderKind::OpenAi | ProviderKind::HuggingFace
        )
    }

    /// Environment variable holding this provider's credential
    pub fn credential_env(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Ollama => "OLLAMA_API_KEY",
            ProviderKind::Vllm => "VLLM_API_KEY",
            ProviderKind::HuggingFace => "HUGGINGFACE_API_KEY",
        }
    }

    /// Credential used when none is configured, for local servers only
    pub fn default_credential(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Ollama => Some("ollama"),
            ProviderKind::Vllm => Some("token-vllm"),
            _ => None,
        }
    }

    /// Whether this provider can substitute a different model on failure
    pub fn supports_dynamic_fallback(&self) -> bool {
        matches!(self, ProviderKind::OpenRouter)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "openai" => Ok(ProviderKind::OpenAi),
            "ollama" => Ok(ProviderKind::Ollama),
            "vllm" => Ok(ProviderKind::Vllm),
            "huggingface" | "hf" => Ok(ProviderKind::HuggingFace),
            other => Err(DomainError::UnknownProvider(other.to_string())),
        }
    }
}

/// Which part of the cycle a model serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    /// Strategic: analysis, selection, planning, synthesis
    Root,
    /// Tactical: plan execution
    Worker,
    /// Evaluator: critique and constraint audit
    Audit,
}

impl ModelRole {
    pub const ALL: [ModelRole; 3] = [ModelRole::Root, ModelRole::Worker, ModelRole::Audit];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelRole::Root => "root",
            ModelRole::Worker => "worker",
            ModelRole::Audit => "audit",
        }
    }
}

impl fmt::Display for ModelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "root" | "strategic" => Ok(ModelRole::Root),
            "worker" | "tactical" => Ok(ModelRole::Worker),
            "audit" | "evaluator" => Ok(ModelRole::Audit),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

/// A provider/model pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelSpec {
    pub provider: ProviderKind,
    pub model: String,
}

impl ModelSpec {
    pub fn new(provider: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_round_trip_through_str() {
        for provider in ProviderKind::ALL {
            assert_eq!(provider.as_str().parse::<ProviderKind>().unwrap(), provider);
        }
        assert_eq!("HF".parse::<ProviderKind>().unwrap(), ProviderKind::HuggingFace);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let err = "bedrock".parse::<ProviderKind>().unwrap_err();
        assert_eq!(err, DomainError::UnknownProvider("bedrock".into()));
    }

    #[test]
    fn test_credential_policy() {
        assert!(ProviderKind::OpenRouter.requires_credential());
        assert!(ProviderKind::HuggingFace.requires_credential());
        assert!(!ProviderKind::Ollama.requires_credential());
        assert_eq!(ProviderKind::Vllm.default_credential(), Some("token-vllm"));
        assert_eq!(ProviderKind::OpenAi.default_credential(), None);
    }

    #[test]
    fn test_role_aliases() {
        assert_eq!("tactical".parse::<ModelRole>().unwrap(), ModelRole::Worker);
        assert_eq!("Audit".parse::<ModelRole>().unwrap(), ModelRole::Audit);
        assert!("judge".parse::<ModelRole>().is_err());
    }

    #[test]
    fn test_model_spec_display() {
        let spec = ModelSpec::new(ProviderKind::Ollama, "llama3.1");
        assert_eq!(spec.to_string(), "ollama/llama3.1");
    }
}
