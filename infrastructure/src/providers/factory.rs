//! Builds role-bound model clients from configuration

use autologic_application::{ModelClient, ModelRoster, ResilienceRegistry};
use autologic_domain::{ModelRole, ModelSpec, ProviderKind, ResilienceKey};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::free_models::FreeModelCache;
use super::huggingface::{HUGGINGFACE_INFERENCE_URL, HuggingFaceClient};
use super::openai_compat::{ChatTransport, OpenAiCompatClient};
use super::openrouter::{OPENROUTER_BASE_URL, OpenRouterClient};
use super::GenerationParams;
use crate::config::{FileLlmConfig, RoleSettings};

/// Errors raised while constructing a client
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Provider '{0}' is disabled in configuration")]
    ProviderDisabled(String),

    #[error("Missing credential for {provider}: set {env} or llm.providers.{provider}.api_key")]
    MissingCredential { provider: String, env: String },

    #[error("Could not build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Looks up an environment-style variable
pub type CredentialLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Creates [`ModelClient`]s for the three roles.
///
/// Every client shares the factory's [`ResilienceRegistry`]; building a
/// roster registers each role's profile under its role-scoped key. Gateway
/// clients also share one [`FreeModelCache`].
pub struct ModelFactory {
    config: FileLlmConfig,
    registry: Arc<ResilienceRegistry>,
    free_models: Arc<FreeModelCache>,
    lookup: CredentialLookup,
}

impl ModelFactory {
    pub fn new(config: FileLlmConfig, registry: Arc<ResilienceRegistry>) -> Self {
        Self {
            config,
            registry,
            free_models: Arc::new(FreeModelCache::default()),
            lookup: Arc::new(|name| std::env::var(name).ok()),
        }
    }

    /// Replace where credentials and host overrides are read from
    pub fn with_credentials(mut self, lookup: CredentialLookup) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn with_free_model_cache(mut self, cache: Arc<FreeModelCache>) -> Self {
        self.free_models = cache;
        self
    }

    pub fn registry(&self) -> &Arc<ResilienceRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &FileLlmConfig {
        &self.config
    }

    /// Clients for root, worker and audit as configured
    pub fn roster(&self) -> Result<ModelRoster, FactoryError> {
        Ok(ModelRoster::new(
            self.create(ModelRole::Root)?,
            self.create(ModelRole::Worker)?,
            self.create(ModelRole::Audit)?,
        ))
    }

    /// One provider/model pair for every role.
    ///
    /// Sampling settings and resilience still come from each role's
    /// configuration.
    pub fn single_model_roster(&self, spec: &ModelSpec) -> Result<ModelRoster, FactoryError> {
        info!(model = %spec, "Using a single model for every role");
        let build = |role: ModelRole| {
            let mut settings = self.config.resolve(role);
            settings.provider = spec.provider.as_str().to_string();
            settings.model = spec.model.clone();
            self.build(&settings)
        };
        Ok(ModelRoster::new(
            build(ModelRole::Root)?,
            build(ModelRole::Worker)?,
            build(ModelRole::Audit)?,
        ))
    }

    /// The configured client for one role
    pub fn create(&self, role: ModelRole) -> Result<Arc<dyn ModelClient>, FactoryError> {
        self.build(&self.config.resolve(role))
    }

    /// Whether a provider may be used (unknown ids are not)
    pub fn is_enabled(&self, provider: &str) -> bool {
        provider.parse::<ProviderKind>().is_ok()
            && self
                .config
                .providers
                .get(provider)
                .is_none_or(|p| p.enabled)
    }

    fn build(&self, settings: &RoleSettings) -> Result<Arc<dyn ModelClient>, FactoryError> {
        let kind: ProviderKind = settings
            .provider
            .parse()
            .map_err(|_| FactoryError::UnknownProvider(settings.provider.clone()))?;
        if !self.is_enabled(kind.as_str()) {
            return Err(FactoryError::ProviderDisabled(kind.to_string()));
        }

        let credential = self.credential(kind)?;

        let key = ResilienceKey::for_role(kind, settings.role);
        self.registry.set_profile(&key, settings.resilience.clone());

        let params = GenerationParams {
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            top_p: settings.top_p,
            timeout: settings.timeout,
        };
        let base_url = self.base_url(kind);
        let registry = Arc::clone(&self.registry);
        let model = settings.model.clone();

        debug!(
            role = settings.role.as_str(),
            provider = kind.as_str(),
            %model,
            %base_url,
            "Creating model client"
        );

        let client: Arc<dyn ModelClient> = match kind {
            ProviderKind::OpenRouter => {
                let transport = OpenRouterClient::transport(
                    &base_url,
                    credential.unwrap_or_default(),
                    params.timeout,
                )?;
                Arc::new(OpenRouterClient::new(
                    model,
                    transport,
                    params,
                    registry,
                    settings.role,
                    Arc::clone(&self.free_models),
                ))
            }
            ProviderKind::OpenAi | ProviderKind::Ollama | ProviderKind::Vllm => {
                let transport = ChatTransport::new(base_url, credential, params.timeout)?;
                Arc::new(OpenAiCompatClient::new(
                    kind,
                    model,
                    transport,
                    params,
                    registry,
                    settings.role,
                ))
            }
            ProviderKind::HuggingFace => Arc::new(
                HuggingFaceClient::new(
                    model,
                    credential.unwrap_or_default(),
                    params,
                    registry,
                    settings.role,
                )?
                .with_inference_url(base_url),
            ),
        };
        Ok(client)
    }

    /// Config key, then environment, then the local-server default.
    /// Remote providers without one are rejected.
    fn credential(&self, kind: ProviderKind) -> Result<Option<String>, FactoryError> {
        let configured = self
            .config
            .providers
            .get(kind.as_str())
            .and_then(|p| p.api_key.clone());
        let found = configured
            .or_else(|| (self.lookup)(kind.credential_env()))
            .filter(|key| !key.trim().is_empty())
            .or_else(|| kind.default_credential().map(String::from));

        match found {
            None if kind.requires_credential() => Err(FactoryError::MissingCredential {
                provider: kind.to_string(),
                env: kind.credential_env().to_string(),
            }),
            other => Ok(other),
        }
    }

    fn base_url(&self, kind: ProviderKind) -> String {
        if let Some(url) = self
            .config
            .providers
            .get(kind.as_str())
            .and_then(|p| p.base_url.clone())
        {
            return url;
        }
        match kind {
            ProviderKind::OpenRouter => OPENROUTER_BASE_URL.to_string(),
            ProviderKind::OpenAi => "https://api.openai.com/v1".to_string(),
            ProviderKind::Ollama => {
                let host = (self.lookup)("OLLAMA_HOST")
                    .unwrap_or_else(|| "http://localhost:11434".to_string());
                format!("{}/v1", host.trim_end_matches('/'))
            }
            ProviderKind::Vllm => {
                let host = (self.lookup)("VLLM_HOST")
                    .unwrap_or_else(|| "http://localhost:8000".to_string());
                format!("{}/v1", host.trim_end_matches('/'))
            }
            ProviderKind::HuggingFace => HUGGINGFACE_INFERENCE_URL.to_string(),
        }
    }
}

impl std::fmt::Debug for ModelFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelFactory")
            .field("active_provider", &self.config.active_provider)
            .field("active_model", &self.config.active_model)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileProviderConfig;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> CredentialLookup {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Arc::new(move |name| vars.get(name).cloned())
    }

    fn factory(toml_str: &str, vars: &[(&str, &str)]) -> ModelFactory {
        let config: FileLlmConfig = toml::from_str(toml_str).unwrap();
        ModelFactory::new(config, Arc::new(ResilienceRegistry::new())).with_credentials(env(vars))
    }

    #[test]
    fn test_roster_defaults_to_root_model_for_every_role() {
        let factory = factory(
            r#"active_model = "meta-llama/llama-3.3-70b-instruct:free""#,
            &[("OPENROUTER_API_KEY", "or-key")],
        );
        let roster = factory.roster().unwrap();
        for client in [&roster.root, &roster.worker, &roster.audit] {
            assert_eq!(client.provider(), ProviderKind::OpenRouter);
            assert_eq!(client.model_name(), "meta-llama/llama-3.3-70b-instruct:free");
        }
    }

    #[test]
    fn test_roster_registers_role_scoped_profiles() {
        let factory = factory(
            r#"
active_provider = "ollama"
active_model = "llama3.1"

[resilience]
rate_limit = 3.0

[worker]
rate_limit = 1.0
retry_enabled = true
"#,
            &[],
        );
        factory.roster().unwrap();

        let registry = factory.registry();
        let keys: Vec<String> = registry
            .keys()
            .iter()
            .map(|k| k.as_str().to_string())
            .collect();
        assert_eq!(keys, vec!["ollama", "ollama_audit", "ollama_worker"]);

        let worker = registry.profile(&ResilienceKey::new("ollama_worker"));
        assert_eq!(worker.rate_limit, 1.0);
        assert!(worker.retry_enabled);
        let audit = registry.profile(&ResilienceKey::new("ollama_audit"));
        assert_eq!(audit.rate_limit, 3.0);
        assert!(!audit.retry_enabled);
    }

    #[test]
    fn test_remote_provider_requires_credential() {
        let factory = factory(r#"active_provider = "openai""#, &[]);
        let err = factory.create(ModelRole::Root).err().unwrap();
        assert!(matches!(err, FactoryError::MissingCredential { .. }));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_configured_api_key_is_accepted() {
        let mut config = FileLlmConfig {
            active_provider: "huggingface".to_string(),
            active_model: "mistralai/Mistral-7B-Instruct".to_string(),
            ..FileLlmConfig::default()
        };
        config.providers.insert(
            "huggingface".to_string(),
            FileProviderConfig {
                api_key: Some("hf-key".to_string()),
                ..FileProviderConfig::default()
            },
        );
        let factory = ModelFactory::new(config, Arc::new(ResilienceRegistry::new()))
            .with_credentials(env(&[]));

        let client = factory.create(ModelRole::Root).unwrap();
        assert_eq!(client.provider(), ProviderKind::HuggingFace);
    }

    #[test]
    fn test_local_providers_use_soft_default_credential() {
        let factory = factory(
            r#"
active_provider = "vllm"
active_model = "served"

[audit]
provider = "ollama"
model = "llama3"
"#,
            &[],
        );
        let roster = factory.roster().unwrap();
        assert_eq!(roster.root.provider(), ProviderKind::Vllm);
        assert_eq!(roster.audit.provider(), ProviderKind::Ollama);
        assert_eq!(roster.audit.model_name(), "llama3");
    }

    #[test]
    fn test_disabled_provider_is_refused() {
        let factory = factory(
            r#"
active_provider = "ollama"

[providers.ollama]
enabled = false
"#,
            &[],
        );
        assert!(!factory.is_enabled("ollama"));
        assert!(matches!(
            factory.create(ModelRole::Root),
            Err(FactoryError::ProviderDisabled(_))
        ));
    }

    #[test]
    fn test_unknown_provider_is_refused() {
        let factory = factory(r#"active_provider = "bedrock""#, &[]);
        assert!(!factory.is_enabled("bedrock"));
        assert!(matches!(
            factory.create(ModelRole::Root),
            Err(FactoryError::UnknownProvider(p)) if p == "bedrock"
        ));
    }

    #[test]
    fn test_host_override_from_environment() {
        let factory = factory(
            r#"active_provider = "ollama""#,
            &[("OLLAMA_HOST", "http://gpu-box:11434/")],
        );
        assert_eq!(factory.base_url(ProviderKind::Ollama), "http://gpu-box:11434/v1");
        assert_eq!(factory.base_url(ProviderKind::Vllm), "http://localhost:8000/v1");
    }

    #[test]
    fn test_single_model_roster() {
        let factory = factory(r#"active_provider = "openrouter""#, &[]);
        let spec = ModelSpec::new(ProviderKind::Ollama, "phi3");
        let roster = factory.single_model_roster(&spec).unwrap();
        for client in [&roster.root, &roster.worker, &roster.audit] {
            assert_eq!(client.provider(), ProviderKind::Ollama);
            assert_eq!(client.model_name(), "phi3");
        }
    }
}
