//! OpenAI-compatible chat transport and the client built on it
//!
//! OpenAI, Ollama and vLLM all speak `POST {base}/chat/completions` and
//! `GET {base}/models`; they differ only in base URL and credential.

use async_trait::async_trait;
use autologic_application::{GatewayError, InvokeOptions, ModelClient, ResilienceRegistry};
use autologic_domain::{ModelRole, ProviderKind, ResilienceKey};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{
    ChatMessage, ChatRequest, ChatResponse, ModelEntry, ModelList, ResponseFormat, check_status,
    from_send_error,
};
use super::{GenerationParams, http_client};

/// HTTP plumbing for one OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct ChatTransport {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    headers: Vec<(&'static str, String)>,
}

impl ChatTransport {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: http_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            headers: Vec::new(),
        })
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}/{}", self.base_url, path));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        for (name, value) in &self.headers {
            builder = builder.header(*name, value);
        }
        builder
    }

    /// One chat completion.
    ///
    /// When `json_output` is set the request asks for a JSON object; an
    /// upstream that answers 400 to that is asked once more without it.
    pub async fn chat(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
        json_output: bool,
    ) -> Result<String, GatewayError> {
        if json_output {
            match self
                .send_chat(model, prompt, params, Some(ResponseFormat::JSON_OBJECT))
                .await
            {
                Err(e) if e.status() == Some(400) => {
                    warn!(model, error = %e, "Retrying without response_format");
                }
                other => return other,
            }
        }
        self.send_chat(model, prompt, params, None).await
    }

    async fn send_chat(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
        response_format: Option<ResponseFormat>,
    ) -> Result<String, GatewayError> {
        let body = ChatRequest {
            model,
            messages: [ChatMessage::user(prompt)],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            response_format,
        };

        let response = self
            .request(reqwest::Method::POST, "chat/completions")
            .json(&body)
            .send()
            .await
            .map_err(from_send_error)?;
        let response = check_status(response).await?;

        let parsed: ChatResponse = response.json().await.map_err(from_send_error)?;
        parsed.into_text()
    }

    /// Raw `GET /models` entries, including pricing when the upstream has it
    pub(crate) async fn model_entries(&self) -> Result<Vec<ModelEntry>, GatewayError> {
        let response = self
            .request(reqwest::Method::GET, "models")
            .send()
            .await
            .map_err(from_send_error)?;
        let response = check_status(response).await?;
        let list: ModelList = response.json().await.map_err(from_send_error)?;
        Ok(list.data)
    }

    /// Model ids the upstream offers
    pub async fn list_model_ids(&self) -> Result<Vec<String>, GatewayError> {
        Ok(self
            .model_entries()
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect())
    }
}

/// Client for OpenAI, Ollama and vLLM
pub struct OpenAiCompatClient {
    kind: ProviderKind,
    model: String,
    transport: ChatTransport,
    params: GenerationParams,
    registry: Arc<ResilienceRegistry>,
    key: ResilienceKey,
}

impl OpenAiCompatClient {
    pub fn new(
        kind: ProviderKind,
        model: impl Into<String>,
        transport: ChatTransport,
        params: GenerationParams,
        registry: Arc<ResilienceRegistry>,
        role: ModelRole,
    ) -> Self {
        Self {
            kind,
            model: model.into(),
            transport,
            params,
            registry,
            key: ResilienceKey::for_role(kind, role),
        }
    }
}

#[async_trait]
impl ModelClient for OpenAiCompatClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> ProviderKind {
        self.kind
    }

    async fn invoke(&self, prompt: &str, options: &InvokeOptions) -> Result<String, GatewayError> {
        debug!(
            provider = self.kind.as_str(),
            model = %self.model,
            key = %self.key,
            json = options.json_output,
            "Invoking model"
        );
        let caller = self.registry.caller(&self.key, options.resilience.as_ref());
        caller
            .call(|| {
                self.transport
                    .chat(&self.model, prompt, &self.params, options.json_output)
            })
            .await
    }

    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        let caller = self.registry.caller(&self.key, None);
        caller.call(|| self.transport.list_model_ids()).await
    }
}
