//! Remote inference API client
//!
//! Uses the text-generation payload (`inputs` + `parameters`) rather than
//! the chat protocol, so there is no structured-output request to make.

use async_trait::async_trait;
use autologic_application::{GatewayError, InvokeOptions, ModelClient, ResilienceRegistry};
use autologic_domain::{ModelRole, ProviderKind, ResilienceKey};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::types::{check_status, from_send_error};
use super::{GenerationParams, http_client};

pub const HUGGINGFACE_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";
pub const HUGGINGFACE_HUB_URL: &str = "https://huggingface.co/api";

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f64,
    top_p: f64,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Batch(Vec<Generated>),
    Single(Generated),
}

#[derive(Debug, Deserialize)]
struct Generated {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
struct HubModel {
    id: String,
}

pub struct HuggingFaceClient {
    model: String,
    http: reqwest::Client,
    api_key: String,
    inference_url: String,
    hub_url: String,
    params: GenerationParams,
    registry: Arc<ResilienceRegistry>,
    key: ResilienceKey,
}

impl HuggingFaceClient {
    pub fn new(
        model: impl Into<String>,
        api_key: String,
        params: GenerationParams,
        registry: Arc<ResilienceRegistry>,
        role: ModelRole,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            model: model.into(),
            http: http_client(params.timeout)?,
            api_key,
            inference_url: HUGGINGFACE_INFERENCE_URL.to_string(),
            hub_url: HUGGINGFACE_HUB_URL.to_string(),
            params,
            registry,
            key: ResilienceKey::for_role(ProviderKind::HuggingFace, role),
        })
    }

    pub fn with_inference_url(mut self, url: impl Into<String>) -> Self {
        self.inference_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_hub_url(mut self, url: impl Into<String>) -> Self {
        self.hub_url = url.into().trim_end_matches('/').to_string();
        self
    }

    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let body = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                max_new_tokens: self.params.max_tokens,
                temperature: self.params.temperature,
                top_p: self.params.top_p,
                return_full_text: false,
            },
        };

        let response = self
            .http
            .post(format!("{}/{}", self.inference_url, self.model))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(from_send_error)?;
        let response = check_status(response).await?;

        match response.json().await.map_err(from_send_error)? {
            GenerationResponse::Single(generated) => Ok(generated.generated_text),
            GenerationResponse::Batch(batch) => batch
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .ok_or_else(|| GatewayError::InvalidResponse("empty generation batch".to_string())),
        }
    }

    /// Most downloaded text-generation models on the hub
    async fn popular_models(&self) -> Result<Vec<String>, GatewayError> {
        let response = self
            .http
            .get(format!("{}/models", self.hub_url))
            .bearer_auth(&self.api_key)
            .query(&[
                ("filter", "text-generation"),
                ("sort", "downloads"),
                ("direction", "-1"),
                ("limit", "100"),
            ])
            .send()
            .await
            .map_err(from_send_error)?;
        let response = check_status(response).await?;
        let models: Vec<HubModel> = response.json().await.map_err(from_send_error)?;

        let mut ids: Vec<String> = models.into_iter().map(|m| m.id).collect();
        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl ModelClient for HuggingFaceClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> ProviderKind {
        ProviderKind::HuggingFace
    }

    async fn invoke(&self, prompt: &str, options: &InvokeOptions) -> Result<String, GatewayError> {
        debug!(model = %self.model, key = %self.key, "Invoking inference model");
        let caller = self.registry.caller(&self.key, options.resilience.as_ref());
        caller.call(|| self.generate(prompt)).await
    }

    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        let caller = self.registry.caller(&self.key, None);
        caller.call(|| self.popular_models()).await
    }
}

impl std::fmt::Debug for HuggingFaceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceClient")
            .field("model", &self.model)
            .field("inference_url", &self.inference_url)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
