//! Hosted multi-model gateway client
//!
//! Speaks the OpenAI-compatible protocol. On a fallback-eligible failure it
//! can reissue the prompt once to a different free model sampled from the
//! shared [`FreeModelCache`].

use async_trait::async_trait;
use autologic_application::{GatewayError, InvokeOptions, ModelClient, ResilienceRegistry};
use autologic_domain::{ModelRole, ProviderKind, ResilienceKey};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::free_models::FreeModelCache;
use super::openai_compat::ChatTransport;
use super::GenerationParams;

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

const REFERER: &str = "https://github.com/autologic/autologic";
const TITLE: &str = "autologic";

pub struct OpenRouterClient {
    model: String,
    transport: ChatTransport,
    params: GenerationParams,
    registry: Arc<ResilienceRegistry>,
    key: ResilienceKey,
    free_models: Arc<FreeModelCache>,
}

impl OpenRouterClient {
    pub fn new(
        model: impl Into<String>,
        transport: ChatTransport,
        params: GenerationParams,
        registry: Arc<ResilienceRegistry>,
        role: ModelRole,
        free_models: Arc<FreeModelCache>,
    ) -> Self {
        Self {
            model: model.into(),
            transport,
            params,
            registry,
            key: ResilienceKey::for_role(ProviderKind::OpenRouter, role),
            free_models,
        }
    }

    /// Transport with the attribution headers the gateway expects
    pub fn transport(
        base_url: &str,
        api_key: String,
        timeout: Duration,
    ) -> Result<ChatTransport, reqwest::Error> {
        Ok(ChatTransport::new(base_url, Some(api_key), timeout)?
            .with_header("HTTP-Referer", REFERER)
            .with_header("X-Title", TITLE))
    }

    /// Ids of models whose prompt and completion prices are both zero
    pub async fn list_free_models(&self) -> Result<Vec<String>, GatewayError> {
        free_model_ids(&self.transport).await
    }

    async fn fallback(
        &self,
        prompt: &str,
        options: &InvokeOptions,
    ) -> Result<String, GatewayError> {
        let transport = &self.transport;
        let Some(alternative) = self
            .free_models
            .pick_other(&self.model, || free_model_ids(transport))
            .await
        else {
            return Err(GatewayError::ModelNotAvailable(
                "no free fallback model available".to_string(),
            ));
        };

        warn!(from = %self.model, to = %alternative, "Falling back to another model");
        self.transport
            .chat(&alternative, prompt, &self.params, options.json_output)
            .await
    }
}

async fn free_model_ids(transport: &ChatTransport) -> Result<Vec<String>, GatewayError> {
    Ok(transport
        .model_entries()
        .await?
        .into_iter()
        .filter(|m| m.is_free())
        .map(|m| m.id)
        .collect())
}

#[async_trait]
impl ModelClient for OpenRouterClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> ProviderKind {
        ProviderKind::OpenRouter
    }

    async fn invoke(&self, prompt: &str, options: &InvokeOptions) -> Result<String, GatewayError> {
        debug!(
            model = %self.model,
            key = %self.key,
            json = options.json_output,
            "Invoking gateway model"
        );
        let caller = self.registry.caller(&self.key, options.resilience.as_ref());
        caller
            .call_with_fallback(
                || {
                    self.transport
                        .chat(&self.model, prompt, &self.params, options.json_output)
                },
                || self.fallback(prompt, options),
            )
            .await
    }

    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        let caller = self.registry.caller(&self.key, None);
        caller.call(|| self.transport.list_model_ids()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autologic_domain::ResilienceProfile;
    use mockito::Matcher;
    use serde_json::json;

    const LISTING: &str = r#"{"data": [
        {"id": "paid/model", "pricing": {"prompt": "0.000002", "completion": "0.000002"}},
        {"id": "primary/model:free", "pricing": {"prompt": "0", "completion": "0"}},
        {"id": "backup/model:free", "pricing": {"prompt": "0", "completion": "0"}}
    ]}"#;

    fn client(url: &str) -> OpenRouterClient {
        let transport =
            OpenRouterClient::transport(url, "or-key".to_string(), Duration::from_secs(5)).unwrap();
        OpenRouterClient::new(
            "primary/model:free",
            transport,
            GenerationParams::default(),
            Arc::new(ResilienceRegistry::new()),
            ModelRole::Root,
            Arc::new(FreeModelCache::default()),
        )
    }

    fn with_fallback() -> InvokeOptions {
        InvokeOptions::default().with_resilience(ResilienceProfile::default().with_fallback(true))
    }

    async fn primary_unavailable(server: &mut mockito::Server) -> mockito::Mock {
        server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({"model": "primary/model:free"})))
            .with_status(404)
            .with_body(r#"{"error": {"message": "No endpoints found for primary/model:free"}}"#)
            .expect(1)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_sends_attribution_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("x-title", "autologic")
            .match_header("authorization", "Bearer or-key")
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"content": "ok"}}]}"#)
            .create_async()
            .await;

        let text = client(&server.url())
            .invoke("hi", &InvokeOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unavailable_model_falls_back_to_other_free_model() {
        let mut server = mockito::Server::new_async().await;
        let primary = primary_unavailable(&mut server).await;
        let listing = server
            .mock("GET", "/models")
            .with_status(200)
            .with_body(LISTING)
            .expect(1)
            .create_async()
            .await;
        let backup = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({"model": "backup/model:free"})))
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"content": "from backup"}}]}"#)
            .expect(1)
            .create_async()
            .await;

        let text = client(&server.url())
            .invoke("hi", &with_fallback())
            .await
            .unwrap();

        assert_eq!(text, "from backup");
        primary.assert_async().await;
        listing.assert_async().await;
        backup.assert_async().await;
    }

    #[tokio::test]
    async fn test_fallback_disabled_surfaces_error() {
        let mut server = mockito::Server::new_async().await;
        primary_unavailable(&mut server).await;
        let listing = server
            .mock("GET", "/models")
            .expect(0)
            .create_async()
            .await;

        let err = client(&server.url())
            .invoke("hi", &InvokeOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        listing.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_alternative_surfaces_original_error() {
        let mut server = mockito::Server::new_async().await;
        primary_unavailable(&mut server).await;
        server
            .mock("GET", "/models")
            .with_status(200)
            .with_body(
                r#"{"data": [{"id": "primary/model:free", "pricing": {"prompt": "0", "completion": "0"}}]}"#,
            )
            .create_async()
            .await;

        let err = client(&server.url())
            .invoke("hi", &with_fallback())
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::FallbackFailed { .. }));
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("No endpoints found"));
    }

    #[tokio::test]
    async fn test_list_free_models() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/models")
            .with_status(200)
            .with_body(LISTING)
            .create_async()
            .await;

        let free = client(&server.url()).list_free_models().await.unwrap();
        assert_eq!(free, vec!["primary/model:free", "backup/model:free"]);
    }
}
