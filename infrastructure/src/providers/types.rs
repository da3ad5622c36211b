//! Wire types shared by the HTTP adapters and conversion of transport
//! failures into [`GatewayError`].

use autologic_application::GatewayError;
use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat completion request with a single user message
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 1],
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ChatMessage<'a> {
    pub fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ResponseFormat {
    pub const JSON_OBJECT: ResponseFormat = ResponseFormat {
        kind: "json_object",
    };
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    /// Some gateways report upstream failures inside a 200 body
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

impl ChatResponse {
    /// Text of the first choice
    pub fn into_text(self) -> Result<String, GatewayError> {
        if let Some(error) = self.error {
            let status = error
                .code
                .as_ref()
                .and_then(|c| match c {
                    serde_json::Value::Number(n) => n.as_u64(),
                    serde_json::Value::String(s) => s.parse().ok(),
                    _ => None,
                })
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(502);
            return Err(GatewayError::http(status, error.message));
        }

        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GatewayError::InvalidResponse("response has no message content".into()))
    }
}

/// `GET /models` listing
#[derive(Debug, Deserialize)]
pub(crate) struct ModelList {
    #[serde(default)]
    pub data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelEntry {
    pub id: String,
    #[serde(default)]
    pub pricing: Option<Pricing>,
}

/// Per-token prices; gateways send them as strings or numbers
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Pricing {
    #[serde(default)]
    pub prompt: Option<serde_json::Value>,
    #[serde(default)]
    pub completion: Option<serde_json::Value>,
}

impl ModelEntry {
    /// Free tier: both prompt and completion prices are zero.
    /// Missing prices count as paid.
    pub fn is_free(&self) -> bool {
        let Some(pricing) = &self.pricing else {
            return false;
        };
        price_is_zero(pricing.prompt.as_ref()) && price_is_zero(pricing.completion.as_ref())
    }
}

fn price_is_zero(value: Option<&serde_json::Value>) -> bool {
    let price = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    price == Some(0.0)
}

/// Map a failure to send (or read) a request
pub(crate) fn from_send_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else if err.is_connect() {
        GatewayError::ConnectionError(err.to_string())
    } else if err.is_decode() {
        GatewayError::InvalidResponse(err.to_string())
    } else if let Some(status) = err.status() {
        GatewayError::http(status.as_u16(), err.to_string())
    } else {
        GatewayError::Other(err.to_string())
    }
}

/// Pass successful responses through; turn the rest into errors that keep
/// the status and body
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        body
    };

    match status.as_u16() {
        401 | 403 => Err(GatewayError::Authentication(message)),
        code => Err(GatewayError::http(code, message)),
    }
}
