use crate::config::GatewayConfig;
use crate::error::ProviderError;
use crate::gemini::types::{Content, ErrorEnvelope, GenerateContentRequest};
use async_trait::async_trait;
use serde_json::Value;

/// The single generation call both gateways depend on.
///
/// Implementations return the provider's raw JSON; turning it into text is the
/// caller's job (see [`crate::gemini::extract_text`]).
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Model id used for generation.
    fn model(&self) -> &str;

    /// Submits `contents` (oldest turn first) and returns the raw response.
    async fn generate_content(
        &self,
        contents: Vec<Content>,
    ) -> Result<Value, ProviderError>;
}

/// Gemini REST client for the `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    #[must_use]
    pub fn with_http_client(
        config: &GatewayConfig,
        http: reqwest::Client,
    ) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate_content(
        &self,
        contents: Vec<Content>,
    ) -> Result<Value, ProviderError> {
        let request = GenerateContentRequest { contents };

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Gemini: {}", e);
                ProviderError::from(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("Gemini API error (status {}): {}", status, body);
            return Err(error_from_body(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            ProviderError::new(format!("Failed to parse Gemini response: {e}")).with_status(status.as_u16())
        })
    }
}

/// Uses the Google error envelope's message when present, the raw body otherwise.
fn error_from_body(
    status: u16,
    body: &str,
) -> ProviderError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            tracing::warn!(
                "Gemini rejected the request: code={:?} status={:?}",
                envelope.error.code,
                envelope.error.status
            );
            envelope.error.message
        }
        Err(_) => format!("Gemini API error (status {status}): {body}"),
    };
    ProviderError::new(message).with_status(status)
}
