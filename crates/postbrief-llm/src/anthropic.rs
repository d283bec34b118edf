//! Anthropic Messages API provider implementation.

use async_trait::async_trait;
use tracing::debug;

use postbrief_types::SecretString;

use crate::error::{ProviderError, Result};
use crate::provider::Provider;
use crate::types::{MessagesRequest, MessagesResponse};

/// Base URL for the Anthropic API.
const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";

/// API version header required on every request.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Client for the Anthropic `/v1/messages` endpoint.
pub struct AnthropicProvider {
    http: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl AnthropicProvider {
    /// Create a provider with the given API key.
    pub fn new(api_key: SecretString) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: ANTHROPIC_API_BASE.to_owned(),
        }
    }

    /// Create a provider pointing at a custom base URL (for testing).
    #[cfg(test)]
    pub fn with_base_url(api_key: SecretString, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    /// Returns the messages endpoint URL.
    fn messages_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/v1/messages")
    }

    /// Ensure an API key is present before making a request.
    fn check_api_key(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "set ANTHROPIC_API_KEY env var".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: &MessagesRequest) -> Result<MessagesResponse> {
        self.check_api_key()?;
        let url = self.messages_url();

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending messages request"
        );

        let response = self
            .http
            .post(&url)
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            if status.as_u16() == 429 {
                let retry_ms = parse_retry_after_header(&response).unwrap_or(1000);
                return Err(ProviderError::RateLimited {
                    retry_after_ms: retry_ms,
                });
            }

            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(ProviderError::AuthFailed(body));
            }

            if status.as_u16() == 404 {
                return Err(ProviderError::ModelNotFound(format!(
                    "model '{}': {}",
                    request.model, body
                )));
            }

            return Err(ProviderError::RequestFailed(format!(
                "HTTP {status}: {body}"
            )));
        }

        let messages_response: MessagesResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("failed to parse response: {e}"))
        })?;

        debug!(
            model = %messages_response.model,
            blocks = messages_response.content.len(),
            "messages response received"
        );

        Ok(messages_response)
    }
}

/// Extract a retry delay from the `Retry-After` header, in milliseconds.
///
/// The header value can be seconds (integer or float) or an HTTP-date;
/// only the numeric form is handled here.
fn parse_retry_after_header(response: &reqwest::Response) -> Option<u64> {
    let header_val = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())?;

    if let Ok(secs) = header_val.parse::<f64>() {
        return Some((secs * 1000.0).max(0.0) as u64);
    }

    None
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .finish()
    }
}
