//! Slack Web API client.
//!
//! [`SlackApiClient`] provides a typed wrapper for `chat.postMessage`,
//! the one Web API method the pipeline uses.

use serde::Deserialize;
use tracing::debug;

use postbrief_types::{ConnectorError, SecretString};

/// Base URL for the Slack Web API.
const SLACK_API_BASE: &str = "https://slack.com/api";

/// Response envelope of `chat.postMessage`.
///
/// Slack reports failure inside a 200 response via `ok: false` plus an
/// error code string.
#[derive(Debug, Deserialize)]
struct ChatPostMessageResponse {
    ok: bool,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the Slack Web API.
pub struct SlackApiClient {
    http: reqwest::Client,
    bot_token: SecretString,
    base_url: String,
}

impl SlackApiClient {
    /// Create a new client with the given bot token.
    pub fn new(bot_token: SecretString) -> Self {
        Self {
            http: reqwest::Client::new(),
            bot_token,
            base_url: SLACK_API_BASE.to_owned(),
        }
    }

    /// Create a client pointing at a custom base URL (for testing).
    #[cfg(test)]
    pub fn with_base_url(bot_token: SecretString, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            bot_token,
            base_url,
        }
    }

    /// Post a message to a channel.
    ///
    /// Returns the message timestamp (`ts`) on success.
    pub async fn chat_post_message(
        &self,
        channel: &str,
        text: &str,
    ) -> Result<String, ConnectorError> {
        let url = format!("{}/chat.postMessage", self.base_url);

        let body = serde_json::json!({
            "channel": channel,
            "text": text,
        });

        debug!(channel = %channel, "posting message");

        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.bot_token.expose()))
            .header("Content-Type", "application/json; charset=utf-8")
            .json(&body)
            .send()
            .await
            .map_err(|e| ConnectorError::ConnectionFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ConnectorError::RequestFailed(format!(
                "HTTP {status}: {body}"
            )));
        }

        let result: ChatPostMessageResponse = resp
            .json()
            .await
            .map_err(|e| ConnectorError::InvalidResponse(format!("chat.postMessage: {e}")))?;

        if !result.ok {
            let err_msg = result.error.unwrap_or_else(|| "unknown error".into());
            // invalid_auth arrives inside a 200 response.
            if err_msg == "invalid_auth" || err_msg == "not_authed" || err_msg == "token_revoked" {
                return Err(ConnectorError::AuthFailed(format!(
                    "chat.postMessage failed: {err_msg}"
                )));
            }
            return Err(ConnectorError::RequestFailed(format!(
                "chat.postMessage failed: {err_msg}"
            )));
        }

        result.ts.ok_or_else(|| {
            ConnectorError::InvalidResponse("chat.postMessage returned ok but no ts".into())
        })
    }
}

impl std::fmt::Debug for SlackApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
