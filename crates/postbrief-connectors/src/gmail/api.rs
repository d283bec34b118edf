//! HTTP client for the Gmail REST API.
//!
//! [`GmailClient`] provides typed methods for the three operations the
//! pipeline uses: `users.messages.list`, `users.messages.get`, and
//! `users.messages.delete`. Authorization uses access tokens minted by
//! [`TokenManager`](super::auth::TokenManager).

use chrono::{Duration, Utc};
use tracing::{debug, info};

use postbrief_types::config::GmailConfig;
use postbrief_types::{ConnectorError, EmailMessage};

use super::auth::TokenManager;
use super::types::{parse_message, Message, MessageListResponse};

/// Base URL for the Gmail REST API.
const GMAIL_API_BASE: &str = "https://gmail.googleapis.com";

/// HTTP client for the Gmail API.
pub struct GmailClient {
    http: reqwest::Client,
    auth: TokenManager,
    base_url: String,
}

impl GmailClient {
    /// Create a client from the Gmail credentials.
    pub fn new(config: &GmailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth: TokenManager::new(config),
            base_url: GMAIL_API_BASE.to_owned(),
        }
    }

    /// Create a client pointing at custom API and token endpoints (for testing).
    #[cfg(test)]
    pub fn with_base_urls(config: &GmailConfig, base_url: String, token_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth: TokenManager::with_token_url(config, token_url),
            base_url,
        }
    }

    /// Fetch recent messages.
    ///
    /// Lists message ids matching an `after:` query over the lookback
    /// window, then fetches and parses each message in full. An empty
    /// mailbox yields an empty Vec, not an error.
    pub async fn fetch_recent(
        &self,
        lookback_hours: u64,
        max_results: u32,
    ) -> Result<Vec<EmailMessage>, ConnectorError> {
        let cutoff = Utc::now() - Duration::hours(lookback_hours as i64);
        let query = format!("after:{}", cutoff.format("%Y/%m/%d"));

        let token = self.auth.access_token().await?;
        let url = format!("{}/gmail/v1/users/me/messages", self.base_url);

        debug!(query = %query, max_results, "listing messages");

        let max_results_param = max_results.to_string();
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .query(&[
                ("q", query.as_str()),
                ("maxResults", max_results_param.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ConnectorError::ConnectionFailed(e.to_string()))?;

        let list: MessageListResponse = Self::parse_json(resp, "message list").await?;

        if list.messages.is_empty() {
            info!("no messages in the lookback window");
            return Ok(Vec::new());
        }

        let mut emails = Vec::with_capacity(list.messages.len());
        for message_ref in &list.messages {
            emails.push(self.get_message(&message_ref.id).await?);
        }

        info!(count = emails.len(), "fetched messages");
        Ok(emails)
    }

    /// Fetch and parse one message in full.
    pub async fn get_message(&self, id: &str) -> Result<EmailMessage, ConnectorError> {
        let token = self.auth.access_token().await?;
        let url = format!("{}/gmail/v1/users/me/messages/{id}", self.base_url);

        let resp = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .query(&[("format", "full")])
            .send()
            .await
            .map_err(|e| ConnectorError::ConnectionFailed(e.to_string()))?;

        let raw: Message = Self::parse_json(resp, "message").await?;
        parse_message(raw)
    }

    /// Permanently delete a message.
    pub async fn delete_message(&self, id: &str) -> Result<(), ConnectorError> {
        let token = self.auth.access_token().await?;
        let url = format!("{}/gmail/v1/users/me/messages/{id}", self.base_url);

        debug!(id = %id, "deleting message");

        let resp = self
            .http
            .delete(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| ConnectorError::ConnectionFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Self::error_for_status(status, resp, id).await);
        }

        Ok(())
    }

    /// Parse a successful response body, mapping failures to typed errors.
    async fn parse_json<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
        what: &str,
    ) -> Result<T, ConnectorError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::error_for_status(status, resp, what).await);
        }
        resp.json::<T>()
            .await
            .map_err(|e| ConnectorError::InvalidResponse(format!("{what}: {e}")))
    }

    /// Map a non-2xx status to a [`ConnectorError`].
    async fn error_for_status(
        status: reqwest::StatusCode,
        resp: reqwest::Response,
        subject: &str,
    ) -> ConnectorError {
        if status.as_u16() == 429 {
            let retry_ms = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<f64>().ok())
                .map(|secs| (secs * 1000.0).max(0.0) as u64)
                .unwrap_or(1000);
            return ConnectorError::RateLimited {
                retry_after_ms: retry_ms,
            };
        }

        let body = resp.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => ConnectorError::AuthFailed(body),
            404 => ConnectorError::NotFound(subject.to_string()),
            _ => ConnectorError::RequestFailed(format!("HTTP {status}: {body}")),
        }
    }
}

impl std::fmt::Debug for GmailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GmailClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
