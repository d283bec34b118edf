//! OAuth2 access-token refresh for the Gmail API.
//!
//! Gmail access tokens are short-lived; the long-lived refresh token from
//! configuration is exchanged for a fresh access token on demand. The
//! current token is cached and reused until shortly before expiry.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use postbrief_types::config::GmailConfig;
use postbrief_types::{ConnectorError, SecretString};

/// Google's OAuth2 token endpoint.
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Refresh this long before the reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Successful token-endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Lifetime of the token in seconds.
    expires_in: u64,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Mints and caches Gmail access tokens.
pub struct TokenManager {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: SecretString,
    refresh_token: SecretString,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    /// Create a token manager from the Gmail credentials.
    pub fn new(config: &GmailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: TOKEN_ENDPOINT.to_owned(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            refresh_token: config.refresh_token.clone(),
            cached: Mutex::new(None),
        }
    }

    /// Create a token manager pointing at a custom token endpoint (for testing).
    #[cfg(test)]
    pub fn with_token_url(config: &GmailConfig, token_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            refresh_token: config.refresh_token.clone(),
            cached: Mutex::new(None),
        }
    }

    /// Return a valid access token, refreshing if the cached one is
    /// missing or about to expire.
    pub async fn access_token(&self) -> Result<String, ConnectorError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.access_token.clone());
            }
        }

        let refreshed = self.refresh().await?;
        let access_token = refreshed.access_token.clone();
        let lifetime = Duration::from_secs(refreshed.expires_in);
        *cached = Some(CachedToken {
            access_token: refreshed.access_token,
            expires_at: Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN),
        });

        Ok(access_token)
    }

    /// Exchange the refresh token for a new access token.
    async fn refresh(&self) -> Result<TokenResponse, ConnectorError> {
        debug!("refreshing gmail access token");

        let resp = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose()),
                ("refresh_token", self.refresh_token.expose()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| ConnectorError::ConnectionFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            // The token endpoint reports bad credentials as 400/401.
            if status.as_u16() == 400 || status.as_u16() == 401 {
                return Err(ConnectorError::AuthFailed(format!(
                    "token refresh rejected ({status}): {body}"
                )));
            }
            return Err(ConnectorError::RequestFailed(format!(
                "HTTP {status}: {body}"
            )));
        }

        resp.json::<TokenResponse>()
            .await
            .map_err(|e| ConnectorError::InvalidResponse(format!("token response: {e}")))
    }
}
