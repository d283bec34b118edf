//! HTTP client for the Notion API.
//!
//! [`NotionClient`] covers the two calls the pipeline needs: creating a
//! page in the configured database and appending paragraph blocks to it.

use serde_json::json;
use tracing::{debug, info};

use postbrief_types::config::NotionConfig;
use postbrief_types::{ConnectorError, NoteRef, SecretString};

use super::blocks::paragraph_blocks;
use super::types::{AppendChildrenResponse, CreatePageResponse};

/// Base URL for the Notion API.
const NOTION_API_BASE: &str = "https://api.notion.com";

/// API version header required on every request.
const NOTION_VERSION: &str = "2022-06-28";

/// HTTP client for the Notion API.
pub struct NotionClient {
    http: reqwest::Client,
    api_key: SecretString,
    database_id: String,
    base_url: String,
}

impl NotionClient {
    /// Create a client for the configured database.
    pub fn new(config: &NotionConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            database_id: config.database_id.clone(),
            base_url: NOTION_API_BASE.to_owned(),
        }
    }

    /// Create a client pointing at a custom base URL (for testing).
    #[cfg(test)]
    pub fn with_base_url(config: &NotionConfig, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            database_id: config.database_id.clone(),
            base_url,
        }
    }

    /// Create a page titled `title` in the database.
    pub async fn create_page(&self, title: &str) -> Result<NoteRef, ConnectorError> {
        let url = format!("{}/v1/pages", self.base_url);

        let body = json!({
            "parent": {"database_id": self.database_id},
            "properties": {
                "Name": {"title": [{"text": {"content": title}}]}
            }
        });

        debug!(title = %title, "creating page");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| ConnectorError::ConnectionFailed(e.to_string()))?;

        let created: CreatePageResponse = Self::parse_json(resp, "create page").await?;
        let page = created.into_note_ref()?;

        info!(page_id = %page.page_id, "page created");
        Ok(page)
    }

    /// Append the given text chunks as paragraph blocks.
    pub async fn append_content(
        &self,
        page_id: &str,
        chunks: &[String],
    ) -> Result<(), ConnectorError> {
        let url = format!("{}/v1/blocks/{page_id}/children", self.base_url);

        debug!(page_id = %page_id, blocks = chunks.len(), "appending blocks");

        let resp = self
            .http
            .patch(&url)
            .bearer_auth(self.api_key.expose())
            .header("Notion-Version", NOTION_VERSION)
            .json(&json!({"children": paragraph_blocks(chunks)}))
            .send()
            .await
            .map_err(|e| ConnectorError::ConnectionFailed(e.to_string()))?;

        let _: AppendChildrenResponse = Self::parse_json(resp, "append blocks").await?;
        Ok(())
    }

    /// Parse a successful response body, mapping failures to typed errors.
    async fn parse_json<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
        what: &str,
    ) -> Result<T, ConnectorError> {
        let status = resp.status();
        if !status.is_success() {
            if status.as_u16() == 429 {
                let retry_ms = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<f64>().ok())
                    .map(|secs| (secs * 1000.0).max(0.0) as u64)
                    .unwrap_or(1000);
                return Err(ConnectorError::RateLimited {
                    retry_after_ms: retry_ms,
                });
            }
            let body = resp.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => ConnectorError::AuthFailed(body),
                404 => ConnectorError::NotFound(what.to_string()),
                _ => ConnectorError::RequestFailed(format!("HTTP {status}: {body}")),
            });
        }
        resp.json::<T>()
            .await
            .map_err(|e| ConnectorError::InvalidResponse(format!("{what}: {e}")))
    }
}

impl std::fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionClient")
            .field("database_id", &self.database_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}
