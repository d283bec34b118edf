//! Notion API wire types.

use serde::Deserialize;

use postbrief_types::{ConnectorError, NoteRef};

/// Response of `POST /v1/pages`.
#[derive(Debug, Deserialize)]
pub struct CreatePageResponse {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl CreatePageResponse {
    /// Convert into the pipeline's page handle.
    ///
    /// The URL is part of the persisted-record contract (notifications
    /// link to it), so a response without one is malformed.
    pub fn into_note_ref(self) -> Result<NoteRef, ConnectorError> {
        let url = self.url.ok_or_else(|| {
            ConnectorError::InvalidResponse(format!("page {} has no url", self.id))
        })?;
        Ok(NoteRef {
            page_id: self.id,
            url,
        })
    }
}

/// Response of `PATCH /v1/blocks/{id}/children`; only inspected for
/// success, the results array is not used.
#[derive(Debug, Deserialize)]
pub struct AppendChildrenResponse {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_page_response_to_note_ref() {
        let resp: CreatePageResponse = serde_json::from_str(
            r#"{"id": "p-1", "url": "https://www.notion.so/p-1", "object": "page"}"#,
        )
        .unwrap();
        let page = resp.into_note_ref().unwrap();
        assert_eq!(page.page_id, "p-1");
        assert_eq!(page.url, "https://www.notion.so/p-1");
    }

    #[test]
    fn missing_url_is_invalid() {
        let resp: CreatePageResponse = serde_json::from_str(r#"{"id": "p-2"}"#).unwrap();
        let err = resp.into_note_ref().unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidResponse(_)));
        assert!(err.to_string().contains("p-2"));
    }

    #[test]
    fn append_response_parses() {
        let resp: AppendChildrenResponse =
            serde_json::from_str(r#"{"results": [{"id": "b-1"}]}"#).unwrap();
        assert_eq!(resp.results.len(), 1);
    }
}
