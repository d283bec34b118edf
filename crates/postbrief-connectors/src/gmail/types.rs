//! Gmail API wire types and message parsing.
//!
//! The raw message format is a tree of MIME parts with base64url-encoded
//! bodies. [`parse_message`] turns it into the pipeline's [`EmailMessage`],
//! failing with an invalid-response error when a required field is missing
//! rather than defaulting silently.

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use postbrief_types::{ConnectorError, EmailMessage};

/// Response of `users.messages.list`.
#[derive(Debug, Deserialize)]
pub struct MessageListResponse {
    /// Matching message references; absent when the mailbox has none.
    #[serde(default)]
    pub messages: Vec<MessageRef>,
}

/// A message reference from a list response.
#[derive(Debug, Deserialize)]
pub struct MessageRef {
    pub id: String,
}

/// A full message from `users.messages.get` with `format=full`.
#[derive(Debug, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(rename = "threadId")]
    pub thread_id: String,
    pub payload: MessagePart,
}

/// One node of the MIME part tree.
#[derive(Debug, Default, Deserialize)]
pub struct MessagePart {
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub body: PartBody,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

/// A single RFC 822 header.
#[derive(Debug, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Body of a part; `data` is base64url-encoded.
#[derive(Debug, Default, Deserialize)]
pub struct PartBody {
    #[serde(default)]
    pub data: Option<String>,
}

/// Convert a raw Gmail message into the pipeline's [`EmailMessage`].
///
/// Subject and sender fall back to "No Subject" / "Unknown Sender"; a
/// missing or unparseable `Date` header is an error, since the timestamp
/// is a required field of the work item.
pub fn parse_message(message: Message) -> Result<EmailMessage, ConnectorError> {
    let subject = header_value(&message.payload.headers, "subject")
        .unwrap_or("No Subject")
        .to_owned();
    let sender = header_value(&message.payload.headers, "from")
        .unwrap_or("Unknown Sender")
        .to_owned();

    let date = header_value(&message.payload.headers, "date").ok_or_else(|| {
        ConnectorError::InvalidResponse(format!("message {}: missing Date header", message.id))
    })?;
    let received_at: DateTime<Utc> = DateTime::parse_from_rfc2822(date)
        .map_err(|e| {
            ConnectorError::InvalidResponse(format!(
                "message {}: unparseable Date header: {e}",
                message.id
            ))
        })?
        .with_timezone(&Utc);

    let body = extract_text_body(&message.payload)?.unwrap_or_default();

    Ok(EmailMessage {
        id: message.id,
        thread_id: message.thread_id,
        subject,
        sender,
        received_at,
        body,
    })
}

/// Case-insensitive header lookup.
fn header_value<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

/// Find and decode the first `text/plain` body in the part tree.
fn extract_text_body(payload: &MessagePart) -> Result<Option<String>, ConnectorError> {
    if payload.mime_type.starts_with("text/plain") {
        if let Some(data) = payload.body.data.as_deref() {
            return decode_body(data).map(Some);
        }
    }

    for part in &payload.parts {
        if let Some(body) = extract_text_body(part)? {
            return Ok(Some(body));
        }
    }

    // A single-part message may carry its body without a mimeType match.
    if payload.parts.is_empty() {
        if let Some(data) = payload.body.data.as_deref() {
            return decode_body(data).map(Some);
        }
    }

    Ok(None)
}

/// Decode a base64url body, tolerating both padded and unpadded data.
fn decode_body(data: &str) -> Result<String, ConnectorError> {
    let bytes = URL_SAFE
        .decode(data)
        .or_else(|_| URL_SAFE_NO_PAD.decode(data))
        .map_err(|e| ConnectorError::InvalidResponse(format!("body decode: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| ConnectorError::InvalidResponse(format!("body is not utf-8: {e}")))
}
