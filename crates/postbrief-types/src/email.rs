//! The email data model flowing through the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One email message, as produced by the fetch step.
///
/// Every later step reads it without mutating it; summaries and page
/// handles are derived values, not edits to the message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailMessage {
    /// Provider-assigned message id.
    pub id: String,

    /// Conversation thread the message belongs to.
    pub thread_id: String,

    /// Subject header, or "No Subject" when absent.
    pub subject: String,

    /// From header, or "Unknown Sender" when absent.
    pub sender: String,

    /// Parsed Date header.
    pub received_at: DateTime<Utc>,

    /// Decoded plain-text body. Empty when the message has no text part.
    pub body: String,
}

/// Handle to a persisted summary page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoteRef {
    /// Page id in the document store.
    pub page_id: String,

    /// Public URL of the page, used in notifications.
    pub url: String,
}

/// Outcome of one scheduler tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Messages returned by the fetch step.
    pub fetched: usize,

    /// Messages that made it through every step.
    pub processed: usize,

    /// Messages skipped after a step failure.
    pub failed: usize,
}

impl TickReport {
    /// Record a successfully processed message.
    pub fn success(&mut self) {
        self.processed += 1;
    }

    /// Record a skipped message.
    pub fn failure(&mut self) {
        self.failed += 1;
    }
}
