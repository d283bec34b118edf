//! Collaborator seams the pipeline is written against.
//!
//! The unit of work only sees these four traits; the real HTTP clients
//! implement them in [`adapters`](crate::adapters) and tests substitute
//! mocks.

use async_trait::async_trait;

use postbrief_llm::ProviderError;
use postbrief_types::{ConnectorError, EmailMessage, NoteRef};

/// Source of work items, and their eventual cleanup.
#[async_trait]
pub trait MailSource: Send + Sync {
    /// Fetch up to `max_results` messages from the lookback window.
    /// An empty mailbox is an empty Vec, not an error.
    async fn fetch_recent(
        &self,
        lookback_hours: u64,
        max_results: u32,
    ) -> Result<Vec<EmailMessage>, ConnectorError>;

    /// Remove a processed message from the mailbox.
    async fn delete(&self, id: &str) -> Result<(), ConnectorError>;
}

/// Produces a summary of one message.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, email: &EmailMessage) -> Result<String, ProviderError>;
}

/// Persists a titled summary and returns a handle to the stored record.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn store_summary(&self, title: &str, content: &str) -> Result<NoteRef, ConnectorError>;
}

/// Announces a stored summary.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        email: &EmailMessage,
        summary: &str,
        page: &NoteRef,
    ) -> Result<(), ConnectorError>;
}
