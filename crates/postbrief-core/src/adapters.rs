//! Implementations of the collaborator seams over the real clients.

use async_trait::async_trait;

use postbrief_connectors::notion::{chunk_text, NOTION_MAX_BLOCK_LEN};
use postbrief_connectors::{GmailClient, NotionClient, SlackApiClient};
use postbrief_llm::{MessagesRequest, Provider, ProviderError};
use postbrief_types::config::{LlmConfig, SlackConfig, SummaryConfig};
use postbrief_types::{ConnectorError, EmailMessage, NoteRef};

use crate::traits::{MailSource, NoteStore, Notifier, Summarizer};

/// Output budget for summary completions.
const SUMMARY_MAX_TOKENS: u32 = 8192;

#[async_trait]
impl MailSource for GmailClient {
    async fn fetch_recent(
        &self,
        lookback_hours: u64,
        max_results: u32,
    ) -> Result<Vec<EmailMessage>, ConnectorError> {
        GmailClient::fetch_recent(self, lookback_hours, max_results).await
    }

    async fn delete(&self, id: &str) -> Result<(), ConnectorError> {
        self.delete_message(id).await
    }
}

/// Summarizes email bodies through an LLM [`Provider`].
///
/// Carries the model id and the configured language and length hints;
/// the provider itself stays a plain completion endpoint.
pub struct EmailSummarizer<P> {
    provider: P,
    model: String,
    max_chars: u32,
    language: String,
}

impl<P> EmailSummarizer<P> {
    /// Create a summarizer from the LLM and summary configuration.
    pub fn new(provider: P, llm: &LlmConfig, summary: &SummaryConfig) -> Self {
        Self {
            provider,
            model: llm.model.clone(),
            max_chars: summary.max_chars,
            language: summary.language.clone(),
        }
    }

    fn build_request(&self, email: &EmailMessage) -> MessagesRequest {
        let prompt = format!(
            "Summarize the following email in {language}, in at most {max_chars} characters. \
             Reply with the summary text only.\n\n\
             Subject: {subject}\nFrom: {sender}\n\n{body}",
            language = self.language,
            max_chars = self.max_chars,
            subject = email.subject,
            sender = email.sender,
            body = email.body,
        );

        MessagesRequest::new(&self.model, SUMMARY_MAX_TOKENS)
            .with_system("You write faithful, concise summaries of email messages.")
            .with_user_message(prompt)
    }
}

#[async_trait]
impl<P: Provider> Summarizer for EmailSummarizer<P> {
    async fn summarize(&self, email: &EmailMessage) -> Result<String, ProviderError> {
        let request = self.build_request(email);
        let response = self.provider.complete(&request).await?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(ProviderError::InvalidResponse(
                "completion contained no summary text".into(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl NoteStore for NotionClient {
    async fn store_summary(&self, title: &str, content: &str) -> Result<NoteRef, ConnectorError> {
        let page = self.create_page(title).await?;
        let chunks = chunk_text(content, NOTION_MAX_BLOCK_LEN);
        if !chunks.is_empty() {
            self.append_content(&page.page_id, &chunks).await?;
        }
        Ok(page)
    }
}

/// Posts summary notifications to the configured Slack channel.
pub struct SlackNotifier {
    client: SlackApiClient,
    channel_id: String,
}

impl SlackNotifier {
    /// Create a notifier from the Slack configuration.
    pub fn new(config: &SlackConfig) -> Self {
        Self {
            client: SlackApiClient::new(config.bot_token.clone()),
            channel_id: config.channel_id.clone(),
        }
    }

    fn format_message(email: &EmailMessage, summary: &str, page: &NoteRef) -> String {
        format!(
            "New email summary\nSubject: {}\nFrom: {}\nSummary: {}\nNotes: {}",
            email.subject, email.sender, summary, page.url
        )
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(
        &self,
        email: &EmailMessage,
        summary: &str,
        page: &NoteRef,
    ) -> Result<(), ConnectorError> {
        let text = Self::format_message(email, summary, page);
        self.client
            .chat_post_message(&self.channel_id, &text)
            .await?;
        Ok(())
    }
}
