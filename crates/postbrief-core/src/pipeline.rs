//! The unit of work: one pass over the mailbox.
//!
//! [`Pipeline::run_once`] fetches recent messages and runs each one
//! through summarize → persist → notify → optional cleanup. Every
//! collaborator call goes through the retry wrapper; a step failure for
//! one message is logged and skips only that message.

use std::sync::Arc;

use tracing::{error, info, warn};

use postbrief_types::{EmailMessage, TickReport};

use crate::error::{PipelineStep, StepError};
use crate::retry::{retry, RetryConfig};
use crate::traits::{MailSource, NoteStore, Notifier, Summarizer};

/// Pipeline knobs, fixed at construction.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// How far back the fetch query looks, in hours.
    pub lookback_hours: u64,
    /// Maximum messages per tick.
    pub max_emails: u32,
    /// Whether processed messages are deleted from the mailbox.
    pub delete_processed: bool,
    /// Retry policy applied to every collaborator call.
    pub retry: RetryConfig,
}

/// The composed unit of work.
pub struct Pipeline {
    mail: Arc<dyn MailSource>,
    summarizer: Arc<dyn Summarizer>,
    notes: Arc<dyn NoteStore>,
    notifier: Arc<dyn Notifier>,
    settings: PipelineSettings,
}

impl Pipeline {
    /// Compose a pipeline from its collaborators.
    pub fn new(
        mail: Arc<dyn MailSource>,
        summarizer: Arc<dyn Summarizer>,
        notes: Arc<dyn NoteStore>,
        notifier: Arc<dyn Notifier>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            mail,
            summarizer,
            notes,
            notifier,
            settings,
        }
    }

    /// Run one tick: fetch, then process each message independently.
    ///
    /// Only a fetch failure (after retries) fails the tick; per-message
    /// failures are counted in the report and logged.
    pub async fn run_once(&self) -> Result<TickReport, StepError> {
        let settings = &self.settings;

        let emails = retry(&settings.retry, "fetch", || {
            self.mail
                .fetch_recent(settings.lookback_hours, settings.max_emails)
        })
        .await
        .map_err(|e| StepError::new(PipelineStep::Fetch, e))?;

        let mut report = TickReport {
            fetched: emails.len(),
            ..TickReport::default()
        };

        if emails.is_empty() {
            info!("no new emails to process");
            return Ok(report);
        }

        info!(count = emails.len(), "processing emails");

        for email in &emails {
            match self.process_one(email).await {
                Ok(()) => report.success(),
                Err(err) => {
                    error!(
                        id = %email.id,
                        subject = %email.subject,
                        error = %err,
                        "failed to process email, skipping"
                    );
                    report.failure();
                }
            }
        }

        Ok(report)
    }

    /// Run one message through every step.
    async fn process_one(&self, email: &EmailMessage) -> Result<(), StepError> {
        let retry_config = &self.settings.retry;

        let summary = retry(retry_config, "summarize", || {
            self.summarizer.summarize(email)
        })
        .await
        .map_err(|e| StepError::new(PipelineStep::Summarize, e))?;

        let page = retry(retry_config, "persist", || {
            self.notes.store_summary(&email.subject, &summary)
        })
        .await
        .map_err(|e| StepError::new(PipelineStep::Persist, e))?;

        retry(retry_config, "notify", || {
            self.notifier.notify(email, &summary, &page)
        })
        .await
        .map_err(|e| StepError::new(PipelineStep::Notify, e))?;

        if self.settings.delete_processed {
            // A failed delete leaves the message to be re-fetched next
            // tick; the summary is already stored, so the message is
            // still counted as processed.
            match retry(retry_config, "cleanup", || self.mail.delete(&email.id)).await {
                Ok(()) => info!(id = %email.id, "deleted processed email"),
                Err(err) => {
                    warn!(id = %email.id, error = %err, "failed to delete processed email")
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use postbrief_llm::ProviderError;
    use postbrief_types::{ConnectorError, NoteRef};

    fn email(id: &str) -> EmailMessage {
        EmailMessage {
            id: id.into(),
            thread_id: format!("t-{id}"),
            subject: format!("subject {id}"),
            sender: "sender@example.com".into(),
            received_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            body: format!("body {id}"),
        }
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig {
            max_attempts: 2,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            retry_all: false,
        }
    }

    fn settings(delete_processed: bool) -> PipelineSettings {
        PipelineSettings {
            lookback_hours: 24,
            max_emails: 10,
            delete_processed,
            retry: fast_retry(),
        }
    }

    #[derive(Default)]
    struct MockMail {
        inbox: Vec<EmailMessage>,
        fetch_calls: AtomicU32,
        deleted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MailSource for MockMail {
        async fn fetch_recent(
            &self,
            _lookback_hours: u64,
            _max_results: u32,
        ) -> Result<Vec<EmailMessage>, ConnectorError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.inbox.clone())
        }

        async fn delete(&self, id: &str) -> Result<(), ConnectorError> {
            self.deleted.lock().unwrap().push(id.to_string());
            Ok(())
        }
    }

    /// Fails (permanently) for ids in `fail_ids`, succeeds otherwise.
    #[derive(Default)]
    struct MockSummarizer {
        fail_ids: Vec<String>,
        calls: AtomicU32,
    }

    #[async_trait]
    impl Summarizer for MockSummarizer {
        async fn summarize(&self, email: &EmailMessage) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_ids.contains(&email.id) {
                return Err(ProviderError::InvalidResponse("no text".into()));
            }
            Ok(format!("summary of {}", email.id))
        }
    }

    #[derive(Default)]
    struct MockNotes {
        calls: AtomicU32,
    }

    #[async_trait]
    impl NoteStore for MockNotes {
        async fn store_summary(
            &self,
            title: &str,
            _content: &str,
        ) -> Result<NoteRef, ConnectorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(NoteRef {
                page_id: format!("page-for-{title}"),
                url: format!("https://notes.example.com/{title}"),
            })
        }
    }

    #[derive(Default)]
    struct MockNotifier {
        calls: AtomicU32,
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn notify(
            &self,
            _email: &EmailMessage,
            _summary: &str,
            _page: &NoteRef,
        ) -> Result<(), ConnectorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Fixture {
        mail: Arc<MockMail>,
        summarizer: Arc<MockSummarizer>,
        notes: Arc<MockNotes>,
        notifier: Arc<MockNotifier>,
        pipeline: Pipeline,
    }

    fn fixture(inbox: Vec<EmailMessage>, fail_ids: Vec<String>, delete: bool) -> Fixture {
        let mail = Arc::new(MockMail {
            inbox,
            ..MockMail::default()
        });
        let summarizer = Arc::new(MockSummarizer {
            fail_ids,
            ..MockSummarizer::default()
        });
        let notes = Arc::new(MockNotes::default());
        let notifier = Arc::new(MockNotifier::default());
        let pipeline = Pipeline::new(
            mail.clone(),
            summarizer.clone(),
            notes.clone(),
            notifier.clone(),
            settings(delete),
        );
        Fixture {
            mail,
            summarizer,
            notes,
            notifier,
            pipeline,
        }
    }

    #[tokio::test]
    async fn empty_fetch_makes_no_downstream_calls() {
        let f = fixture(vec![], vec![], true);
        let report = f.pipeline.run_once().await.unwrap();
        assert_eq!(report, TickReport::default());
        assert_eq!(f.summarizer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.notes.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.notifier.calls.load(Ordering::SeqCst), 0);
        assert!(f.mail.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn all_messages_flow_through_every_step() {
        let f = fixture(vec![email("a"), email("b")], vec![], true);
        let report = f.pipeline.run_once().await.unwrap();
        assert_eq!(report.fetched, 2);
        assert_eq!(report.processed, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(f.notes.calls.load(Ordering::SeqCst), 2);
        assert_eq!(f.notifier.calls.load(Ordering::SeqCst), 2);
        assert_eq!(*f.mail.deleted.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn middle_failure_skips_only_that_message() {
        let f = fixture(
            vec![email("a"), email("b"), email("c")],
            vec!["b".to_string()],
            false,
        );
        let report = f.pipeline.run_once().await.unwrap();
        assert_eq!(report.fetched, 3);
        assert_eq!(report.processed, 2);
        assert_eq!(report.failed, 1);
        // Items a and c were still attempted end to end.
        assert_eq!(f.notes.calls.load(Ordering::SeqCst), 2);
        assert_eq!(f.notifier.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn delete_is_skipped_when_disabled() {
        let f = fixture(vec![email("a")], vec![], false);
        f.pipeline.run_once().await.unwrap();
        assert!(f.mail.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_fails_the_tick() {
        struct BrokenMail;

        #[async_trait]
        impl MailSource for BrokenMail {
            async fn fetch_recent(
                &self,
                _lookback_hours: u64,
                _max_results: u32,
            ) -> Result<Vec<EmailMessage>, ConnectorError> {
                Err(ConnectorError::AuthFailed("expired".into()))
            }

            async fn delete(&self, _id: &str) -> Result<(), ConnectorError> {
                unreachable!("delete must not be called when fetch fails")
            }
        }

        let pipeline = Pipeline::new(
            Arc::new(BrokenMail),
            Arc::new(MockSummarizer::default()),
            Arc::new(MockNotes::default()),
            Arc::new(MockNotifier::default()),
            settings(false),
        );
        let err = pipeline.run_once().await.unwrap_err();
        assert_eq!(err.step, PipelineStep::Fetch);
        assert!(err.to_string().contains("fetch failed"));
    }

    #[tokio::test]
    async fn transient_summarize_failure_is_retried_within_the_item() {
        /// Fails once with a transient error, then succeeds.
        struct FlakySummarizer {
            calls: AtomicU32,
        }

        #[async_trait]
        impl Summarizer for FlakySummarizer {
            async fn summarize(&self, email: &EmailMessage) -> Result<String, ProviderError> {
                let n = self.calls.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    return Err(ProviderError::RequestFailed("HTTP 503: busy".into()));
                }
                Ok(format!("summary of {}", email.id))
            }
        }

        let summarizer = Arc::new(FlakySummarizer {
            calls: AtomicU32::new(0),
        });
        let mail = Arc::new(MockMail {
            inbox: vec![email("a")],
            ..MockMail::default()
        });
        let pipeline = Pipeline::new(
            mail,
            summarizer.clone(),
            Arc::new(MockNotes::default()),
            Arc::new(MockNotifier::default()),
            settings(false),
        );

        let report = pipeline.run_once().await.unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 2);
    }
}
