//! Subcommand implementations and shared bootstrap helpers.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use postbrief_connectors::{GmailClient, NotionClient};
use postbrief_core::adapters::{EmailSummarizer, SlackNotifier};
use postbrief_core::{Pipeline, PipelineSettings, RetryConfig};
use postbrief_llm::AnthropicProvider;
use postbrief_types::Config;

pub mod run;
pub mod status;
pub mod tick;

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise info level, or debug with
/// `--verbose`.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Load `.env` (when present) and the process configuration.
///
/// A missing mandatory credential aborts startup here, before the
/// scheduler ever runs.
pub fn load_config() -> anyhow::Result<Config> {
    let _ = dotenvy::dotenv();
    Ok(Config::from_env()?)
}

/// Wire the real collaborators into a pipeline.
pub fn build_pipeline(config: &Config) -> Pipeline {
    let mail = Arc::new(GmailClient::new(&config.gmail));
    let provider = AnthropicProvider::new(config.llm.api_key.clone());
    let summarizer = Arc::new(EmailSummarizer::new(provider, &config.llm, &config.summary));
    let notes = Arc::new(NotionClient::new(&config.notion));
    let notifier = Arc::new(SlackNotifier::new(&config.slack));

    let settings = PipelineSettings {
        lookback_hours: config.schedule.lookback_hours,
        max_emails: config.schedule.max_emails,
        delete_processed: config.schedule.delete_processed,
        retry: RetryConfig::from(&config.retry),
    };

    Pipeline::new(mail, summarizer, notes, notifier, settings)
}
