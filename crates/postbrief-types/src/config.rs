//! Process configuration, loaded once from the environment.
//!
//! [`Config::from_env`] reads every setting at startup and returns an
//! immutable value that is passed by reference into the scheduler and the
//! connectors. There is no ambient global lookup and nothing is re-read at
//! runtime. A missing mandatory credential fails fast with the variable
//! name; everything else has a default.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::secret::SecretString;

/// Gmail OAuth2 credentials.
#[derive(Debug, Clone)]
pub struct GmailConfig {
    /// OAuth2 client id.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: SecretString,
    /// Long-lived refresh token used to mint access tokens.
    pub refresh_token: SecretString,
}

/// Anthropic API settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key sent as `x-api-key`.
    pub api_key: SecretString,
    /// Model id used for summaries.
    pub model: String,
}

/// Notion API settings.
#[derive(Debug, Clone)]
pub struct NotionConfig {
    /// Integration token.
    pub api_key: SecretString,
    /// Database that receives summary pages.
    pub database_id: String,
}

/// Slack API settings.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Bot token (`xoxb-...`).
    pub bot_token: SecretString,
    /// Channel that receives notifications.
    pub channel_id: String,
}

/// Scheduler and fetch-window settings.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Seconds between the end of one tick and the start of the next.
    pub interval_secs: u64,
    /// How far back the fetch query looks, in hours.
    pub lookback_hours: u64,
    /// Maximum messages fetched per tick.
    pub max_emails: u32,
    /// Whether processed messages are deleted from the mailbox.
    pub delete_processed: bool,
}

/// Retry settings shared by every collaborator call.
#[derive(Debug, Clone)]
pub struct RetrySettings {
    /// Total attempts per call, including the first (>= 1).
    pub max_attempts: u32,
    /// Base backoff delay in seconds; doubles after each failed attempt.
    pub base_delay_secs: u64,
}

/// Summary generation hints.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// Target upper bound for summary length, in characters.
    pub max_chars: u32,
    /// Language the summary should be written in (e.g. "en", "ja").
    pub language: String,
}

/// The full, immutable process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub gmail: GmailConfig,
    pub llm: LlmConfig,
    pub notion: NotionConfig,
    pub slack: SlackConfig,
    pub schedule: ScheduleConfig,
    pub retry: RetrySettings,
    pub summary: SummaryConfig,
}

impl Config {
    /// Load the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingVar`] when a mandatory credential is unset or
    /// empty, [`ConfigError::InvalidVar`] when a numeric or boolean
    /// setting fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            gmail: GmailConfig {
                client_id: required("GMAIL_CLIENT_ID")?,
                client_secret: required("GMAIL_CLIENT_SECRET")?.into(),
                refresh_token: required("GMAIL_REFRESH_TOKEN")?.into(),
            },
            llm: LlmConfig {
                api_key: required("ANTHROPIC_API_KEY")?.into(),
                model: optional("POSTBRIEF_MODEL")
                    .unwrap_or_else(|| "claude-3-5-sonnet-20241022".into()),
            },
            notion: NotionConfig {
                api_key: required("NOTION_API_KEY")?.into(),
                database_id: required("NOTION_DATABASE_ID")?,
            },
            slack: SlackConfig {
                bot_token: required("SLACK_BOT_TOKEN")?.into(),
                channel_id: required("SLACK_CHANNEL_ID")?,
            },
            schedule: ScheduleConfig {
                interval_secs: parsed_or("POSTBRIEF_INTERVAL_SECS", 300)?,
                lookback_hours: parsed_or("POSTBRIEF_LOOKBACK_HOURS", 24)?,
                max_emails: parsed_or("POSTBRIEF_MAX_EMAILS", 10)?,
                delete_processed: flag_or("POSTBRIEF_DELETE_PROCESSED", false)?,
            },
            retry: RetrySettings {
                max_attempts: parsed_or("POSTBRIEF_MAX_ATTEMPTS", 3)?,
                base_delay_secs: parsed_or("POSTBRIEF_RETRY_BASE_DELAY_SECS", 5)?,
            },
            summary: SummaryConfig {
                max_chars: parsed_or("POSTBRIEF_SUMMARY_MAX_CHARS", 500)?,
                language: optional("POSTBRIEF_SUMMARY_LANGUAGE").unwrap_or_else(|| "en".into()),
            },
        })
    }
}

/// Read a mandatory variable. Empty counts as missing.
fn required(name: &str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name.to_string())),
    }
}

/// Read an optional variable, treating empty as unset.
fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read an optional variable and parse it, falling back to a default.
fn parsed_or<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match optional(name) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            var: name.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Read an optional boolean flag ("true"/"false"/"1"/"0").
fn flag_or(name: &str, default: bool) -> Result<bool, ConfigError> {
    match optional(name).as_deref() {
        None => Ok(default),
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(ConfigError::InvalidVar {
            var: name.to_string(),
            reason: format!("expected true/false, got {other:?}"),
        }),
    }
}
