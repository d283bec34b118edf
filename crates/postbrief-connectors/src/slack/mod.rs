//! Slack connector.
//!
//! A single-purpose Web API client: the pipeline only posts
//! notifications, so [`api`] wraps `chat.postMessage` and nothing else.

pub mod api;

pub use api::SlackApiClient;
